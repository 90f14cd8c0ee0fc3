//! MySQL implementation of the user repository.

use async_trait::async_trait;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;

use super::push_id_list;
use crate::config::ApiConfig;
use crate::domain::entities::UserDetail;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct UserRow {
    id: u64,
    user_login: String,
    user_nicename: String,
    user_email: String,
    user_url: String,
    registered: Option<String>,
    user_status: i32,
    display_name: String,
    description: String,
}

impl From<UserRow> for UserDetail {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            login: row.user_login,
            nicename: row.user_nicename,
            email: row.user_email,
            url: row.user_url,
            registered: row.registered.unwrap_or_default(),
            status: row.user_status,
            display_name: row.display_name,
            description: row.description,
        }
    }
}

/// Users joined with their `description` meta. The meta condition lives in
/// the join so users without a description are still returned.
pub fn build_users_query(cfg: &ApiConfig, ids: &[u64]) -> QueryBuilder<'static, MySql> {
    let mut qb = QueryBuilder::<MySql>::new(format!(
        "SELECT u.ID AS id, u.user_login, u.user_nicename, u.user_email, u.user_url, \
         CAST(DATE_FORMAT(u.user_registered, '%Y-%m-%dT%H:%i:%s') AS CHAR) AS registered, \
         u.user_status, u.display_name, COALESCE(um.meta_value, '') AS description \
         FROM {} AS u \
         LEFT JOIN {} AS um ON um.user_id = u.ID AND um.meta_key = 'description' \
         WHERE u.ID IN ",
        cfg.table("users"),
        cfg.table("usermeta"),
    ));
    push_id_list(&mut qb, ids);
    qb
}

/// MySQL repository for post authors.
pub struct MySqlUserRepository {
    pool: Arc<MySqlPool>,
}

impl MySqlUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<MySqlPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_ids(
        &self,
        cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<HashMap<u64, UserDetail>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = build_users_query(cfg, ids)
            .build_query_as::<UserRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.id, UserDetail::from(row)))
            .collect())
    }
}
