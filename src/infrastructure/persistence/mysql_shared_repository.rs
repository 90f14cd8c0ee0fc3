//! MySQL implementation of the shared (options and post meta) repository.

use async_trait::async_trait;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};
use std::sync::Arc;

use super::push_id_list;
use crate::config::ApiConfig;
use crate::domain::entities::WpOption;
use crate::domain::repositories::{PostMetas, SharedRepository};
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct OptionRow {
    option_id: u64,
    option_name: String,
    option_value: String,
    autoload: String,
}

#[derive(Debug, FromRow)]
struct PostMetaRow {
    post_id: u64,
    meta_key: Option<String>,
    meta_value: Option<String>,
}

/// Groups meta rows per post. The first occurrence of a key wins.
fn group_metas(rows: Vec<PostMetaRow>) -> PostMetas {
    let mut metas = PostMetas::new();

    for row in rows {
        let Some(key) = row.meta_key else { continue };
        metas
            .entry(row.post_id)
            .or_default()
            .entry(key)
            .or_insert_with(|| row.meta_value.unwrap_or_default());
    }

    metas
}

/// MySQL repository for `{prefix}options` and `{prefix}postmeta`.
pub struct MySqlSharedRepository {
    pool: Arc<MySqlPool>,
}

impl MySqlSharedRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<MySqlPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SharedRepository for MySqlSharedRepository {
    async fn load_option(
        &self,
        cfg: &ApiConfig,
        name: &str,
    ) -> Result<Option<WpOption>, AppError> {
        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT option_id, option_name, option_value, autoload FROM {} WHERE option_name = ",
            cfg.table("options")
        ));
        qb.push_bind(name.to_string());
        qb.push(" LIMIT 1");

        let row = qb
            .build_query_as::<OptionRow>()
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(|r| WpOption {
            option_id: r.option_id,
            option_name: r.option_name,
            option_value: r.option_value,
            autoload: r.autoload,
        }))
    }

    async fn post_metas_by_post_ids(
        &self,
        cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<PostMetas, AppError> {
        if ids.is_empty() {
            return Ok(PostMetas::new());
        }

        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT post_id, meta_key, meta_value FROM {} WHERE post_id IN ",
            cfg.table("postmeta")
        ));
        push_id_list(&mut qb, ids);
        qb.push(" ORDER BY meta_id ASC");

        let rows = qb
            .build_query_as::<PostMetaRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(group_metas(rows))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
