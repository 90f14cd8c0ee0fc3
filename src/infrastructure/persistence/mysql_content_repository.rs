//! MySQL implementation of the content repository.

use async_trait::async_trait;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::domain::entities::{
    CommentRecord, ContentKind, ContentRecord, ListFilter, OrderBy, media::mime_types_for,
};
use super::{push_id_list, push_str_list};
use crate::domain::repositories::ContentRepository;
use crate::error::AppError;
use crate::utils::permalink::{generate_excerpt, permalink};

/// Columns of `{prefix}posts` mapped onto [`ContentRow`].
///
/// Dates are formatted in SQL so zero dates survive decoding.
const CONTENT_COLUMNS: &str = "p.ID AS id, p.post_author, \
    CAST(DATE_FORMAT(p.post_date, '%Y-%m-%dT%H:%i:%s') AS CHAR) AS post_date, \
    CAST(DATE_FORMAT(p.post_date_gmt, '%Y-%m-%dT%H:%i:%s') AS CHAR) AS post_date_gmt, \
    p.post_content, p.post_title, p.post_excerpt, p.post_status, p.comment_status, \
    p.ping_status, p.post_password, p.post_name, \
    CAST(DATE_FORMAT(p.post_modified, '%Y-%m-%dT%H:%i:%s') AS CHAR) AS post_modified, \
    CAST(DATE_FORMAT(p.post_modified_gmt, '%Y-%m-%dT%H:%i:%s') AS CHAR) AS post_modified_gmt, \
    p.post_parent, p.guid, p.menu_order, p.post_type, p.post_mime_type";

#[derive(Debug, FromRow)]
struct ContentRow {
    id: u64,
    post_author: u64,
    post_date: Option<String>,
    post_date_gmt: Option<String>,
    post_content: String,
    post_title: String,
    post_excerpt: String,
    post_status: String,
    comment_status: String,
    ping_status: String,
    post_password: String,
    post_name: String,
    post_modified: Option<String>,
    post_modified_gmt: Option<String>,
    post_parent: u64,
    guid: String,
    menu_order: i32,
    post_type: String,
    post_mime_type: String,
}

impl ContentRow {
    fn into_record(self, cfg: &ApiConfig) -> ContentRecord {
        let kind = match self.post_type.as_str() {
            "page" => ContentKind::Page,
            "attachment" => ContentKind::Attachment,
            _ => ContentKind::Post,
        };
        let date = self.post_date.unwrap_or_default();
        let link = permalink(
            cfg,
            kind,
            self.id,
            &self.post_name,
            &self.post_type,
            &date,
        );
        let excerpt = if self.post_excerpt.is_empty() {
            generate_excerpt(&self.post_content)
        } else {
            self.post_excerpt
        };

        ContentRecord {
            id: self.id,
            author: self.post_author,
            date,
            date_gmt: self.post_date_gmt.unwrap_or_default(),
            content: self.post_content,
            title: self.post_title,
            excerpt,
            status: self.post_status,
            comment_status: self.comment_status,
            ping_status: self.ping_status,
            password: self.post_password,
            slug: self.post_name,
            modified: self.post_modified.unwrap_or_default(),
            modified_gmt: self.post_modified_gmt.unwrap_or_default(),
            parent: self.post_parent,
            guid: self.guid,
            menu_order: i64::from(self.menu_order),
            post_type: self.post_type,
            mime_type: self.post_mime_type,
            link,
        }
    }
}

#[derive(Debug, FromRow)]
struct CommentRow {
    id: u64,
    post_id: u64,
    parent: u64,
    user_id: u64,
    author_name: String,
    author_email: String,
    author_url: String,
    date: Option<String>,
    content: String,
}

impl From<CommentRow> for CommentRecord {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            parent: row.parent,
            user_id: row.user_id,
            author_name: row.author_name,
            author_email: row.author_email,
            author_url: row.author_url,
            date: row.date.unwrap_or_default(),
            content: row.content,
        }
    }
}

#[derive(Debug, FromRow)]
struct RevisionRow {
    id: u64,
    parent: u64,
}

/// Escapes `LIKE` wildcards in a user-supplied search term.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Builds the id query of a collection request.
///
/// # Errors
///
/// Returns [`AppError::InvalidParameter`] when the ordering key needs a
/// parameter the filter lacks.
pub fn build_id_query(
    cfg: &ApiConfig,
    filter: &ListFilter,
) -> Result<QueryBuilder<'static, MySql>, AppError> {
    filter.validate_ordering()?;

    let relationships = cfg.table("term_relationships");
    let mut qb = QueryBuilder::<MySql>::new(format!("SELECT p.ID FROM {} AS p", cfg.table("posts")));

    if filter.taxonomy_include.is_some() {
        qb.push(format!(
            " LEFT JOIN {} AS tr ON tr.object_id = p.ID",
            relationships
        ));
    }

    qb.push(" WHERE p.post_type = ");
    qb.push_bind(filter.kind.as_str());

    if !filter.status.is_empty() {
        qb.push(" AND p.post_status IN ");
        push_str_list(&mut qb, &filter.status);
    }

    if let Some(term) = filter.search_term() {
        let pattern = like_pattern(term);
        qb.push(" AND (p.post_title LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR p.post_excerpt LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR p.post_content LIKE ");
        qb.push_bind(pattern);
        qb.push(") AND p.post_password = ''");
    }

    if let Some(before) = filter.before {
        qb.push(" AND p.post_date < ");
        qb.push_bind(before);
    }

    if let Some(after) = filter.after {
        qb.push(" AND p.post_date > ");
        qb.push_bind(after);
    }

    if !filter.include.is_empty() {
        qb.push(" AND p.ID IN ");
        push_id_list(&mut qb, &filter.include);
    }

    if !filter.exclude.is_empty() {
        qb.push(" AND p.ID NOT IN ");
        push_id_list(&mut qb, &filter.exclude);
    }

    if !filter.slugs.is_empty() {
        qb.push(" AND p.post_name IN ");
        push_str_list(&mut qb, &filter.slugs);
    }

    if !filter.authors.is_empty() {
        qb.push(" AND p.post_author IN ");
        push_id_list(&mut qb, &filter.authors);
    }

    if !filter.authors_exclude.is_empty() {
        qb.push(" AND p.post_author NOT IN ");
        push_id_list(&mut qb, &filter.authors_exclude);
    }

    let sticky_ids: Vec<u64> = filter.sticky_ids.iter().copied().collect();
    match filter.sticky {
        Some(true) if sticky_ids.is_empty() => {
            qb.push(" AND 1 = 0");
        }
        Some(true) => {
            qb.push(" AND p.ID IN ");
            push_id_list(&mut qb, &sticky_ids);
        }
        Some(false) if !sticky_ids.is_empty() => {
            qb.push(" AND p.ID NOT IN ");
            push_id_list(&mut qb, &sticky_ids);
        }
        _ => {}
    }

    match &filter.taxonomy_include {
        Some(ids) if ids.is_empty() => {
            qb.push(" AND 1 = 0");
        }
        Some(ids) => {
            qb.push(" AND tr.term_taxonomy_id IN ");
            push_id_list(&mut qb, ids);
        }
        None => {}
    }

    if let Some(ids) = filter.taxonomy_exclude.as_ref().filter(|ids| !ids.is_empty()) {
        qb.push(format!(
            " AND p.ID NOT IN (SELECT object_id FROM {} WHERE term_taxonomy_id IN ",
            relationships
        ));
        push_id_list(&mut qb, ids);
        qb.push(")");
    }

    if let Some(menu_order) = filter.menu_order {
        qb.push(" AND p.menu_order = ");
        qb.push_bind(menu_order);
    }

    if !filter.parent.is_empty() {
        qb.push(" AND p.post_parent IN ");
        push_id_list(&mut qb, &filter.parent);
    }

    if !filter.parent_exclude.is_empty() {
        qb.push(" AND p.post_parent NOT IN ");
        push_id_list(&mut qb, &filter.parent_exclude);
    }

    if let Some(media_type) = &filter.media_type {
        let mime_types: Vec<String> = mime_types_for(media_type)
            .into_iter()
            .map(str::to_string)
            .collect();
        if mime_types.is_empty() {
            qb.push(" AND 1 = 0");
        } else {
            qb.push(" AND p.post_mime_type IN ");
            push_str_list(&mut qb, &mime_types);
        }
    }

    if let Some(mime_type) = &filter.mime_type {
        qb.push(" AND p.post_mime_type = ");
        qb.push_bind(mime_type.clone());
    }

    qb.push(" GROUP BY p.ID");

    match filter.order_by {
        OrderBy::Include => {
            qb.push(" ORDER BY FIELD(p.ID, ");
            let mut separated = qb.separated(", ");
            for id in &filter.include {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");
        }
        OrderBy::Relevance => {
            let term = filter.search_term().unwrap_or_default();
            qb.push(" ORDER BY p.post_title LIKE ");
            qb.push_bind(like_pattern(term));
            qb.push(format!(" {0}, p.post_date {0}", filter.order.as_sql()));
        }
        order_by => {
            let column = order_by.column().unwrap_or("post_date");
            qb.push(format!(" ORDER BY p.{} {}", column, filter.order.as_sql()));
        }
    }

    qb.push(" LIMIT ");
    qb.push_bind(filter.row_offset());
    qb.push(", ");
    qb.push_bind(filter.per_page);

    Ok(qb)
}

/// MySQL repository for content rows, comments and revisions.
pub struct MySqlContentRepository {
    pool: Arc<MySqlPool>,
}

impl MySqlContentRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<MySqlPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for MySqlContentRepository {
    async fn find_by_id(
        &self,
        cfg: &ApiConfig,
        id: u64,
        kind: ContentKind,
    ) -> Result<ContentRecord, AppError> {
        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM {} AS p WHERE p.ID = ",
            CONTENT_COLUMNS,
            cfg.table("posts")
        ));
        qb.push_bind(id);
        qb.push(" AND p.post_type = ");
        qb.push_bind(kind.as_str());
        qb.push(" AND p.post_status = ");
        qb.push_bind(kind.public_status());

        let row = qb
            .build_query_as::<ContentRow>()
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(|r| r.into_record(cfg)).ok_or(AppError::NotFound)
    }

    async fn query_ids(
        &self,
        cfg: &ApiConfig,
        filter: &ListFilter,
    ) -> Result<Vec<u64>, AppError> {
        let mut qb = build_id_query(cfg, filter)?;

        let ids = qb
            .build_query_scalar::<u64>()
            .fetch_all(self.pool.as_ref())
            .await?;

        tracing::debug!(count = ids.len(), kind = %filter.kind, "Resolved content ids");
        Ok(ids)
    }

    async fn find_by_ids(
        &self,
        cfg: &ApiConfig,
        kind: ContentKind,
        ids: &[u64],
    ) -> Result<Vec<ContentRecord>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM {} AS p WHERE p.ID IN ",
            CONTENT_COLUMNS,
            cfg.table("posts")
        ));
        push_id_list(&mut qb, ids);
        qb.push(" AND p.post_type = ");
        qb.push_bind(kind.as_str());

        let rows = qb
            .build_query_as::<ContentRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        let mut by_id: HashMap<u64, ContentRecord> = rows
            .into_iter()
            .map(|r| (r.id, r.into_record(cfg)))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn comments_by_post_ids(
        &self,
        cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<Vec<CommentRecord>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT comment_ID AS id, comment_post_ID AS post_id, comment_parent AS parent, \
             user_id, comment_author AS author_name, comment_author_email AS author_email, \
             comment_author_url AS author_url, \
             CAST(DATE_FORMAT(comment_date, '%Y-%m-%dT%H:%i:%s') AS CHAR) AS date, \
             comment_content AS content \
             FROM {} WHERE comment_post_ID IN ",
            cfg.table("comments")
        ));
        push_id_list(&mut qb, ids);
        qb.push(
            " AND comment_approved = '1' AND comment_type IN ('', 'comment') \
             ORDER BY comment_date ASC, comment_ID ASC",
        );

        let rows = qb
            .build_query_as::<CommentRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }

    async fn revisions_by_parent_ids(
        &self,
        cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<HashMap<u64, Vec<u64>>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT ID AS id, post_parent AS parent FROM {} WHERE post_parent IN ",
            cfg.table("posts")
        ));
        push_id_list(&mut qb, ids);
        qb.push(
            " AND post_type = 'revision' AND post_status = 'inherit' \
             ORDER BY post_date DESC, ID DESC",
        );

        let rows = qb
            .build_query_as::<RevisionRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        let mut revisions: HashMap<u64, Vec<u64>> = HashMap::new();
        for row in rows {
            revisions.entry(row.parent).or_default().push(row.id);
        }

        Ok(revisions)
    }
}
