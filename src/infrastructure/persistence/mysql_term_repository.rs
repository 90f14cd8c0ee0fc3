//! MySQL implementation of the term repository.

use async_trait::async_trait;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::domain::entities::{PostTaxonomies, PostTerm, Term, TermTaxonomy};
use super::push_id_list;
use crate::domain::repositories::TermRepository;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct PostTermRow {
    term_id: u64,
    name: String,
    slug: String,
    term_group: i64,
    term_taxonomy_id: u64,
    taxonomy: String,
    description: String,
    parent: u64,
    count: i64,
    object_id: u64,
}

impl From<PostTermRow> for PostTerm {
    fn from(row: PostTermRow) -> Self {
        Self {
            object_id: row.object_id,
            term: Term {
                term_id: row.term_id,
                name: row.name,
                slug: row.slug,
                term_group: row.term_group,
            },
            taxonomy: TermTaxonomy {
                term_taxonomy_id: row.term_taxonomy_id,
                term_id: row.term_id,
                taxonomy: row.taxonomy,
                description: row.description,
                parent: row.parent,
                count: row.count,
            },
        }
    }
}

#[derive(Debug, FromRow)]
struct TermTaxonomyRow {
    term_taxonomy_id: u64,
    term_id: u64,
    taxonomy: String,
    description: String,
    parent: u64,
    count: i64,
}

impl From<TermTaxonomyRow> for TermTaxonomy {
    fn from(row: TermTaxonomyRow) -> Self {
        Self {
            term_taxonomy_id: row.term_taxonomy_id,
            term_id: row.term_id,
            taxonomy: row.taxonomy,
            description: row.description,
            parent: row.parent,
            count: row.count,
        }
    }
}

/// Joins terms to the given content ids through `term_relationships`.
pub fn build_post_terms_query(cfg: &ApiConfig, ids: &[u64]) -> QueryBuilder<'static, MySql> {
    let mut qb = QueryBuilder::<MySql>::new(format!(
        "SELECT t.term_id, t.name, t.slug, t.term_group, tt.term_taxonomy_id, tt.taxonomy, \
         tt.description, tt.parent, tt.count, tr.object_id \
         FROM {} AS t \
         INNER JOIN {} AS tt ON t.term_id = tt.term_id \
         INNER JOIN {} AS tr ON tr.term_taxonomy_id = tt.term_taxonomy_id \
         WHERE tt.taxonomy IN ('category', 'post_tag', 'post_format') AND tr.object_id IN ",
        cfg.table("terms"),
        cfg.table("term_taxonomy"),
        cfg.table("term_relationships"),
    ));
    push_id_list(&mut qb, ids);
    qb.push(" ORDER BY t.name ASC");
    qb
}

/// MySQL repository for categories, tags and post formats.
pub struct MySqlTermRepository {
    pool: Arc<MySqlPool>,
}

impl MySqlTermRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<MySqlPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TermRepository for MySqlTermRepository {
    async fn post_terms_by_ids(
        &self,
        cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<PostTaxonomies, AppError> {
        if ids.is_empty() {
            return Ok(PostTaxonomies::default());
        }

        let rows = build_post_terms_query(cfg, ids)
            .build_query_as::<PostTermRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(PostTaxonomies::from_rows(
            rows.into_iter().map(PostTerm::from).collect(),
        ))
    }

    async fn term_taxonomies_by_term_ids(
        &self,
        cfg: &ApiConfig,
        term_ids: &[u64],
        taxonomy: &str,
    ) -> Result<Vec<TermTaxonomy>, AppError> {
        if term_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT term_taxonomy_id, term_id, taxonomy, description, parent, count \
             FROM {} WHERE term_id IN ",
            cfg.table("term_taxonomy")
        ));
        push_id_list(&mut qb, term_ids);
        qb.push(" AND taxonomy = ");
        qb.push_bind(taxonomy.to_string());

        let rows = qb
            .build_query_as::<TermTaxonomyRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(TermTaxonomy::from).collect())
    }
}
