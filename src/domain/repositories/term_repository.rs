//! Repository trait for taxonomy terms.

use crate::config::ApiConfig;
use crate::domain::entities::{PostTaxonomies, TermTaxonomy};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TermRepository: Send + Sync {
    /// Category, tag and format assignments of the given content ids.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Query`] on database errors.
    async fn post_terms_by_ids(
        &self,
        cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<PostTaxonomies, AppError>;

    /// Taxonomy join rows of `term_ids` within one taxonomy.
    ///
    /// Used to turn client-facing term ids into `term_taxonomy_id`s.
    async fn term_taxonomies_by_term_ids(
        &self,
        cfg: &ApiConfig,
        term_ids: &[u64],
        taxonomy: &str,
    ) -> Result<Vec<TermTaxonomy>, AppError>;
}
