//! Repository trait for posts, pages, attachments and their comments and
//! revisions.

use std::collections::HashMap;

use crate::config::ApiConfig;
use crate::domain::entities::{CommentRecord, ContentKind, ContentRecord, ListFilter};
use crate::error::AppError;
use async_trait::async_trait;

/// Read access to `{prefix}posts` and `{prefix}comments`.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MySqlContentRepository`] - MySQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Finds one publicly visible row of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no row matches `id` and `kind`.
    /// Returns [`AppError::Query`] on database errors.
    async fn find_by_id(
        &self,
        cfg: &ApiConfig,
        id: u64,
        kind: ContentKind,
    ) -> Result<ContentRecord, AppError>;

    /// Resolves a collection filter into an ordered page of ids.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidParameter`] when the ordering needs a
    /// parameter the filter lacks (`include`, `relevance`).
    /// Returns [`AppError::Query`] on database errors.
    async fn query_ids(&self, cfg: &ApiConfig, filter: &ListFilter)
    -> Result<Vec<u64>, AppError>;

    /// Loads full rows for `ids`, returned in the order of `ids`.
    ///
    /// Ids without a matching row are skipped.
    async fn find_by_ids(
        &self,
        cfg: &ApiConfig,
        kind: ContentKind,
        ids: &[u64],
    ) -> Result<Vec<ContentRecord>, AppError>;

    /// Approved comments of the given content ids, oldest first.
    async fn comments_by_post_ids(
        &self,
        cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<Vec<CommentRecord>, AppError>;

    /// Revision ids per parent id, newest first.
    async fn revisions_by_parent_ids(
        &self,
        cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<HashMap<u64, Vec<u64>>, AppError>;
}
