//! Repository trait for options and post meta.

use std::collections::HashMap;

use crate::config::ApiConfig;
use crate::domain::entities::WpOption;
use crate::error::AppError;
use async_trait::async_trait;

/// `meta_key -> meta_value` per post id.
pub type PostMetas = HashMap<u64, HashMap<String, String>>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SharedRepository: Send + Sync {
    /// Loads a site option by name, `None` when unset.
    async fn load_option(&self, cfg: &ApiConfig, name: &str)
    -> Result<Option<WpOption>, AppError>;

    /// Post meta of the given ids. When a key repeats, the first row wins.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Query`] on database errors.
    async fn post_metas_by_post_ids(
        &self,
        cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<PostMetas, AppError>;

    /// Round trip to the store, used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}
