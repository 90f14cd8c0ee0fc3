//! Repository trait for users.

use std::collections::HashMap;

use crate::config::ApiConfig;
use crate::domain::entities::UserDetail;
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Users keyed by id. Unknown ids are absent from the map.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Query`] on database errors.
    async fn find_by_ids(
        &self,
        cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<HashMap<u64, UserDetail>, AppError>;
}
