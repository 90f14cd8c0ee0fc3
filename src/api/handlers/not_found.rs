//! Fallback for unmatched routes.

use crate::error::AppError;

/// Renders the `rest_no_route` envelope for any unmatched path.
pub async fn no_route_handler() -> AppError {
    AppError::NoRoute
}
