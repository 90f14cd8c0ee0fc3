//! API route configuration.

use crate::api::handlers::{
    get_page_handler, get_post_handler, list_pages_handler, list_posts_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// WordPress content routes, mounted under the configured API prefix.
///
/// # Endpoints
///
/// - `GET /posts`       - Published posts (filterable, paginated)
/// - `GET /posts/{id}`  - A single post
/// - `GET /pages`       - Published pages (filterable, paginated)
/// - `GET /pages/{id}`  - A single page
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts_handler))
        .route("/posts/{id}", get(get_post_handler))
        .route("/pages", get(list_pages_handler))
        .route("/pages/{id}", get(get_page_handler))
}
