//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`                     - Health check (database)
//! - `GET  {api_prefix}/posts[/{id}]`   - Posts
//! - `GET  {api_prefix}/pages[/{id}]`   - Pages
//! - anything else                      - `rest_no_route`
//!
//! `api_prefix` defaults to `/wp-json/wp/v2`.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin, read-only methods
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, no_route_handler};
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes and middleware without path normalization.
pub fn api_router(state: AppState) -> Router {
    let prefix = state.api_config.api_prefix();

    Router::new()
        .route("/health", get(health_handler))
        .nest(&prefix, api::routes::content_routes())
        .fallback(no_route_handler)
        .with_state(state)
        .layer(cors::layer())
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(api_router(state))
}
