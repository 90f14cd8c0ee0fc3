//! CORS policy for the public read-only API.

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Any origin may issue `GET` requests.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any)
}
