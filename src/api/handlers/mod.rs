//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod content;
pub mod health;
pub mod not_found;

pub use content::{get_page_handler, get_post_handler, list_pages_handler, list_posts_handler};
pub use health::health_handler;
pub use not_found::no_route_handler;
