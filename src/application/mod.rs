//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers.
//!
//! # Available Services
//!
//! - [`services::content_service::ContentService`] - Post and page retrieval,
//!   link synthesis and embedding

pub mod services;
