//! Business logic services for the application layer.

pub mod content_service;

pub use content_service::ContentService;
