//! Repository trait definitions for the domain layer.
//!
//! One capability trait per entity family. Every operation receives the
//! immutable [`crate::config::ApiConfig`] (table prefix, site URL, permalink
//! structure) explicitly.
//!
//! # Available Repositories
//!
//! - [`ContentRepository`] - Posts, pages, attachments, comments and revisions
//! - [`TermRepository`] - Categories, tags and post formats
//! - [`UserRepository`] - Authors
//! - [`SharedRepository`] - Options and post meta
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod content_repository;
pub mod shared_repository;
pub mod term_repository;
pub mod user_repository;

pub use content_repository::ContentRepository;
pub use shared_repository::{PostMetas, SharedRepository};
pub use term_repository::TermRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use content_repository::MockContentRepository;
#[cfg(test)]
pub use shared_repository::MockSharedRepository;
#[cfg(test)]
pub use term_repository::MockTermRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
