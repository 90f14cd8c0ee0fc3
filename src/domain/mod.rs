//! Domain layer: entities, repository interfaces and link synthesis.
//!
//! # Architecture
//!
//! - [`entities`] - Stored rows, request contracts and response shapes
//! - [`repositories`] - Data access trait definitions
//! - [`link_builder`] - Pure `_links` URL composition
//!
//! The domain layer knows nothing about MySQL or HTTP. Repository traits are
//! implemented in [`crate::infrastructure::persistence`] and orchestrated by
//! [`crate::application::services`].

pub mod entities;
pub mod link_builder;
pub mod repositories;
