//! MySQL repository implementations.
//!
//! Concrete implementations of the domain repository traits. Queries are
//! assembled at runtime with [`sqlx::QueryBuilder`] because table names carry
//! the configured prefix; every value is bound, never interpolated.
//!
//! # Repositories
//!
//! - [`MySqlContentRepository`] - Posts, pages, attachments, comments and revisions
//! - [`MySqlTermRepository`] - Categories, tags and post formats
//! - [`MySqlUserRepository`] - Authors
//! - [`MySqlSharedRepository`] - Options and post meta

pub mod mysql_content_repository;
pub mod mysql_shared_repository;
pub mod mysql_term_repository;
pub mod mysql_user_repository;

pub use mysql_content_repository::MySqlContentRepository;
pub use mysql_shared_repository::MySqlSharedRepository;
pub use mysql_term_repository::MySqlTermRepository;
pub use mysql_user_repository::MySqlUserRepository;

use sqlx::{MySql, QueryBuilder};

/// Appends `(?, ?, ...)` with one bound id per element.
pub(crate) fn push_id_list(qb: &mut QueryBuilder<'static, MySql>, ids: &[u64]) {
    qb.push("(");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

pub(crate) fn push_str_list(qb: &mut QueryBuilder<'static, MySql>, values: &[String]) {
    qb.push("(");
    let mut separated = qb.separated(", ");
    for value in values {
        separated.push_bind(value.clone());
    }
    separated.push_unseparated(")");
}
