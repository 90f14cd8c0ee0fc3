//! Core domain entities.
//!
//! Stored rows (`*Record`, `UserDetail`, `WpOption`, term join rows) are plain
//! data produced by repositories. Response entities (`Content`, `Media`,
//! `User`, `Comment`, `EmbeddedTerm`) are the serialized WordPress shapes and
//! are assembled per request by [`crate::application::services::ContentService`].

pub mod comment;
pub mod content;
pub mod filter;
pub mod links;
pub mod media;
pub mod option;
pub mod request;
pub mod term;
pub mod user;

pub use comment::{Comment, CommentRecord};
pub use content::{
    Content, ContentBase, ContentKind, ContentRecord, ContentRendered, ContentResponse, Embedded,
    Rendered,
};
pub use filter::{ListFilter, Order, OrderBy};
pub use media::{Media, MediaDetails};
pub use option::WpOption;
pub use request::{Context, GetItemRequest, ListRequest};
pub use term::{EmbeddedTerm, PostTaxonomies, PostTerm, Term, TermTaxonomy};
pub use user::{User, UserDetail};
