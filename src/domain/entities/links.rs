//! `_links` envelopes attached to every serialized resource.
//!
//! Field names follow the WordPress REST contract (`self`, `version-history`,
//! `wp:featuredmedia`, ...). Optional relations are empty vectors and are
//! skipped during serialization.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Href {
    pub href: String,
}

impl Href {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// A relation the client may inline with `?_embed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddableLink {
    pub embeddable: bool,
    pub href: String,
}

impl EmbeddableLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            embeddable: true,
            href: href.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionHistoryLink {
    pub count: usize,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionLink {
    pub id: u64,
    pub href: String,
}

/// `wp:term` entry on a post, one per taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermRelationLink {
    pub taxonomy: String,
    pub embeddable: bool,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Curie {
    pub name: String,
    pub href: String,
    pub templated: bool,
}

/// Link set of a post, page or attachment.
///
/// Always carries exactly one `self` and one `collection` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentLinks {
    #[serde(rename = "self")]
    pub self_link: Vec<Href>,
    pub collection: Vec<Href>,
    pub about: Vec<Href>,
    pub author: Vec<EmbeddableLink>,
    pub replies: Vec<EmbeddableLink>,
    #[serde(rename = "version-history")]
    pub version_history: Vec<VersionHistoryLink>,
    #[serde(
        rename = "predecessor-version",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub predecessor_version: Vec<VersionLink>,
    #[serde(rename = "wp:featuredmedia", skip_serializing_if = "Vec::is_empty")]
    pub featured_media: Vec<EmbeddableLink>,
    #[serde(rename = "wp:attachment")]
    pub attachment: Vec<Href>,
    #[serde(rename = "wp:term", skip_serializing_if = "Vec::is_empty")]
    pub term: Vec<TermRelationLink>,
    pub curies: Vec<Curie>,
}

/// Reduced link set carried by embedded media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaLinks {
    #[serde(rename = "self")]
    pub self_link: Vec<Href>,
    pub collection: Vec<Href>,
    pub about: Vec<Href>,
    pub author: Vec<EmbeddableLink>,
    pub replies: Vec<EmbeddableLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermLinks {
    #[serde(rename = "self")]
    pub self_link: Vec<Href>,
    pub collection: Vec<Href>,
    pub about: Vec<Href>,
    #[serde(rename = "wp:post_type")]
    pub post_type: Vec<Href>,
    pub curies: Vec<Curie>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserLinks {
    #[serde(rename = "self")]
    pub self_link: Vec<Href>,
    pub collection: Vec<Href>,
}

/// `up` relation of a comment, pointing back at the commented content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpLink {
    pub embeddable: bool,
    pub post_type: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentLinks {
    #[serde(rename = "self")]
    pub self_link: Vec<Href>,
    pub collection: Vec<Href>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<EmbeddableLink>,
    pub up: Vec<UpLink>,
    #[serde(rename = "in-reply-to", skip_serializing_if = "Vec::is_empty")]
    pub in_reply_to: Vec<EmbeddableLink>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Href>,
}
