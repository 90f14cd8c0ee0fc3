//! Posts, pages and attachments: the stored row and its REST projections.

use serde::Serialize;
use std::fmt;

use super::comment::Comment;
use super::links::ContentLinks;
use super::media::Media;
use super::term::EmbeddedTerm;
use super::user::User;

/// `post_type` discriminator of a content row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentKind {
    #[default]
    Post,
    Page,
    Attachment,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Page => "page",
            ContentKind::Attachment => "attachment",
        }
    }

    /// Status a publicly visible row of this kind carries.
    pub fn public_status(&self) -> &'static str {
        match self {
            ContentKind::Attachment => "inherit",
            _ => "publish",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `{prefix}posts`, with the permalink already rendered.
///
/// Dates are ISO-8601 local strings (`2019-01-31T10:00:00`). Nullable text
/// columns arrive as empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentRecord {
    pub id: u64,
    pub author: u64,
    pub date: String,
    pub date_gmt: String,
    pub content: String,
    pub title: String,
    pub excerpt: String,
    pub status: String,
    pub comment_status: String,
    pub ping_status: String,
    pub password: String,
    pub slug: String,
    pub modified: String,
    pub modified_gmt: String,
    pub parent: u64,
    pub guid: String,
    pub menu_order: i64,
    pub post_type: String,
    pub mime_type: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub rendered: String,
}

impl Rendered {
    pub fn new(rendered: impl Into<String>) -> Self {
        Self {
            rendered: rendered.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentRendered {
    pub rendered: String,
    pub protected: bool,
}

/// Fields shared by every projection, including `context=embed`.
#[derive(Debug, Clone, Serialize)]
pub struct ContentBase {
    pub id: u64,
    pub date: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub link: String,
    pub title: Rendered,
    pub author: u64,
    pub excerpt: ContentRendered,
    pub featured_media: u64,
    #[serde(rename = "_links")]
    pub links: ContentLinks,
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
}

/// Full `context=view` projection.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    #[serde(flatten)]
    pub base: ContentBase,
    pub date_gmt: String,
    pub guid: Rendered,
    pub modified: String,
    pub modified_gmt: String,
    pub status: String,
    pub comment_status: String,
    pub ping_status: String,
    pub content: ContentRendered,
    pub template: String,
    pub meta: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticky: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// `_embedded` sub-graph, populated only for `?_embed` requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Embedded {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<User>,
    #[serde(rename = "wp:featuredmedia", skip_serializing_if = "Vec::is_empty")]
    pub featured_media: Vec<Media>,
    /// Grouped per taxonomy: categories first, then tags.
    #[serde(rename = "wp:term", skip_serializing_if = "Vec::is_empty")]
    pub term: Vec<Vec<EmbeddedTerm>>,
    #[serde(rename = "wp:replies", skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Comment>,
}

/// What a single-item or collection request returns per item.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ContentResponse {
    Full(Box<Content>),
    Embed(ContentBase),
}

impl ContentResponse {
    pub fn base(&self) -> &ContentBase {
        match self {
            ContentResponse::Full(content) => &content.base,
            ContentResponse::Embed(base) => base,
        }
    }

    pub fn id(&self) -> u64 {
        self.base().id
    }
}
