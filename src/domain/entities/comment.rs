//! Approved comments and their embedded representation.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::content::Rendered;
use super::links::CommentLinks;
use crate::domain::link_builder::comment_links;
use crate::utils::avatar::avatar_urls;

/// Row of `{prefix}comments`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentRecord {
    pub id: u64,
    pub post_id: u64,
    pub parent: u64,
    /// Registered commenter, `0` for anonymous comments.
    pub user_id: u64,
    pub author_name: String,
    pub author_email: String,
    pub author_url: String,
    pub date: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: u64,
    pub parent: u64,
    pub author: u64,
    pub author_name: String,
    pub author_url: String,
    pub author_avatar_urls: BTreeMap<String, String>,
    pub date: String,
    pub content: Rendered,
    pub link: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "_links")]
    pub links: CommentLinks,
}

/// Reshapes the approved comments of one content item for `wp:replies`.
///
/// A comment gets a `children` link when any comment of the batch names it
/// as parent; replies get `in-reply-to`.
pub fn embed_comments(
    base_url: &str,
    post_link: &str,
    post_kind: &str,
    records: &[CommentRecord],
) -> Vec<Comment> {
    let parents: HashSet<u64> = records
        .iter()
        .filter(|c| c.parent != 0)
        .map(|c| c.parent)
        .collect();

    records
        .iter()
        .map(|c| Comment {
            id: c.id,
            parent: c.parent,
            author: c.user_id,
            author_name: c.author_name.clone(),
            author_url: c.author_url.clone(),
            author_avatar_urls: avatar_urls(&c.author_email),
            date: c.date.clone(),
            content: Rendered::new(c.content.clone()),
            link: format!("{}#comment-{}", post_link, c.id),
            kind: "comment".to_string(),
            links: comment_links(
                base_url,
                c.id,
                c.parent,
                c.user_id,
                c.post_id,
                post_kind,
                parents.contains(&c.id),
            ),
        })
        .collect()
}
