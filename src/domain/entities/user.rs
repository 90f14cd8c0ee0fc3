//! Users: the internal detail row and the compact public projection.

use serde::Serialize;
use std::collections::BTreeMap;

use super::links::UserLinks;
use crate::config::ApiConfig;
use crate::domain::link_builder::{author_archive_link, user_links};
use crate::utils::avatar::avatar_urls;

/// Row of `{prefix}users` joined with the `description` user meta.
///
/// Never serialized; only [`User`] leaves the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDetail {
    pub id: u64,
    pub login: String,
    pub nicename: String,
    pub email: String,
    pub url: String,
    pub registered: String,
    pub status: i32,
    pub display_name: String,
    pub description: String,
}

/// Public author projection embedded under `_embedded.author`.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub description: String,
    pub link: String,
    pub slug: String,
    pub avatar_urls: BTreeMap<String, String>,
    #[serde(rename = "_links")]
    pub links: UserLinks,
}

impl User {
    pub fn from_detail(detail: &UserDetail, cfg: &ApiConfig) -> Self {
        Self {
            id: detail.id,
            name: detail.display_name.clone(),
            url: detail.url.clone(),
            description: detail.description.clone(),
            link: author_archive_link(&cfg.site_url, &detail.nicename),
            slug: detail.nicename.clone(),
            avatar_urls: avatar_urls(&detail.email),
            links: user_links(&cfg.api_base_url, detail.id),
        }
    }
}
