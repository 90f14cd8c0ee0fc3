//! Query-string parameters of the post and page endpoints.

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use serde_with::{DisplayFromStr, StringWithSeparator, formats::CommaSeparator, serde_as};
use validator::Validate;

use crate::domain::entities::filter::{DEFAULT_PER_PAGE, MAX_PER_PAGE};
use crate::domain::entities::{
    ContentKind, Context, GetItemRequest, ListFilter, ListRequest, Order, OrderBy,
};
use crate::error::AppError;

/// Collection query parameters.
///
/// List-valued parameters are comma separated (`?include=1,2,3`). The
/// presence of `_embed`, with or without a value, requests embedding.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, message = "page must be greater than or equal to 1."))]
    pub page: Option<u64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 100, message = "per_page must be between 1 (inclusive) and 100 (inclusive)."))]
    pub per_page: Option<u64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub offset: Option<u64>,

    pub search: Option<String>,
    pub before: Option<String>,
    pub after: Option<String>,

    #[serde_as(as = "StringWithSeparator::<CommaSeparator, u64>")]
    #[serde(default)]
    pub author: Vec<u64>,

    #[serde_as(as = "StringWithSeparator::<CommaSeparator, u64>")]
    #[serde(default)]
    pub author_exclude: Vec<u64>,

    #[serde_as(as = "StringWithSeparator::<CommaSeparator, u64>")]
    #[serde(default)]
    pub include: Vec<u64>,

    #[serde_as(as = "StringWithSeparator::<CommaSeparator, u64>")]
    #[serde(default)]
    pub exclude: Vec<u64>,

    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    #[serde(default)]
    pub slug: Vec<String>,

    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    #[serde(default)]
    pub status: Vec<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub sticky: Option<bool>,

    #[serde_as(as = "StringWithSeparator::<CommaSeparator, u64>")]
    #[serde(default)]
    pub categories: Vec<u64>,

    #[serde_as(as = "StringWithSeparator::<CommaSeparator, u64>")]
    #[serde(default)]
    pub categories_exclude: Vec<u64>,

    #[serde_as(as = "StringWithSeparator::<CommaSeparator, u64>")]
    #[serde(default)]
    pub tags: Vec<u64>,

    #[serde_as(as = "StringWithSeparator::<CommaSeparator, u64>")]
    #[serde(default)]
    pub tags_exclude: Vec<u64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub menu_order: Option<i64>,

    #[serde_as(as = "StringWithSeparator::<CommaSeparator, u64>")]
    #[serde(default)]
    pub parent: Vec<u64>,

    #[serde_as(as = "StringWithSeparator::<CommaSeparator, u64>")]
    #[serde(default)]
    pub parent_exclude: Vec<u64>,

    pub media_type: Option<String>,
    pub mime_type: Option<String>,

    #[serde(alias = "order_by")]
    pub orderby: Option<String>,
    pub order: Option<String>,
    pub context: Option<String>,

    #[serde(rename = "_embed")]
    pub embed: Option<String>,
}

/// Single-item query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ItemQuery {
    pub context: Option<String>,
    pub password: Option<String>,

    #[serde(rename = "_embed")]
    pub embed: Option<String>,
}

impl ListQuery {
    /// Validates the parameters and converts them into a collection request
    /// for `kind`. Post-only filters are ignored for pages and vice versa.
    pub fn into_request(self, kind: ContentKind) -> Result<ListRequest, AppError> {
        self.validate()?;

        let context = parse_context(self.context.as_deref())?;
        let order_by = self
            .orderby
            .as_deref()
            .map(str::parse::<OrderBy>)
            .transpose()?
            .unwrap_or_default();
        let order = self
            .order
            .as_deref()
            .map(str::parse::<Order>)
            .transpose()?
            .unwrap_or_default();

        // Only the public status is served; others need authentication.
        let public_status = kind.public_status();
        let status = if self.status.is_empty() {
            vec![public_status.to_string()]
        } else {
            if let Some(forbidden) = self.status.iter().find(|s| *s != public_status) {
                return Err(AppError::invalid_param(
                    "status",
                    format!("Status is forbidden: {}.", forbidden),
                ));
            }
            self.status
        };

        let mut filter = ListFilter {
            kind,
            page: self.page.unwrap_or(1),
            per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE).min(MAX_PER_PAGE),
            offset: self.offset,
            search: self.search,
            before: parse_date("before", self.before.as_deref())?,
            after: parse_date("after", self.after.as_deref())?,
            include: self.include,
            exclude: self.exclude,
            slugs: self.slug,
            status,
            authors: self.author,
            authors_exclude: self.author_exclude,
            order_by,
            order,
            ..ListFilter::for_kind(kind)
        };

        match kind {
            ContentKind::Post => {
                filter.sticky = self.sticky;
                filter.categories = self.categories;
                filter.categories_exclude = self.categories_exclude;
                filter.tags = self.tags;
                filter.tags_exclude = self.tags_exclude;
            }
            ContentKind::Page => {
                filter.menu_order = self.menu_order;
                filter.parent = self.parent;
                filter.parent_exclude = self.parent_exclude;
            }
            ContentKind::Attachment => {
                filter.parent = self.parent;
                filter.parent_exclude = self.parent_exclude;
                filter.media_type = self.media_type;
                filter.mime_type = self.mime_type;
            }
        }

        filter.validate_ordering()?;

        Ok(ListRequest {
            filter,
            embed: self.embed.is_some(),
            context,
        })
    }
}

impl ItemQuery {
    pub fn into_request(self, id: u64, kind: ContentKind) -> Result<GetItemRequest, AppError> {
        Ok(GetItemRequest {
            id,
            kind,
            embed: self.embed.is_some(),
            context: parse_context(self.context.as_deref())?,
            password: self.password,
        })
    }
}

fn parse_context(value: Option<&str>) -> Result<Context, AppError> {
    value
        .map(str::parse::<Context>)
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Accepts RFC 3339 timestamps and offset-less `YYYY-MM-DDTHH:MM:SS`.
///
/// Dates compare against the site-local `post_date`, so the wall-clock part is
/// kept and any offset dropped.
fn parse_date(param: &str, value: Option<&str>) -> Result<Option<NaiveDateTime>, AppError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(dt.naive_local()));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map(Some)
        .map_err(|_| AppError::invalid_param(param, format!("Invalid date: {}.", value)))
}
