//! Collection query contract.

use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::content::ContentKind;
use crate::error::AppError;

pub const DEFAULT_PER_PAGE: u64 = 10;
pub const MAX_PER_PAGE: u64 = 100;

/// `orderby` allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    Author,
    #[default]
    Date,
    Id,
    Include,
    Modified,
    Parent,
    Relevance,
    Slug,
    Title,
}

impl OrderBy {
    /// Sort column for plain keys; `None` for `include` and `relevance`,
    /// which need bound values.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            OrderBy::Author => Some("post_author"),
            OrderBy::Date => Some("post_date"),
            OrderBy::Id => Some("ID"),
            OrderBy::Modified => Some("post_modified"),
            OrderBy::Parent => Some("post_parent"),
            OrderBy::Slug => Some("post_name"),
            OrderBy::Title => Some("post_title"),
            OrderBy::Include | OrderBy::Relevance => None,
        }
    }
}

impl FromStr for OrderBy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "author" => Ok(OrderBy::Author),
            "date" => Ok(OrderBy::Date),
            "id" => Ok(OrderBy::Id),
            "include" => Ok(OrderBy::Include),
            "modified" => Ok(OrderBy::Modified),
            "parent" => Ok(OrderBy::Parent),
            "relevance" => Ok(OrderBy::Relevance),
            "slug" => Ok(OrderBy::Slug),
            "title" => Ok(OrderBy::Title),
            other => Err(AppError::invalid_param(
                "orderby",
                format!("orderby is not one of author, date, id, include, modified, parent, relevance, slug, title; got {other}."),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl Order {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

impl FromStr for Order {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            _ => Err(AppError::invalid_param("order", "order is not one of asc, desc.")),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Filters, pagination and ordering of a collection request.
///
/// `categories`/`tags` hold term ids as sent by the client. The service
/// resolves them into `taxonomy_include`/`taxonomy_exclude`
/// (`term_taxonomy_id`s) and fills `sticky_ids` before the query runs;
/// `Some(empty)` there means no row can match.
#[derive(Debug, Clone, PartialEq)]
pub struct ListFilter {
    pub kind: ContentKind,
    pub page: u64,
    pub per_page: u64,
    pub offset: Option<u64>,
    pub search: Option<String>,
    pub before: Option<NaiveDateTime>,
    pub after: Option<NaiveDateTime>,
    pub include: Vec<u64>,
    pub exclude: Vec<u64>,
    pub slugs: Vec<String>,
    pub status: Vec<String>,
    pub authors: Vec<u64>,
    pub authors_exclude: Vec<u64>,
    pub sticky: Option<bool>,
    pub sticky_ids: BTreeSet<u64>,
    pub categories: Vec<u64>,
    pub categories_exclude: Vec<u64>,
    pub tags: Vec<u64>,
    pub tags_exclude: Vec<u64>,
    pub taxonomy_include: Option<Vec<u64>>,
    pub taxonomy_exclude: Option<Vec<u64>>,
    pub order_by: OrderBy,
    pub order: Order,
    pub menu_order: Option<i64>,
    pub parent: Vec<u64>,
    pub parent_exclude: Vec<u64>,
    pub media_type: Option<String>,
    pub mime_type: Option<String>,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            kind: ContentKind::Post,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            offset: None,
            search: None,
            before: None,
            after: None,
            include: Vec::new(),
            exclude: Vec::new(),
            slugs: Vec::new(),
            status: vec!["publish".to_string()],
            authors: Vec::new(),
            authors_exclude: Vec::new(),
            sticky: None,
            sticky_ids: BTreeSet::new(),
            categories: Vec::new(),
            categories_exclude: Vec::new(),
            tags: Vec::new(),
            tags_exclude: Vec::new(),
            taxonomy_include: None,
            taxonomy_exclude: None,
            order_by: OrderBy::Date,
            order: Order::Desc,
            menu_order: None,
            parent: Vec::new(),
            parent_exclude: Vec::new(),
            media_type: None,
            mime_type: None,
        }
    }
}

impl ListFilter {
    pub fn for_kind(kind: ContentKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Non-blank search term.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Row offset: an explicit `offset` wins over `page`.
    pub fn row_offset(&self) -> u64 {
        self.offset
            .unwrap_or_else(|| self.page.saturating_sub(1).saturating_mul(self.per_page))
    }

    /// Rejects ordering keys whose companion parameter is missing.
    pub fn validate_ordering(&self) -> Result<(), AppError> {
        match self.order_by {
            OrderBy::Include if self.include.is_empty() => Err(AppError::invalid_param(
                "orderby",
                "You need to define an include parameter to order by include.",
            )),
            OrderBy::Relevance if self.search_term().is_none() => Err(AppError::invalid_param(
                "orderby",
                "You need to define a search term to order by relevance.",
            )),
            _ => Ok(()),
        }
    }
}
