//! Decoded requests handed to the content service.

use std::str::FromStr;

use super::content::ContentKind;
use super::filter::ListFilter;
use crate::error::AppError;

/// Response depth selected by the `context` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Context {
    #[default]
    View,
    Embed,
}

impl FromStr for Context {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Context::View),
            "embed" => Ok(Context::Embed),
            _ => Err(AppError::invalid_param(
                "context",
                "context is not one of view, embed.",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GetItemRequest {
    pub id: u64,
    pub kind: ContentKind,
    pub embed: bool,
    pub context: Context,
    /// Unlocks password-protected content when it matches.
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListRequest {
    pub filter: ListFilter,
    pub embed: bool,
    pub context: Context,
}
