//! Rows of `{prefix}options`.

use std::collections::BTreeSet;

use crate::utils::php_serialize::{DecodeError, unserialize};

pub const STICKY_POSTS_OPTION: &str = "sticky_posts";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WpOption {
    pub option_id: u64,
    pub option_name: String,
    pub option_value: String,
    pub autoload: String,
}

/// Ids stored in the serialized `sticky_posts` option.
///
/// Entries that are neither integers nor numeric strings are skipped. An
/// empty value means no sticky posts.
pub fn parse_sticky_ids(option_value: &str) -> Result<BTreeSet<u64>, DecodeError> {
    if option_value.trim().is_empty() {
        return Ok(BTreeSet::new());
    }

    let value = unserialize(option_value)?;
    let ids = value
        .as_array()
        .unwrap_or_default()
        .iter()
        .filter_map(|(_, v)| v.as_int())
        .filter_map(|id| u64::try_from(id).ok())
        .collect();

    Ok(ids)
}
