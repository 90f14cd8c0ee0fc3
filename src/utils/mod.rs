//! Helper functions used across the application:
//!
//! - [`php_serialize`] - Decoder for PHP-serialized options and post meta
//! - [`permalink`] - Front-end permalinks and generated excerpts
//! - [`avatar`] - Gravatar URLs

pub mod avatar;
pub mod permalink;
pub mod php_serialize;
