//! Data Transfer Objects for API requests and responses.
//!
//! Query strings are decoded with Serde (`serde_with` for numbers and
//! comma-separated lists) and checked with validator before being turned
//! into domain requests.

pub mod health;
pub mod query;
