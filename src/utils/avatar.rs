//! Gravatar URLs for users and comment authors.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

const GRAVATAR_BASE: &str = "https://secure.gravatar.com/avatar";
const AVATAR_SIZES: [u32; 3] = [24, 48, 96];

/// Avatar URL per size (`"24"`, `"48"`, `"96"`).
///
/// The address is trimmed and lowercased before hashing. An empty address
/// still yields the default mystery-person image.
pub fn avatar_urls(email: &str) -> BTreeMap<String, String> {
    let hash = hex::encode(Sha256::digest(email.trim().to_lowercase().as_bytes()));

    AVATAR_SIZES
        .iter()
        .map(|size| {
            (
                size.to_string(),
                format!("{}/{}?s={}&d=mm&r=g", GRAVATAR_BASE, hash, size),
            )
        })
        .collect()
}
