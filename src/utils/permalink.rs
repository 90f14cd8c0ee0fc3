//! Front-end URLs of content rows.

use chrono::{Datelike, NaiveDateTime};

use crate::config::ApiConfig;
use crate::domain::entities::ContentKind;

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const EXCERPT_WORDS: usize = 55;

/// Renders the public permalink of a row.
///
/// Posts expand the configured permalink structure (`%year%`, `%monthnum%`,
/// `%day%`, `%postname%`, `%post_id%`, `%category%`). `%category%` renders
/// the post type, not a category slug. Pages live at `{site}/{slug}/`.
/// Rows without a slug, and attachments, fall back to the query-string form.
pub fn permalink(
    cfg: &ApiConfig,
    kind: ContentKind,
    id: u64,
    slug: &str,
    post_type: &str,
    date: &str,
) -> String {
    if slug.is_empty() {
        return format!("{}/?p={}", cfg.site_url, id);
    }

    match kind {
        ContentKind::Attachment => format!("{}/?attachment_id={}", cfg.site_url, id),
        ContentKind::Page => format!("{}/{}/", cfg.site_url, slug),
        ContentKind::Post => {
            let structure = cfg.permalink_structure.trim();
            if structure.is_empty() {
                return format!("{}/?p={}", cfg.site_url, id);
            }

            let (year, month, day) = NaiveDateTime::parse_from_str(date, DATE_FORMAT)
                .map(|d| {
                    (
                        format!("{:04}", d.year()),
                        format!("{:02}", d.month()),
                        format!("{:02}", d.day()),
                    )
                })
                .unwrap_or_else(|_| ("0000".to_string(), "00".to_string(), "00".to_string()));

            let path = structure
                .replace("%year%", &year)
                .replace("%monthnum%", &month)
                .replace("%day%", &day)
                .replace("%postname%", slug)
                .replace("%post_id%", &id.to_string())
                .replace("%category%", post_type);

            format!("{}/{}", cfg.site_url, path.trim_start_matches('/'))
        }
    }
}

/// First 55 words of the content, used when the stored excerpt is empty.
pub fn generate_excerpt(content: &str) -> String {
    content
        .split_whitespace()
        .take(EXCERPT_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}
