//! Attachments embedded as featured media, and the decoding of
//! `_wp_attachment_metadata`.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::content::{ContentRecord, Rendered};
use super::links::MediaLinks;
use crate::config::ApiConfig;
use crate::domain::link_builder::media_links;
use crate::utils::php_serialize::{DecodeError, PhpValue, unserialize};

pub const ATTACHMENT_METADATA_KEY: &str = "_wp_attachment_metadata";
pub const ATTACHED_FILE_KEY: &str = "_wp_attached_file";
pub const IMAGE_ALT_KEY: &str = "_wp_attachment_image_alt";

/// Registered upload MIME types, keyed by file extensions.
pub const MIME_TYPES: &[(&str, &str)] = &[
    ("jpg|jpeg|jpe", "image/jpeg"),
    ("gif", "image/gif"),
    ("png", "image/png"),
    ("bmp", "image/bmp"),
    ("tiff|tif", "image/tiff"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    ("asf|asx", "video/x-ms-asf"),
    ("wmv", "video/x-ms-wmv"),
    ("wmx", "video/x-ms-wmx"),
    ("wm", "video/x-ms-wm"),
    ("avi", "video/avi"),
    ("divx", "video/divx"),
    ("flv", "video/x-flv"),
    ("mov|qt", "video/quicktime"),
    ("mpeg|mpg|mpe", "video/mpeg"),
    ("mp4|m4v", "video/mp4"),
    ("ogv", "video/ogg"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("3gp|3gpp", "video/3gpp"),
    ("3g2|3gp2", "video/3gpp2"),
    ("txt|asc|c|cc|h|srt", "text/plain"),
    ("csv", "text/csv"),
    ("tsv", "text/tab-separated-values"),
    ("ics", "text/calendar"),
    ("rtx", "text/richtext"),
    ("css", "text/css"),
    ("htm|html", "text/html"),
    ("vtt", "text/vtt"),
    ("dfxp", "application/ttaf+xml"),
    ("mp3|m4a|m4b", "audio/mpeg"),
    ("ra|ram", "audio/x-realaudio"),
    ("wav", "audio/wav"),
    ("ogg|oga", "audio/ogg"),
    ("flac", "audio/flac"),
    ("mid|midi", "audio/midi"),
    ("wma", "audio/x-ms-wma"),
    ("wax", "audio/x-ms-wax"),
    ("mka", "audio/x-matroska"),
    ("rtf", "application/rtf"),
    ("js", "application/javascript"),
    ("pdf", "application/pdf"),
    ("swf", "application/x-shockwave-flash"),
    ("class", "application/java"),
    ("tar", "application/x-tar"),
    ("zip", "application/zip"),
    ("gz|gzip", "application/x-gzip"),
    ("rar", "application/rar"),
    ("7z", "application/x-7z-compressed"),
    ("exe", "application/x-msdownload"),
    ("psd|xcf", "application/octet-stream"),
    ("doc", "application/msword"),
    ("pot|pps|ppt", "application/vnd.ms-powerpoint"),
    ("wri", "application/vnd.ms-write"),
    ("xla|xls|xlt|xlw", "application/vnd.ms-excel"),
    ("mdb", "application/vnd.ms-access"),
    ("mpp", "application/vnd.ms-project"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("odp", "application/vnd.oasis.opendocument.presentation"),
    ("ods", "application/vnd.oasis.opendocument.spreadsheet"),
    ("odg", "application/vnd.oasis.opendocument.graphics"),
    ("wp|wpd", "application/wordperfect"),
    ("key", "application/vnd.apple.keynote"),
    ("numbers", "application/vnd.apple.numbers"),
    ("pages", "application/vnd.apple.pages"),
];

/// MIME types matching an attachment `media_type` filter such as `image`.
pub fn mime_types_for(media_type: &str) -> Vec<&'static str> {
    let mut types: Vec<&'static str> = MIME_TYPES
        .iter()
        .map(|(_, mime)| *mime)
        .filter(|mime| mime.contains(media_type))
        .collect();
    types.dedup();
    types
}

/// `image` for image MIME types, `file` for everything else.
pub fn media_type_of(mime_type: &str) -> &'static str {
    if mime_type.contains("image") {
        "image"
    } else {
        "file"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageSize {
    pub file: String,
    pub width: i64,
    pub height: i64,
    pub mime_type: String,
    pub source_url: String,
}

/// Camera and IPTC fields WordPress extracts on upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageMeta {
    pub aperture: String,
    pub credit: String,
    pub camera: String,
    pub caption: String,
    pub created_timestamp: String,
    pub copyright: String,
    pub focal_length: String,
    pub iso: String,
    pub shutter_speed: String,
    pub title: String,
    pub orientation: String,
}

impl ImageMeta {
    fn from_php(value: &PhpValue) -> Self {
        let text = |key: &str| value.get(key).and_then(PhpValue::to_text).unwrap_or_default();

        Self {
            aperture: text("aperture"),
            credit: text("credit"),
            camera: text("camera"),
            caption: text("caption"),
            created_timestamp: text("created_timestamp"),
            copyright: text("copyright"),
            focal_length: text("focal_length"),
            iso: text("iso"),
            shutter_speed: text("shutter_speed"),
            title: text("title"),
            orientation: text("orientation"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaDetails {
    pub width: i64,
    pub height: i64,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_meta: Option<ImageMeta>,
    pub sizes: BTreeMap<String, ImageSize>,
}

impl MediaDetails {
    /// Decodes a serialized `_wp_attachment_metadata` value.
    ///
    /// Size files resolve under the upload directory of the original file,
    /// taken from the first two segments of its path (`2019/01`). A `full`
    /// entry pointing at `source_url` is always added when a file is known.
    pub fn decode(
        raw: &str,
        cfg: &ApiConfig,
        mime_type: &str,
        source_url: &str,
    ) -> Result<Self, DecodeError> {
        let value = unserialize(raw)?;

        let int = |v: &PhpValue, key: &str| v.get(key).and_then(PhpValue::as_int).unwrap_or(0);
        let file = value
            .get("file")
            .and_then(PhpValue::as_str)
            .unwrap_or_default()
            .to_string();

        let segments: Vec<&str> = file.split('/').collect();
        let dir_depth = segments.len().saturating_sub(1).min(2);
        let upload_dir = segments[..dir_depth].join("/");

        let mut sizes = BTreeMap::new();
        if let Some(entries) = value.get("sizes").and_then(PhpValue::as_array) {
            for (name, size) in entries {
                let Some(name) = name.to_text() else { continue };
                let size_file = size
                    .get("file")
                    .and_then(PhpValue::as_str)
                    .unwrap_or_default()
                    .to_string();
                let relative = if upload_dir.is_empty() {
                    size_file.clone()
                } else {
                    format!("{}/{}", upload_dir, size_file)
                };

                sizes.insert(
                    name,
                    ImageSize {
                        source_url: cfg.upload_url(&relative),
                        width: int(size, "width"),
                        height: int(size, "height"),
                        mime_type: size
                            .get("mime-type")
                            .and_then(PhpValue::to_text)
                            .unwrap_or_default(),
                        file: size_file,
                    },
                );
            }
        }

        let width = int(&value, "width");
        let height = int(&value, "height");

        if !file.is_empty() {
            sizes.insert(
                "full".to_string(),
                ImageSize {
                    file: segments.last().copied().unwrap_or_default().to_string(),
                    width,
                    height,
                    mime_type: mime_type.to_string(),
                    source_url: source_url.to_string(),
                },
            );
        }

        Ok(Self {
            width,
            height,
            file,
            image_meta: value
                .get("image_meta")
                .filter(|v| v.as_array().is_some())
                .map(ImageMeta::from_php),
            sizes,
        })
    }
}

/// Attachment as embedded under `wp:featuredmedia`.
#[derive(Debug, Clone, Serialize)]
pub struct Media {
    pub id: u64,
    pub date: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub link: String,
    pub title: Rendered,
    pub author: u64,
    pub caption: Rendered,
    pub alt_text: String,
    pub media_type: String,
    pub mime_type: String,
    pub media_details: MediaDetails,
    pub source_url: String,
    #[serde(rename = "_links")]
    pub links: MediaLinks,
}

impl Media {
    /// Builds the embedded attachment from its row and post meta.
    ///
    /// A malformed metadata blob is logged and yields empty details.
    pub fn from_record(
        record: &ContentRecord,
        metas: Option<&HashMap<String, String>>,
        cfg: &ApiConfig,
    ) -> Self {
        let meta = |key: &str| metas.and_then(|m| m.get(key));

        let source_url = meta(ATTACHED_FILE_KEY)
            .filter(|f| !f.is_empty())
            .map(|f| cfg.upload_url(f))
            .unwrap_or_else(|| record.guid.clone());

        let media_details = match meta(ATTACHMENT_METADATA_KEY) {
            Some(raw) => MediaDetails::decode(raw, cfg, &record.mime_type, &source_url)
                .unwrap_or_else(|e| {
                    tracing::warn!(
                        media_id = record.id,
                        error = %e,
                        "Failed to decode attachment metadata"
                    );
                    MediaDetails::default()
                }),
            None => MediaDetails::default(),
        };

        Self {
            id: record.id,
            date: record.date.clone(),
            slug: record.slug.clone(),
            kind: record.post_type.clone(),
            link: record.link.clone(),
            title: Rendered::new(record.title.clone()),
            author: record.author,
            caption: Rendered::new(record.excerpt.clone()),
            alt_text: meta(IMAGE_ALT_KEY).cloned().unwrap_or_default(),
            media_type: media_type_of(&record.mime_type).to_string(),
            mime_type: record.mime_type.clone(),
            media_details,
            source_url,
            links: media_links(&cfg.api_base_url, record.id, record.author),
        }
    }
}
