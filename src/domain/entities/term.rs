//! Taxonomy terms and their per-post grouping.

use serde::Serialize;
use std::collections::HashMap;

use super::links::TermLinks;

pub const FORMAT_TAXONOMY: &str = "post_format";
const FORMAT_PREFIX: &str = "post-format-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub term_id: u64,
    pub name: String,
    pub slug: String,
    pub term_group: i64,
}

/// One taxonomy-scoped join row. A term may have several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermTaxonomy {
    pub term_taxonomy_id: u64,
    pub term_id: u64,
    pub taxonomy: String,
    pub description: String,
    pub parent: u64,
    pub count: i64,
}

/// A term attached to a content object through `term_relationships`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTerm {
    pub object_id: u64,
    pub term: Term,
    pub taxonomy: TermTaxonomy,
}

/// Category, tag and format assignments of a batch of content ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostTaxonomies {
    /// Category and tag rows per content id, in query order.
    pub terms: HashMap<u64, Vec<PostTerm>>,
    /// Format slug per content id (`post-format-aside`).
    pub formats: HashMap<u64, String>,
}

impl PostTaxonomies {
    pub fn from_rows(rows: Vec<PostTerm>) -> Self {
        let mut grouped = PostTaxonomies::default();

        for row in rows {
            if row.taxonomy.taxonomy == FORMAT_TAXONOMY {
                grouped
                    .formats
                    .insert(row.object_id, row.term.slug.clone());
                continue;
            }
            grouped.terms.entry(row.object_id).or_default().push(row);
        }

        grouped
    }

    /// Term ids of `object_id` in one taxonomy.
    pub fn term_ids(&self, object_id: u64, taxonomy: &str) -> Vec<u64> {
        self.terms
            .get(&object_id)
            .map(|rows| {
                rows.iter()
                    .filter(|r| r.taxonomy.taxonomy == taxonomy)
                    .map(|r| r.term.term_id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Post format without its `post-format-` prefix, `standard` when unset.
    pub fn format(&self, object_id: u64) -> String {
        self.formats
            .get(&object_id)
            .map(|slug| slug.replace(FORMAT_PREFIX, ""))
            .unwrap_or_else(|| "standard".to_string())
    }
}

/// Term as it appears in `_embedded["wp:term"]`.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddedTerm {
    pub id: u64,
    pub link: String,
    pub name: String,
    pub slug: String,
    pub taxonomy: String,
    #[serde(rename = "_links")]
    pub links: TermLinks,
}
