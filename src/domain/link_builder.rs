//! Canonical URL synthesis for `_links`.
//!
//! Every function here is pure string composition over the API base URL
//! (`{api_host}/{api_path}/{api_version}`) and a resource kind. Nothing can
//! fail: an unknown kind pluralizes to an empty string and yields URLs with an
//! empty path segment.

use crate::domain::entities::links::{
    CommentLinks, ContentLinks, Curie, EmbeddableLink, Href, MediaLinks, TermLinks,
    TermRelationLink, UpLink, UserLinks, VersionHistoryLink, VersionLink,
};

pub const POST_TYPE: &str = "post";
pub const PAGE_TYPE: &str = "page";
pub const CATEGORY_TAXONOMY: &str = "category";
pub const TAG_TAXONOMY: &str = "post_tag";

const CURIES_HREF: &str = "https://api.w.org/{rel}";

/// Plural route segment of a resource kind.
///
/// Kinds outside the table map to `""`.
pub fn plural(kind: &str) -> &'static str {
    match kind {
        "post" => "posts",
        "page" => "pages",
        "category" => "categories",
        "post_tag" => "tags",
        "comment" => "comments",
        _ => "",
    }
}

/// URL templates for one resource kind under one API base.
#[derive(Debug, Clone, Copy)]
pub struct LinkUrl<'a> {
    base_url: &'a str,
    kind: &'a str,
}

impl<'a> LinkUrl<'a> {
    pub fn new(base_url: &'a str, kind: &'a str) -> Self {
        Self { base_url, kind }
    }

    fn about_prefix(&self) -> &'static str {
        match self.kind {
            CATEGORY_TAXONOMY | TAG_TAXONOMY => "taxonomies",
            _ => "types",
        }
    }

    pub fn self_link(&self, id: u64) -> String {
        format!("{}/{}/{}", self.base_url, plural(self.kind), id)
    }

    pub fn collection(&self) -> String {
        format!("{}/{}/", self.base_url, plural(self.kind))
    }

    pub fn about(&self) -> String {
        format!("{}/{}/{}", self.base_url, self.about_prefix(), self.kind)
    }

    pub fn author(&self, user_id: u64) -> String {
        format!("{}/users/{}", self.base_url, user_id)
    }

    pub fn replies(&self, id: u64) -> String {
        format!("{}/comments?post={}", self.base_url, id)
    }

    pub fn featured_media(&self, id: u64) -> String {
        format!("{}/media/{}", self.base_url, id)
    }

    pub fn revisions(&self, id: u64) -> String {
        format!("{}/{}/{}/revisions", self.base_url, plural(self.kind), id)
    }

    pub fn attachment(&self, id: u64) -> String {
        format!("{}/media?parent={}", self.base_url, id)
    }

    pub fn categories(&self, id: u64) -> String {
        format!("{}/categories?post={}", self.base_url, id)
    }

    pub fn tags(&self, id: u64) -> String {
        format!("{}/tags?post={}", self.base_url, id)
    }

    /// Posts filtered by this taxonomy term, e.g. `/posts/?category=3`.
    pub fn post_type(&self, id: u64) -> String {
        format!("{}/posts/?{}={}", self.base_url, self.kind, id)
    }

    pub fn curies(&self) -> &'static str {
        CURIES_HREF
    }
}

pub fn predecessor_version(base_url: &str, plural: &str, id: u64, revision_id: u64) -> String {
    format!("{}/{}/{}/revisions/{}", base_url, plural, id, revision_id)
}

/// Front-end archive URL of a category.
pub fn category_link(site_url: &str, slug: &str) -> String {
    format!("{}/category/{}/", site_url, slug)
}

/// Front-end archive URL of a tag.
pub fn tag_link(site_url: &str, slug: &str) -> String {
    format!("{}/tag/{}/", site_url, slug)
}

pub fn author_archive_link(site_url: &str, nicename: &str) -> String {
    format!("{}/author/{}/", site_url, nicename)
}

fn wp_curie(url: &LinkUrl<'_>) -> Curie {
    Curie {
        name: "wp".to_string(),
        href: url.curies().to_string(),
        templated: true,
    }
}

/// Full link set of a post or page.
///
/// `revisions` holds revision ids newest first; the first one becomes the
/// `predecessor-version` entry. `featured_media == 0` omits `wp:featuredmedia`.
pub fn content_links(
    base_url: &str,
    kind: &str,
    id: u64,
    author: u64,
    featured_media: u64,
    revisions: &[u64],
) -> ContentLinks {
    let url = LinkUrl::new(base_url, kind);

    let featured_media = if featured_media != 0 {
        vec![EmbeddableLink::new(url.featured_media(featured_media))]
    } else {
        Vec::new()
    };

    let predecessor_version = revisions
        .first()
        .map(|rev| VersionLink {
            id: *rev,
            href: predecessor_version(base_url, plural(kind), id, *rev),
        })
        .into_iter()
        .collect();

    let term = if kind == POST_TYPE {
        vec![
            TermRelationLink {
                taxonomy: CATEGORY_TAXONOMY.to_string(),
                embeddable: true,
                href: url.categories(id),
            },
            TermRelationLink {
                taxonomy: TAG_TAXONOMY.to_string(),
                embeddable: true,
                href: url.tags(id),
            },
        ]
    } else {
        Vec::new()
    };

    ContentLinks {
        self_link: vec![Href::new(url.self_link(id))],
        collection: vec![Href::new(url.collection())],
        about: vec![Href::new(url.about())],
        author: vec![EmbeddableLink::new(url.author(author))],
        replies: vec![EmbeddableLink::new(url.replies(id))],
        version_history: vec![VersionHistoryLink {
            count: revisions.len(),
            href: url.revisions(id),
        }],
        predecessor_version,
        featured_media,
        attachment: vec![Href::new(url.attachment(id))],
        term,
        curies: vec![wp_curie(&url)],
    }
}

/// Link set of an embedded attachment. Attachments live under `/media`.
pub fn media_links(base_url: &str, id: u64, author: u64) -> MediaLinks {
    let url = LinkUrl::new(base_url, "attachment");

    MediaLinks {
        self_link: vec![Href::new(url.featured_media(id))],
        collection: vec![Href::new(format!("{}/media", base_url))],
        about: vec![Href::new(url.about())],
        author: vec![EmbeddableLink::new(url.author(author))],
        replies: vec![EmbeddableLink::new(url.replies(id))],
    }
}

/// Link set of a taxonomy term; `self` uses the taxonomy's own route.
pub fn term_links(base_url: &str, taxonomy: &str, term_id: u64) -> TermLinks {
    let url = LinkUrl::new(base_url, taxonomy);

    TermLinks {
        self_link: vec![Href::new(url.self_link(term_id))],
        collection: vec![Href::new(url.collection())],
        about: vec![Href::new(url.about())],
        post_type: vec![Href::new(url.post_type(term_id))],
        curies: vec![wp_curie(&url)],
    }
}

pub fn user_links(base_url: &str, user_id: u64) -> UserLinks {
    UserLinks {
        self_link: vec![Href::new(format!("{}/users/{}", base_url, user_id))],
        collection: vec![Href::new(format!("{}/users", base_url))],
    }
}

/// Link set of an embedded comment.
///
/// `is_parent` tells whether another comment in the same batch replies to
/// this one, which adds the `children` relation.
pub fn comment_links(
    base_url: &str,
    comment_id: u64,
    parent: u64,
    author: u64,
    post_id: u64,
    post_kind: &str,
    is_parent: bool,
) -> CommentLinks {
    let author = if author != 0 {
        vec![EmbeddableLink::new(format!("{}/users/{}", base_url, author))]
    } else {
        Vec::new()
    };

    let in_reply_to = if parent != 0 {
        vec![EmbeddableLink::new(format!("{}/comments/{}", base_url, parent))]
    } else {
        Vec::new()
    };

    let children = if is_parent {
        vec![Href::new(format!(
            "{}/comments?parent={}",
            base_url, comment_id
        ))]
    } else {
        Vec::new()
    };

    CommentLinks {
        self_link: vec![Href::new(format!("{}/comments/{}", base_url, comment_id))],
        collection: vec![Href::new(format!("{}/comments", base_url))],
        author,
        up: vec![UpLink {
            embeddable: true,
            post_type: post_kind.to_string(),
            href: format!("{}/{}/{}", base_url, plural(post_kind), post_id),
        }],
        in_reply_to,
        children,
    }
}
