//! Post and page aggregation: fetches rows, pulls their relational context
//! in batches and assembles the `_links` / `_embedded` envelope.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::domain::entities::{
    CommentRecord, Content, ContentBase, ContentKind, ContentRecord, ContentRendered,
    ContentResponse, Context, Embedded, EmbeddedTerm, GetItemRequest, ListFilter, ListRequest,
    Media, PostTaxonomies, Rendered, User, UserDetail, comment::embed_comments,
    option::{STICKY_POSTS_OPTION, parse_sticky_ids},
};
use crate::domain::link_builder::{
    CATEGORY_TAXONOMY, POST_TYPE, TAG_TAXONOMY, category_link, content_links, tag_link,
    term_links,
};
use crate::domain::repositories::{
    ContentRepository, PostMetas, SharedRepository, TermRepository, UserRepository,
};
use crate::error::AppError;

const THUMBNAIL_KEY: &str = "_thumbnail_id";
const PAGE_TEMPLATE_KEY: &str = "_wp_page_template";

/// Relational context shared by every item of one request.
#[derive(Default)]
struct Batch {
    metas: PostMetas,
    users: HashMap<u64, UserDetail>,
    revisions: HashMap<u64, Vec<u64>>,
    taxonomies: PostTaxonomies,
    sticky_ids: BTreeSet<u64>,
    /// Present only for `?_embed` requests.
    embedded: Option<EmbedBatch>,
}

#[derive(Default)]
struct EmbedBatch {
    comments: HashMap<u64, Vec<CommentRecord>>,
    media: HashMap<u64, Media>,
}

/// Featured media id from `_thumbnail_id`, `0` when unset or malformed.
pub fn featured_media_id(metas: Option<&HashMap<String, String>>) -> u64 {
    metas
        .and_then(|m| m.get(THUMBNAIL_KEY))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

/// Service assembling WordPress content responses.
///
/// Every store access happens in batches: the number of queries per request
/// does not depend on the number of items.
pub struct ContentService<
    C: ContentRepository + ?Sized = dyn ContentRepository,
    T: TermRepository + ?Sized = dyn TermRepository,
    U: UserRepository + ?Sized = dyn UserRepository,
    S: SharedRepository + ?Sized = dyn SharedRepository,
> {
    content: Arc<C>,
    terms: Arc<T>,
    users: Arc<U>,
    shared: Arc<S>,
}

impl<C, T, U, S> ContentService<C, T, U, S>
where
    C: ContentRepository + ?Sized,
    T: TermRepository + ?Sized,
    U: UserRepository + ?Sized,
    S: SharedRepository + ?Sized,
{
    /// Creates a new content service.
    pub fn new(content: Arc<C>, terms: Arc<T>, users: Arc<U>, shared: Arc<S>) -> Self {
        Self {
            content,
            terms,
            users,
            shared,
        }
    }

    /// Store connectivity probe.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.shared.ping().await
    }

    /// Fetches one post or page by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidId`] if no publicly visible row of the
    /// requested kind has this id. Any other repository error aborts the
    /// request unchanged.
    pub async fn get_item(
        &self,
        cfg: &ApiConfig,
        req: &GetItemRequest,
    ) -> Result<ContentResponse, AppError> {
        let record = match self.content.find_by_id(cfg, req.id, req.kind).await {
            Ok(record) => record,
            Err(AppError::NotFound) => return Err(AppError::InvalidId),
            Err(e) => {
                tracing::error!(id = req.id, kind = %req.kind, error = %e, "Failed to load content");
                return Err(e);
            }
        };

        let sticky_ids = if req.kind == ContentKind::Post && req.context == Context::View {
            self.sticky_ids(cfg).await?
        } else {
            BTreeSet::new()
        };

        let mut items = self
            .assemble(
                cfg,
                vec![record],
                req.embed,
                req.context,
                req.password.as_deref(),
                sticky_ids,
            )
            .await?;

        items.pop().ok_or(AppError::InvalidId)
    }

    /// Runs a collection request.
    ///
    /// Returns an empty list without further queries when nothing matches.
    pub async fn list(
        &self,
        cfg: &ApiConfig,
        req: ListRequest,
    ) -> Result<Vec<ContentResponse>, AppError> {
        tracing::debug!(filter = ?req.filter, embed = req.embed, "Listing content");

        let mut filter = req.filter;

        let sticky_ids = if filter.kind == ContentKind::Post
            && (filter.sticky.is_some() || req.context == Context::View)
        {
            self.sticky_ids(cfg).await?
        } else {
            BTreeSet::new()
        };
        filter.sticky_ids = sticky_ids.clone();

        self.resolve_taxonomy_filters(cfg, &mut filter).await?;

        let ids = self
            .content
            .query_ids(cfg, &filter)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Content query rejected or failed"))?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.content.find_by_ids(cfg, filter.kind, &ids).await?;

        self.assemble(cfg, records, req.embed, req.context, None, sticky_ids)
            .await
    }

    /// Ids listed in the `sticky_posts` option.
    ///
    /// A missing or undecodable option means no sticky posts.
    async fn sticky_ids(&self, cfg: &ApiConfig) -> Result<BTreeSet<u64>, AppError> {
        let Some(option) = self.shared.load_option(cfg, STICKY_POSTS_OPTION).await? else {
            return Ok(BTreeSet::new());
        };

        Ok(parse_sticky_ids(&option.option_value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to decode sticky_posts option");
            BTreeSet::new()
        }))
    }

    /// Turns client term ids into `term_taxonomy_id` include/exclude lists.
    async fn resolve_taxonomy_filters(
        &self,
        cfg: &ApiConfig,
        filter: &mut ListFilter,
    ) -> Result<(), AppError> {
        if !filter.categories.is_empty() || !filter.tags.is_empty() {
            let mut ids = self
                .term_taxonomy_ids(cfg, &filter.categories, CATEGORY_TAXONOMY)
                .await?;
            ids.extend(self.term_taxonomy_ids(cfg, &filter.tags, TAG_TAXONOMY).await?);
            filter.taxonomy_include = Some(ids);
        }

        if !filter.categories_exclude.is_empty() || !filter.tags_exclude.is_empty() {
            let mut ids = self
                .term_taxonomy_ids(cfg, &filter.categories_exclude, CATEGORY_TAXONOMY)
                .await?;
            ids.extend(
                self.term_taxonomy_ids(cfg, &filter.tags_exclude, TAG_TAXONOMY)
                    .await?,
            );
            filter.taxonomy_exclude = Some(ids);
        }

        Ok(())
    }

    async fn term_taxonomy_ids(
        &self,
        cfg: &ApiConfig,
        term_ids: &[u64],
        taxonomy: &str,
    ) -> Result<Vec<u64>, AppError> {
        if term_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .terms
            .term_taxonomies_by_term_ids(cfg, term_ids, taxonomy)
            .await?;

        Ok(rows.into_iter().map(|tt| tt.term_taxonomy_id).collect())
    }

    /// Pulls the relational context of all records, then builds each item.
    async fn assemble(
        &self,
        cfg: &ApiConfig,
        records: Vec<ContentRecord>,
        embed: bool,
        context: Context,
        password: Option<&str>,
        sticky_ids: BTreeSet<u64>,
    ) -> Result<Vec<ContentResponse>, AppError> {
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();

        let mut authors: Vec<u64> = records.iter().map(|r| r.author).collect();
        authors.sort_unstable();
        authors.dedup();

        let post_ids: Vec<u64> = records
            .iter()
            .filter(|r| r.post_type == POST_TYPE)
            .map(|r| r.id)
            .collect();

        let metas = self
            .shared
            .post_metas_by_post_ids(cfg, &ids)
            .await
            .inspect_err(|e| tracing::error!(ids = ?ids, error = %e, "Failed to load post meta"))?;

        let users = self
            .users
            .find_by_ids(cfg, &authors)
            .await
            .inspect_err(|e| tracing::error!(authors = ?authors, error = %e, "Failed to load authors"))?;

        let revisions = self
            .content
            .revisions_by_parent_ids(cfg, &ids)
            .await
            .inspect_err(|e| tracing::error!(ids = ?ids, error = %e, "Failed to load revisions"))?;

        let taxonomies = if !post_ids.is_empty() && (embed || context == Context::View) {
            self.terms
                .post_terms_by_ids(cfg, &post_ids)
                .await
                .inspect_err(|e| tracing::error!(ids = ?post_ids, error = %e, "Failed to load terms"))?
        } else {
            PostTaxonomies::default()
        };

        let embedded = if embed {
            Some(self.embed_batch(cfg, &ids, &metas).await?)
        } else {
            None
        };

        let batch = Batch {
            metas,
            users,
            revisions,
            taxonomies,
            sticky_ids,
            embedded,
        };

        Ok(records
            .into_iter()
            .map(|record| build_item(cfg, record, &batch, context, password))
            .collect())
    }

    /// Comments and featured media of all records, one query each.
    async fn embed_batch(
        &self,
        cfg: &ApiConfig,
        ids: &[u64],
        metas: &PostMetas,
    ) -> Result<EmbedBatch, AppError> {
        let mut comments: HashMap<u64, Vec<CommentRecord>> = HashMap::new();
        for comment in self
            .content
            .comments_by_post_ids(cfg, ids)
            .await
            .inspect_err(|e| tracing::error!(ids = ?ids, error = %e, "Failed to load comments"))?
        {
            comments.entry(comment.post_id).or_default().push(comment);
        }

        let mut media_ids: Vec<u64> = ids
            .iter()
            .map(|id| featured_media_id(metas.get(id)))
            .filter(|id| *id != 0)
            .collect();
        media_ids.sort_unstable();
        media_ids.dedup();

        let mut media = HashMap::new();
        if !media_ids.is_empty() {
            let rows = self
                .content
                .find_by_ids(cfg, ContentKind::Attachment, &media_ids)
                .await?;
            let media_metas = self.shared.post_metas_by_post_ids(cfg, &media_ids).await?;

            for row in &rows {
                media.insert(row.id, Media::from_record(row, media_metas.get(&row.id), cfg));
            }
        }

        Ok(EmbedBatch { comments, media })
    }
}

/// Per-item enrichment, in order: featured media, links, embedded graph,
/// view-only fields, projection.
fn build_item(
    cfg: &ApiConfig,
    record: ContentRecord,
    batch: &Batch,
    context: Context,
    password: Option<&str>,
) -> ContentResponse {
    let id = record.id;
    let is_post = record.post_type == POST_TYPE;
    let metas = batch.metas.get(&id);

    let featured_media = featured_media_id(metas);

    let revisions = batch
        .revisions
        .get(&id)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let links = content_links(
        &cfg.api_base_url,
        &record.post_type,
        id,
        record.author,
        featured_media,
        revisions,
    );

    let embedded = batch
        .embedded
        .as_ref()
        .map(|e| embed_item(cfg, &record, featured_media, batch, e));

    let protected = !record.password.is_empty();
    let unlocked = !protected || password == Some(record.password.as_str());
    let visible = |text: &str| {
        if unlocked {
            text.to_string()
        } else {
            String::new()
        }
    };

    let base = ContentBase {
        id,
        date: record.date.clone(),
        slug: record.slug.clone(),
        kind: record.post_type.clone(),
        link: record.link.clone(),
        title: Rendered::new(record.title.clone()),
        author: record.author,
        excerpt: ContentRendered {
            rendered: visible(&record.excerpt),
            protected,
        },
        featured_media,
        links,
        embedded,
    };

    if context == Context::Embed {
        return ContentResponse::Embed(base);
    }

    let template = metas
        .and_then(|m| m.get(PAGE_TEMPLATE_KEY))
        .cloned()
        .unwrap_or_default();

    let is_page = record.post_type == ContentKind::Page.as_str();
    let is_attachment = record.post_type == ContentKind::Attachment.as_str();

    ContentResponse::Full(Box::new(Content {
        content: ContentRendered {
            rendered: visible(&record.content),
            protected,
        },
        base,
        date_gmt: record.date_gmt,
        guid: Rendered::new(record.guid),
        modified: record.modified,
        modified_gmt: record.modified_gmt,
        status: record.status,
        comment_status: record.comment_status,
        ping_status: record.ping_status,
        template,
        meta: Vec::new(),
        format: is_post.then(|| batch.taxonomies.format(id)),
        sticky: is_post.then(|| batch.sticky_ids.contains(&id)),
        categories: is_post.then(|| batch.taxonomies.term_ids(id, CATEGORY_TAXONOMY)),
        tags: is_post.then(|| batch.taxonomies.term_ids(id, TAG_TAXONOMY)),
        parent: is_page.then_some(record.parent),
        menu_order: is_page.then_some(record.menu_order),
        mime_type: is_attachment.then(|| record.mime_type.clone()),
        media_type: is_attachment
            .then(|| crate::domain::entities::media::media_type_of(&record.mime_type).to_string()),
    }))
}

fn embed_item(
    cfg: &ApiConfig,
    record: &ContentRecord,
    featured_media: u64,
    batch: &Batch,
    embedded: &EmbedBatch,
) -> Embedded {
    let author = batch
        .users
        .get(&record.author)
        .map(|u| User::from_detail(u, cfg))
        .into_iter()
        .collect();

    let featured_media = if featured_media == 0 {
        Vec::new()
    } else {
        match embedded.media.get(&featured_media) {
            Some(media) => vec![media.clone()],
            None => {
                tracing::warn!(
                    post_id = record.id,
                    media_id = featured_media,
                    "Featured media not found"
                );
                Vec::new()
            }
        }
    };

    let term = if record.post_type == POST_TYPE {
        vec![
            embedded_terms(cfg, batch, record.id, CATEGORY_TAXONOMY),
            embedded_terms(cfg, batch, record.id, TAG_TAXONOMY),
        ]
    } else {
        Vec::new()
    };

    let comments = embedded
        .comments
        .get(&record.id)
        .map(Vec::as_slice)
        .unwrap_or_default();

    Embedded {
        author,
        featured_media,
        term,
        replies: embed_comments(&cfg.api_base_url, &record.link, &record.post_type, comments),
    }
}

fn embedded_terms(cfg: &ApiConfig, batch: &Batch, object_id: u64, taxonomy: &str) -> Vec<EmbeddedTerm> {
    batch
        .taxonomies
        .terms
        .get(&object_id)
        .into_iter()
        .flatten()
        .filter(|row| row.taxonomy.taxonomy == taxonomy)
        .map(|row| {
            let link = if taxonomy == CATEGORY_TAXONOMY {
                category_link(&cfg.site_url, &row.term.slug)
            } else {
                tag_link(&cfg.site_url, &row.term.slug)
            };

            EmbeddedTerm {
                id: row.term.term_id,
                link,
                name: row.term.name.clone(),
                slug: row.term.slug.clone(),
                taxonomy: taxonomy.to_string(),
                links: term_links(&cfg.api_base_url, taxonomy, row.term.term_id),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        OrderBy, PostTerm, Term, TermTaxonomy, WpOption,
        media::{ATTACHED_FILE_KEY, IMAGE_ALT_KEY},
    };
    use crate::domain::repositories::{
        MockContentRepository, MockSharedRepository, MockTermRepository, MockUserRepository,
    };

    type TestService = ContentService<
        MockContentRepository,
        MockTermRepository,
        MockUserRepository,
        MockSharedRepository,
    >;

    struct Mocks {
        content: MockContentRepository,
        terms: MockTermRepository,
        users: MockUserRepository,
        shared: MockSharedRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                content: MockContentRepository::new(),
                terms: MockTermRepository::new(),
                users: MockUserRepository::new(),
                shared: MockSharedRepository::new(),
            }
        }

        fn into_service(self) -> TestService {
            ContentService::new(
                Arc::new(self.content),
                Arc::new(self.terms),
                Arc::new(self.users),
                Arc::new(self.shared),
            )
        }
    }

    fn create_test_post(id: u64, author: u64) -> ContentRecord {
        ContentRecord {
            id,
            author,
            date: "2020-05-01T10:00:00".to_string(),
            title: format!("Post {id}"),
            content: "<p>Body</p>".to_string(),
            excerpt: "Body".to_string(),
            status: "publish".to_string(),
            slug: format!("post-{id}"),
            post_type: "post".to_string(),
            link: format!("http://localhost:8080/post-{id}/"),
            ..Default::default()
        }
    }

    fn create_test_user(id: u64) -> UserDetail {
        UserDetail {
            id,
            nicename: format!("user{id}"),
            display_name: format!("User {id}"),
            email: format!("user{id}@example.com"),
            ..Default::default()
        }
    }

    fn expect_view_context(mocks: &mut Mocks, metas: PostMetas) {
        mocks
            .shared
            .expect_post_metas_by_post_ids()
            .times(1)
            .returning(move |_, _| Ok(metas.clone()));
        mocks
            .users
            .expect_find_by_ids()
            .times(1)
            .returning(|_, ids| Ok(ids.iter().map(|id| (*id, create_test_user(*id))).collect()));
        mocks
            .content
            .expect_revisions_by_parent_ids()
            .times(1)
            .returning(|_, _| Ok(HashMap::new()));
        mocks
            .terms
            .expect_post_terms_by_ids()
            .times(1)
            .returning(|_, _| Ok(PostTaxonomies::default()));
        mocks
            .shared
            .expect_load_option()
            .times(1)
            .returning(|_, _| Ok(None));
    }

    fn get_request(id: u64) -> GetItemRequest {
        GetItemRequest {
            id,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_get_item_links() {
        let mut mocks = Mocks::new();
        mocks
            .content
            .expect_find_by_id()
            .withf(|_, id, kind| *id == 1 && *kind == ContentKind::Post)
            .times(1)
            .returning(|_, id, _| Ok(create_test_post(id, 1)));
        expect_view_context(&mut mocks, PostMetas::new());

        let service = mocks.into_service();
        let cfg = ApiConfig::default();
        let item = service.get_item(&cfg, &get_request(1)).await.unwrap();

        let base = item.base();
        assert_eq!(base.id, 1);
        assert_eq!(base.author, 1);
        assert_eq!(base.links.self_link.len(), 1);
        assert_eq!(
            base.links.self_link[0].href,
            format!("{}/posts/1", cfg.api_base_url)
        );
        assert_eq!(
            base.links.collection[0].href,
            format!("{}/posts/", cfg.api_base_url)
        );
        assert!(base.links.featured_media.is_empty());
        assert!(base.embedded.is_none());

        let ContentResponse::Full(content) = item else {
            panic!("expected full projection");
        };
        assert_eq!(content.sticky, Some(false));
        assert_eq!(content.format.as_deref(), Some("standard"));
        assert_eq!(content.categories, Some(vec![]));
    }

    #[tokio::test]
    async fn test_get_item_not_found_is_invalid_id() {
        let mut mocks = Mocks::new();
        mocks
            .content
            .expect_find_by_id()
            .times(1)
            .returning(|_, _, _| Err(AppError::NotFound));
        mocks.shared.expect_post_metas_by_post_ids().times(0);

        let service = mocks.into_service();
        let result = service
            .get_item(&ApiConfig::default(), &get_request(999999))
            .await;

        assert!(matches!(result, Err(AppError::InvalidId)));
    }

    #[tokio::test]
    async fn test_get_item_store_failure_propagates() {
        let mut mocks = Mocks::new();
        mocks
            .content
            .expect_find_by_id()
            .times(1)
            .returning(|_, _, _| Err(AppError::Query(sqlx::Error::PoolTimedOut)));

        let service = mocks.into_service();
        let result = service.get_item(&ApiConfig::default(), &get_request(1)).await;

        assert!(matches!(result, Err(AppError::Query(_))));
    }

    #[tokio::test]
    async fn test_embed_context_omits_view_only_fields() {
        let mut mocks = Mocks::new();
        mocks
            .content
            .expect_find_by_id()
            .times(1)
            .returning(|_, id, _| Ok(create_test_post(id, 1)));
        mocks
            .shared
            .expect_post_metas_by_post_ids()
            .times(1)
            .returning(|_, _| Ok(PostMetas::new()));
        mocks
            .users
            .expect_find_by_ids()
            .times(1)
            .returning(|_, _| Ok(HashMap::new()));
        mocks
            .content
            .expect_revisions_by_parent_ids()
            .times(1)
            .returning(|_, _| Ok(HashMap::new()));
        mocks.terms.expect_post_terms_by_ids().times(0);
        mocks.shared.expect_load_option().times(0);

        let service = mocks.into_service();
        let req = GetItemRequest {
            id: 1,
            context: Context::Embed,
            ..Default::default()
        };
        let item = service.get_item(&ApiConfig::default(), &req).await.unwrap();

        assert!(matches!(item, ContentResponse::Embed(_)));
        let json = serde_json::to_value(&item).unwrap();
        for field in ["template", "tags", "categories", "format", "sticky", "content", "status"] {
            assert!(json.get(field).is_none(), "{field} should be omitted");
        }
        assert_eq!(json["id"], 1);
        assert!(json.get("excerpt").is_some());
        assert!(json.get("_links").is_some());
    }

    #[tokio::test]
    async fn test_list_batches_author_and_meta_lookups() {
        let mut mocks = Mocks::new();
        mocks
            .content
            .expect_query_ids()
            .times(1)
            .returning(|_, _| Ok(vec![3, 2, 1]));
        mocks
            .content
            .expect_find_by_ids()
            .withf(|_, kind, ids| *kind == ContentKind::Post && ids == [3, 2, 1])
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![
                    create_test_post(3, 2),
                    create_test_post(2, 1),
                    create_test_post(1, 1),
                ])
            });
        mocks
            .shared
            .expect_post_metas_by_post_ids()
            .withf(|_, ids| ids == [3, 2, 1])
            .times(1)
            .returning(|_, _| Ok(PostMetas::new()));
        mocks
            .users
            .expect_find_by_ids()
            .withf(|_, ids| ids == [1, 2])
            .times(1)
            .returning(|_, ids| Ok(ids.iter().map(|id| (*id, create_test_user(*id))).collect()));
        mocks
            .content
            .expect_revisions_by_parent_ids()
            .times(1)
            .returning(|_, _| Ok(HashMap::new()));
        mocks
            .terms
            .expect_post_terms_by_ids()
            .times(1)
            .returning(|_, _| Ok(PostTaxonomies::default()));
        mocks
            .shared
            .expect_load_option()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = mocks.into_service();
        let items = service
            .list(&ApiConfig::default(), ListRequest::default())
            .await
            .unwrap();

        let ids: Vec<u64> = items.iter().map(ContentResponse::id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_list_empty_short_circuits() {
        let mut mocks = Mocks::new();
        mocks
            .shared
            .expect_load_option()
            .times(1)
            .returning(|_, _| Ok(None));
        mocks
            .content
            .expect_query_ids()
            .times(1)
            .returning(|_, _| Ok(vec![]));
        mocks.content.expect_find_by_ids().times(0);
        mocks.shared.expect_post_metas_by_post_ids().times(0);

        let service = mocks.into_service();
        let items = service
            .list(&ApiConfig::default(), ListRequest::default())
            .await
            .unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_sticky_ids_are_passed_to_filter() {
        let mut mocks = Mocks::new();
        mocks
            .shared
            .expect_load_option()
            .withf(|_, name| name == "sticky_posts")
            .times(1)
            .returning(|_, _| {
                Ok(Some(WpOption {
                    option_name: "sticky_posts".to_string(),
                    option_value: "a:2:{i:0;i:2;i:1;i:5;}".to_string(),
                    ..Default::default()
                }))
            });
        mocks
            .content
            .expect_query_ids()
            .withf(|_, filter| {
                filter.sticky == Some(true)
                    && filter.sticky_ids.iter().copied().collect::<Vec<_>>() == vec![2, 5]
            })
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let service = mocks.into_service();
        let req = ListRequest {
            filter: ListFilter {
                sticky: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(service.list(&ApiConfig::default(), req).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_sticky_option_means_no_sticky_posts() {
        let mut mocks = Mocks::new();
        mocks.shared.expect_load_option().times(1).returning(|_, _| {
            Ok(Some(WpOption {
                option_value: "a:2:{broken".to_string(),
                ..Default::default()
            }))
        });
        mocks
            .content
            .expect_query_ids()
            .withf(|_, filter| filter.sticky_ids.is_empty())
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let service = mocks.into_service();
        let req = ListRequest {
            filter: ListFilter {
                sticky: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(service.list(&ApiConfig::default(), req).await.is_ok());
    }

    #[tokio::test]
    async fn test_taxonomy_filters_resolve_into_separate_lists() {
        let mut mocks = Mocks::new();
        mocks
            .shared
            .expect_load_option()
            .returning(|_, _| Ok(None));
        mocks
            .terms
            .expect_term_taxonomies_by_term_ids()
            .withf(|_, ids, taxonomy| ids == [3] && taxonomy == "category")
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![TermTaxonomy {
                    term_taxonomy_id: 13,
                    term_id: 3,
                    taxonomy: "category".to_string(),
                    description: String::new(),
                    parent: 0,
                    count: 4,
                }])
            });
        mocks
            .content
            .expect_query_ids()
            .withf(|_, filter| {
                filter.taxonomy_exclude == Some(vec![13]) && filter.taxonomy_include.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let service = mocks.into_service();
        let req = ListRequest {
            filter: ListFilter {
                categories_exclude: vec![3],
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(service.list(&ApiConfig::default(), req).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_ordering_aborts_request() {
        let mut mocks = Mocks::new();
        mocks
            .shared
            .expect_load_option()
            .returning(|_, _| Ok(None));
        mocks
            .content
            .expect_query_ids()
            .times(1)
            .returning(|_, filter| filter.validate_ordering().map(|_| vec![]));
        mocks.content.expect_find_by_ids().times(0);

        let service = mocks.into_service();
        let req = ListRequest {
            filter: ListFilter {
                order_by: OrderBy::Relevance,
                ..Default::default()
            },
            ..Default::default()
        };

        let result = service.list(&ApiConfig::default(), req).await;
        assert!(matches!(result, Err(AppError::InvalidParameter { .. })));
    }

    #[tokio::test]
    async fn test_featured_media_link_follows_thumbnail_meta() {
        let mut mocks = Mocks::new();
        mocks
            .content
            .expect_query_ids()
            .returning(|_, _| Ok(vec![1, 2]));
        mocks
            .content
            .expect_find_by_ids()
            .returning(|_, _, _| Ok(vec![create_test_post(1, 1), create_test_post(2, 1)]));
        let metas = PostMetas::from([(
            1,
            HashMap::from([(THUMBNAIL_KEY.to_string(), "44".to_string())]),
        )]);
        expect_view_context(&mut mocks, metas);

        let service = mocks.into_service();
        let items = service
            .list(&ApiConfig::default(), ListRequest::default())
            .await
            .unwrap();

        let first = items[0].base();
        assert_eq!(first.featured_media, 44);
        assert_eq!(first.links.featured_media.len(), 1);
        assert!(first.links.featured_media[0].href.ends_with("/media/44"));

        let second = items[1].base();
        assert_eq!(second.featured_media, 0);
        assert!(second.links.featured_media.is_empty());
    }

    #[tokio::test]
    async fn test_predecessor_version_from_newest_revision() {
        let mut mocks = Mocks::new();
        mocks
            .content
            .expect_find_by_id()
            .returning(|_, id, _| Ok(create_test_post(id, 1)));
        mocks
            .shared
            .expect_post_metas_by_post_ids()
            .returning(|_, _| Ok(PostMetas::new()));
        mocks
            .users
            .expect_find_by_ids()
            .returning(|_, _| Ok(HashMap::new()));
        mocks
            .content
            .expect_revisions_by_parent_ids()
            .times(1)
            .returning(|_, _| Ok(HashMap::from([(7, vec![30, 12])])));

        let service = mocks.into_service();
        let req = GetItemRequest {
            id: 7,
            context: Context::Embed,
            ..Default::default()
        };
        let item = service.get_item(&ApiConfig::default(), &req).await.unwrap();
        let links = &item.base().links;

        assert_eq!(links.version_history[0].count, 2);
        assert_eq!(links.predecessor_version.len(), 1);
        assert_eq!(links.predecessor_version[0].id, 30);
        assert!(links.predecessor_version[0].href.ends_with("/posts/7/revisions/30"));
    }

    #[tokio::test]
    async fn test_embed_assembles_author_terms_comments_and_media() {
        let mut mocks = Mocks::new();
        mocks
            .content
            .expect_find_by_id()
            .returning(|_, id, _| Ok(create_test_post(id, 1)));
        mocks
            .shared
            .expect_post_metas_by_post_ids()
            .withf(|_, ids| ids == [1])
            .times(1)
            .returning(|_, _| {
                Ok(PostMetas::from([(
                    1,
                    HashMap::from([(THUMBNAIL_KEY.to_string(), "44".to_string())]),
                )]))
            });
        mocks
            .shared
            .expect_post_metas_by_post_ids()
            .withf(|_, ids| ids == [44])
            .times(1)
            .returning(|_, _| {
                Ok(PostMetas::from([(
                    44,
                    HashMap::from([
                        (ATTACHED_FILE_KEY.to_string(), "2020/05/a.png".to_string()),
                        (IMAGE_ALT_KEY.to_string(), "Alt".to_string()),
                    ]),
                )]))
            });
        mocks
            .shared
            .expect_load_option()
            .returning(|_, _| Ok(None));
        mocks
            .users
            .expect_find_by_ids()
            .times(1)
            .returning(|_, _| Ok(HashMap::from([(1, create_test_user(1))])));
        mocks
            .content
            .expect_revisions_by_parent_ids()
            .returning(|_, _| Ok(HashMap::new()));
        mocks
            .terms
            .expect_post_terms_by_ids()
            .times(1)
            .returning(|_, _| {
                let term = |term_id: u64, slug: &str, taxonomy: &str| PostTerm {
                    object_id: 1,
                    term: Term {
                        term_id,
                        name: slug.to_string(),
                        slug: slug.to_string(),
                        term_group: 0,
                    },
                    taxonomy: TermTaxonomy {
                        term_taxonomy_id: term_id + 10,
                        term_id,
                        taxonomy: taxonomy.to_string(),
                        description: String::new(),
                        parent: 0,
                        count: 1,
                    },
                };
                Ok(PostTaxonomies::from_rows(vec![
                    term(3, "news", "category"),
                    term(7, "rust", "post_tag"),
                ]))
            });
        mocks
            .content
            .expect_comments_by_post_ids()
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    CommentRecord {
                        id: 10,
                        post_id: 1,
                        content: "first".to_string(),
                        ..Default::default()
                    },
                    CommentRecord {
                        id: 11,
                        post_id: 1,
                        parent: 10,
                        content: "reply".to_string(),
                        ..Default::default()
                    },
                ])
            });
        mocks
            .content
            .expect_find_by_ids()
            .withf(|_, kind, ids| *kind == ContentKind::Attachment && ids == [44])
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![ContentRecord {
                    id: 44,
                    author: 1,
                    post_type: "attachment".to_string(),
                    mime_type: "image/png".to_string(),
                    ..Default::default()
                }])
            });

        let service = mocks.into_service();
        let cfg = ApiConfig::default();
        let req = GetItemRequest {
            id: 1,
            embed: true,
            ..Default::default()
        };
        let item = service.get_item(&cfg, &req).await.unwrap();
        let embedded = item.base().embedded.as_ref().unwrap();

        assert_eq!(embedded.author.len(), 1);
        assert_eq!(embedded.author[0].id, 1);

        assert_eq!(embedded.term.len(), 2);
        assert_eq!(embedded.term[0][0].slug, "news");
        assert_eq!(embedded.term[0][0].link, "http://localhost:8080/category/news/");
        assert_eq!(embedded.term[1][0].taxonomy, "post_tag");
        assert!(embedded.term[1][0].links.self_link[0].href.ends_with("/tags/7"));

        assert_eq!(embedded.replies.len(), 2);
        assert!(!embedded.replies[0].links.children.is_empty());
        assert_eq!(
            embedded.replies[1].links.in_reply_to[0].href,
            format!("{}/comments/10", cfg.api_base_url)
        );

        assert_eq!(embedded.featured_media.len(), 1);
        assert_eq!(embedded.featured_media[0].alt_text, "Alt");
        assert_eq!(
            embedded.featured_media[0].source_url,
            "http://localhost:8080/wp-content/uploads/2020/05/a.png"
        );

        let ContentResponse::Full(content) = item else {
            panic!("expected full projection");
        };
        assert_eq!(content.categories, Some(vec![3]));
        assert_eq!(content.tags, Some(vec![7]));
    }

    #[tokio::test]
    async fn test_password_protected_content_is_hidden() {
        let mut mocks = Mocks::new();
        mocks.content.expect_find_by_id().returning(|_, id, _| {
            Ok(ContentRecord {
                password: "secret".to_string(),
                ..create_test_post(id, 1)
            })
        });
        expect_view_context(&mut mocks, PostMetas::new());

        let service = mocks.into_service();
        let item = service
            .get_item(&ApiConfig::default(), &get_request(1))
            .await
            .unwrap();

        let ContentResponse::Full(content) = item else {
            panic!("expected full projection");
        };
        assert!(content.content.protected);
        assert_eq!(content.content.rendered, "");
        assert_eq!(content.base.excerpt.rendered, "");
    }

    #[test]
    fn test_featured_media_id_parsing() {
        let metas = HashMap::from([(THUMBNAIL_KEY.to_string(), " 12 ".to_string())]);
        assert_eq!(featured_media_id(Some(&metas)), 12);

        let bad = HashMap::from([(THUMBNAIL_KEY.to_string(), "abc".to_string())]);
        assert_eq!(featured_media_id(Some(&bad)), 0);
        assert_eq!(featured_media_id(None), 0);
    }
}
