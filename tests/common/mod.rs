#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wprest::application::services::ContentService;
use wprest::config::ApiConfig;
use wprest::domain::entities::{
    CommentRecord, ContentKind, ContentRecord, ListFilter, Order, OrderBy, PostTaxonomies, PostTerm,
    Term, TermTaxonomy, UserDetail, WpOption,
};
use wprest::domain::repositories::{
    ContentRepository, PostMetas, SharedRepository, TermRepository, UserRepository,
};
use wprest::error::AppError;
use wprest::routes::api_router;
use wprest::state::AppState;

/// In-memory WordPress store standing in for the MySQL repositories.
#[derive(Default)]
pub struct FakeStore {
    pub rows: Vec<ContentRecord>,
    pub metas: PostMetas,
    pub users: HashMap<u64, UserDetail>,
    pub options: HashMap<String, String>,
    pub terms: Vec<PostTerm>,
    pub comments: Vec<CommentRecord>,
    pub revisions: HashMap<u64, Vec<u64>>,
    pub user_batches: AtomicUsize,
    pub meta_batches: AtomicUsize,
    pub fail_ping: bool,
}

impl FakeStore {
    /// Posts 1..=5 by authors 1 and 2, page 10, attachment 44 and the
    /// sticky posts 2 and 5.
    pub fn seeded() -> Self {
        let mut store = FakeStore::default();

        for id in 1..=5 {
            store.rows.push(post(id, if id % 2 == 0 { 2 } else { 1 }));
        }
        store.rows.push(page(10));
        store.rows.push(ContentRecord {
            id: 44,
            author: 1,
            post_type: "attachment".to_string(),
            status: "inherit".to_string(),
            mime_type: "image/jpeg".to_string(),
            guid: "http://localhost:8080/wp-content/uploads/2020/05/cat.jpg".to_string(),
            ..Default::default()
        });

        store.users.insert(1, user(1));
        store.users.insert(2, user(2));

        store.options.insert(
            "sticky_posts".to_string(),
            "a:2:{i:0;i:2;i:1;i:5;}".to_string(),
        );

        store.metas.insert(
            1,
            HashMap::from([("_thumbnail_id".to_string(), "44".to_string())]),
        );
        store.metas.insert(
            44,
            HashMap::from([(
                "_wp_attached_file".to_string(),
                "2020/05/cat.jpg".to_string(),
            )]),
        );

        store.terms.push(post_term(1, 3, "news", "category"));
        store.terms.push(post_term(1, 7, "rust", "post_tag"));
        store.terms.push(post_term(2, 3, "news", "category"));

        store.comments.push(CommentRecord {
            id: 100,
            post_id: 1,
            author_name: "Reader".to_string(),
            content: "Nice".to_string(),
            ..Default::default()
        });
        store.comments.push(CommentRecord {
            id: 101,
            post_id: 1,
            parent: 100,
            user_id: 1,
            author_name: "User 1".to_string(),
            content: "Thanks".to_string(),
            ..Default::default()
        });

        store.revisions.insert(1, vec![31, 30]);

        store
    }

    fn visible(&self, kind: ContentKind) -> impl Iterator<Item = &ContentRecord> {
        self.rows
            .iter()
            .filter(move |r| r.post_type == kind.as_str() && r.status == kind.public_status())
    }
}

pub fn post(id: u64, author: u64) -> ContentRecord {
    ContentRecord {
        id,
        author,
        date: format!("2020-05-{:02}T10:00:00", id),
        date_gmt: format!("2020-05-{:02}T08:00:00", id),
        modified: format!("2020-06-{:02}T10:00:00", id),
        modified_gmt: format!("2020-06-{:02}T08:00:00", id),
        title: format!("Post {id}"),
        content: format!("<p>Content of post {id}</p>"),
        excerpt: format!("Content of post {id}"),
        status: "publish".to_string(),
        comment_status: "open".to_string(),
        ping_status: "open".to_string(),
        slug: format!("post-{id}"),
        guid: format!("http://localhost:8080/?p={id}"),
        post_type: "post".to_string(),
        link: format!("http://localhost:8080/post-{id}/"),
        ..Default::default()
    }
}

pub fn page(id: u64) -> ContentRecord {
    ContentRecord {
        post_type: "page".to_string(),
        title: format!("Page {id}"),
        slug: format!("page-{id}"),
        link: format!("http://localhost:8080/page-{id}/"),
        menu_order: 3,
        ..post(id, 1)
    }
}

pub fn user(id: u64) -> UserDetail {
    UserDetail {
        id,
        login: format!("user{id}"),
        nicename: format!("user{id}"),
        email: format!("user{id}@example.com"),
        display_name: format!("User {id}"),
        ..Default::default()
    }
}

pub fn post_term(object_id: u64, term_id: u64, slug: &str, taxonomy: &str) -> PostTerm {
    PostTerm {
        object_id,
        term: Term {
            term_id,
            name: slug.to_string(),
            slug: slug.to_string(),
            term_group: 0,
        },
        taxonomy: TermTaxonomy {
            term_taxonomy_id: term_id + 100,
            term_id,
            taxonomy: taxonomy.to_string(),
            description: String::new(),
            parent: 0,
            count: 1,
        },
    }
}

#[async_trait]
impl ContentRepository for FakeStore {
    async fn find_by_id(
        &self,
        _cfg: &ApiConfig,
        id: u64,
        kind: ContentKind,
    ) -> Result<ContentRecord, AppError> {
        self.visible(kind)
            .find(|r| r.id == id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn query_ids(&self, _cfg: &ApiConfig, filter: &ListFilter) -> Result<Vec<u64>, AppError> {
        filter.validate_ordering()?;

        let tagged: BTreeSet<u64> = match &filter.taxonomy_include {
            Some(tt_ids) => self
                .terms
                .iter()
                .filter(|t| tt_ids.contains(&t.taxonomy.term_taxonomy_id))
                .map(|t| t.object_id)
                .collect(),
            None => BTreeSet::new(),
        };

        let mut rows: Vec<&ContentRecord> = self
            .visible(filter.kind)
            .filter(|r| filter.include.is_empty() || filter.include.contains(&r.id))
            .filter(|r| !filter.exclude.contains(&r.id))
            .filter(|r| filter.authors.is_empty() || filter.authors.contains(&r.author))
            .filter(|r| filter.slugs.is_empty() || filter.slugs.contains(&r.slug))
            .filter(|r| match filter.sticky {
                Some(true) => filter.sticky_ids.contains(&r.id),
                Some(false) => !filter.sticky_ids.contains(&r.id),
                None => true,
            })
            .filter(|r| filter.taxonomy_include.is_none() || tagged.contains(&r.id))
            .filter(|r| match filter.search_term() {
                Some(term) => r.title.contains(term) || r.content.contains(term),
                None => true,
            })
            .collect();

        match filter.order_by {
            OrderBy::Id => rows.sort_by_key(|r| r.id),
            OrderBy::Title => rows.sort_by(|a, b| a.title.cmp(&b.title)),
            _ => rows.sort_by(|a, b| a.date.cmp(&b.date)),
        }
        if filter.order == Order::Desc {
            rows.reverse();
        }

        Ok(rows
            .into_iter()
            .map(|r| r.id)
            .skip(filter.row_offset() as usize)
            .take(filter.per_page as usize)
            .collect())
    }

    async fn find_by_ids(
        &self,
        _cfg: &ApiConfig,
        kind: ContentKind,
        ids: &[u64],
    ) -> Result<Vec<ContentRecord>, AppError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.visible(kind).find(|r| r.id == *id).cloned())
            .collect())
    }

    async fn comments_by_post_ids(
        &self,
        _cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<Vec<CommentRecord>, AppError> {
        Ok(self
            .comments
            .iter()
            .filter(|c| ids.contains(&c.post_id))
            .cloned()
            .collect())
    }

    async fn revisions_by_parent_ids(
        &self,
        _cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<HashMap<u64, Vec<u64>>, AppError> {
        Ok(self
            .revisions
            .iter()
            .filter(|(parent, _)| ids.contains(parent))
            .map(|(parent, revs)| (*parent, revs.clone()))
            .collect())
    }
}

#[async_trait]
impl TermRepository for FakeStore {
    async fn post_terms_by_ids(
        &self,
        _cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<PostTaxonomies, AppError> {
        Ok(PostTaxonomies::from_rows(
            self.terms
                .iter()
                .filter(|t| ids.contains(&t.object_id))
                .cloned()
                .collect(),
        ))
    }

    async fn term_taxonomies_by_term_ids(
        &self,
        _cfg: &ApiConfig,
        term_ids: &[u64],
        taxonomy: &str,
    ) -> Result<Vec<TermTaxonomy>, AppError> {
        let mut found: Vec<TermTaxonomy> = self
            .terms
            .iter()
            .filter(|t| term_ids.contains(&t.term.term_id) && t.taxonomy.taxonomy == taxonomy)
            .map(|t| t.taxonomy.clone())
            .collect();
        found.dedup_by_key(|t| t.term_taxonomy_id);
        Ok(found)
    }
}

#[async_trait]
impl UserRepository for FakeStore {
    async fn find_by_ids(
        &self,
        _cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<HashMap<u64, UserDetail>, AppError> {
        self.user_batches.fetch_add(1, Ordering::SeqCst);
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| (*id, u.clone())))
            .collect())
    }
}

#[async_trait]
impl SharedRepository for FakeStore {
    async fn load_option(&self, _cfg: &ApiConfig, name: &str) -> Result<Option<WpOption>, AppError> {
        Ok(self.options.get(name).map(|value| WpOption {
            option_id: 1,
            option_name: name.to_string(),
            option_value: value.clone(),
            autoload: "yes".to_string(),
        }))
    }

    async fn post_metas_by_post_ids(
        &self,
        _cfg: &ApiConfig,
        ids: &[u64],
    ) -> Result<PostMetas, AppError> {
        self.meta_batches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .metas
            .iter()
            .filter(|(id, _)| ids.contains(id))
            .map(|(id, m)| (*id, m.clone()))
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.fail_ping {
            Err(AppError::Query(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

pub fn create_test_state(store: Arc<FakeStore>) -> AppState {
    let content: Arc<dyn ContentRepository> = store.clone();
    let terms: Arc<dyn TermRepository> = store.clone();
    let users: Arc<dyn UserRepository> = store.clone();
    let shared: Arc<dyn SharedRepository> = store;

    let service: ContentService = ContentService::new(content, terms, users, shared);

    AppState::new(Arc::new(service), Arc::new(ApiConfig::default()))
}

pub fn make_server(store: Arc<FakeStore>) -> TestServer {
    TestServer::new(api_router(create_test_state(store))).unwrap()
}
