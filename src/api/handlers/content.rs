//! Handlers for the post and page endpoints.
//!
//! Both resources share one pipeline; the route decides the content kind.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};

use crate::api::dto::query::{ItemQuery, ListQuery};
use crate::domain::entities::{ContentKind, ContentResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists published posts.
///
/// # Endpoint
///
/// `GET /wp-json/wp/v2/posts`
///
/// # Errors
///
/// Returns 400 `rest_invalid_param` for malformed or contradictory
/// parameters (e.g. `orderby=relevance` without `search`).
pub async fn list_posts_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<ContentResponse>>, AppError> {
    list(state, query, ContentKind::Post).await
}

/// Fetches one published post.
///
/// # Endpoint
///
/// `GET /wp-json/wp/v2/posts/{id}`
///
/// # Errors
///
/// Returns 404 `rest_post_invalid_id` if the post does not exist and
/// 404 `rest_no_route` if `{id}` is not a number.
pub async fn get_post_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<ItemQuery>, QueryRejection>,
) -> Result<Json<ContentResponse>, AppError> {
    get_item(state, &id, query, ContentKind::Post).await
}

/// Lists published pages.
///
/// `GET /wp-json/wp/v2/pages`
pub async fn list_pages_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<ContentResponse>>, AppError> {
    list(state, query, ContentKind::Page).await
}

/// Fetches one published page.
///
/// `GET /wp-json/wp/v2/pages/{id}`
pub async fn get_page_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<ItemQuery>, QueryRejection>,
) -> Result<Json<ContentResponse>, AppError> {
    get_item(state, &id, query, ContentKind::Page).await
}

async fn list(
    state: AppState,
    query: Result<Query<ListQuery>, QueryRejection>,
    kind: ContentKind,
) -> Result<Json<Vec<ContentResponse>>, AppError> {
    let Query(query) = query?;
    let request = query.into_request(kind)?;

    let items = state
        .content_service
        .list(&state.api_config, request)
        .await?;

    Ok(Json(items))
}

async fn get_item(
    state: AppState,
    id: &str,
    query: Result<Query<ItemQuery>, QueryRejection>,
    kind: ContentKind,
) -> Result<Json<ContentResponse>, AppError> {
    // A non-numeric id does not match the route at all.
    let id: u64 = id.parse().map_err(|_| AppError::NoRoute)?;

    let Query(query) = query?;
    let request = query.into_request(id, kind)?;

    let item = state
        .content_service
        .get_item(&state.api_config, &request)
        .await?;

    Ok(Json(item))
}
