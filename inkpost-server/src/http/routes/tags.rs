//! Tag endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::CURSOR_HEADER;
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ResourceId};
use crate::http::server::AppState;
use crate::models::{ListParams, Tag, TagName};

/// Create/update tag request
#[derive(Deserialize)]
pub struct TagRequest {
    #[serde(default)]
    pub name: String,
}

/// Write acknowledgement
#[derive(Serialize)]
pub struct TagResponse {
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(t: Tag) -> Self {
        Self { name: t.name }
    }
}

/// GET /api/tags - one page of tags, next token in `X-Cursor`
///
/// `num` is clamped to `1..=max_page_size` like the article list.
async fn list_tags(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .tags
        .fetch(params.cursor(), params.page_size())
        .await?;

    Ok(([(CURSOR_HEADER, page.next_cursor)], Json(page.items)))
}

/// GET /api/tags/{id}
async fn get_tag(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<Json<Tag>, ApiError> {
    let tag = state.tags.get_by_id(id).await?;
    Ok(Json(tag))
}

/// POST /api/tags
async fn create_tag(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<TagRequest>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    let name = TagName::new(&req.name)?;
    let tag = state.tags.store(name).await?;

    Ok((StatusCode::CREATED, Json(TagResponse::from(tag))))
}

/// PATCH /api/tags/{id}
async fn update_tag(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    JsonBody(req): JsonBody<TagRequest>,
) -> Result<Json<TagResponse>, ApiError> {
    let name = TagName::new(&req.name)?;
    let tag = state.tags.update(id, name).await?;

    Ok(Json(TagResponse::from(tag)))
}

/// DELETE /api/tags/{id}
async fn delete_tag(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    state.tags.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Tag routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route(
            "/tags/{id}",
            get(get_tag).patch(update_tag).delete(delete_tag),
        )
}
