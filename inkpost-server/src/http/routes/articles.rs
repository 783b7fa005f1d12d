//! Article endpoints

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
use crate::models::{Article, ArticleChanges, ListParams, NewArticle};

/// Create/update article request
///
/// Missing fields deserialize to their zero values; on PATCH those mean
/// "leave unchanged".
#[derive(Deserialize)]
pub struct ArticleRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tag_id: i64,
}

/// Write acknowledgement
#[derive(Serialize)]
pub struct ArticleResponse {
    pub title: String,
    pub content: String,
}

impl From<Article> for ArticleResponse {
    fn from(a: Article) -> Self {
        Self {
            title: a.title,
            content: a.content,
        }
    }
}

/// GET /api/articles - one page with tags embedded
///
/// `num` is clamped to `1..=max_page_size`; a missing or unusable value
/// uses the default page size.
async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .articles
        .fetch(params.cursor(), params.page_size())
        .await?;

    Ok(([(CURSOR_HEADER, page.next_cursor)], Json(page.items)))
}

/// GET /api/articles/{id}
async fn get_article(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<Json<Article>, ApiError> {
    let article = state.articles.get_by_id(id).await?;
    Ok(Json(article))
}

/// POST /api/articles
async fn create_article(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ArticleRequest>,
) -> Result<(StatusCode, Json<ArticleResponse>), ApiError> {
    let input = NewArticle::new(&req.title, &req.content, req.tag_id)?;
    let article = state.articles.store(input).await?;

    Ok((StatusCode::CREATED, Json(ArticleResponse::from(article))))
}

/// PATCH /api/articles/{id}
async fn update_article(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    JsonBody(req): JsonBody<ArticleRequest>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let changes = ArticleChanges::new(&req.title, &req.content, req.tag_id)?;
    let article = state.articles.update(id, changes).await?;

    Ok(Json(ArticleResponse::from(article)))
}

/// DELETE /api/articles/{id}
async fn delete_article(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    state.articles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Article routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/articles", get(list_articles).post(create_article))
        .route(
            "/articles/{id}",
            get(get_article).patch(update_article).delete(delete_article),
        )
}
