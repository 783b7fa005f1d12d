//! Route handlers organized by resource

pub mod articles;
pub mod health;
pub mod tags;

use std::sync::Arc;

use axum::http::HeaderName;
use axum::Router;

use super::server::AppState;

/// Response header carrying the next-page token
pub const CURSOR_HEADER: HeaderName = HeaderName::from_static("x-cursor");

/// Routes mounted under `/api`
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(tags::router())
        .merge(articles::router())
}
