//! Liveness endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub store: &'static str,
}

impl Health {
    fn report(state: &AppState) -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            store: state.backend,
        }
    }
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health::report(&state))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
