//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::ServiceConfig;
use crate::db::{ArticleStore, MemoryStore, PgArticleRepo, PgTagRepo, TagStore};
use crate::usecase::{ArticleUsecase, TagUsecase};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:9090)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 9090)),
            cors_permissive: false,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub tags: TagUsecase,
    pub articles: ArticleUsecase,
    /// Store backend name reported by `/health`
    pub backend: &'static str,
}

impl AppState {
    /// Wire usecases over the given stores.
    pub fn new(
        tag_store: Arc<dyn TagStore>,
        article_store: Arc<dyn ArticleStore>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            tags: TagUsecase::new(Arc::clone(&tag_store), config.clone()),
            articles: ArticleUsecase::new(article_store, tag_store, config),
            backend: "custom",
        }
    }

    /// State backed by PostgreSQL.
    pub fn postgres(pool: PgPool, config: ServiceConfig) -> Self {
        Self {
            backend: "postgres",
            ..Self::new(
                Arc::new(PgTagRepo::new(pool.clone())),
                Arc::new(PgArticleRepo::new(pool)),
                config,
            )
        }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(config: ServiceConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            backend: "memory",
            ..Self::new(store.clone(), store, config)
        }
    }
}

/// Build the application router with all routes.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        let port = config.bind_addr.port();
        let origins: Vec<HeaderValue> = [
            format!("http://localhost:{port}"),
            format!("http://127.0.0.1:{port}"),
        ]
        .into_iter()
        .filter_map(|origin| HeaderValue::from_str(&origin).ok())
        .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([routes::CURSOR_HEADER])
    };

    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// let state = AppState::postgres(pool, ServiceConfig::default());
/// run_server(state, ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    let app = build_router(state, &config);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
