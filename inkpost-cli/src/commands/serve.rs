//! HTTP server command
//!
//! Runs the tags/articles API against PostgreSQL, or against an in-memory
//! store with `--in-memory` for local experiments.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use inkpost_server::db::{create_pool_with_options, PoolSettings};
use inkpost_server::{run_server, AppState, ServerConfig, ServiceConfig};

use crate::config::FileConfig;

const DEFAULT_BIND: &str = "127.0.0.1:9090";

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:9090)
    #[arg(long, short = 'b', env = "INKPOST_BIND")]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Keep records in process memory instead of PostgreSQL (ignores the database URL)
    #[arg(long)]
    pub in_memory: bool,

    /// Path to a TOML config file
    #[arg(long, short = 'c', env = "INKPOST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "INKPOST_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Maximum database connections in the pool
    #[arg(long, env = "INKPOST_MAX_CONNECTIONS")]
    pub max_connections: Option<u32>,

    /// Maximum concurrent tag lookups while enriching article pages
    #[arg(long, env = "INKPOST_MAX_CONCURRENT_LOOKUPS")]
    pub max_concurrent_lookups: Option<usize>,
}

impl ServeArgs {
    fn service_config(&self, file: &FileConfig) -> ServiceConfig {
        let mut config = file.service_config();
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(n) = self.max_concurrent_lookups {
            config = config.with_max_concurrent_lookups(n);
        }
        config
    }

    fn server_config(&self, file: &FileConfig) -> Result<ServerConfig> {
        let bind_addr = match self.bind.or(file.bind) {
            Some(addr) => addr,
            None => DEFAULT_BIND.parse().context("invalid default bind address")?,
        };

        Ok(ServerConfig {
            bind_addr,
            cors_permissive: self.cors_permissive,
        })
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let service = args.service_config(&file);
    let server = args.server_config(&file)?;

    let state = if args.in_memory {
        tracing::warn!("Using in-memory store; records are lost on shutdown");
        AppState::in_memory(service)
    } else {
        let database_url = args
            .database_url
            .clone()
            .or_else(|| file.database_url.clone())
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, .env, or the config file (or pass --in-memory)")?;

        let mut pool_settings = PoolSettings::default();
        if let Some(n) = args.max_connections.or(file.max_connections) {
            pool_settings = pool_settings.with_max_connections(n);
        }

        let pool = create_pool_with_options(&database_url, &pool_settings)
            .await
            .context("Failed to create database pool")?;

        AppState::postgres(pool, service)
    };

    tracing::info!("Starting inkpost server on {}", server.bind_addr);

    // Run server (blocks until shutdown)
    run_server(state, server).await.context("Server error")?;

    Ok(())
}
