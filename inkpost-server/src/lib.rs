//! inkpost-server: tags and articles over HTTP
//!
//! Records are listed with opaque cursor pagination keyed on creation
//! time. Article pages are enriched with their tags through a bounded
//! fan-out of concurrent lookups.
//!
//! Layers, innermost first:
//! - [`models`]: records, validated inputs, cursor codec, page builder
//! - [`db`]: store traits with PostgreSQL and in-memory backends
//! - [`usecase`]: timeouts, business checks, tag enrichment
//! - [`http`]: axum routes and the JSON error surface

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod usecase;

pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use http::{build_router, run_server, AppState, ServerConfig};
