//! Optional TOML config file for `inkpost serve`
//!
//! Every key is optional. Command-line flags and environment variables
//! win over the file; the file wins over built-in defaults.
//!
//! ```toml
//! bind = "127.0.0.1:9090"
//! database_url = "postgres://localhost/inkpost"
//! timeout_secs = 2
//! default_page_size = 10
//! max_page_size = 100
//! max_concurrent_lookups = 8
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use inkpost_server::ServiceConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub bind: Option<SocketAddr>,
    pub database_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub default_page_size: Option<u32>,
    pub max_page_size: Option<u32>,
    pub max_concurrent_lookups: Option<usize>,
    pub max_connections: Option<u32>,
}

impl FileConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&content).context("Failed to parse config file (invalid TOML)")
    }

    /// Service settings from the file, defaults for anything missing.
    ///
    /// Zero page sizes and lookup caps are raised to one.
    pub fn service_config(&self) -> ServiceConfig {
        let defaults = ServiceConfig::default();
        let config = ServiceConfig::default()
            .with_timeout(
                self.timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
            )
            .with_page_sizes(
                self.default_page_size
                    .unwrap_or(defaults.default_page_size),
                self.max_page_size.unwrap_or(defaults.max_page_size),
            );

        match self.max_concurrent_lookups {
            Some(n) => config.with_max_concurrent_lookups(n),
            None => config,
        }
    }
}
