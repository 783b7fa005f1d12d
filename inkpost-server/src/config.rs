//! Service configuration
//!
//! Passed explicitly into usecase constructors; nothing here is global.

use std::time::Duration;

use crate::models::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Default per-operation timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Default cap on concurrent tag lookups during enrichment
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;

/// Usecase-level policy knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Upper bound on one usecase call, enrichment included
    pub timeout: Duration,
    /// Page size used when the caller asks for 0
    pub default_page_size: u32,
    /// Largest page a caller may request
    pub max_page_size: u32,
    /// Concurrent tag lookups allowed across all enrichment calls
    pub max_concurrent_lookups: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }
}

impl ServiceConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the page sizes; zero is raised to one.
    pub fn with_page_sizes(mut self, default_page_size: u32, max_page_size: u32) -> Self {
        self.default_page_size = default_page_size.max(1);
        self.max_page_size = max_page_size.max(1);
        self
    }

    pub fn with_max_concurrent_lookups(mut self, limit: usize) -> Self {
        self.max_concurrent_lookups = limit.max(1);
        self
    }

    /// Effective page size for a caller request.
    pub fn page_limit(&self, requested: u32) -> u32 {
        crate::models::page_limit(requested, self.default_page_size, self.max_page_size)
    }
}
