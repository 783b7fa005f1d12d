//! Database layer - connection pool and record stores
//!
//! # Design Principles
//!
//! - Connection pool shared by all concurrent lookups
//! - Keyset pagination on `created_at`, never OFFSET
//! - Constraint violations surface as `Error::Conflict`

pub mod memory;
pub mod pool;
pub mod repos;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options, PoolSettings};
pub use repos::{ArticleStore, PgArticleRepo, PgTagRepo, TagStore};
