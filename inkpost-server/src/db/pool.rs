//! PostgreSQL connection pool
//!
//! Each concurrent tag lookup checks out its own connection, so
//! `max_connections` is the real ceiling on database parallelism during
//! enrichment. Lookups beyond it queue inside the pool until
//! `acquire_timeout`.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool sizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl PoolSettings {
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Connect with default settings.
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/inkpost").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, &PoolSettings::default()).await
}

pub async fn create_pool_with_options(
    database_url: &str,
    settings: &PoolSettings,
) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(
        max_connections = settings.max_connections,
        "connecting to database"
    );
    settings.options().connect(database_url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_connections_is_raised_to_one() {
        let settings = PoolSettings::default().with_max_connections(0);
        assert_eq!(settings.max_connections, 1);
        assert_eq!(settings.acquire_timeout, DEFAULT_ACQUIRE_TIMEOUT);
    }

    // Run with: DATABASE_URL=postgres://... cargo test -p inkpost-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn more_queries_than_connections_all_finish() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let settings = PoolSettings::default().with_max_connections(2);
        let pool = create_pool_with_options(&url, &settings)
            .await
            .expect("pool creation failed");

        let mut queries = tokio::task::JoinSet::new();
        for i in 0..8 {
            let pool = pool.clone();
            queries.spawn(async move {
                let (n,): (i32,) = sqlx::query_as("SELECT $1::int")
                    .bind(i)
                    .fetch_one(&pool)
                    .await
                    .expect("query failed");
                n
            });
        }

        let mut seen = Vec::new();
        while let Some(n) = queries.join_next().await {
            seen.push(n.expect("task panicked"));
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }
}
