//! Tag repository
//!
//! Reads and writes the `tag` table:
//! - fetch: keyset pagination on `created_at`
//! - store/update: unique name enforced by the schema, surfaced as Conflict

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::TagStore;
use crate::error::{Error, Result};
use crate::models::{PageQuery, Tag, TagName};

/// PostgreSQL-backed tag store
#[derive(Debug, Clone)]
pub struct PgTagRepo {
    pool: PgPool,
}

impl PgTagRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagStore for PgTagRepo {
    async fn fetch(&self, page: PageQuery) -> Result<Vec<Tag>> {
        let rows = match page.after {
            Some(after) => {
                sqlx::query_as::<_, Tag>(
                    r#"
                    SELECT id, name, created_at, updated_at
                    FROM tag
                    WHERE created_at > $1
                    ORDER BY created_at
                    LIMIT $2
                    "#,
                )
                .bind(after)
                .bind(page.sql_limit())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Tag>(
                    r#"
                    SELECT id, name, created_at, updated_at
                    FROM tag
                    ORDER BY created_at
                    LIMIT $1
                    "#,
                )
                .bind(page.sql_limit())
                .fetch_all(&self.pool)
                .await
            }
        };

        rows.map_err(|e| {
            tracing::error!(error = %e, "tag page query failed");
            Error::from(e)
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Tag> {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM tag
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("tag", id))
    }

    async fn get_by_name(&self, name: &str) -> Result<Tag> {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM tag
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("tag", name))
    }

    async fn store(&self, name: &TagName, now: DateTime<Utc>) -> Result<Tag> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tag (name, created_at, updated_at)
            VALUES ($1, $2, $2)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(tag)
    }

    async fn update(&self, id: i64, name: &TagName, now: DateTime<Utc>) -> Result<Tag> {
        sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tag SET name = $1, updated_at = $2
            WHERE id = $3
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name.as_str())
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("tag", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let affected = sqlx::query("DELETE FROM tag WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        match affected {
            0 => Err(Error::not_found("tag", id)),
            1 => Ok(()),
            n => Err(Error::Internal(format!(
                "deleting tag {id} affected {n} rows"
            ))),
        }
    }
}
