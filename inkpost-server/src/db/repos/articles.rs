//! Article repository
//!
//! Rows carry only `tag_id`. Resolving the tag is the usecase layer's job,
//! so no query here joins against `tag`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::ArticleStore;
use crate::error::{Error, Result};
use crate::models::{Article, NewArticle, PageQuery};

/// PostgreSQL-backed article store
#[derive(Debug, Clone)]
pub struct PgArticleRepo {
    pool: PgPool,
}

impl PgArticleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleStore for PgArticleRepo {
    async fn fetch(&self, page: PageQuery) -> Result<Vec<Article>> {
        let rows = match page.after {
            Some(after) => {
                sqlx::query_as::<_, Article>(
                    r#"
                    SELECT id, title, content, tag_id, created_at, updated_at
                    FROM article
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
                sqlx::query_as::<_, Article>(
                    r#"
                    SELECT id, title, content, tag_id, created_at, updated_at
                    FROM article
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
            tracing::error!(error = %e, "article page query failed");
            Error::from(e)
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Article> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, tag_id, created_at, updated_at
            FROM article
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("article", id))
    }

    async fn get_by_title(&self, title: &str) -> Result<Article> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, tag_id, created_at, updated_at
            FROM article
            WHERE title = $1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("article", title))
    }

    async fn store(&self, article: &NewArticle, now: DateTime<Utc>) -> Result<Article> {
        let stored = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO article (title, content, tag_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, title, content, tag_id, created_at, updated_at
            "#,
        )
        .bind(article.title.as_str())
        .bind(article.content.as_str())
        .bind(article.tag_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn update(&self, id: i64, article: &NewArticle, now: DateTime<Utc>) -> Result<Article> {
        sqlx::query_as::<_, Article>(
            r#"
            UPDATE article SET title = $1, content = $2, tag_id = $3, updated_at = $4
            WHERE id = $5
            RETURNING id, title, content, tag_id, created_at, updated_at
            "#,
        )
        .bind(article.title.as_str())
        .bind(article.content.as_str())
        .bind(article.tag_id)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("article", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let affected = sqlx::query("DELETE FROM article WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        match affected {
            0 => Err(Error::not_found("article", id)),
            1 => Ok(()),
            n => Err(Error::Internal(format!(
                "deleting article {id} affected {n} rows"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::create_pool;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn first_page_is_oldest_first() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let repo = PgArticleRepo::new(create_pool(&url).await.expect("pool creation failed"));

        let rows = repo.fetch(PageQuery::first(5)).await.expect("query failed");
        assert!(rows.len() <= 5);
        assert!(rows.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        assert!(rows.iter().all(|a| a.tag.is_none()));
    }
}
