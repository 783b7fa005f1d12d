//! Article usecases
//!
//! Listing fetches a page and then enriches it with tags concurrently.
//! Single-article reads resolve their one tag directly.

use std::sync::Arc;

use chrono::Utc;

use super::{existing, with_timeout, TagEnricher};
use crate::config::ServiceConfig;
use crate::db::{ArticleStore, TagStore};
use crate::error::{Error, Result};
use crate::models::{Article, ArticleChanges, NewArticle, Page, PageQuery};

/// Article operations with timeout, tag checks and enrichment applied
#[derive(Clone)]
pub struct ArticleUsecase {
    articles: Arc<dyn ArticleStore>,
    tags: Arc<dyn TagStore>,
    enricher: TagEnricher,
    config: ServiceConfig,
}

impl ArticleUsecase {
    pub fn new(
        articles: Arc<dyn ArticleStore>,
        tags: Arc<dyn TagStore>,
        config: ServiceConfig,
    ) -> Self {
        let enricher = TagEnricher::new(Arc::clone(&tags), config.max_concurrent_lookups);
        Self {
            articles,
            tags,
            enricher,
            config,
        }
    }

    /// One page of articles with tags attached.
    ///
    /// If enrichment fails the whole call fails, so no cursor is handed out
    /// for a page the caller never received.
    pub async fn fetch(&self, cursor: &str, num: u32) -> Result<Page<Article>> {
        let limit = self.config.page_limit(num);
        let query = PageQuery::parse(cursor, limit)?;

        with_timeout(self.config.timeout, async {
            let rows = self.articles.fetch(query).await?;
            let Page { items, next_cursor } = Page::from_rows(rows, limit);
            let items = self.enricher.enrich(items).await?;
            Ok(Page { items, next_cursor })
        })
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Article> {
        with_timeout(self.config.timeout, async {
            let article = self.articles.get_by_id(id).await?;
            self.attach_tag(article).await
        })
        .await
    }

    pub async fn get_by_title(&self, title: &str) -> Result<Article> {
        with_timeout(self.config.timeout, async {
            let article = self.articles.get_by_title(title).await?;
            self.attach_tag(article).await
        })
        .await
    }

    /// Create an article. The title must be unused and the tag must exist.
    pub async fn store(&self, input: NewArticle) -> Result<Article> {
        with_timeout(self.config.timeout, async {
            if existing(self.articles.get_by_title(input.title.as_str()).await)?.is_some() {
                return Err(Error::Conflict(format!(
                    "article '{}' already exists",
                    input.title.as_str()
                )));
            }

            let tag = self.tags.get_by_id(input.tag_id).await?;
            let mut article = self.articles.store(&input, Utc::now()).await?;
            tracing::info!(article_id = article.id, tag_id = tag.id, "article created");

            article.tag = Some(tag);
            Ok(article)
        })
        .await
    }

    /// Apply a partial update; omitted fields keep their stored values.
    pub async fn update(&self, id: i64, changes: ArticleChanges) -> Result<Article> {
        with_timeout(self.config.timeout, async {
            let current = self.articles.get_by_id(id).await?;
            let merged = changes.merge(&current);

            if merged.title.as_str() != current.title {
                if let Some(holder) =
                    existing(self.articles.get_by_title(merged.title.as_str()).await)?
                {
                    if holder.id != current.id {
                        return Err(Error::Conflict(format!(
                            "article '{}' already exists",
                            merged.title.as_str()
                        )));
                    }
                }
            }

            let tag = self.tags.get_by_id(merged.tag_id).await?;
            let mut article = self.articles.update(id, &merged, Utc::now()).await?;
            article.tag = Some(tag);
            Ok(article)
        })
        .await
    }

    /// Delete an article after confirming it exists.
    pub async fn delete(&self, id: i64) -> Result<()> {
        with_timeout(self.config.timeout, async {
            self.articles.get_by_id(id).await?;
            self.articles.delete(id).await?;
            tracing::info!(article_id = id, "article deleted");
            Ok(())
        })
        .await
    }

    async fn attach_tag(&self, mut article: Article) -> Result<Article> {
        article.tag = Some(self.tags.get_by_id(article.tag_id).await?);
        Ok(article)
    }
}
