//! Record stores for tags and articles
//!
//! Stores own all SQL/IO. They return rows ordered by `created_at` and
//! report missing rows as `Error::NotFound`; cursor handling and business
//! rules live in the usecase layer.

pub mod articles;
pub mod tags;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Article, NewArticle, PageQuery, Tag, TagName};

pub use articles::PgArticleRepo;
pub use tags::PgTagRepo;

/// Tag persistence. Implementations must be safe for concurrent use.
#[async_trait]
pub trait TagStore: Send + Sync {
    /// Tags created after `page.after`, oldest first, at most `page.limit`.
    async fn fetch(&self, page: PageQuery) -> Result<Vec<Tag>>;

    async fn get_by_id(&self, id: i64) -> Result<Tag>;

    async fn get_by_name(&self, name: &str) -> Result<Tag>;

    /// Resolve a tag for enrichment.
    ///
    /// `Ok(None)` means the store answered without a record and without
    /// failing; enrichment leaves such articles unresolved. Stores that
    /// treat a missing row as an error keep the default.
    async fn lookup(&self, id: i64) -> Result<Option<Tag>> {
        self.get_by_id(id).await.map(Some)
    }

    async fn store(&self, name: &TagName, now: DateTime<Utc>) -> Result<Tag>;

    async fn update(&self, id: i64, name: &TagName, now: DateTime<Utc>) -> Result<Tag>;

    async fn delete(&self, id: i64) -> Result<()>;
}

/// Article persistence. Rows come back with `tag: None`.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn fetch(&self, page: PageQuery) -> Result<Vec<Article>>;

    async fn get_by_id(&self, id: i64) -> Result<Article>;

    async fn get_by_title(&self, title: &str) -> Result<Article>;

    async fn store(&self, article: &NewArticle, now: DateTime<Utc>) -> Result<Article>;

    /// Overwrite title, content and tag id; `created_at` is untouched.
    async fn update(&self, id: i64, article: &NewArticle, now: DateTime<Utc>) -> Result<Article>;

    async fn delete(&self, id: i64) -> Result<()>;
}
