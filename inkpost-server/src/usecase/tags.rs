//! Tag usecases

use std::sync::Arc;

use chrono::Utc;

use super::{existing, with_timeout};
use crate::config::ServiceConfig;
use crate::db::TagStore;
use crate::error::{Error, Result};
use crate::models::{Page, PageQuery, Tag, TagName};

/// Tag operations with timeout and uniqueness policy applied
#[derive(Clone)]
pub struct TagUsecase {
    tags: Arc<dyn TagStore>,
    config: ServiceConfig,
}

impl TagUsecase {
    pub fn new(tags: Arc<dyn TagStore>, config: ServiceConfig) -> Self {
        Self { tags, config }
    }

    /// One page of tags after `cursor`; `num == 0` uses the default size.
    pub async fn fetch(&self, cursor: &str, num: u32) -> Result<Page<Tag>> {
        let limit = self.config.page_limit(num);
        let query = PageQuery::parse(cursor, limit)?;

        with_timeout(self.config.timeout, async {
            let rows = self.tags.fetch(query).await?;
            Ok(Page::from_rows(rows, limit))
        })
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Tag> {
        with_timeout(self.config.timeout, self.tags.get_by_id(id)).await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Tag> {
        with_timeout(self.config.timeout, self.tags.get_by_name(name)).await
    }

    /// Create a tag, rejecting a name that is already taken.
    ///
    /// The name check and the insert are separate statements; a concurrent
    /// writer can slip in between, in which case the store's own unique
    /// constraint reports the conflict.
    pub async fn store(&self, name: TagName) -> Result<Tag> {
        with_timeout(self.config.timeout, async {
            if existing(self.tags.get_by_name(name.as_str()).await)?.is_some() {
                return Err(Error::Conflict(format!(
                    "tag '{}' already exists",
                    name.as_str()
                )));
            }

            let tag = self.tags.store(&name, Utc::now()).await?;
            tracing::info!(tag_id = tag.id, name = %tag.name, "tag created");
            Ok(tag)
        })
        .await
    }

    /// Rename a tag.
    pub async fn update(&self, id: i64, name: TagName) -> Result<Tag> {
        with_timeout(self.config.timeout, async {
            let current = self.tags.get_by_id(id).await?;

            if let Some(holder) = existing(self.tags.get_by_name(name.as_str()).await)? {
                if holder.id != current.id {
                    return Err(Error::Conflict(format!(
                        "tag '{}' already exists",
                        name.as_str()
                    )));
                }
            }

            self.tags.update(id, &name, Utc::now()).await
        })
        .await
    }

    /// Delete a tag after confirming it exists.
    pub async fn delete(&self, id: i64) -> Result<()> {
        with_timeout(self.config.timeout, async {
            self.tags.get_by_id(id).await?;
            self.tags.delete(id).await?;
            tracing::info!(tag_id = id, "tag deleted");
            Ok(())
        })
        .await
    }
}
