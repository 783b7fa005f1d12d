//! Tag enrichment for article batches
//!
//! Articles come out of the store with only a `tag_id`. Enrichment resolves
//! each distinct id once, concurrently, and writes the tags back in the
//! original order.
//!
//! - One task per distinct tag id, spawned on a `JoinSet`
//! - A shared semaphore caps in-flight lookups regardless of page size
//! - First failure aborts the remaining tasks and fails the whole batch

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::db::TagStore;
use crate::error::{Error, Result};
use crate::models::{Article, Tag};

/// Resolves article tags through a bounded pool of concurrent lookups
#[derive(Clone)]
pub struct TagEnricher {
    tags: Arc<dyn TagStore>,
    /// Shared by every enrichment call made through this enricher
    permits: Arc<Semaphore>,
}

impl TagEnricher {
    pub fn new(tags: Arc<dyn TagStore>, max_concurrent_lookups: usize) -> Self {
        Self {
            tags,
            permits: Arc::new(Semaphore::new(max_concurrent_lookups.max(1))),
        }
    }

    /// Attach the resolved tag to every article in `articles`.
    ///
    /// Output order matches input order and only `tag` changes. A lookup
    /// answering `Ok(None)` leaves that id's articles with `tag: None`.
    ///
    /// # Errors
    ///
    /// The first lookup error is returned as-is; a panicked lookup task
    /// becomes `Error::Internal`.
    pub async fn enrich(&self, mut articles: Vec<Article>) -> Result<Vec<Article>> {
        let ids: HashSet<i64> = articles.iter().map(|a| a.tag_id).collect();
        if ids.is_empty() {
            return Ok(articles);
        }

        tracing::debug!(
            articles = articles.len(),
            lookups = ids.len(),
            "resolving article tags"
        );

        let resolved = self.resolve(ids).await?;

        for article in &mut articles {
            if let Some(tag) = resolved.get(&article.tag_id) {
                article.tag = Some(tag.clone());
            }
        }

        Ok(articles)
    }

    async fn resolve(&self, ids: HashSet<i64>) -> Result<HashMap<i64, Tag>> {
        let mut lookups = JoinSet::new();

        for id in ids {
            let tags = Arc::clone(&self.tags);
            let permits = Arc::clone(&self.permits);

            lookups.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| Error::Internal(format!("lookup pool closed: {e}")))?;
                tags.lookup(id).await.map(|tag| (id, tag))
            });
        }

        let mut resolved = HashMap::with_capacity(lookups.len());

        while let Some(joined) = lookups.join_next().await {
            let (id, tag) = match joined {
                Ok(Ok(found)) => found,
                Ok(Err(e)) => {
                    lookups.abort_all();
                    tracing::error!(error = %e, "tag lookup failed, abandoning batch");
                    return Err(e);
                }
                Err(e) => {
                    lookups.abort_all();
                    return Err(Error::Internal(format!("tag lookup task failed: {e}")));
                }
            };

            match tag {
                Some(tag) => {
                    resolved.insert(id, tag);
                }
                None => tracing::debug!(tag_id = id, "tag not available, leaving unresolved"),
            }
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use crate::models::{PageQuery, TagName};

    /// Tag store stub that counts lookups and tracks peak concurrency.
    #[derive(Default)]
    struct CountingTags {
        lookups: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        /// Ids that fail with NotFound
        missing: Vec<i64>,
        /// Ids that answer Ok(None)
        pending: Vec<i64>,
        delay: Option<Duration>,
    }

    fn tag(id: i64) -> Tag {
        let now = Utc::now();
        Tag {
            id,
            name: format!("tag-{id}"),
            created_at: now,
            updated_at: now,
        }
    }

    fn article(id: i64, tag_id: i64) -> Article {
        let now = Utc::now();
        Article {
            id,
            title: format!("article-{id}"),
            content: "body".into(),
            tag_id,
            tag: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[async_trait]
    impl TagStore for CountingTags {
        async fn fetch(&self, _page: PageQuery) -> Result<Vec<Tag>> {
            unimplemented!()
        }

        async fn get_by_id(&self, id: i64) -> Result<Tag> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.missing.contains(&id) {
                Err(Error::not_found("tag", id))
            } else {
                Ok(tag(id))
            }
        }

        async fn lookup(&self, id: i64) -> Result<Option<Tag>> {
            if self.pending.contains(&id) {
                self.lookups.fetch_add(1, Ordering::SeqCst);
                return Ok(None);
            }
            self.get_by_id(id).await.map(Some)
        }

        async fn get_by_name(&self, _name: &str) -> Result<Tag> {
            unimplemented!()
        }

        async fn store(&self, _name: &TagName, _now: DateTime<Utc>) -> Result<Tag> {
            unimplemented!()
        }

        async fn update(&self, _id: i64, _name: &TagName, _now: DateTime<Utc>) -> Result<Tag> {
            unimplemented!()
        }

        async fn delete(&self, _id: i64) -> Result<()> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn one_lookup_per_distinct_tag() {
        let store = Arc::new(CountingTags::default());
        let enricher = TagEnricher::new(store.clone(), 8);

        let batch = vec![
            article(1, 10),
            article(2, 20),
            article(3, 10),
            article(4, 30),
            article(5, 10),
            article(6, 20),
        ];
        let out = enricher.enrich(batch).await.unwrap();

        assert_eq!(store.lookups.load(Ordering::SeqCst), 3);
        assert!(out.iter().all(|a| a.tag.as_ref().map(|t| t.id) == Some(a.tag_id)));
    }

    #[tokio::test]
    async fn preserves_order_and_other_fields() {
        let store = Arc::new(CountingTags {
            delay: Some(Duration::from_millis(5)),
            ..Default::default()
        });
        let enricher = TagEnricher::new(store, 4);

        let batch: Vec<Article> = (1..=12).map(|i| article(i, (i % 5) + 1)).collect();
        let out = enricher.enrich(batch.clone()).await.unwrap();

        assert_eq!(out.len(), batch.len());
        for (before, after) in batch.iter().zip(&out) {
            let mut stripped = after.clone();
            stripped.tag = None;
            assert_eq!(&stripped, before);
            assert_eq!(after.tag.as_ref().unwrap().id, before.tag_id);
        }
    }

    #[tokio::test]
    async fn any_failure_fails_the_batch() {
        let store = Arc::new(CountingTags {
            missing: vec![20],
            ..Default::default()
        });
        let enricher = TagEnricher::new(store, 8);

        let err = enricher
            .enrich(vec![article(1, 10), article(2, 20), article(3, 30)])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound { resource: "tag", .. }));
    }

    #[tokio::test]
    async fn unavailable_tags_stay_unresolved() {
        let store = Arc::new(CountingTags {
            pending: vec![20],
            ..Default::default()
        });
        let enricher = TagEnricher::new(store, 8);

        let out = enricher
            .enrich(vec![article(1, 10), article(2, 20)])
            .await
            .unwrap();

        assert_eq!(out[0].tag.as_ref().map(|t| t.id), Some(10));
        assert!(out[1].tag.is_none());
    }

    #[tokio::test]
    async fn concurrency_is_capped() {
        let store = Arc::new(CountingTags {
            delay: Some(Duration::from_millis(10)),
            ..Default::default()
        });
        let enricher = TagEnricher::new(store.clone(), 3);

        let batch: Vec<Article> = (1..=20).map(|i| article(i, i)).collect();
        enricher.enrich(batch).await.unwrap();

        assert_eq!(store.lookups.load(Ordering::SeqCst), 20);
        let peak = store.peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency {peak} exceeded cap");
        assert!(peak >= 2, "lookups never overlapped");
    }

    #[tokio::test]
    async fn empty_batch_does_no_lookups() {
        let store = Arc::new(CountingTags::default());
        let enricher = TagEnricher::new(store.clone(), 8);

        assert!(enricher.enrich(Vec::new()).await.unwrap().is_empty());
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }
}
