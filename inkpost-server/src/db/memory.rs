//! In-memory store implementation.
//!
//! Mirrors the PostgreSQL schema's constraints (unique tag names and
//! article titles, article → tag foreign key) so usecases behave the same
//! against either backend. Used by tests and the `--in-memory` dev mode.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use super::repos::{ArticleStore, TagStore};
use crate::error::{Error, Result};
use crate::models::{Article, NewArticle, PageQuery, Tag, TagName, Timestamped};

#[derive(Default)]
struct MemoryState {
    tags: BTreeMap<i64, Tag>,
    articles: BTreeMap<i64, Article>,
    next_tag_id: i64,
    next_article_id: i64,
    /// Latest creation time handed out; keeps `created_at` strictly increasing.
    last_created: Option<DateTime<Utc>>,
}

impl MemoryState {
    fn stamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let at = match self.last_created {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created = Some(at);
        at
    }

    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.tags
            .values()
            .any(|t| t.name == name && Some(t.id) != except)
    }

    fn title_taken(&self, title: &str, except: Option<i64>) -> bool {
        self.articles
            .values()
            .any(|a| a.title == title && Some(a.id) != except)
    }

    fn check_tag_ref(&self, tag_id: i64) -> Result<()> {
        if self.tags.contains_key(&tag_id) {
            Ok(())
        } else {
            Err(Error::Conflict(format!(
                "article references missing tag {tag_id}"
            )))
        }
    }
}

fn page_of<T: Timestamped + Clone>(rows: impl Iterator<Item = T>, page: PageQuery) -> Vec<T> {
    let mut rows: Vec<T> = rows
        .filter(|r| page.after.map_or(true, |after| r.created_at() > after))
        .collect();
    rows.sort_by_key(|r| r.created_at());
    rows.truncate(page.limit as usize);
    rows
}

/// Shared in-memory tag and article store
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TagStore for MemoryStore {
    async fn fetch(&self, page: PageQuery) -> Result<Vec<Tag>> {
        let state = self.state.lock().await;
        Ok(page_of(state.tags.values().cloned(), page))
    }

    async fn get_by_id(&self, id: i64) -> Result<Tag> {
        let state = self.state.lock().await;
        state
            .tags
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("tag", id))
    }

    async fn get_by_name(&self, name: &str) -> Result<Tag> {
        let state = self.state.lock().await;
        state
            .tags
            .values()
            .find(|t| t.name == name)
            .cloned()
            .ok_or_else(|| Error::not_found("tag", name))
    }

    async fn store(&self, name: &TagName, now: DateTime<Utc>) -> Result<Tag> {
        let mut state = self.state.lock().await;
        if state.name_taken(name.as_str(), None) {
            return Err(Error::Conflict(format!(
                "tag '{}' already exists",
                name.as_str()
            )));
        }

        state.next_tag_id += 1;
        let created_at = state.stamp(now);
        let tag = Tag {
            id: state.next_tag_id,
            name: name.as_str().to_owned(),
            created_at,
            updated_at: created_at,
        };
        state.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn update(&self, id: i64, name: &TagName, now: DateTime<Utc>) -> Result<Tag> {
        let mut state = self.state.lock().await;
        if state.name_taken(name.as_str(), Some(id)) {
            return Err(Error::Conflict(format!(
                "tag '{}' already exists",
                name.as_str()
            )));
        }

        let tag = state
            .tags
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("tag", id))?;
        tag.name = name.as_str().to_owned();
        tag.updated_at = now;
        Ok(tag.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.articles.values().any(|a| a.tag_id == id) {
            return Err(Error::Conflict(format!(
                "tag {id} is still referenced by articles"
            )));
        }

        state
            .tags
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("tag", id))
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn fetch(&self, page: PageQuery) -> Result<Vec<Article>> {
        let state = self.state.lock().await;
        Ok(page_of(state.articles.values().cloned(), page))
    }

    async fn get_by_id(&self, id: i64) -> Result<Article> {
        let state = self.state.lock().await;
        state
            .articles
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("article", id))
    }

    async fn get_by_title(&self, title: &str) -> Result<Article> {
        let state = self.state.lock().await;
        state
            .articles
            .values()
            .find(|a| a.title == title)
            .cloned()
            .ok_or_else(|| Error::not_found("article", title))
    }

    async fn store(&self, article: &NewArticle, now: DateTime<Utc>) -> Result<Article> {
        let mut state = self.state.lock().await;
        if state.title_taken(article.title.as_str(), None) {
            return Err(Error::Conflict(format!(
                "article '{}' already exists",
                article.title.as_str()
            )));
        }
        state.check_tag_ref(article.tag_id)?;

        state.next_article_id += 1;
        let created_at = state.stamp(now);
        let stored = Article {
            id: state.next_article_id,
            title: article.title.as_str().to_owned(),
            content: article.content.as_str().to_owned(),
            tag_id: article.tag_id,
            tag: None,
            created_at,
            updated_at: created_at,
        };
        state.articles.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i64, article: &NewArticle, now: DateTime<Utc>) -> Result<Article> {
        let mut state = self.state.lock().await;
        if state.title_taken(article.title.as_str(), Some(id)) {
            return Err(Error::Conflict(format!(
                "article '{}' already exists",
                article.title.as_str()
            )));
        }
        state.check_tag_ref(article.tag_id)?;

        let stored = state
            .articles
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("article", id))?;
        stored.title = article.title.as_str().to_owned();
        stored.content = article.content.as_str().to_owned();
        stored.tag_id = article.tag_id;
        stored.updated_at = now;
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.state.lock().await;
        state
            .articles
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("article", id))
    }
}
