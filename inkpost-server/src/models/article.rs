//! Article record and write inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::pagination::Timestamped;
use super::tag::Tag;
use super::validation::{required_text, ValidationError};

/// Maximum length for article titles
const MAX_TITLE_LEN: usize = 256;

/// Article record
///
/// Rows carry only `tag_id`; `tag` is filled in by the usecase layer once
/// the referenced tag has been resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tag_id: i64,
    #[sqlx(skip)]
    #[serde(default)]
    pub tag: Option<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamped for Article {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Validated article title (the article's business key)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleTitle(String);

impl ArticleTitle {
    /// Create a new title: non-empty after trimming, max 256 characters.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        required_text(s, "title", MAX_TITLE_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated article body
///
/// Must contain something besides whitespace; stored as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleContent(String);

impl ArticleContent {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty { field: "content" });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn positive_id(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    match value {
        0 => Err(ValidationError::Empty { field }),
        v if v < 0 => Err(ValidationError::InvalidId { field, value }),
        v => Ok(v),
    }
}

/// Complete article write: every field present and valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: ArticleTitle,
    pub content: ArticleContent,
    pub tag_id: i64,
}

impl NewArticle {
    pub fn new(title: &str, content: &str, tag_id: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            title: ArticleTitle::new(title)?,
            content: ArticleContent::new(content)?,
            tag_id: positive_id("tag_id", tag_id)?,
        })
    }
}

/// Partial article update
///
/// Empty strings and a zero tag id mean "keep the stored value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleChanges {
    pub title: Option<ArticleTitle>,
    pub content: Option<ArticleContent>,
    pub tag_id: Option<i64>,
}

impl ArticleChanges {
    pub fn new(title: &str, content: &str, tag_id: i64) -> Result<Self, ValidationError> {
        let title = if title.trim().is_empty() {
            None
        } else {
            Some(ArticleTitle::new(title)?)
        };

        let content = if content.trim().is_empty() {
            None
        } else {
            Some(ArticleContent::new(content)?)
        };

        let tag_id = match tag_id {
            0 => None,
            id => Some(positive_id("tag_id", id)?),
        };

        Ok(Self {
            title,
            content,
            tag_id,
        })
    }

    /// Merge onto the stored article, falling back field by field.
    pub fn merge(self, current: &Article) -> NewArticle {
        NewArticle {
            title: self
                .title
                .unwrap_or_else(|| ArticleTitle(current.title.clone())),
            content: self
                .content
                .unwrap_or_else(|| ArticleContent(current.content.clone())),
            tag_id: self.tag_id.unwrap_or(current.tag_id),
        }
    }
}
