//! Tag record and name validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::pagination::Timestamped;
use super::validation::{required_text, ValidationError};

/// Maximum length for tag names
const MAX_TAG_NAME_LEN: usize = 200;

/// Tag record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamped for Tag {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Validated tag name (the tag's business key)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    /// Create a new tag name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 200 characters
    ///
    /// # Example
    /// ```
    /// use inkpost_server::models::TagName;
    ///
    /// assert!(TagName::new("rust").is_ok());
    /// assert!(TagName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        required_text(s, "name", MAX_TAG_NAME_LEN).map(Self)
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
