//! Cursor pagination types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cursor::{decode_cursor, encode_cursor, CursorError};

/// Default items per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum items per page
pub const MAX_PAGE_SIZE: u32 = 100;

/// Store-facing page query: rows created strictly after `after`, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// Exclusive lower bound on `created_at`; `None` for the first page
    pub after: Option<DateTime<Utc>>,
    /// Maximum rows to return
    pub limit: u32,
}

impl PageQuery {
    /// Query for the first page.
    pub fn first(limit: u32) -> Self {
        Self { after: None, limit }
    }

    /// Build a query from a raw cursor token.
    ///
    /// An empty token means the first page; anything else must decode.
    pub fn parse(cursor: &str, limit: u32) -> Result<Self, CursorError> {
        if cursor.is_empty() {
            return Ok(Self::first(limit));
        }

        Ok(Self {
            after: Some(decode_cursor(cursor)?),
            limit,
        })
    }

    /// SQL LIMIT value.
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

/// Resolve the effective page size.
///
/// Zero means unspecified and falls back to `default`; anything else is
/// capped at `max`. Never returns 0, even for a zero `default` or `max`.
pub fn page_limit(requested: u32, default: u32, max: u32) -> u32 {
    let size = if requested == 0 { default } else { requested };
    size.clamp(1, max.max(1))
}

/// Records that can be ordered and cursored by creation time.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

/// One page of results plus the token for the next one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items for current page, oldest first
    pub items: Vec<T>,
    /// Next-page token, empty when no further page is expected
    pub next_cursor: String,
}

impl<T: Timestamped> Page<T> {
    /// Wrap fetched rows and derive the next cursor.
    ///
    /// A full page is taken to mean more rows exist, so the last row's
    /// timestamp becomes the next cursor. A short page ends the listing.
    /// When the total is an exact multiple of `limit` the final cursor
    /// leads to one empty page.
    pub fn from_rows(items: Vec<T>, limit: u32) -> Self {
        let next_cursor = match items.last() {
            Some(last) if items.len() == limit as usize => encode_cursor(last.created_at()),
            _ => String::new(),
        };

        Self { items, next_cursor }
    }
}

impl<T> Page<T> {
    /// Check if a next page is expected.
    pub fn has_next(&self) -> bool {
        !self.next_cursor.is_empty()
    }
}

/// Query parameters for list endpoints
///
/// `num` stays a string so a malformed or negative value degrades to the
/// default page size instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub num: Option<String>,
    pub cursor: Option<String>,
}

impl ListParams {
    /// Requested page size, 0 when absent or unusable.
    pub fn page_size(&self) -> u32 {
        self.num
            .as_deref()
            .and_then(|n| n.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
            .unwrap_or(0)
    }

    /// Cursor token, empty for the first page.
    pub fn cursor(&self) -> &str {
        self.cursor.as_deref().unwrap_or("")
    }
}
