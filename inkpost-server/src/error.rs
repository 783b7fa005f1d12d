//! Error types for inkpost-server
//!
//! Repository and usecase code share one error type so store failures
//! reach the delivery layer unchanged.

use std::time::Duration;

use thiserror::Error;

use crate::models::{CursorError, ValidationError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error("{0}")]
    Conflict(String),

    #[error("bad parameter: {0}")]
    BadParamInput(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<CursorError> for Error {
    fn from(e: CursorError) -> Self {
        Self::BadParamInput(e.to_string())
    }
}

/// Constraint violations become typed conflicts; the rest stay opaque.
impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return Self::Conflict(format!(
                    "duplicate value violates {}",
                    db.constraint().unwrap_or("a unique constraint")
                ));
            }
            if db.is_foreign_key_violation() {
                return Self::Conflict(format!(
                    "record is still referenced ({})",
                    db.constraint().unwrap_or("foreign key")
                ));
            }
        }
        Self::Database(e)
    }
}
