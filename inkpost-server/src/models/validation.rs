//! Validation error types

use std::fmt;

/// Validation error for request fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Numeric reference must be a positive id
    InvalidId { field: &'static str, value: i64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidId { field, value } => {
                write!(f, "{} must be a positive id, got {}", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim `raw` and check it against a length bound.
pub(crate) fn required_text(
    raw: &str,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(trimmed.to_owned())
}
