//! API error type with IntoResponse
//!
//! Errors are converted to `{"message": ...}` bodies with the status code
//! the client needs. Anything unexpected is logged and reported as 500
//! with a generic message.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::Error;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Field validation failed (400)
    Validation(ValidationError),

    /// Malformed cursor, body or parameter (400)
    BadRequest { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Business key already taken or record still referenced (409)
    Conflict { message: String },

    /// Deadline exceeded (500, logged)
    Timeout { after: Duration },

    /// Database error (500, logged)
    Database(sqlx::Error),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Timeout { .. } | Self::Database(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Validation(e) => e.to_string(),
            Self::BadRequest { message } => message,
            Self::NotFound { resource, id } => format!("{} '{}' not found", resource, id),
            Self::Conflict { message } => message,
            Self::Timeout { after } => {
                tracing::error!("Request timed out after {:?}", after);
                "request timed out".to_owned()
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                "internal server error".to_owned()
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                "internal server error".to_owned()
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::NotFound { resource, id } => Self::NotFound { resource, id },
            Error::Conflict(message) => Self::Conflict { message },
            Error::BadParamInput(message) => Self::BadRequest { message },
            Error::Validation(e) => Self::Validation(e),
            Error::Timeout(after) => Self::Timeout { after },
            Error::Database(e) => Self::Database(e),
            Error::Internal(message) => Self::Internal { message },
        }
    }
}
