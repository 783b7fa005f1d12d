//! Opaque pagination cursor
//!
//! A cursor wraps the creation timestamp of the last row on a page. The
//! timestamp is rendered as RFC 3339 with fixed nanosecond precision and
//! then base64url-encoded, so tokens are URL-safe and two distinct instants
//! never share a token.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Cursor decoding failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("invalid cursor '{token}': {reason}")]
    InvalidCursor { token: String, reason: &'static str },
}

impl CursorError {
    fn invalid(token: &str, reason: &'static str) -> Self {
        Self::InvalidCursor {
            token: token.to_owned(),
            reason,
        }
    }
}

/// Encode a timestamp boundary into an opaque token.
pub fn encode_cursor(at: DateTime<Utc>) -> String {
    let raw = at.to_rfc3339_opts(SecondsFormat::Nanos, true);
    URL_SAFE_NO_PAD.encode(raw.as_bytes())
}

/// Decode a token produced by [`encode_cursor`].
///
/// Callers treat the empty string as "first page" and never pass it here;
/// an empty token is rejected like any other malformed input. Valid RFC 3339
/// in any other shape (offsets, lowercase `t`, other precisions) is rejected
/// too: the token must be exactly what `encode_cursor` would emit.
pub fn decode_cursor(token: &str) -> Result<DateTime<Utc>, CursorError> {
    if token.is_empty() {
        return Err(CursorError::invalid(token, "empty token"));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| CursorError::invalid(token, "not base64url"))?;

    let raw = std::str::from_utf8(&bytes)
        .map_err(|_| CursorError::invalid(token, "not utf-8"))?;

    let at = DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| CursorError::invalid(token, "not an RFC 3339 timestamp"))?;

    if encode_cursor(at) != token {
        return Err(CursorError::invalid(token, "not in canonical form"));
    }

    Ok(at)
}
