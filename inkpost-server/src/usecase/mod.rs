//! Usecase orchestrators
//!
//! Every public operation runs under the configured timeout. Business
//! checks (uniqueness, existence, partial-update merge) happen here, before
//! the store is asked to write.

pub mod articles;
pub mod enrich;
pub mod tags;

use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

pub use articles::ArticleUsecase;
pub use enrich::TagEnricher;
pub use tags::TagUsecase;

/// Run `op` with a deadline; dropping it on expiry cancels in-flight work.
pub(crate) async fn with_timeout<T, F>(limit: Duration, op: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout = ?limit, "usecase call timed out");
            Err(Error::Timeout(limit))
        }
    }
}

/// Turn a business-key probe into an optional hit.
///
/// `NotFound` becomes `None`; other failures propagate.
pub(crate) fn existing<T>(probe: Result<T>) -> Result<Option<T>> {
    match probe {
        Ok(found) => Ok(Some(found)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
