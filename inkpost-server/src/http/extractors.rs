//! Custom Axum extractors

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Numeric record id from the path.
///
/// A non-numeric id can never match a record, so it is reported as 404
/// rather than 400.
pub struct ResourceId(pub i64);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound {
                resource: "item",
                id: String::new(),
            })?;

        raw.parse::<i64>()
            .map(Self)
            .map_err(|_| ApiError::NotFound {
                resource: "item",
                id: raw,
            })
    }
}

/// JSON body whose rejections use the API error shape.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::BadRequest {
                message: rejection.body_text(),
            })?;

        Ok(Self(value))
    }
}
