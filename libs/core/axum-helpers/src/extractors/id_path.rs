//! Numeric path identifier extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use std::str::FromStr;

/// Parses the single `{id}` path segment into `T` (`i32` by default).
///
/// A segment that does not parse is rejected with a 400 `INVALID_ID` body.
///
/// ```ignore
/// use axum::{Router, routing::get};
/// use axum_helpers::IdPath;
///
/// async fn show(IdPath(id): IdPath) -> String {
///     format!("product {id}")
/// }
///
/// let app: Router = Router::new().route("/products/{id}", get(show));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath<T = i32>(pub T);

impl<T, S> FromRequestParts<S> for IdPath<T>
where
    T: FromStr + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        raw.trim()
            .parse::<T>()
            .map(IdPath)
            .map_err(|_| AppError::InvalidId(raw).into_response())
    }
}
