//! JSON body extractor with [`ErrorResponse`](crate::ErrorResponse) rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// `axum::Json` whose rejections use the shared error body.
///
/// Malformed syntax and a missing `Content-Type` keep the status axum assigns
/// (400 / 415); type mismatches are 422. Field rules are left to the caller.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(JsonBody(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorResponse;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::post,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Payload {
        quantity: i32,
    }

    fn app() -> Router {
        Router::new().route(
            "/",
            post(|JsonBody(p): JsonBody<Payload>| async move { p.quantity.to_string() }),
        )
    }

    fn json_request(body: &'static str) -> Request<Body> {
        Request::post("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let response = app().oneshot(json_request(r#"{"quantity": 3}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_syntax_error_uses_error_response() {
        let response = app().oneshot(json_request("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "JSON_EXTRACTION");
    }

    #[tokio::test]
    async fn test_type_mismatch_is_unprocessable() {
        let response = app()
            .oneshot(json_request(r#"{"quantity": "three"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
