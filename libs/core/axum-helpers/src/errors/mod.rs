pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Body returned for infrastructure-level failures.
///
/// ```json
/// {
///   "code": 2013,
///   "error": "DATABASE_POOL_TIMEOUT",
///   "message": "Database connection pool timed out"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Errors every domain can fall back on when turning failures into responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Invalid id: {0}")]
    InvalidId(String),
}

impl AppError {
    fn parts(self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::Database(e) => map_db_error(&e),
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {}",
                    e
                );
                (e.status(), ErrorCode::JsonExtraction, e.body_text())
            }
            AppError::InvalidId(raw) => {
                tracing::info!(error_code = ErrorCode::InvalidId.code(), id = %raw, "Invalid id");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidId,
                    format!("Invalid id: {}", raw),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

fn map_db_error(error: &DbErr) -> (StatusCode, ErrorCode, String) {
    match error {
        DbErr::ConnectionAcquire(e) => {
            tracing::warn!(
                error_code = ErrorCode::DatabasePoolTimeout.code(),
                "Could not acquire a database connection: {}",
                e
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::DatabasePoolTimeout,
                ErrorCode::DatabasePoolTimeout.default_message().to_string(),
            )
        }
        DbErr::RecordNotFound(what) => {
            tracing::info!(
                error_code = ErrorCode::DatabaseNotFound.code(),
                "Database record not found: {}",
                what
            );
            (
                StatusCode::NOT_FOUND,
                ErrorCode::DatabaseNotFound,
                ErrorCode::DatabaseNotFound.default_message().to_string(),
            )
        }
        other => {
            tracing::error!(
                error_code = ErrorCode::DatabaseError.code(),
                "Database error: {:?}",
                other
            );
            // Driver details stay in the logs.
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                ErrorCode::DatabaseError.default_message().to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_id_is_bad_request() {
        let response = AppError::InvalidId("abc".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_of(response).await;
        assert_eq!(body.error, "INVALID_ID");
        assert_eq!(body.code, 1002);
        assert_eq!(body.message, "Invalid id: abc");
    }

    #[tokio::test]
    async fn test_database_error_hides_driver_message() {
        let response =
            AppError::Database(DbErr::Custom("relation \"products\" does not exist".into()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.error, "DATABASE_ERROR");
        assert_eq!(body.message, "A database error occurred");
    }

    #[tokio::test]
    async fn test_record_not_found_maps_to_404() {
        let response = AppError::from(DbErr::RecordNotFound("products".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await.error, "DATABASE_NOT_FOUND");
    }
}
