use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::AppError;
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;

/// Field name → first violated rule's message, ordered by field name.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product with ID {0} was not found.")]
    NotFound(i32),

    #[error("Invalid input: {0:?}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// 404 body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotFoundBody {
    #[schema(example = "Product with ID 42 was not found.")]
    pub error: String,
}

/// 400 body: one message per rejected field.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorsBody {
    #[schema(example = json!({"name": "Name is required.", "price": "Price must be greater than 0."}))]
    pub errors: FieldErrors,
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        match self {
            ProductError::NotFound(id) => {
                tracing::info!(product_id = id, "Product not found");
                let body = NotFoundBody {
                    error: self.to_string(),
                };
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            ProductError::Validation(errors) => {
                tracing::info!(fields = ?errors.keys().collect::<Vec<_>>(), "Validation failed");
                (StatusCode::BAD_REQUEST, Json(ValidationErrorsBody { errors })).into_response()
            }
            ProductError::Database(e) => AppError::Database(e).into_response(),
        }
    }
}
