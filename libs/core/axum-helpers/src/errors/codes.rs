//! Error codes carried by [`ErrorResponse`](super::ErrorResponse).
//!
//! Each code has a client-facing string form, an integer for log queries and a
//! default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::InvalidId;
//! assert_eq!(code.as_str(), "INVALID_ID");
//! assert_eq!(code.code(), 1002);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    /// Path identifier is not a valid integer
    InvalidId,
    JsonExtraction,
    NotFound,

    // Database errors (2000s)
    DatabaseNotFound,
    DatabaseError,
    DatabasePoolTimeout,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidId => "INVALID_ID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabasePoolTimeout => "DATABASE_POOL_TIMEOUT",
        }
    }

    pub const fn code(&self) -> i32 {
        match self {
            Self::InvalidId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::DatabaseNotFound => 2001,
            Self::DatabaseError => 2003,
            Self::DatabasePoolTimeout => 2013,
        }
    }

    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::InvalidId => "Invalid identifier format",
            Self::JsonExtraction => "Failed to extract JSON from request body",
            Self::NotFound => "Resource not found",
            Self::DatabaseNotFound => "Database record not found",
            Self::DatabaseError => "A database error occurred",
            Self::DatabasePoolTimeout => "Database connection pool timed out",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::InvalidId.as_str(), "INVALID_ID");
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorCode::DatabasePoolTimeout.to_string(), "DATABASE_POOL_TIMEOUT");
    }

    #[test]
    fn test_error_code_integer_codes() {
        assert_eq!(ErrorCode::NotFound.code(), 1004);
        assert_eq!(ErrorCode::InvalidId.code(), 1002);
        assert_eq!(ErrorCode::DatabaseError.code(), 2003);
    }

    #[test]
    fn test_serde_matches_as_str() {
        for code in [
            ErrorCode::InvalidId,
            ErrorCode::JsonExtraction,
            ErrorCode::DatabasePoolTimeout,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            let back: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, code);
        }
    }
}
