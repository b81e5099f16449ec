//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Bookstore API                      │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ValidationError ──────────────────────────► 400 VALIDATION_ERROR      │
//! │  DbError::UniqueViolation ─────────────────► 400 DUPLICATE             │
//! │  DbError::Domain(InsufficientStock) ───────► 400 INSUFFICIENT_STOCK    │
//! │  DbError::NotFound ────────────────────────► 404 NOT_FOUND             │
//! │  request timeout ──────────────────────────► 408 TIMEOUT               │
//! │  anything else ── error!(cause) ───────────► 500 "Server error"        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The response body is always:
//! ```json
//! { "message": "Not enough stock. Available: 2, Requested: 3", "code": "INSUFFICIENT_STOCK" }
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bookstore_core::{CoreError, ValidationError};
use bookstore_db::DbError;
use serde::Serialize;

/// API error returned from handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status of the response
    pub status: StatusCode,

    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Unique field already taken (400)
    Duplicate,

    /// Sale would drive stock negative (400)
    InsufficientStock,

    /// Handler exceeded the request timeout (408)
    Timeout,

    /// Unexpected failure (500)
    Internal,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    code: ErrorCode,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error, e.g. "Book not found".
    pub fn not_found(entity: &str) -> Self {
        ApiError::new(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            format!("{} not found", entity),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationError, message)
    }

    /// Creates a request timeout error.
    pub fn timeout() -> Self {
        ApiError::new(
            StatusCode::REQUEST_TIMEOUT,
            ErrorCode::Timeout,
            "Request timed out",
        )
    }

    /// Creates an internal error. The real cause should already be logged.
    pub fn internal() -> Self {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal,
            "Server error",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: &self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } => ApiError::not_found(&entity),
            e @ DbError::UniqueViolation { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::Duplicate, e.to_string())
            }
            DbError::Domain(e) => ApiError::from(e),
            other => {
                // Log the actual error but return a generic message
                tracing::error!(error = %other, "Request failed");
                ApiError::internal()
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            e @ CoreError::InsufficientStock { .. } => ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::InsufficientStock,
                e.to_string(),
            ),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result alias used by every handler.
pub type ApiResult<T> = Result<T, ApiError>;
