//! Application error type shared by the manager, repositories and HTTP layer.
//!
//! Every variant carries a human-readable message and free-form JSON details.
//! [`IntoResponse`] renders them as:
//!
//! ```json
//! { "error": { "code": "ambiguous_identifier", "message": "...", "details": { "count": 2 } } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation_error: {message}")]
    Validation { message: String, details: Value },
    #[error("not_found: {message}")]
    NotFound { message: String, details: Value },
    /// A hash prefix or URL matched more than one stored link.
    #[error("ambiguous_identifier: {message}")]
    Ambiguous { message: String, details: Value },
    #[error("conflict: {message}")]
    Conflict { message: String, details: Value },
    /// A single optimistic update lost the race against another writer.
    #[error("concurrency_conflict: {message}")]
    ConcurrencyConflict { message: String, details: Value },
    /// The optimistic retry budget was exhausted.
    #[error("operation_incomplete: {message}")]
    Incomplete { message: String, details: Value },
    #[error("internal_error: {message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn ambiguous(message: impl Into<String>, details: Value) -> Self {
        Self::Ambiguous {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn concurrency_conflict(message: impl Into<String>, details: Value) -> Self {
        Self::ConcurrencyConflict {
            message: message.into(),
            details,
        }
    }
    pub fn incomplete(message: impl Into<String>, details: Value) -> Self {
        Self::Incomplete {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    fn parts(&self) -> (StatusCode, &'static str, &str, &Value) {
        match self {
            AppError::Validation { message, details } => {
                (StatusCode::BAD_REQUEST, "validation_error", message, details)
            }
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Ambiguous { message, details } => (
                StatusCode::BAD_REQUEST,
                "ambiguous_identifier",
                message,
                details,
            ),
            AppError::Conflict { message, details } => {
                (StatusCode::CONFLICT, "conflict", message, details)
            }
            AppError::ConcurrencyConflict { message, details } => (
                StatusCode::CONFLICT,
                "concurrency_conflict",
                message,
                details,
            ),
            AppError::Incomplete { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "operation_incomplete",
                message,
                details,
            ),
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code, message, details) = self.parts();
        ErrorInfo {
            code,
            message: message.to_string(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request("Validation failed", json!(e))
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    tracing::error!(error = %e, "Database error");
    AppError::internal("Database error", json!({}))
}
