//! Application error type and its HTTP representation.
//!
//! Every layer returns [`AppError`]. Handlers let axum turn it into a JSON
//! body of the form:
//!
//! ```json
//! { "error": { "code": "invalid_filter", "message": "...", "details": {} } }
//! ```
//!
//! Undefined ratios are not errors: they travel through the pipeline as
//! `None` values and end up as `null` in chart payloads.

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error description embedded in error responses.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Caller supplied a structurally invalid filter or chart parameter.
    #[error("invalid filter: {message}")]
    InvalidFilter { message: String, details: Value },

    #[error("not found: {message}")]
    NotFound { message: String, details: Value },

    /// The record source could not be read. Never retried inside the core.
    #[error("source unavailable: {message}")]
    SourceUnavailable { message: String, details: Value },

    #[error("internal error: {message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_filter(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidFilter {
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
    pub fn source_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::SourceUnavailable {
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

    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidFilter { .. } => (StatusCode::BAD_REQUEST, "invalid_filter"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::SourceUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "source_unavailable")
            }
            AppError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Converts the error into its serializable description.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.parts();
        let (message, details) = match self {
            AppError::InvalidFilter { message, details }
            | AppError::NotFound { message, details }
            | AppError::SourceUnavailable { message, details }
            | AppError::Internal { message, details } => (message.clone(), details.clone()),
        };
        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::source_unavailable("Database error", json!({ "reason": e.to_string() }))
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map(|p| p.line());
        AppError::source_unavailable(
            "Failed to read survey data file",
            json!({ "reason": e.to_string(), "line": line }),
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::source_unavailable("I/O error", json!({ "reason": e.to_string() }))
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::invalid_filter("Malformed query string", json!({ "reason": e.body_text() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::invalid_filter("Invalid chart parameters", json!(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                AppError::invalid_filter("bad", json!({})),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::not_found("none", json!({})), StatusCode::NOT_FOUND),
            (
                AppError::source_unavailable("down", json!({})),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::internal("oops", json!({})),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_error_info_code() {
        let info = AppError::invalid_filter("min > max", json!({ "min": 5 })).to_error_info();
        assert_eq!(info.code, "invalid_filter");
        assert_eq!(info.message, "min > max");
        assert_eq!(info.details["min"], 5);
    }

    #[test]
    fn test_io_error_maps_to_source_unavailable() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, AppError::SourceUnavailable { .. }));
    }
}
