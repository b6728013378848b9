//! Application error type shared by every layer.
//!
//! Errors carry an [`ErrorKind`] discriminator. Callers branch on the kind,
//! HTTP handlers map it to a status code, and the message/details pair is
//! rendered as the JSON error body.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Classification of every user-visible failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed URL, malformed or out-of-range custom code, bad request body.
    InvalidInput,
    /// Short code already taken.
    Conflict,
    /// Short code unknown to the store.
    NotFound,
    /// Short code known but past its expiry.
    Expired,
    /// Missing or wrong admin credentials.
    Unauthorized,
    /// Collaborator failure or exhausted retry bound.
    Internal,
}

impl ErrorKind {
    /// HTTP status for this kind.
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Expired => StatusCode::GONE,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code used in the JSON body.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "validation_error",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Expired => "expired",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Internal => "internal_error",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serialized error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Tagged application error.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    details: Value,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, details: Value) -> Self {
        Self {
            kind,
            message: message.into(),
            details,
        }
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::new(ErrorKind::InvalidInput, message, details)
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::new(ErrorKind::Conflict, message, details)
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::new(ErrorKind::NotFound, message, details)
    }

    pub fn expired(message: impl Into<String>, details: Value) -> Self {
        Self::new(ErrorKind::Expired, message, details)
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::new(ErrorKind::Unauthorized, message, details)
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::new(ErrorKind::Internal, message, details)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &Value {
        &self.details
    }

    /// Builds the JSON payload without consuming the error.
    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.kind.as_str(),
            message: self.message.clone(),
            details: self.details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let body = ErrorBody {
            error: ErrorInfo {
                code: self.kind.as_str(),
                message: self.message,
                details: self.details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!("Database error: {}", e);
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request("Request validation failed", json!({ "fields": e.to_string() }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::bad_request("Invalid JSON body", json!({ "reason": e.body_text() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorKind::InvalidInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(ErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::Expired.status_code(), StatusCode::GONE);
        assert_eq!(ErrorKind::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ErrorKind::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(
            AppError::bad_request("x", json!({})).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(AppError::conflict("x", json!({})).kind(), ErrorKind::Conflict);
        assert_eq!(AppError::not_found("x", json!({})).kind(), ErrorKind::NotFound);
        assert_eq!(AppError::expired("x", json!({})).kind(), ErrorKind::Expired);
        assert_eq!(AppError::internal("x", json!({})).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_display_uses_message() {
        let err = AppError::not_found("Short link not found", json!({ "code": "abc" }));
        assert_eq!(err.to_string(), "Short link not found");
        assert_eq!(err.details()["code"], "abc");
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::expired("gone", json!({})).into_response();
        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[test]
    fn test_row_not_found_is_internal() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
