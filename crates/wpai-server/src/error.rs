//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all operations. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with the matching HTTP status code, and [`ApiError::to_body`] renders the
//! same structure for callers that never go through HTTP (blueprint steps,
//! registry callbacks).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use wpai_storage::StorageError;

use crate::packages::PackageError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "missing_field", "upstream_error").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// HTTP status the failure maps to.
    pub status: u16,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required request field is absent or empty (400).
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field is present but malformed (400).
    #[error("validation error: {0}")]
    Validation(String),

    /// A caller-supplied reference does not resolve (400).
    #[error("not found: {0}")]
    NotFound(String),

    /// The content/settings store or package directory reported a failure;
    /// its status is passed through.
    #[error("upstream error: {message}")]
    Upstream { status: u16, message: String },

    /// Credential missing or mismatched (401).
    #[error("unauthorized")]
    Unauthorized,

    /// Internal server error (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingField(_) => "missing_field",
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Upstream { .. } => "upstream_error",
            ApiError::Unauthorized => "auth_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::Validation(_) | ApiError::NotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured detail for this error.
    pub fn detail(&self) -> ApiErrorDetail {
        let message = match self {
            ApiError::MissingField(field) => format!("{} is required", field),
            ApiError::Unauthorized => "missing or invalid API token".to_string(),
            ApiError::Upstream { message, .. } => message.clone(),
            other => other.to_string(),
        };
        ApiErrorDetail {
            code: self.code().to_string(),
            message,
            status: self.status().as_u16(),
        }
    }

    /// The JSON body sent for this error.
    pub fn to_body(&self) -> serde_json::Value {
        serde_json::json!({
            "success": false,
            "error": self.detail(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Upstream { .. } | ApiError::Internal(_) => {
                tracing::warn!(code = self.code(), error = %self, "operation failed");
            }
            _ => tracing::debug!(code = self.code(), error = %self, "request rejected"),
        }
        (self.status(), axum::Json(self.to_body())).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::PageNotFound(_)
            | StorageError::MenuNotFound(_)
            | StorageError::ExtensionNotFound(_) => ApiError::NotFound(err.to_string()),
            _ => ApiError::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                message: err.to_string(),
            },
        }
    }
}

impl From<PackageError> for ApiError {
    fn from(err: PackageError) -> Self {
        ApiError::Upstream {
            status: err.status(),
            message: err.to_string(),
        }
    }
}
