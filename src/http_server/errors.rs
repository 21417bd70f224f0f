//! # HTTP API Errors
//!
//! Every failure maps to one status code and a `{"error": "..."}` body.

use std::error::Error as _;

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::AuthError;
use crate::file_storage::StorageError;

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bearer token missing or wrong
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Store lookup or disk I/O failure
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Upload request without a `file` field
    #[error("No file provided")]
    NoFile,

    /// Malformed or oversized multipart body
    #[error("{}", .0.body_text())]
    Multipart(#[from] MultipartError),

    /// Blocking disk task failed to complete
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            ApiError::Auth(e) => e.status_code(),
            ApiError::Storage(e) => e.status_code(),
            ApiError::NoFile => 400,
            ApiError::Multipart(e) => e.status().as_u16(),
            ApiError::Internal(_) => 500,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Storage(e) if status.is_server_error() => {
                let cause = e.source().map(|s| s.to_string()).unwrap_or_default();
                error!(error = %e, %cause, "storage failure");
            }
            ApiError::Internal(detail) => error!(%detail, "internal failure"),
            ApiError::Auth(e) => warn!(error = %e, "rejected request"),
            other => debug!(error = %other, status = status.as_u16(), "request failed"),
        }

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(AuthError::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::NoFile.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(StorageError::NotFound("x".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StorageError::Delete(io::Error::new(io::ErrorKind::Other, "x")))
                .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_bodies() {
        assert_eq!(ErrorResponse::from(&ApiError::NoFile).error, "No file provided");
        assert_eq!(
            ErrorResponse::from(&ApiError::from(AuthError::InvalidToken)).error,
            "Unauthorized: Invalid token"
        );
        assert_eq!(
            ErrorResponse::from(&ApiError::Internal("join error".into())).error,
            "Internal server error"
        );
    }

    #[test]
    fn test_body_is_error_only() {
        let json = serde_json::to_value(ErrorResponse::from(&ApiError::NoFile)).unwrap();
        assert_eq!(json, serde_json::json!({"error": "No file provided"}));
    }
}
