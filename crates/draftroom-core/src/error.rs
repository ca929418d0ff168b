//! The error system shared by every Draftroom crate.
//!
//! Fallible operations return [`AppError`], a kind-tagged error that crosses
//! crate boundaries through `?` and is turned into an HTTP response at the
//! API edge.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Category of an [`AppError`].
///
/// The kind decides the HTTP status and the machine-readable code in the
/// response body; the message carries the detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A document, version, or tag is absent (or scoped to a different
    /// document than the request claimed).
    NotFound,
    /// The request shape or a parameter value is invalid.
    Validation,
    /// A write lost a race (version-number collision) or hit a duplicate.
    Conflict,
    /// The caller exceeded the write throttle.
    RateLimit,
    /// Unexpected internal failure.
    Internal,
    /// The database rejected or failed an operation.
    Database,
    /// Configuration could not be loaded or parsed.
    Configuration,
    /// JSON encoding or decoding failed.
    Serialization,
    /// A dependency is down; retry later.
    ServiceUnavailable,
}

impl ErrorKind {
    /// Stable machine-readable code used in logs and response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION_ERROR",
            Self::Conflict => "CONFLICT",
            Self::RateLimit => "RATE_LIMITED",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Internal | Self::Database | Self::Configuration | Self::Serialization => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// The HTTP status this kind maps to at the API boundary.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal | Self::Database | Self::Configuration | Self::Serialization => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Kind-tagged error carried through the whole application.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// What went wrong, categorically.
    pub kind: ErrorKind,
    /// Detail for humans.
    pub message: String,
    /// The underlying failure, when one exists.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Build an error from a kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Build an error wrapping an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for [`ErrorKind::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Shorthand for [`ErrorKind::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Shorthand for [`ErrorKind::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Shorthand for [`ErrorKind::RateLimit`].
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimit, message)
    }

    /// Shorthand for [`ErrorKind::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error carries the given kind.
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

// The boxed source is not clonable; a clone keeps the kind and message,
// which is all retry loops and tests need.
impl Clone for AppError {
    fn clone(&self) -> Self {
        Self::new(self.kind, self.message.clone())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::Serialization, err.to_string(), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(ErrorKind::Configuration, err.to_string(), err)
    }
}

/// JSON body returned for every failed request: `{error, message}`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.kind.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Internal server error");
        }

        let body = ApiErrorResponse {
            error: self.kind.code().to_string(),
            message: self.message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_http_mapping() {
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorKind::RateLimit.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ErrorKind::Database.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ErrorKind::Database.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_clone_keeps_kind_and_message() {
        let original = AppError::with_source(
            ErrorKind::Database,
            "append failed",
            std::io::Error::other("disk"),
        );
        let clone = original.clone();
        assert!(clone.is_kind(ErrorKind::Database));
        assert_eq!(clone.message, "append failed");
        assert!(clone.source.is_none());
    }
}
