//! Error types for Daedalus.
//!
//! [`LabyrinthError`] is the standard application-level error type:
//! handlers return it, and the dispatch layer maps it onto responses. The
//! categories carry a default HTTP status code so transports do not need
//! their own mapping tables.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`LabyrinthError`].
pub type LabyrinthResult<T> = Result<T, LabyrinthError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Request validation errors (invalid input).
    Validation,
    /// Resource not found.
    NotFound,
    /// Internal errors.
    Internal,
    /// External collaborator errors (storage, job queue, downstream services).
    External,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::External => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Standard application error for Daedalus handlers and collaborators.
///
/// # Example
///
/// ```
/// use daedalus_core::{LabyrinthError, LabyrinthResult};
///
/// fn load_post(id: &str) -> LabyrinthResult<String> {
///     if id.is_empty() {
///         return Err(LabyrinthError::validation("post id cannot be empty"));
///     }
///     Err(LabyrinthError::not_found(format!("post {id}"), Some("post")))
/// }
/// ```
#[derive(Error, Debug)]
pub enum LabyrinthError {
    /// Request validation failed.
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },

    /// Resource not found.
    #[error("not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
        /// The type of resource that was not found.
        resource_type: Option<String>,
    },

    /// Internal error.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An external collaborator failed.
    #[error("external error: {message}")]
    External {
        /// Human-readable error message.
        message: String,
        /// The collaborator that failed (e.g. "storage", "job-queue").
        collaborator: Option<String>,
    },
}

impl LabyrinthError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>, resource_type: Option<&str>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: resource_type.map(str::to_string),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error wrapping an underlying cause.
    #[must_use]
    pub fn internal_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an external-collaborator error.
    #[must_use]
    pub fn external(message: impl Into<String>, collaborator: Option<&str>) -> Self {
        Self::External {
            message: message.into(),
            collaborator: collaborator.map(str::to_string),
        }
    }

    /// Returns the error's category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Internal { .. } => ErrorCategory::Internal,
            Self::External { .. } => ErrorCategory::External,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_map_to_status_codes() {
        assert_eq!(
            ErrorCategory::Validation.default_status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCategory::NotFound.default_status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCategory::Internal.default_status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCategory::External.default_status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_category_and_status() {
        let err = LabyrinthError::validation("bad input");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = LabyrinthError::not_found("post 7", Some("post"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_display_messages() {
        let err = LabyrinthError::internal("boom");
        assert_eq!(err.to_string(), "internal error: boom");

        let err = LabyrinthError::external("storage unreachable", Some("storage"));
        assert_eq!(err.to_string(), "external error: storage unreachable");
    }

    #[test]
    fn test_internal_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = LabyrinthError::internal_with("write failed", io);
        assert!(std::error::Error::source(&err).is_some());
    }
}
