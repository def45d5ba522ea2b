//! Error types for the dispatch crate.

use daedalus_core::LabyrinthError;
use thiserror::Error;

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`DispatchConfig`].
    ///
    /// [`DispatchConfig`]: crate::DispatchConfig
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds an invalid value.
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Creates an [`ConfigError::InvalidValue`].
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from dispatching a single request.
///
/// Route-matching misses and hook failures are *not* errors: the former is
/// a [`DispatchOutcome::NotFound`] and the latter are recovered inside the
/// hook chain. What remains here is fatal for the current request only and
/// never for the dispatcher itself.
///
/// [`DispatchOutcome::NotFound`]: crate::DispatchOutcome::NotFound
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request's method string is not a valid token.
    #[error("invalid request method: {method}")]
    InvalidMethod {
        /// The offending method string.
        method: String,
    },

    /// The matched route's handler reference resolves to nothing.
    #[error("unknown handler reference: {id}")]
    UnknownHandler {
        /// The unresolvable reference.
        id: String,
    },

    /// The handler itself failed.
    #[error("handler error: {0}")]
    Handler(#[source] LabyrinthError),

    /// The rendering collaborator failed.
    #[error("render error: {0}")]
    Render(#[source] LabyrinthError),
}
