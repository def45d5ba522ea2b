//! Inbound requests and normalization.
//!
//! The transport layer hands the dispatcher a decoded method string and URI
//! string; normalization turns them into the method/path pair routing runs
//! on. Query strings are stripped, the configured base path is removed by
//! length, and an optional method-override field lets POST-only clients
//! reach PUT/DELETE/PATCH routes.

use crate::config::DispatchConfig;
use crate::error::DispatchError;
use http::Method;

/// A decoded inbound request, before normalization.
///
/// # Example
///
/// ```
/// use daedalus_dispatch::{DispatchConfig, Request};
///
/// let request = Request::new("post", "/app/posts/7?draft=1").with_override("PUT");
/// let config = DispatchConfig {
///     base_path: "/app".to_string(),
///     ..Default::default()
/// };
///
/// let normalized = request.normalize(&config).unwrap();
/// assert_eq!(normalized.method, http::Method::PUT);
/// assert_eq!(normalized.path, "/posts/7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Decoded HTTP method string, any case.
    pub method: String,

    /// Request URI, optionally carrying a query string.
    pub uri: String,

    /// Optional method-override field supplied by the client.
    pub method_override: Option<String>,
}

impl Request {
    /// Creates a request from a decoded method and URI.
    #[must_use]
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            method_override: None,
        }
    }

    /// Attaches a method-override field.
    #[must_use]
    pub fn with_override(mut self, method: impl Into<String>) -> Self {
        self.method_override = Some(method.into());
        self
    }

    /// Normalizes the request against the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidMethod`] when the method string is
    /// not a valid token.
    pub fn normalize(&self, config: &DispatchConfig) -> Result<NormalizedRequest, DispatchError> {
        let method = parse_method(&self.method)?;
        let method = self.apply_override(method, config);

        let path = self.uri.split('?').next().unwrap_or("");
        let base = &config.base_path;
        let path = if !base.is_empty() && path.starts_with(base.as_str()) {
            &path[base.len()..]
        } else {
            path
        };
        let path = if path.is_empty() { "/" } else { path };

        Ok(NormalizedRequest {
            method,
            path: path.to_string(),
        })
    }

    /// Applies the override field, when configured and applicable.
    ///
    /// The override is honored only for POST requests and only when it
    /// names one of the verbs its clients cannot send natively; anything
    /// else leaves the real method in place.
    fn apply_override(&self, method: Method, config: &DispatchConfig) -> Method {
        if !config.method_override || method != Method::POST {
            return method;
        }
        let Some(requested) = self.method_override.as_deref() else {
            return method;
        };
        match parse_method(requested) {
            Ok(m) if m == Method::PUT || m == Method::DELETE || m == Method::PATCH => {
                tracing::debug!(from = %method, to = %m, "method override applied");
                m
            }
            _ => method,
        }
    }
}

fn parse_method(token: &str) -> Result<Method, DispatchError> {
    Method::from_bytes(token.to_ascii_uppercase().as_bytes()).map_err(|_| {
        DispatchError::InvalidMethod {
            method: token.to_string(),
        }
    })
}

/// The normalized method/path pair routing runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRequest {
    /// Uppercased, parsed request method (override applied).
    pub method: Method,

    /// Request path with query string and base path removed.
    pub path: String,
}
