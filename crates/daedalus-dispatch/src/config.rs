//! Dispatcher configuration.
//!
//! Typed configuration loaded from TOML files or built in code. Unknown
//! fields are rejected so typos fail loudly at load time instead of being
//! silently ignored.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Dispatcher configuration.
///
/// # Example
///
/// ```
/// use daedalus_dispatch::DispatchConfig;
///
/// let config = DispatchConfig::from_toml_str(
///     r#"
///     base_path = "/app"
///     method_override = true
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.base_path, "/app");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Base path stripped from the front of every request path before
    /// routing. Empty disables stripping.
    #[serde(default)]
    pub base_path: String,

    /// Whether the request's method-override field is honored for POST
    /// requests from clients that cannot send PUT/DELETE/PATCH natively.
    #[serde(default = "default_method_override")]
    pub method_override: bool,

    /// Where the optional route snapshot is persisted, if anywhere.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

const fn default_method_override() -> bool {
    true
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            method_override: true,
            snapshot_path: None,
        }
    }
}

impl DispatchConfig {
    /// Parses configuration from a TOML string.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `base_path` is non-empty
    /// but does not start with `/`, or ends with `/`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_path.is_empty() {
            if !self.base_path.starts_with('/') {
                return Err(ConfigError::invalid_value(
                    "base_path",
                    "must start with '/' when set",
                ));
            }
            if self.base_path.ends_with('/') {
                return Err(ConfigError::invalid_value(
                    "base_path",
                    "must not end with '/'",
                ));
            }
        }
        Ok(())
    }
}
