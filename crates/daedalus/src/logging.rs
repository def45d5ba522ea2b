//! Structured logging bootstrap.
//!
//! The library crates only *emit* `tracing` events; installing a
//! subscriber is the embedding process's job. This module provides the
//! standard setup used by Labyrinth services and by the test suites.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default filter directive (e.g. "info", "daedalus=debug").
    pub filter: String,

    /// Whether to output JSON format.
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json_format: true,
        }
    }
}

impl LogConfig {
    /// A development configuration: human-readable output, debug level.
    #[must_use]
    pub fn development() -> Self {
        Self {
            filter: "debug".to_string(),
            json_format: false,
        }
    }
}

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, falling back to the
/// configured directive. Returns an error if a subscriber is already
/// installed.
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter.clone()));

    if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?;
    }
    Ok(())
}
