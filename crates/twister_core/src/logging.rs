//! Log subscriber set-up for twister tools
//!
//! Events are written to stderr. `RUST_LOG` takes precedence over the
//! configured level when it is set.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Whether ANSI colours are used
    pub use_colors: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            use_colors: true,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, multi-line
    Pretty,
    /// One line per event
    Compact,
    /// Structured JSON, needs the `logging-json` feature
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("JSON log format requires the logging-json feature")]
    JsonUnavailable,

    #[error("a global log subscriber is already installed")]
    AlreadyInitialized,
}

/// Build the level filter, preferring `RUST_LOG` when present
pub fn build_filter(config: &LogConfig) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|source| LoggingError::InvalidFilter {
            directive: config.level.clone(),
            source,
        }),
    }
}

/// Install the global subscriber for the process
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry().with(build_filter(config)?);
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.use_colors);

    let result = match config.format {
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Json => {
            #[cfg(feature = "logging-json")]
            {
                registry.with(layer.json().with_ansi(false)).try_init()
            }
            #[cfg(not(feature = "logging-json"))]
            {
                return Err(LoggingError::JsonUnavailable);
            }
        }
    };

    result.map_err(|_| LoggingError::AlreadyInitialized)?;
    crate::twister_log_debug!(level = %config.level, format = ?config.format, "logging initialized");
    Ok(())
}
