//! Structured logging setup using tracing
//!
//! Console logging with configurable levels for embedding applications
//! that haven't installed their own subscriber. The library itself only
//! emits `tracing` events; calling this is optional.
//!
//! # Example
//!
//! ```no_run
//! use caduceus::logging::init_logging;
//!
//! init_logging("info").expect("Failed to initialize logging");
//! ```

use crate::domain::errors::CaduceusError;
use crate::domain::result::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Initialize console logging at the given level
///
/// The `RUST_LOG` environment variable overrides `log_level_str` when set.
///
/// # Errors
///
/// Returns an error if the level string is not one of trace, debug, info,
/// warn, error, or if a global subscriber is already installed.
pub fn init_logging(log_level_str: &str) -> Result<()> {
    let log_level = parse_log_level(log_level_str)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("caduceus={log_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|e| {
            CaduceusError::Configuration(format!("Failed to initialize logging: {e}"))
        })?;

    tracing::debug!(level = %log_level, "Logging initialized");
    Ok(())
}

/// Parse log level from string
fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(CaduceusError::Configuration(format!(
            "Invalid log level: {level_str}. Must be one of: trace, debug, info, warn, error"
        ))),
    }
}
