//! Domain error types
//!
//! This module defines the error hierarchy for Caduceus. All errors are
//! domain-specific and don't expose third-party types. Every fatal variant
//! aborts the export run; no partial bundle is returned to the caller.

use thiserror::Error;

/// Main Caduceus error type
///
/// This is the primary error type used throughout the library. A failed
/// export returns exactly one of these; the bundle under construction is
/// discarded.
#[derive(Debug, Error)]
pub enum CaduceusError {
    /// An event's type code has no entry in the named terminology table
    #[error("No {table} terminology entry for '{key}'")]
    MissingLookup { table: &'static str, key: String },

    /// A composite or report synthesizer asked for more prior entries than the bundle holds
    #[error("Requested the last {requested} bundle entries but only {available} exist")]
    InsufficientEntries { requested: usize, available: usize },

    /// A duration or frequency unit outside the supported units-of-time set
    #[error("'{0}' is not a recognized unit of time")]
    UnrecognizedUnit(String),

    /// The entries preceding a composite observation are not a consumable panel
    #[error("Invalid composite panel: {0}")]
    InvalidComposite(String),

    /// An event payload doesn't match the shape its terminology entry declares
    #[error("Validation error: {0}")]
    Validation(String),

    /// Terminology/configuration loading errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for CaduceusError {
    fn from(err: std::io::Error) -> Self {
        CaduceusError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CaduceusError {
    fn from(err: serde_json::Error) -> Self {
        CaduceusError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CaduceusError {
    fn from(err: toml::de::Error) -> Self {
        CaduceusError::Configuration(format!("TOML parse error: {err}"))
    }
}
