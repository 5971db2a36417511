//! # Error Types
//!
//! Top-level error for the foundational crate. State machine and schema
//! errors live in their own crates; this enum covers configuration,
//! parsing, and IO failures that any consumer may surface.

use thiserror::Error;

/// Top-level error type for the wizard foundation.
#[derive(Error, Debug)]
pub enum CredwizError {
    /// Configuration could not be loaded or parsed.
    #[error("configuration error for '{source_name}': {reason}")]
    Config {
        /// File path or environment variable the configuration came from.
        source_name: String,
        /// Why loading failed.
        reason: String,
    },

    /// A timestamp string could not be parsed.
    #[error("invalid timestamp: {0}")]
    Timestamp(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CredwizError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
