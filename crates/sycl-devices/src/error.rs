//! Error types for device configuration operations.

use std::path::PathBuf;

/// Errors that can occur while loading device capabilities.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error reading the configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file not found.
    #[error("device configuration file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The requested target has no entry in the configuration.
    #[error("unknown target '{target}' (known targets: {known})")]
    UnknownTarget {
        /// The requested target name.
        target: String,
        /// Comma-separated list of configured targets.
        known: String,
    },

    /// Validation error in a target definition.
    #[error("validation error in target '{target}': {detail}")]
    Validation {
        /// Target whose definition is invalid.
        target: String,
        /// Description of the validation failure.
        detail: String,
    },
}

/// Result type for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;
