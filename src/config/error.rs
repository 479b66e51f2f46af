//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations. Every
/// variant is a fatal startup error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A receiver is missing a field it cannot work without.
    #[error("Receiver #{index}: missing required field {field}")]
    MissingField {
        /// 1-based position in the receivers list
        index: usize,
        /// Dotted name of the missing field
        field: &'static str,
    },

    /// Invalid URL provided.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The invalid URL string
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Smarthost is not `host[:port]`.
    #[error("Invalid smarthost '{value}': expected host[:port]")]
    InvalidSmarthost {
        /// The invalid smarthost string
        value: String,
    },

    /// Invalid duration value (zero or too large).
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid retry configuration.
    #[error("Invalid retry configuration: {0}")]
    InvalidRetry(String),

    /// Invalid message template (Handlebars syntax error).
    #[error("Invalid message template: {reason}")]
    InvalidTemplate {
        /// Reason for invalidity
        reason: String,
    },
}

impl ConfigError {
    /// Creates a `MissingField` error for a receiver.
    #[must_use]
    pub const fn missing(index: usize, field: &'static str) -> Self {
        Self::MissingField { index, field }
    }
}
