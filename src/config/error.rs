//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
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

    /// Missing required field that must be provided by CLI or config file.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// Invalid duration value (zero or too large).
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid `Key=Value` pair (query parameter or header).
    #[error("Invalid {kind} '{value}': expected 'Key=Value'{alt}")]
    InvalidPair {
        /// What the pair was meant to be
        kind: &'static str,
        /// The invalid input
        value: String,
        /// Additional accepted form, if any
        alt: &'static str,
    },

    /// The same query parameter or header was given more than once.
    #[error("Duplicate {kind} '{name}': each name may be given only once")]
    DuplicatePair {
        /// What the pair was meant to be
        kind: &'static str,
        /// The repeated name
        name: String,
    },

    /// Invalid HTTP method.
    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// Invalid JSON request body.
    #[error("Invalid JSON body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    /// Invalid environment variable name.
    #[error("Invalid environment variable name '{0}'")]
    InvalidEnvVar(String),
}

/// Well-known field names for `MissingRequired` errors.
pub mod field {
    /// The basic auth user name.
    pub const BASIC_USER: &str = "basic_user";
    /// The basic auth password.
    pub const BASIC_PASSWORD: &str = "basic_password";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
