//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Outbound transport section
    #[serde(default)]
    pub transport: TransportSection,

    /// Status-change trigger section
    #[serde(default)]
    pub trigger: TriggerSection,
}

/// Outbound transport section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransportSection {
    /// Connect/read timeout in seconds
    pub timeout: Option<u64>,

    /// PEM CA bundle used to validate servers
    pub ca_bundle: Option<String>,
}

/// Status-change trigger section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerSection {
    /// Comma-separated target URLs
    pub targets: Option<String>,

    /// Environment variable consulted when `targets` is not set
    pub env_var: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# status-hook configuration file

[transport]
# Connect/read timeout in seconds (default: 30).
# A whole request/response exchange is bounded by twice this value.
# timeout = 30

# PEM CA bundle used to validate servers.
# When unset, server certificates are NOT verified.
# ca_bundle = "/etc/status-hook/ca.pem"

[trigger]
# Comma-separated target URLs notified on status changes.
# When unset, the list is read from the environment variable below.
# targets = "http://a.example/hook, http://b.example/hook"

# Environment variable holding the target list (default: STATUS_CHANGED_TRIGGER)
# env_var = "STATUS_CHANGED_TRIGGER"
"#
    .to_string()
}
