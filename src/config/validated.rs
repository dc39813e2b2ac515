//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use http::Method;

use crate::webhook::{
    BasicAuth, EnvTargets, Headers, Params, StaticTargets, TargetSource, TlsMode,
    TransportConfig, parse_method,
};

use super::cli::{Cli, Command, RequestArgs};
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Where the notifier's target list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetsSetting {
    /// An explicit list from the CLI or config file.
    Explicit(String),
    /// Read from this environment variable at notification time.
    Env(String),
}

impl TargetsSetting {
    /// Builds the matching [`TargetSource`].
    #[must_use]
    pub fn source(&self) -> Box<dyn TargetSource> {
        match self {
            Self::Explicit(list) => Box::new(StaticTargets::new(list.clone())),
            Self::Env(var) => Box::new(EnvTargets::new(var.clone())),
        }
    }
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Outbound transport settings
    pub transport: TransportConfig,

    /// Trigger target list setting
    pub targets: TargetsSetting,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tls = match &self.transport.tls {
            TlsMode::Insecure => "insecure".to_string(),
            TlsMode::CaBundle(path) => format!("ca:{}", path.display()),
        };
        let targets = match &self.targets {
            TargetsSetting::Explicit(_) => "explicit".to_string(),
            TargetsSetting::Env(var) => format!("env:{var}"),
        };

        write!(
            f,
            "Config {{ timeout: {}s, tls: {}, targets: {} }}",
            self.transport.timeout.as_secs(),
            tls,
            targets,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The timeout is zero
    /// - The target environment variable name is invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let timeout = Self::resolve_timeout(cli, toml)?;

        let tls = Self::resolve_ca_bundle(cli, toml).map_or(TlsMode::Insecure, TlsMode::CaBundle);

        let targets = Self::resolve_targets(cli, toml)?;

        Ok(Self {
            transport: TransportConfig { timeout, tls },
            targets,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.transport.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_ca_bundle(cli: &Cli, toml: Option<&TomlConfig>) -> Option<PathBuf> {
        if let Some(ref path) = cli.ca_bundle {
            return Some(path.clone());
        }

        toml.and_then(|t| t.transport.ca_bundle.as_ref().map(PathBuf::from))
    }

    fn resolve_targets(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<TargetsSetting, ConfigError> {
        let notify = match &cli.command {
            Command::Notify(args) => Some(args),
            _ => None,
        };

        // Priority: CLI list > TOML list > environment
        let explicit = notify
            .and_then(|n| n.targets.clone())
            .or_else(|| toml.and_then(|t| t.trigger.targets.clone()));

        if let Some(list) = explicit {
            return Ok(TargetsSetting::Explicit(list));
        }

        let var = notify
            .and_then(|n| n.env_var.clone())
            .or_else(|| toml.and_then(|t| t.trigger.env_var.clone()))
            .unwrap_or_else(|| defaults::TRIGGER_ENV_VAR.to_string());

        if var.is_empty() || var.contains(['=', '\0']) {
            return Err(ConfigError::InvalidEnvVar(var));
        }

        Ok(TargetsSetting::Env(var))
    }
}

/// A fully parsed `request` invocation.
#[derive(Debug)]
pub struct RequestOptions {
    /// HTTP method
    pub method: Method,
    /// Target URL (validated when the request is built)
    pub url: String,
    /// Query parameters
    pub params: Params,
    /// Extra headers
    pub headers: Headers,
    /// JSON body
    pub body: Option<serde_json::Value>,
    /// Basic credentials
    pub auth: Option<BasicAuth>,
}

impl RequestOptions {
    /// Parses and validates `request` arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the method, a parameter, a header or the body
    /// is malformed, if a parameter or header name is repeated, or if only
    /// half of the basic credentials are given.
    pub fn from_args(args: &RequestArgs) -> Result<Self, ConfigError> {
        let method = parse_method(&args.method)
            .map_err(|_| ConfigError::InvalidMethod(args.method.clone()))?;

        let mut params = Params::new();
        for pair in &args.params {
            let (key, value) = parse_param_string(pair)?;
            if params.contains_key(&key) {
                return Err(ConfigError::DuplicatePair {
                    kind: "query parameter",
                    name: key,
                });
            }
            params.insert(key, value);
        }

        let mut headers = Headers::new();
        for pair in &args.headers {
            let (name, value) = parse_header_string(pair)?;
            // Header names are case-insensitive
            if headers.keys().any(|n| n.eq_ignore_ascii_case(&name)) {
                return Err(ConfigError::DuplicatePair {
                    kind: "header",
                    name,
                });
            }
            headers.insert(name, value);
        }

        let body = args
            .body
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(ConfigError::InvalidBody)?;

        let auth = match (&args.basic_user, &args.basic_password) {
            (Some(user), Some(password)) => Some(BasicAuth::new(user, password)),
            (Some(_), None) => {
                return Err(ConfigError::missing(
                    field::BASIC_PASSWORD,
                    "Use --basic-password together with --basic-user",
                ));
            }
            (None, Some(_)) => {
                return Err(ConfigError::missing(
                    field::BASIC_USER,
                    "Use --basic-user together with --basic-password",
                ));
            }
            (None, None) => None,
        };

        Ok(Self {
            method,
            url: args.url.clone(),
            params,
            headers,
            body,
            auth,
        })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_param_string(s: &str) -> Result<(String, String), ConfigError> {
    s.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| ConfigError::InvalidPair {
            kind: "query parameter",
            value: s.to_string(),
            alt: "",
        })
}

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    let invalid = || ConfigError::InvalidPair {
        kind: "header",
        value: s.to_string(),
        alt: " or 'Key: Value'",
    };

    // Try "Key=Value" format first, then "Key: Value"
    let (name, value) = s
        .split_once('=')
        .or_else(|| s.split_once(':'))
        .ok_or_else(invalid)?;

    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }

    Ok((name.to_string(), value.trim().to_string()))
}
