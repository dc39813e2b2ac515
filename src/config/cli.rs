//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::defaults;

/// status-hook: outbound HTTP helper and status-change trigger
///
/// Sends one-off HTTP requests and notifies configured webhook
/// targets when an instance's status changes.
#[derive(Debug, Parser)]
#[command(name = "status-hook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Connect/read timeout in seconds (whole exchange is bounded by twice this)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// PEM CA bundle used to validate servers (default: no verification)
    #[arg(long = "ca-bundle", value_name = "PATH", global = true)]
    pub ca_bundle: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for status-hook
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Notify every configured target that an instance's status changed
    Notify(NotifyArgs),

    /// Send a single HTTP request and print the response
    Request(RequestArgs),

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

/// Arguments for `notify`.
#[derive(Debug, Clone, Args)]
pub struct NotifyArgs {
    /// Name of the instance whose status changed
    #[arg(long = "instance")]
    pub instance_name: String,

    /// Namespace of the instance
    #[arg(long)]
    pub namespace: String,

    /// Comma-separated target URLs (overrides config file and environment)
    #[arg(long)]
    pub targets: Option<String>,

    /// Environment variable holding the target list
    #[arg(long = "env-var", value_name = "NAME")]
    pub env_var: Option<String>,
}

/// Arguments for `request`.
#[derive(Debug, Clone, Args)]
pub struct RequestArgs {
    /// HTTP method (GET, DELETE, POST, PUT, PATCH)
    pub method: String,

    /// Target URL
    pub url: String,

    /// Query parameter in 'Key=Value' format (repeat for more; names must be unique)
    #[arg(long = "param", value_name = "K=V")]
    pub params: Vec<String>,

    /// HTTP header in 'Key=Value' or 'Key: Value' format (repeat for more; names must be unique)
    #[arg(long = "header", value_name = "K=V")]
    pub headers: Vec<String>,

    /// JSON request body (POST, PUT and PATCH only)
    #[arg(long)]
    pub body: Option<String>,

    /// User name for basic authentication
    #[arg(long = "basic-user")]
    pub basic_user: Option<String>,

    /// Password for basic authentication
    #[arg(long = "basic-password")]
    pub basic_password: Option<String>,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
