//! Configuration layer for status-hook.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`], [`RequestOptions`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The trigger target list is special: an explicit list (CLI `--targets`
//! or `trigger.targets`) wins; otherwise the list is read from an
//! environment variable (`STATUS_CHANGED_TRIGGER` unless renamed) each
//! time a notification is sent. An unset or empty variable disables
//! notification without error.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;

pub use cli::{Cli, Command, NotifyArgs, RequestArgs};
pub use error::{ConfigError, field};
pub use self::toml::{TomlConfig, default_config_template};
pub use validated::{RequestOptions, TargetsSetting, ValidatedConfig, write_default_config};
