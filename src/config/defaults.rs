//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default connect/read timeout in seconds. Whole exchanges get twice this.
pub const TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the comma-separated trigger targets.
pub const TRIGGER_ENV_VAR: &str = "STATUS_CHANGED_TRIGGER";

/// Default output path for `init`.
pub const CONFIG_FILE: &str = "status-hook.toml";

/// Default timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}
