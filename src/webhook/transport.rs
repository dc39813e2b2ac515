//! Transport configuration and client construction.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::defaults;

use super::HttpError;

/// How server certificates are checked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// Server certificates are not verified.
    #[default]
    Insecure,
    /// Server certificates must chain to a CA in this PEM bundle.
    ///
    /// Only the bundle is trusted; the platform roots are not consulted.
    CaBundle(PathBuf),
}

/// Settings used to build a client for one outbound request.
///
/// The value is cheap to clone and carries no connection state; every
/// call to [`TransportConfig::build_client`] produces a fresh client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Connect and read timeout; the whole exchange is bounded by twice this.
    pub timeout: Duration,
    /// Certificate verification mode
    pub tls: TlsMode,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: defaults::timeout(),
            tls: TlsMode::Insecure,
        }
    }
}

impl TransportConfig {
    /// Creates an insecure transport with the given timeout.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            tls: TlsMode::Insecure,
        }
    }

    /// Validates server certificates against the PEM bundle at `path`.
    #[must_use]
    pub fn with_ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls = TlsMode::CaBundle(path.into());
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Upper bound for a whole request/response exchange.
    #[must_use]
    pub const fn overall_timeout(&self) -> Duration {
        self.timeout.saturating_mul(2)
    }

    /// Builds a `reqwest::Client` for these settings.
    ///
    /// The CA bundle, if any, is read from disk on every call.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Tls`] if the CA bundle cannot be read or
    /// contains no usable certificate, and [`HttpError::InvalidRequest`]
    /// if the client cannot be initialized.
    pub fn build_client(&self) -> Result<reqwest::Client, HttpError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.timeout)
            .read_timeout(self.timeout)
            .timeout(self.overall_timeout());

        builder = match &self.tls {
            TlsMode::Insecure => builder.danger_accept_invalid_certs(true),
            // Only the bundle is trusted
            TlsMode::CaBundle(path) => builder.tls_certs_only(load_ca_bundle(path)?),
        };

        builder
            .build()
            .map_err(|e| HttpError::invalid(format!("failed to build HTTP client: {e}")))
    }
}

fn load_ca_bundle(path: &Path) -> Result<Vec<reqwest::Certificate>, HttpError> {
    let tls_error = |reason: String| HttpError::Tls {
        path: path.to_path_buf(),
        reason,
    };

    let pem = std::fs::read(path).map_err(|e| tls_error(e.to_string()))?;
    let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| tls_error(e.to_string()))?;

    if certs.is_empty() {
        return Err(tls_error("no certificates found".to_string()));
    }

    Ok(certs)
}
