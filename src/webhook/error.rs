//! Error types for HTTP and trigger operations.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong without dictating recovery strategy.
/// Nothing in this crate retries; callers decide what to do.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request body could not be encoded as JSON.
    #[error("Failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The request could not be constructed.
    ///
    /// Covers unparsable URLs, empty methods and invalid header
    /// names or values. This indicates a caller error rather than
    /// a transient failure.
    #[error("Invalid request: {reason}")]
    InvalidRequest {
        /// Why the request was rejected
        reason: String,
    },

    /// The CA bundle for a TLS transport could not be loaded.
    #[error("Failed to load CA bundle '{}': {reason}", path.display())]
    Tls {
        /// Path to the PEM bundle
        path: PathBuf,
        /// Reason for the failure
        reason: String,
    },

    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// TLS handshake failures and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,
}

impl HttpError {
    /// Creates an `InvalidRequest` error.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Returns true for failures of the exchange itself (connect, TLS, timeout).
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }
}

/// Error produced by a single status-change trigger.
///
/// These never reach the caller of
/// [`StatusNotifier::notify_status_changed`](super::StatusNotifier::notify_status_changed);
/// they are handed to the configured [`TriggerLog`](super::TriggerLog).
#[derive(Debug, Error)]
pub enum TriggerError {
    /// The request could not be built or the exchange failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The target answered with something other than 200 OK.
    #[error("invalid trigger request to target `{target}`, code is `{}`", status.as_u16())]
    UnexpectedStatus {
        /// Target URL as configured
        target: String,
        /// Status code returned by the target
        status: http::StatusCode,
    },
}
