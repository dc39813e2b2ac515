//! Status-change notification fan-out.
//!
//! When an instance changes status, every configured target receives
//! `PUT <target>?instanceName=<name>&namespace=<namespace>`. Each target
//! is handled by its own task; the caller never waits and never sees
//! a failure. Outcomes go to a [`TriggerLog`].

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::Level;

use crate::config::defaults;

use super::{HttpClient, HttpError, HttpRequest, TriggerError};

/// Query parameter carrying the instance name.
pub const INSTANCE_NAME_PARAM: &str = "instanceName";

/// Query parameter carrying the namespace.
pub const NAMESPACE_PARAM: &str = "namespace";

/// Supplies the raw, comma-separated target list.
///
/// The list is read on every notification, never cached.
pub trait TargetSource: Send + Sync {
    /// Returns the configured list, or `None` when nothing is configured.
    fn raw_targets(&self) -> Option<String>;
}

impl<T: TargetSource + ?Sized> TargetSource for Box<T> {
    fn raw_targets(&self) -> Option<String> {
        (**self).raw_targets()
    }
}

/// Reads the target list from an environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvTargets {
    var: String,
}

impl EnvTargets {
    /// Reads targets from the named variable.
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable consulted.
    #[must_use]
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvTargets {
    fn default() -> Self {
        Self::new(defaults::TRIGGER_ENV_VAR)
    }
}

impl TargetSource for EnvTargets {
    fn raw_targets(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

/// A fixed target list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticTargets(Option<String>);

impl StaticTargets {
    /// Uses `list` as the comma-separated target list.
    #[must_use]
    pub fn new(list: impl Into<String>) -> Self {
        Self(Some(list.into()))
    }

    /// No targets configured.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }
}

impl TargetSource for StaticTargets {
    fn raw_targets(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Splits a comma-separated target list.
///
/// Entries are trimmed but neither deduplicated nor dropped when empty;
/// an empty input yields no targets.
#[must_use]
pub fn parse_targets(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|t| t.trim().to_string()).collect()
}

/// Fields attached to every trigger log record.
#[derive(Debug, Clone, Copy)]
pub struct TriggerFields<'a> {
    /// Target URL as configured
    pub target: &'a str,
    /// Instance whose status changed
    pub instance_name: &'a str,
    /// Failure, if any
    pub error: Option<&'a TriggerError>,
}

/// Sink for trigger outcomes.
pub trait TriggerLog: Send + Sync {
    /// Records one outcome.
    fn record(&self, level: Level, message: &str, fields: &TriggerFields<'_>);
}

/// [`TriggerLog`] that forwards to `tracing`.
///
/// Records carry the fields `trigger.target` and `instance.Name`,
/// plus `error` on failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl TriggerLog for TracingLog {
    fn record(&self, level: Level, message: &str, fields: &TriggerFields<'_>) {
        let error = fields.error.map(tracing::field::display);
        if level == Level::ERROR {
            tracing::error!(
                trigger.target = fields.target,
                instance.Name = fields.instance_name,
                error,
                "{message}"
            );
        } else if level == Level::WARN {
            tracing::warn!(
                trigger.target = fields.target,
                instance.Name = fields.instance_name,
                error,
                "{message}"
            );
        } else if level == Level::INFO {
            tracing::info!(
                trigger.target = fields.target,
                instance.Name = fields.instance_name,
                error,
                "{message}"
            );
        } else {
            tracing::debug!(
                trigger.target = fields.target,
                instance.Name = fields.instance_name,
                error,
                "{message}"
            );
        }
    }
}

/// Handles of the tasks started by one notification.
///
/// Dropping this detaches the tasks; they keep running to completion.
#[derive(Debug, Default)]
pub struct Dispatch {
    handles: Vec<JoinHandle<()>>,
}

impl Dispatch {
    /// Number of targets notified.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns true if no target was notified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits until every dispatched notification has finished.
    pub async fn wait(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::warn!("Trigger task did not complete: {e}");
            }
        }
    }
}

/// Notifies external targets that an instance's status changed.
///
/// # Type Parameters
///
/// - `H`: HTTP client used for every trigger request
/// - `S`: where the target list comes from (defaults to [`EnvTargets`])
/// - `L`: where outcomes are recorded (defaults to [`TracingLog`])
///
/// # Example
///
/// ```no_run
/// use status_hook::webhook::{StatusNotifier, TransportClient};
///
/// # #[tokio::main]
/// # async fn main() {
/// let notifier = StatusNotifier::new(TransportClient::default());
/// notifier.notify_status_changed("db-0", "prod");
/// # }
/// ```
#[derive(Debug)]
pub struct StatusNotifier<H, S = EnvTargets, L = TracingLog> {
    client: Arc<H>,
    source: S,
    log: Arc<L>,
}

impl<H> StatusNotifier<H, EnvTargets, TracingLog> {
    /// Creates a notifier reading `STATUS_CHANGED_TRIGGER` and logging via `tracing`.
    #[must_use]
    pub fn new(client: H) -> Self {
        Self {
            client: Arc::new(client),
            source: EnvTargets::default(),
            log: Arc::new(TracingLog),
        }
    }
}

impl<H, S, L> StatusNotifier<H, S, L> {
    /// Replaces the target source.
    #[must_use]
    pub fn with_source<S2>(self, source: S2) -> StatusNotifier<H, S2, L> {
        StatusNotifier {
            client: self.client,
            source,
            log: self.log,
        }
    }

    /// Replaces the outcome sink.
    #[must_use]
    pub fn with_log<L2>(self, log: L2) -> StatusNotifier<H, S, L2> {
        StatusNotifier {
            client: self.client,
            source: self.source,
            log: Arc::new(log),
        }
    }

    /// Returns the target source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }
}

impl<H, S, L> StatusNotifier<H, S, L>
where
    H: HttpClient + 'static,
    S: TargetSource,
    L: TriggerLog + 'static,
{
    /// Starts one trigger per configured target and returns immediately.
    ///
    /// With no configured targets (absent or empty list) nothing is sent.
    /// The returned [`Dispatch`] may be dropped; it only exists so callers
    /// that must outlive the notifications (such as a CLI) can wait.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn notify_status_changed(&self, instance_name: &str, namespace: &str) -> Dispatch {
        let Some(raw) = self.source.raw_targets().filter(|raw| !raw.is_empty()) else {
            tracing::debug!("No status change targets configured");
            return Dispatch::default();
        };

        let handles = parse_targets(&raw)
            .into_iter()
            .map(|target| {
                let client = Arc::clone(&self.client);
                let log = Arc::clone(&self.log);
                let instance_name = instance_name.to_string();
                let namespace = namespace.to_string();
                tokio::spawn(async move {
                    let result =
                        trigger(client.as_ref(), &target, &instance_name, &namespace).await;
                    record_outcome(
                        log.as_ref(),
                        &target,
                        &instance_name,
                        result.as_ref().err(),
                    );
                })
            })
            .collect();

        Dispatch { handles }
    }
}

/// Sends a single trigger request and checks for 200 OK.
///
/// # Errors
///
/// Returns [`TriggerError::Http`] if the URL is malformed or the exchange
/// fails, and [`TriggerError::UnexpectedStatus`] for any status but 200.
pub async fn trigger<H: HttpClient>(
    client: &H,
    target: &str,
    instance_name: &str,
    namespace: &str,
) -> Result<(), TriggerError> {
    let url = url::Url::parse(target)
        .map_err(|e| HttpError::invalid(format!("invalid URL '{target}': {e}")))?;

    let request = HttpRequest::put(url)
        .with_query(INSTANCE_NAME_PARAM, instance_name)
        .with_query(NAMESPACE_PARAM, namespace);

    let response = client.request(request).await?;
    if response.is_ok() {
        return Ok(());
    }

    Err(TriggerError::UnexpectedStatus {
        target: target.to_string(),
        status: response.status,
    })
}

fn record_outcome<L: TriggerLog + ?Sized>(
    log: &L,
    target: &str,
    instance_name: &str,
    error: Option<&TriggerError>,
) {
    let fields = TriggerFields {
        target,
        instance_name,
        error,
    };
    if error.is_some() {
        log.record(Level::ERROR, "Status change trigger failed", &fields);
    } else {
        log.record(Level::INFO, "Status change trigger succeeded", &fields);
    }
}
