//! Application execution logic.
//!
//! Runs the `notify` and `request` subcommands against the validated
//! configuration.

use thiserror::Error;

use status_hook::config::{
    Command, ConfigError, NotifyArgs, RequestArgs, RequestOptions, ValidatedConfig,
};
use status_hook::webhook::{
    HttpError, HttpResponse, RequestHelper, StatusNotifier, TransportClient, carries_body,
    encode_json,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Subcommand arguments were invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP request failed.
    #[error("Request failed: {0}")]
    Http(#[from] HttpError),
}

impl RunError {
    /// Returns true if the failure stems from invalid input rather than the network.
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Http(HttpError::InvalidRequest { .. } | HttpError::Serialization(_))
        )
    }
}

/// Executes one subcommand.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or, for `request`,
/// if the exchange fails. `notify` never fails: per-target failures
/// are only logged.
pub async fn execute(command: Command, config: ValidatedConfig) -> Result<(), RunError> {
    match command {
        Command::Notify(args) => {
            notify(&args, config).await;
            Ok(())
        }
        Command::Request(args) => {
            let response = request(&args, config).await?;
            print_response(&response);
            Ok(())
        }
        // Handled before configuration is loaded
        Command::Init { .. } => Ok(()),
    }
}

/// Notifies every configured target and waits for all of them.
async fn notify(args: &NotifyArgs, config: ValidatedConfig) {
    let notifier = StatusNotifier::new(TransportClient::new(config.transport))
        .with_source(config.targets.source());

    let dispatch = notifier.notify_status_changed(&args.instance_name, &args.namespace);

    if dispatch.is_empty() {
        tracing::info!("No status change targets configured; nothing to notify");
        return;
    }

    tracing::info!(
        instance.Name = %args.instance_name,
        namespace = %args.namespace,
        "Notifying {} target(s)",
        dispatch.len()
    );

    // The process must not exit before the notifications finish.
    dispatch.wait().await;
}

/// Sends the request described by `args`.
async fn request(args: &RequestArgs, config: ValidatedConfig) -> Result<HttpResponse, RunError> {
    let options = RequestOptions::from_args(args)?;

    let mut helper = RequestHelper::new(config.transport);
    if let Some(auth) = options.auth {
        helper = helper.with_basic_auth(auth);
    }

    let body = if carries_body(&options.method) {
        encode_json(options.body.as_ref())?
    } else {
        if options.body.is_some() {
            tracing::warn!("Ignoring body for {} request", options.method);
        }
        None
    };

    let response = helper
        .send_raw(
            options.method,
            &options.url,
            body,
            Some(&options.params),
            Some(&options.headers),
        )
        .await?;

    Ok(response)
}

fn print_response(response: &HttpResponse) {
    println!("{}", response.status);
    if !response.body.is_empty() {
        println!("{}", String::from_utf8_lossy(&response.body));
    }
}
