//! Tests for `StatusNotifier` and target handling.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::Level;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{
    EnvTargets, HttpClient, HttpError, HttpRequest, HttpResponse, StaticTargets, StatusNotifier,
    TargetSource, TracingLog, TransportClient, TransportConfig, TriggerError, TriggerFields,
    TriggerLog, parse_targets, trigger,
};

/// Mock client answering by host: `fail` gets 500, `down` a connection
/// error, `hang` never answers, anything else 200.
#[derive(Debug, Clone, Default)]
struct ScriptedClient {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedClient {
    fn captured(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for ScriptedClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let host = req.url.host_str().unwrap_or_default().to_string();
        self.requests.lock().unwrap().push(req);

        let status = match host.as_str() {
            "fail" => http::StatusCode::INTERNAL_SERVER_ERROR,
            "down" => {
                return Err(HttpError::Connection(Box::new(std::io::Error::other(
                    "connection refused",
                ))));
            }
            "hang" => std::future::pending().await,
            _ => http::StatusCode::OK,
        };

        Ok(HttpResponse::new(status, http::HeaderMap::new(), vec![]))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Record {
    level: Level,
    message: String,
    target: String,
    instance_name: String,
    error: Option<String>,
}

/// Log sink that keeps every record.
#[derive(Debug, Clone, Default)]
struct CaptureLog {
    records: Arc<Mutex<Vec<Record>>>,
}

impl CaptureLog {
    fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    fn for_target(&self, target: &str) -> Option<Record> {
        self.records().into_iter().find(|r| r.target == target)
    }
}

impl TriggerLog for CaptureLog {
    fn record(&self, level: Level, message: &str, fields: &TriggerFields<'_>) {
        self.records.lock().unwrap().push(Record {
            level,
            message: message.to_string(),
            target: fields.target.to_string(),
            instance_name: fields.instance_name.to_string(),
            error: fields.error.map(ToString::to_string),
        });
    }
}

/// Target source that hands out a fixed sequence of lists, one per read.
#[derive(Debug, Clone, Default)]
struct SequenceSource {
    lists: Arc<Mutex<VecDeque<Option<String>>>>,
    reads: Arc<AtomicUsize>,
}

impl SequenceSource {
    fn new<const N: usize>(lists: [Option<&str>; N]) -> Self {
        Self {
            lists: Arc::new(Mutex::new(
                lists.into_iter().map(|l| l.map(str::to_string)).collect(),
            )),
            reads: Arc::default(),
        }
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl TargetSource for SequenceSource {
    fn raw_targets(&self) -> Option<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.lists.lock().unwrap().pop_front().flatten()
    }
}

fn notifier(
    targets: &str,
) -> (
    StatusNotifier<ScriptedClient, StaticTargets, CaptureLog>,
    ScriptedClient,
    CaptureLog,
) {
    let client = ScriptedClient::default();
    let log = CaptureLog::default();
    let notifier = StatusNotifier::new(client.clone())
        .with_source(StaticTargets::new(targets))
        .with_log(log.clone());
    (notifier, client, log)
}

mod targets {
    use super::*;

    #[test]
    fn parse_splits_and_trims() {
        assert_eq!(
            parse_targets("http://a/hook, http://b/hook ,http://c/hook"),
            vec!["http://a/hook", "http://b/hook", "http://c/hook"]
        );
    }

    #[test]
    fn parse_keeps_duplicates_and_empty_entries() {
        assert_eq!(
            parse_targets("http://a/hook,,http://a/hook, "),
            vec!["http://a/hook", "", "http://a/hook", ""]
        );
    }

    #[test]
    fn parse_empty_yields_nothing() {
        assert!(parse_targets("").is_empty());
    }

    #[test]
    fn static_targets_return_configured_list() {
        assert_eq!(
            StaticTargets::new("http://a/hook").raw_targets().as_deref(),
            Some("http://a/hook")
        );
        assert!(StaticTargets::none().raw_targets().is_none());
    }

    #[test]
    fn env_targets_default_to_status_changed_trigger() {
        assert_eq!(EnvTargets::default().var(), "STATUS_CHANGED_TRIGGER");
    }

    #[test]
    fn env_targets_read_the_process_environment() {
        let source = EnvTargets::new("PATH");

        assert_eq!(source.raw_targets(), std::env::var("PATH").ok());
    }

    #[test]
    fn env_targets_unset_variable_is_none() {
        assert!(EnvTargets::new("STATUS_HOOK_TEST_NEVER_SET")
            .raw_targets()
            .is_none());
    }

    #[test]
    fn boxed_source_delegates() {
        let source: Box<dyn TargetSource> = Box::new(StaticTargets::new("http://a/hook"));

        assert_eq!(source.raw_targets().as_deref(), Some("http://a/hook"));
    }
}

mod trigger_error {
    use super::*;

    #[test]
    fn unexpected_status_message_names_target_and_code() {
        let error = TriggerError::UnexpectedStatus {
            target: "http://a/hook".to_string(),
            status: http::StatusCode::INTERNAL_SERVER_ERROR,
        };

        assert_eq!(
            error.to_string(),
            "invalid trigger request to target `http://a/hook`, code is `500`"
        );
    }

    #[test]
    fn http_error_is_transparent() {
        let error = TriggerError::from(HttpError::Timeout);

        assert_eq!(error.to_string(), "Request timed out");
    }
}

mod single_trigger {
    use super::*;

    #[tokio::test]
    async fn sends_put_with_instance_and_namespace() {
        let client = ScriptedClient::default();

        trigger(&client, "http://a/hook", "abc", "ns1").await.unwrap();

        let captured = client.captured();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].method, http::Method::PUT);
        assert_eq!(
            captured[0].url.as_str(),
            "http://a/hook?instanceName=abc&namespace=ns1"
        );
        assert!(captured[0].body.is_none());
    }

    #[tokio::test]
    async fn non_200_is_unexpected_status() {
        let client = ScriptedClient::default();

        let result = trigger(&client, "http://fail/hook", "abc", "ns1").await;

        match result {
            Err(TriggerError::UnexpectedStatus { target, status }) => {
                assert_eq!(target, "http://fail/hook");
                assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("Expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_target_fails_without_sending() {
        let client = ScriptedClient::default();

        let result = trigger(&client, "", "abc", "ns1").await;

        assert!(matches!(
            result,
            Err(TriggerError::Http(HttpError::InvalidRequest { .. }))
        ));
        assert!(client.captured().is_empty());
    }
}

mod fan_out {
    use super::*;

    #[tokio::test]
    async fn absent_configuration_sends_nothing() {
        let client = ScriptedClient::default();
        let log = CaptureLog::default();
        let notifier = StatusNotifier::new(client.clone())
            .with_source(StaticTargets::none())
            .with_log(log.clone());

        let dispatch = notifier.notify_status_changed("abc", "ns1");

        assert!(dispatch.is_empty());
        dispatch.wait().await;
        assert!(client.captured().is_empty());
        assert!(log.records().is_empty());
    }

    #[tokio::test]
    async fn empty_configuration_sends_nothing() {
        let (notifier, client, log) = notifier("");

        let dispatch = notifier.notify_status_changed("abc", "ns1");

        assert_eq!(dispatch.len(), 0);
        dispatch.wait().await;
        assert!(client.captured().is_empty());
        assert!(log.records().is_empty());
    }

    #[tokio::test]
    async fn unset_environment_variable_sends_nothing() {
        let client = ScriptedClient::default();
        let notifier = StatusNotifier::new(client.clone())
            .with_source(EnvTargets::new("STATUS_HOOK_TEST_NEVER_SET"))
            .with_log(CaptureLog::default());

        let dispatch = notifier.notify_status_changed("abc", "ns1");

        assert!(dispatch.is_empty());
        assert!(client.captured().is_empty());
    }

    #[tokio::test]
    async fn source_is_read_on_every_notification() {
        let source = SequenceSource::new([
            None,
            Some("http://a/hook"),
            Some("http://b/hook, http://c/hook"),
        ]);
        let client = ScriptedClient::default();
        let notifier = StatusNotifier::new(client.clone())
            .with_source(source.clone())
            .with_log(CaptureLog::default());

        assert!(notifier.notify_status_changed("abc", "ns1").is_empty());
        notifier.notify_status_changed("abc", "ns1").wait().await;
        notifier.notify_status_changed("abc", "ns1").wait().await;

        assert_eq!(source.reads(), 3);
        let mut hosts: Vec<String> = client
            .captured()
            .iter()
            .filter_map(|req| req.url.host_str().map(ToString::to_string))
            .collect();
        hosts.sort();
        assert_eq!(hosts, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn every_target_gets_its_own_put() {
        let (notifier, client, log) = notifier("http://a/hook, http://b/hook");

        let dispatch = notifier.notify_status_changed("abc", "ns1");
        assert_eq!(dispatch.len(), 2);
        dispatch.wait().await;

        let mut urls: Vec<String> = client
            .captured()
            .iter()
            .inspect(|req| assert_eq!(req.method, http::Method::PUT))
            .map(|req| req.url.to_string())
            .collect();
        urls.sort();
        assert_eq!(
            urls,
            vec![
                "http://a/hook?instanceName=abc&namespace=ns1",
                "http://b/hook?instanceName=abc&namespace=ns1",
            ]
        );

        for target in ["http://a/hook", "http://b/hook"] {
            let record = log.for_target(target).unwrap();
            assert_eq!(record.level, Level::INFO);
            assert_eq!(record.instance_name, "abc");
            assert!(record.error.is_none());
        }
    }

    #[tokio::test]
    async fn failing_target_is_logged_and_isolated() {
        let (notifier, client, log) = notifier("http://fail/hook,http://ok/hook");

        notifier.notify_status_changed("abc", "ns1").wait().await;

        assert_eq!(client.captured().len(), 2);

        let failed = log.for_target("http://fail/hook").unwrap();
        assert_eq!(failed.level, Level::ERROR);
        assert_eq!(failed.instance_name, "abc");
        let error = failed.error.unwrap();
        assert!(error.contains("http://fail/hook"));
        assert!(error.contains("500"));

        let delivered = log.for_target("http://ok/hook").unwrap();
        assert_eq!(delivered.level, Level::INFO);
    }

    #[tokio::test]
    async fn network_failure_is_logged() {
        let (notifier, _client, log) = notifier("http://down/hook");

        notifier.notify_status_changed("abc", "ns1").wait().await;

        let record = log.for_target("http://down/hook").unwrap();
        assert_eq!(record.level, Level::ERROR);
        assert!(record.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn empty_entry_is_attempted_and_logged() {
        let (notifier, client, log) = notifier("http://a/hook,,http://b/hook");

        let dispatch = notifier.notify_status_changed("abc", "ns1");
        assert_eq!(dispatch.len(), 3);
        dispatch.wait().await;

        assert_eq!(client.captured().len(), 2);
        assert_eq!(log.records().len(), 3);
        assert_eq!(log.for_target("").unwrap().level, Level::ERROR);
    }

    #[tokio::test]
    async fn duplicate_targets_are_each_notified() {
        let (notifier, client, _log) = notifier("http://a/hook,http://a/hook");

        notifier.notify_status_changed("abc", "ns1").wait().await;

        assert_eq!(client.captured().len(), 2);
    }

    #[tokio::test]
    async fn hung_target_does_not_block_caller_or_others() {
        let (notifier, _client, log) = notifier("http://hang/hook,http://ok/hook");

        // Returns without awaiting anything.
        let dispatch = notifier.notify_status_changed("abc", "ns1");
        assert_eq!(dispatch.len(), 2);

        tokio::time::timeout(Duration::from_secs(5), async {
            while log.for_target("http://ok/hook").is_none() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("healthy target should be notified");

        assert!(log.for_target("http://hang/hook").is_none());
        drop(dispatch);
    }

    #[tokio::test]
    async fn tracing_log_accepts_every_level() {
        let error = TriggerError::from(HttpError::Timeout);
        let fields = TriggerFields {
            target: "http://a/hook",
            instance_name: "abc",
            error: Some(&error),
        };

        for level in [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE] {
            TracingLog.record(level, "message", &fields);
        }
    }
}

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn notifies_real_servers_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/ok"))
            .and(query_param("instanceName", "abc"))
            .and(query_param("namespace", "ns1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let ok = format!("{}/ok", server.uri());
        let broken = format!("{}/broken", server.uri());
        let log = CaptureLog::default();
        let notifier = StatusNotifier::new(TransportClient::new(TransportConfig::new(
            Duration::from_secs(5),
        )))
        .with_source(StaticTargets::new(format!("{ok}, {broken}")))
        .with_log(log.clone());

        notifier.notify_status_changed("abc", "ns1").wait().await;

        assert_eq!(log.for_target(&ok).unwrap().level, Level::INFO);
        let failed = log.for_target(&broken).unwrap();
        assert_eq!(failed.level, Level::ERROR);
        assert!(failed.error.unwrap().contains("code is `500`"));
    }
}
