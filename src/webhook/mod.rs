//! Webhook layer for sending HTTP requests to external services.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`]) and reading responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Transport settings with optional CA validation ([`TransportConfig`], [`TlsMode`])
//! - Production clients ([`ReqwestClient`], [`TransportClient`])
//! - One-off GET/DELETE/POST/PUT/PATCH calls ([`RequestHelper`])
//! - Status-change fan-out to configured targets ([`StatusNotifier`])

mod client;
mod error;
mod helper;
mod http;
mod transport;
mod trigger;

#[cfg(test)]
mod trigger_tests;

pub use client::{ReqwestClient, TransportClient};
pub use error::{HttpError, TriggerError};
pub use helper::{
    BasicAuth, RequestHelper, build_request, carries_body, encode_json, parse_method,
};
pub use self::http::{
    CONTENT_TYPE_JSON, CONTENT_TYPE_JSON_PATCH, Headers, HttpClient, HttpRequest, HttpResponse,
    Params,
};
pub use transport::{TlsMode, TransportConfig};
pub use trigger::{
    Dispatch, EnvTargets, INSTANCE_NAME_PARAM, NAMESPACE_PARAM, StaticTargets, StatusNotifier,
    TargetSource, TracingLog, TriggerFields, TriggerLog, parse_targets, trigger,
};
