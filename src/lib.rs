//! status-hook: outbound HTTP helper and status-change trigger
//!
//! A library for issuing one-off HTTP requests (optionally validated
//! against a CA bundle) and for notifying external webhook targets
//! when an instance's status changes.

pub mod config;
pub mod webhook;
