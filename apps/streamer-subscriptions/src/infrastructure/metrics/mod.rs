//! Metrics Module
//!
//! Records handle lifecycle metrics through the `metrics` facade. Installing
//! a recorder (Prometheus or otherwise) is left to the embedding process;
//! without one every call here is a no-op.
//!
//! # Metrics
//!
//! - `streamer_subs_handles_created_total{kind}`
//! - `streamer_subs_handles_destroyed_total{kind}`
//! - `streamer_subs_handles_live`
//! - `streamer_subs_rejected_total{operation, error}`

use std::sync::Once;

use metrics::{counter, describe_counter, describe_gauge, gauge};

use crate::application::bridge::ErrorKind;
use crate::domain::subscription::SubscriptionKind;

static REGISTER: Once = Once::new();

/// Describe every metric with the installed recorder.
///
/// Call after installing a recorder. Later calls do nothing.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        describe_counter!(
            "streamer_subs_handles_created_total",
            "Subscription handles created, by kind"
        );
        describe_counter!(
            "streamer_subs_handles_destroyed_total",
            "Subscription handles destroyed, by kind"
        );
        describe_gauge!(
            "streamer_subs_handles_live",
            "Subscription handles currently live"
        );
        describe_counter!(
            "streamer_subs_rejected_total",
            "Bridge calls that failed, by operation and error kind"
        );
    });
}

/// Record a successful create.
pub fn record_created(kind: SubscriptionKind) {
    counter!(
        "streamer_subs_handles_created_total",
        "kind" => kind.name()
    )
    .increment(1);
}

/// Record a successful destroy.
pub fn record_destroyed(kind: SubscriptionKind) {
    counter!(
        "streamer_subs_handles_destroyed_total",
        "kind" => kind.name()
    )
    .increment(1);
}

/// Update the live handle gauge.
#[allow(clippy::cast_precision_loss)]
pub fn set_live_handles(count: usize) {
    gauge!("streamer_subs_handles_live").set(count as f64);
}

/// Record a failed bridge call.
pub fn record_rejected(operation: &'static str, error: ErrorKind) {
    counter!(
        "streamer_subs_rejected_total",
        "operation" => operation,
        "error" => error.as_str()
    )
    .increment(1);
}
