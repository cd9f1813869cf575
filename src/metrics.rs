//! Request metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding binary installs a recorder.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

use crate::api::Method;

/// Requests issued counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// Failed requests counter metric name.
pub const METRIC_HTTP_REQUEST_FAILURES: &str = "http_request_failures_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of backend requests issued");
    describe_counter!(
        METRIC_HTTP_REQUEST_FAILURES,
        "Total number of backend requests that failed"
    );
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "Backend request latency in milliseconds"
    );

    debug!("Metrics descriptions registered");
}

/// Count a request as issued.
pub fn record_request(method: Method) {
    counter!(METRIC_HTTP_REQUESTS, "method" => method.to_string()).increment(1);
}

/// Count a request as failed.
pub fn record_failure(method: Method) {
    counter!(METRIC_HTTP_REQUEST_FAILURES, "method" => method.to_string()).increment(1);
}

/// Record how long a request took, cancelled ones included.
pub fn record_latency(method: Method, elapsed: Duration) {
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "method" => method.to_string())
        .record(elapsed.as_secs_f64() * 1000.0);
}
