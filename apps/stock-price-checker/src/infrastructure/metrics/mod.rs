//! Prometheus Metrics Module
//!
//! Exposes application metrics via Prometheus format for monitoring.
//!
//! # Metrics Categories
//!
//! - **Lookups**: Requests by symbol count
//! - **Quotes**: Fetch latency and failures by kind
//! - **Likes**: Newly recorded likes and storage failures
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the HTTP server.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// Safe to call more than once; later calls return the first handle.
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if metrics::set_global_recorder(recorder).is_err() {
                tracing::warn!("Global metrics recorder already installed");
            }

            register_metrics();
            handle
        })
        .clone()
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        "stock_checker_lookups_total",
        "Total stock price lookups by number of symbols"
    );
    describe_counter!(
        "stock_checker_quote_errors_total",
        "Total failed quote fetches by kind"
    );
    describe_counter!(
        "stock_checker_likes_recorded_total",
        "Total new likes recorded"
    );
    describe_counter!(
        "stock_checker_storage_errors_total",
        "Total stock storage failures"
    );
    describe_histogram!(
        "stock_checker_quote_fetch_seconds",
        "Latency of quote proxy requests"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Metric labels for quote fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteErrorKind {
    /// Connection failure or timeout.
    Network,
    /// Non-success HTTP status.
    Status,
    /// Body could not be decoded.
    Decode,
    /// Payload had no usable price.
    MissingPrice,
    /// Upstream reported its own error.
    Upstream,
    /// Request URL could not be built.
    InvalidUrl,
}

impl QuoteErrorKind {
    /// Label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Status => "status",
            Self::Decode => "decode",
            Self::MissingPrice => "missing_price",
            Self::Upstream => "upstream",
            Self::InvalidUrl => "invalid_url",
        }
    }
}

/// Record a lookup request.
pub fn record_lookup(arity: &'static str) {
    counter!("stock_checker_lookups_total", "arity" => arity).increment(1);
}

/// Record a failed quote fetch.
pub fn record_quote_error(kind: QuoteErrorKind) {
    counter!("stock_checker_quote_errors_total", "kind" => kind.as_str()).increment(1);
}

/// Record a newly added like.
pub fn record_like() {
    counter!("stock_checker_likes_recorded_total").increment(1);
}

/// Record a storage failure.
pub fn record_storage_error() {
    counter!("stock_checker_storage_errors_total").increment(1);
}

/// Record quote proxy request latency.
pub fn record_quote_fetch_duration(duration: Duration) {
    histogram!("stock_checker_quote_fetch_seconds").record(duration.as_secs_f64());
}

// =============================================================================
// Tests
// =============================================================================
