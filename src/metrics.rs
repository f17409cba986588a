//! Prometheus metrics for ingest throughput and latency.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Ingest requests received counter metric name.
pub const METRIC_INGEST_REQUESTS: &str = "ingest_requests_total";
/// Ingest requests rejected with `Invalid Format` counter metric name.
pub const METRIC_INGEST_REJECTED: &str = "ingest_rejected_total";
/// Ingest requests that failed during processing counter metric name.
pub const METRIC_INGEST_FAILED: &str = "ingest_failed_total";
/// Readings appended to the store counter metric name.
pub const METRIC_READINGS_INGESTED: &str = "readings_ingested_total";
/// Ingest handler latency metric name.
pub const METRIC_INGEST_LATENCY: &str = "ingest_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_INGEST_LATENCY,
        "Time to decode, stamp and store a batch in milliseconds"
    );

    describe_counter!(
        METRIC_INGEST_REQUESTS,
        "Total number of ingest requests received"
    );
    describe_counter!(
        METRIC_INGEST_REJECTED,
        "Total number of ingest requests rejected as Invalid Format"
    );
    describe_counter!(
        METRIC_INGEST_FAILED,
        "Total number of ingest requests that failed during processing"
    );
    describe_counter!(
        METRIC_READINGS_INGESTED,
        "Total number of readings appended to the store"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return its render handle.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Increment ingest requests counter.
pub fn inc_ingest_requests() {
    counter!(METRIC_INGEST_REQUESTS).increment(1);
}

/// Increment rejected ingest counter.
pub fn inc_ingest_rejected() {
    counter!(METRIC_INGEST_REJECTED).increment(1);
}

/// Increment failed ingest counter.
pub fn inc_ingest_failed() {
    counter!(METRIC_INGEST_FAILED).increment(1);
}

/// Add to the stored readings counter.
pub fn add_readings_ingested(count: usize) {
    counter!(METRIC_READINGS_INGESTED).increment(count as u64);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for an ingest request.
pub fn timer_ingest() -> LatencyTimer {
    LatencyTimer::new(METRIC_INGEST_LATENCY)
}
