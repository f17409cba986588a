//! HTTP API handlers.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::ingest::ingest_batch;
use crate::metrics;
use crate::store::ReadingStore;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide reading store.
    pub store: ReadingStore,
    /// Prometheus render handle, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around an empty store.
    pub fn new() -> Self {
        Self {
            store: ReadingStore::new(),
            prometheus: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Successful ingest response.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    /// Always true.
    pub success: bool,
    /// Fixed confirmation text.
    pub message: &'static str,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Ingest handler - stamps and stores a batch of readings.
///
/// Every failure inside is mapped to a JSON `error` body by [`IngestError`].
pub async fn ingest_readings(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<IngestResponse>, IngestError> {
    let _timer = metrics::timer_ingest();
    metrics::inc_ingest_requests();

    let body = body.map_err(|rejection| {
        metrics::inc_ingest_failed();
        warn!(error = %rejection, "Ingest body refused");
        IngestError::from(rejection)
    })?;

    let outcome = ingest_batch(&state.store, &body).await;
    metrics::add_readings_ingested(outcome.appended);

    match outcome.into_result() {
        Ok(count) => {
            debug!(count, "Batch stored");
            Ok(Json(IngestResponse {
                success: true,
                message: "Data received",
            }))
        }
        Err(IngestError::InvalidFormat) => {
            metrics::inc_ingest_rejected();
            warn!("Rejected ingest body without readings");
            Err(IngestError::InvalidFormat)
        }
        Err(e) => {
            metrics::inc_ingest_failed();
            warn!(error = %e, "Ingest failed");
            Err(e)
        }
    }
}

/// Data handler - returns every stored reading, oldest first.
pub async fn data(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.snapshot().await)
}

/// Metrics handler - Prometheus text exposition, 503 if no recorder.
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.prometheus {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "metrics recorder not installed".to_string(),
        ),
    }
}
