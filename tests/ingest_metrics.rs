//! Ingest counters as exposed on `/metrics`.
//!
//! The Prometheus recorder is process-global, so this binary holds a single
//! test that installs it once.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use telemetry_sink::api::{create_router, AppState};
use telemetry_sink::metrics::{
    install_prometheus, METRIC_INGEST_FAILED, METRIC_INGEST_REJECTED, METRIC_INGEST_REQUESTS,
    METRIC_READINGS_INGESTED,
};

async fn post(app: &Router, body: &'static str) -> StatusCode {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/ingest/readings")
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

async fn scrape(app: &Router) -> String {
    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn counter(exposition: &str, name: &str) -> Option<u64> {
    exposition
        .lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| line.strip_prefix(name)?.trim().parse().ok())
}

#[tokio::test]
async fn counters_track_partial_and_rejected_batches() {
    let handle = install_prometheus().unwrap();
    let state = AppState::new().with_prometheus(handle);
    let app = create_router(state.clone());

    let status = post(&app, r#"{"readings":[{"sensor_id":"a"},{"sensor_id":"b"},7]}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(state.store.len().await, 2);

    let status = post(&app, r#"{"readings":[{"sensor_id":"c"}]}"#).await;
    assert_eq!(status, StatusCode::OK);

    let status = post(&app, r#"{"foo":1}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let exposition = scrape(&app).await;
    assert_eq!(counter(&exposition, METRIC_READINGS_INGESTED), Some(3));
    assert_eq!(counter(&exposition, METRIC_INGEST_REQUESTS), Some(3));
    assert_eq!(counter(&exposition, METRIC_INGEST_FAILED), Some(1));
    assert_eq!(counter(&exposition, METRIC_INGEST_REJECTED), Some(1));
    assert_eq!(state.store.len().await, 3);
}
