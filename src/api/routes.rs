//! HTTP API route definitions.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::dashboard::dashboard;
use super::handlers::{data, health, ingest_readings, prometheus_metrics, AppState};
use crate::config::DEFAULT_MAX_BODY_BYTES;

/// Create the API router with the default body limit.
pub fn create_router(state: AppState) -> Router {
    create_router_with_limit(state, DEFAULT_MAX_BODY_BYTES)
}

/// Create the API router, capping request bodies at `max_body_bytes`.
pub fn create_router_with_limit(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        // Dashboard
        .route("/", get(dashboard))
        // Ingest and query
        .route("/api/ingest/readings", post(ingest_readings))
        .route("/api/data", get(data))
        // Operational endpoints
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let app = create_router(AppState::new());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn dashboard_is_served_as_html() {
        let app = create_router(AppState::new());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn metrics_endpoint_returns_503_without_recorder() {
        let app = create_router(AppState::new());

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn ingest_rejects_get() {
        let app = create_router(AppState::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ingest/readings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn oversized_body_is_refused() {
        let app = create_router_with_limit(AppState::new(), 16);
        let payload = r#"{"readings":[{"sensor_id":"a-very-long-sensor-name"}]}"#;

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/ingest/readings")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("application/json"));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].as_str().is_some_and(|s| !s.is_empty()));
    }
}
