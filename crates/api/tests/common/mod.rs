use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{DateTime, FixedOffset};
use http_body_util::BodyExt;
use tower::ServiceExt;

use pulsewatch_alert::{AlertError, AlertNotifier};
use pulsewatch_api::config::{ServerConfig, StoreBackend};
use pulsewatch_api::router::build_app_router;
use pulsewatch_api::state::AppState;
use pulsewatch_core::dashboard::civil_offset;
use pulsewatch_core::Pulse;
use pulsewatch_db::{PulseStore, StoreError};

/// Build a test `ServerConfig` with safe defaults: memory store, no
/// retention cap, the Brasilia dashboard offset.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        recent_limit: 100,
        retention_max: 0,
        dashboard_offset: civil_offset(-3).unwrap(),
    }
}

/// Build the full application router with all middleware layers, using the
/// given store and alerter.
///
/// This goes through `build_app_router` so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(
    store: Arc<dyn PulseStore>,
    alerter: Option<Arc<dyn AlertNotifier>>,
) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        alerter,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Issue a GET request against the router.
pub async fn get(app: Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON value against the router.
pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, path, body.to_string()).await
}

/// POST a raw body with a JSON content type (for malformed-body tests).
pub async fn post_raw(app: Router, path: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Alert notifier that records how many alerts were attempted.
#[derive(Default)]
pub struct RecordingAlerter {
    notified: AtomicUsize,
}

impl RecordingAlerter {
    pub fn count(&self) -> usize {
        self.notified.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertNotifier for RecordingAlerter {
    async fn notify(&self, _triggered_at: DateTime<FixedOffset>) -> Result<(), AlertError> {
        self.notified.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Wait until the alerter has recorded `expected` notifications.
///
/// Alert delivery is spawned fire-and-forget, so tests poll briefly instead
/// of asserting immediately after the response.
pub async fn wait_for_notifications(alerter: &RecordingAlerter, expected: usize) {
    for _ in 0..200 {
        if alerter.count() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {expected} notifications, got {} after 2s",
        alerter.count()
    );
}

/// Pulse store whose every operation fails, for degraded-path tests.
pub struct FailingStore;

fn store_failure() -> StoreError {
    StoreError::Payload(serde_json::from_str::<serde_json::Value>("not json").unwrap_err())
}

#[async_trait]
impl PulseStore for FailingStore {
    async fn append(&self, _pulse: &Pulse) -> Result<(), StoreError> {
        Err(store_failure())
    }

    async fn recent(&self, _limit: usize) -> Result<Vec<Pulse>, StoreError> {
        Err(store_failure())
    }
}
