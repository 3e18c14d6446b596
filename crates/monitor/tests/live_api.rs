//! End-to-end tests: the monitor against a real ingestion API instance
//! (in-memory store) on an ephemeral port.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use pulsewatch_api::config::{ServerConfig, StoreBackend};
use pulsewatch_api::router::build_app_router;
use pulsewatch_api::state::AppState;
use pulsewatch_core::dashboard::civil_offset;
use pulsewatch_core::Pulse;
use pulsewatch_db::{InMemoryPulseStore, PulseStore};
use pulsewatch_monitor::report::fetch_report_page;
use pulsewatch_monitor::{DashboardPoller, DashboardState, PulseClient};

/// Serve the real router (full middleware stack) on an ephemeral port.
async fn spawn_api(store: Arc<dyn PulseStore>) -> (String, JoinHandle<()>) {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        recent_limit: 100,
        retention_max: 0,
        dashboard_offset: civil_offset(-3).unwrap(),
    };
    let state = AppState {
        store,
        alerter: None,
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), handle)
}

/// Wait (bounded) until the published dashboard state satisfies `pred`.
async fn wait_until(
    rx: &mut watch::Receiver<DashboardState>,
    pred: impl Fn(&DashboardState) -> bool,
) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if pred(&rx.borrow()) {
                break;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("timed out waiting for dashboard state");
}

#[tokio::test]
async fn client_fetches_latest_pulses_newest_first() {
    let store = Arc::new(InMemoryPulseStore::new(0));
    for minutes_ago in [10, 5, 1] {
        let pulse = Pulse::record(true, Utc::now() - chrono::Duration::minutes(minutes_ago));
        store.append(&pulse).await.unwrap();
    }
    let (base_url, server) = spawn_api(store).await;

    let client = PulseClient::new(&base_url).unwrap();
    let pulses = client.latest_pulses().await.unwrap();

    assert_eq!(pulses.len(), 3);
    assert!(pulses[0].received_at > pulses[1].received_at);
    assert!(pulses[1].received_at > pulses[2].received_at);

    server.abort();
}

#[tokio::test]
async fn report_page_renders_and_clamps() {
    let store = Arc::new(InMemoryPulseStore::new(0));
    for minutes_ago in 1..=23 {
        let pulse = Pulse::record(true, Utc::now() - chrono::Duration::minutes(minutes_ago));
        store.append(&pulse).await.unwrap();
    }
    let (base_url, server) = spawn_api(store).await;

    let client = PulseClient::new(&base_url).unwrap();
    let offset = civil_offset(-3).unwrap();

    // Page 5 of 3 clamps to the last page, which holds the 3 oldest rows.
    let page = fetch_report_page(&client, offset, 5, 10).await.unwrap();
    assert_eq!(page.page, 3);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_items, 23);
    assert_eq!(page.lines.len(), 3);
    assert!(page.lines.iter().all(|l| l.starts_with("Pulse recorded at ")));

    server.abort();
}

#[tokio::test]
async fn poller_publishes_snapshots_and_keeps_the_last_on_failure() {
    let store = Arc::new(InMemoryPulseStore::new(0));
    store
        .append(&Pulse::record(true, Utc::now() - chrono::Duration::minutes(5)))
        .await
        .unwrap();
    let (base_url, server) = spawn_api(store).await;

    let client = PulseClient::new(&base_url).unwrap();
    let poller = DashboardPoller::new(client, civil_offset(-3).unwrap(), Duration::from_millis(50));

    let (tx, mut rx) = watch::channel(DashboardState::default());
    let cancel = CancellationToken::new();
    let poller_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        poller.run(poller_cancel, tx).await;
    });

    // First successful refresh: a pulse 5 minutes old means danger.
    wait_until(&mut rx, |state| state.snapshot.is_some()).await;
    {
        let state = rx.borrow().clone();
        let snapshot = state.snapshot.unwrap();
        assert!(snapshot.danger);
        assert!(snapshot.last_pulse_local.is_some());
        assert!(state.last_error.is_none());
    }

    // Kill the API; the poller must keep the last snapshot and surface
    // the fetch error instead of crashing or clearing the view.
    server.abort();
    wait_until(&mut rx, |state| state.last_error.is_some()).await;
    {
        let state = rx.borrow().clone();
        assert!(state.snapshot.is_some(), "stale snapshot must be retained");
    }

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("poller did not stop after cancellation")
        .unwrap();
}

#[tokio::test]
async fn client_reports_unreachable_server() {
    // Nothing listens on this port.
    let client = PulseClient::new("http://127.0.0.1:9").unwrap();
    let result = client.latest_pulses().await;
    assert!(result.is_err());
}
