//! `pulsewatch-monitor` -- live dashboard daemon.
//!
//! Polls the ingestion API on a fixed interval, recomputes the dashboard
//! snapshot (today's hourly histogram, danger flag, last pulse time), and
//! logs every state change. Stops cleanly on Ctrl-C.
//!
//! # Environment variables
//!
//! | Variable                     | Required | Default                 |
//! |------------------------------|----------|-------------------------|
//! | `MONITOR_BASE_URL`           | no       | `http://127.0.0.1:3000` |
//! | `MONITOR_POLL_INTERVAL_SECS` | no       | `5`                     |
//! | `DASHBOARD_UTC_OFFSET_HOURS` | no       | `-3`                    |

use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulsewatch_core::dashboard::{civil_offset, DEFAULT_UTC_OFFSET_HOURS};
use pulsewatch_monitor::poller::DEFAULT_POLL_INTERVAL;
use pulsewatch_monitor::{DashboardPoller, DashboardState, PulseClient};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulsewatch_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url = std::env::var("MONITOR_BASE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());

    let interval_secs: u64 = std::env::var("MONITOR_POLL_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_POLL_INTERVAL.as_secs());

    let offset_hours: i32 = std::env::var("DASHBOARD_UTC_OFFSET_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_UTC_OFFSET_HOURS);
    let offset = civil_offset(offset_hours).unwrap_or_else(|| {
        tracing::error!("DASHBOARD_UTC_OFFSET_HOURS must be between -23 and 23");
        std::process::exit(1);
    });

    let client = PulseClient::new(&base_url).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });

    tracing::info!(
        base_url = %base_url,
        interval_secs,
        offset_hours,
        "Starting pulsewatch-monitor",
    );

    let poller = DashboardPoller::new(client, offset, Duration::from_secs(interval_secs));
    let (tx, mut rx) = watch::channel(DashboardState::default());

    let cancel = CancellationToken::new();
    let poller_cancel = cancel.clone();
    let poller_handle = tokio::spawn(async move {
        poller.run(poller_cancel, tx).await;
    });

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl-C, stopping monitor");
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    tracing::warn!("Poller stopped publishing, exiting");
                    break;
                }
                log_state(&rx.borrow().clone());
            }
        }
    }

    // The timer must be explicitly stopped when the view is torn down.
    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), poller_handle).await;

    tracing::info!("Monitor stopped");
}

/// Log one dashboard state change at an operator-friendly level.
fn log_state(state: &DashboardState) {
    if let Some(error) = &state.last_error {
        tracing::warn!(error = %error, "Dashboard showing last known data");
    }

    match &state.snapshot {
        Some(snapshot) => {
            let last_pulse = snapshot
                .last_pulse_local
                .map(|ts| ts.format("%d/%m/%Y %H:%M:%S").to_string())
                .unwrap_or_else(|| "none".to_string());

            tracing::info!(
                total_today = snapshot.total_today,
                danger = snapshot.danger,
                last_pulse = %last_pulse,
                "Dashboard updated"
            );
        }
        None => tracing::info!("Waiting for first successful fetch"),
    }
}
