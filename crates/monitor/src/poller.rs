//! Live dashboard refresh loop.
//!
//! [`DashboardPoller`] runs as a background task: every few seconds it
//! fetches the pulse list, recomputes the dashboard snapshot for the
//! current instant, and publishes it over a watch channel. Cycles are
//! strictly sequential -- a tick's fetch and recompute finish before the
//! next tick is taken -- and the loop exits when the provided
//! [`CancellationToken`] is cancelled, so a torn-down view never leaks
//! periodic work.

use std::time::Duration;

use chrono::{FixedOffset, Utc};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use pulsewatch_core::dashboard::DashboardSnapshot;

use crate::client::PulseClient;

/// Default interval between dashboard refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// What the live view renders: the latest snapshot plus fetch health.
///
/// On a failed fetch the previous snapshot is kept (displayed as last
/// known) and `last_error` is set; the next successful refresh clears it.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Most recent successfully computed snapshot, if any.
    pub snapshot: Option<DashboardSnapshot>,
    /// Error from the most recent fetch, cleared on success.
    pub last_error: Option<String>,
}

/// Background service that keeps the dashboard state fresh.
pub struct DashboardPoller {
    client: PulseClient,
    offset: FixedOffset,
    interval: Duration,
}

impl DashboardPoller {
    /// Create a poller for the given client, dashboard timezone, and
    /// refresh interval.
    pub fn new(client: PulseClient, offset: FixedOffset, interval: Duration) -> Self {
        Self {
            client,
            offset,
            interval,
        }
    }

    /// Run the refresh loop, publishing state on `tx`.
    ///
    /// The loop exits gracefully when `cancel` is cancelled. The first
    /// refresh happens immediately; subsequent ones follow the configured
    /// interval.
    pub async fn run(&self, cancel: CancellationToken, tx: watch::Sender<DashboardState>) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Dashboard poller cancelled");
                    break;
                }
                _ = interval.tick() => {
                    self.refresh(&tx).await;
                }
            }
        }
    }

    /// One fetch-recompute cycle.
    async fn refresh(&self, tx: &watch::Sender<DashboardState>) {
        match self.client.latest_pulses().await {
            Ok(pulses) => {
                let snapshot = DashboardSnapshot::compute(Utc::now(), self.offset, &pulses);
                tracing::debug!(
                    total_today = snapshot.total_today,
                    danger = snapshot.danger,
                    "Dashboard refreshed"
                );
                tx.send_modify(|state| {
                    state.snapshot = Some(snapshot);
                    state.last_error = None;
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "Dashboard refresh failed, keeping last snapshot");
                tx.send_modify(|state| {
                    state.last_error = Some(e.to_string());
                });
            }
        }
    }
}
