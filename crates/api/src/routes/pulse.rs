//! Handlers for the `/api/pulse` resource.
//!
//! The write path accepts a heartbeat from the flood sensor, persists it,
//! and fires a best-effort email alert. The read path serves the recent
//! pulse log to the dashboard and report views, degrading to an empty list
//! when the store is unreachable so the dashboard never hard-fails.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;

use pulsewatch_core::pulse::{require_sensor_active, Pulse, PulsePayload};

use crate::error::{AppError, AppResult};
use crate::response::{PulseAccepted, PulseList};
use crate::state::AppState;

/// POST /api/pulse
///
/// Validate the inbound payload, record the pulse at the current server
/// time, trigger the alert notifier, and append to the store.
///
/// The raw-JSON extractor result is matched explicitly: an unparseable body
/// is a 500 per the device contract, while a parseable body that fails
/// validation is a 400 with no side effects.
async fn receive_pulse(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<Json<PulseAccepted>> {
    let Json(body) = body.map_err(|rejection| match rejection {
        JsonRejection::JsonSyntaxError(err) => AppError::MalformedBody(err.to_string()),
        other => AppError::BadRequest(other.body_text()),
    })?;

    let payload: PulsePayload = serde_json::from_value(body)
        .map_err(|e| pulsewatch_core::CoreError::Validation(format!("invalid payload: {e}")))?;
    require_sensor_active(&payload)?;

    if let Some(uptime_ms) = payload.timestamp {
        tracing::debug!(device_uptime_ms = uptime_ms, "Device uptime counter");
    }

    let now = Utc::now();
    let pulse = Pulse::record(true, now);

    // Fire-and-forget: alert delivery must never block or fail the write
    // path, whatever happens to the SMTP connection.
    if let Some(alerter) = state.alerter.clone() {
        let triggered_at = now.with_timezone(&state.config.dashboard_offset);
        tokio::spawn(async move {
            if let Err(e) = alerter.notify(triggered_at).await {
                tracing::warn!(error = %e, "Flood alert delivery failed");
            }
        });
    }

    state.store.append(&pulse).await?;
    tracing::info!(received_at = pulse.received_at, "Pulse stored");

    Ok(Json(PulseAccepted {
        message: "Pulse received successfully",
        data: pulse,
    }))
}

/// GET /api/pulse
///
/// Return the newest pulses, newest first. A store failure degrades to an
/// empty list instead of an error, so callers must treat an empty result as
/// "no data or store unavailable".
async fn latest_pulses(State(state): State<AppState>) -> Json<PulseList> {
    let pulses = match state.store.recent(state.config.recent_limit).await {
        Ok(pulses) => pulses,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch pulses, serving empty list");
            Vec::new()
        }
    };

    Json(PulseList {
        message: "Latest pulses",
        pulses,
    })
}

/// Mount `/pulse` routes (intended to be nested under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/pulse", post(receive_pulse).get(latest_pulses))
}
