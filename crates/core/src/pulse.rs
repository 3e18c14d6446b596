//! The pulse entity and inbound payload validation.
//!
//! A pulse is the heartbeat a flood sensor sends when its probe triggers.
//! The device is a resource-constrained microcontroller that does not emit
//! strict JSON types, so the activation flag may arrive either as a native
//! boolean or as the string literal `"true"`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A single sensor heartbeat as stored and served over the wire.
///
/// Field names are camelCase on the wire to match the device protocol and
/// the stored payload format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pulse {
    /// Whether the device reported an active trigger.
    pub sensor: bool,
    /// Server-side ingestion timestamp, milliseconds since the Unix epoch.
    /// Always assigned by the server, never by the device.
    pub received_at: i64,
    /// ISO-8601 UTC rendering of `received_at`, stored redundantly so
    /// display code can parse a civil timestamp without epoch math.
    pub human_time: String,
}

impl Pulse {
    /// Record a pulse at the given server time.
    ///
    /// `received_at` and `human_time` are both derived from `now`; the
    /// store's ordering key must equal `received_at` exactly.
    pub fn record(sensor: bool, now: DateTime<Utc>) -> Self {
        Self {
            sensor,
            received_at: now.timestamp_millis(),
            human_time: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Parse `human_time` back into a UTC timestamp.
    ///
    /// Returns `None` for records whose stored string is not valid
    /// ISO-8601; callers skip such records rather than failing the whole
    /// aggregation.
    pub fn human_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.human_time)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Inbound webhook payload.
///
/// `timestamp` is the device's uptime counter in milliseconds; it is logged
/// for diagnostics but never stored (the server clock is the sole source of
/// truth for `received_at`).
#[derive(Debug, Deserialize)]
pub struct PulsePayload {
    pub sensor: Option<serde_json::Value>,
    pub timestamp: Option<i64>,
}

/// Check that a payload's activation flag is recognizable as "true".
///
/// Accepts the native boolean `true` and the string literal `"true"`
/// (case-sensitive, as emitted by the device firmware). Every other shape
/// -- missing field, `false`, `"false"`, numbers, objects -- is a
/// validation error.
pub fn require_sensor_active(payload: &PulsePayload) -> Result<(), CoreError> {
    match &payload.sensor {
        Some(serde_json::Value::Bool(true)) => Ok(()),
        Some(serde_json::Value::String(s)) if s == "true" => Ok(()),
        Some(other) => Err(CoreError::Validation(format!(
            "sensor must be true, got {other}"
        ))),
        None => Err(CoreError::Validation(
            "missing required field: sensor".to_string(),
        )),
    }
}
