//! Shared response envelope types for API handlers.
//!
//! The device firmware and the dashboard both expect `message`-keyed
//! envelopes; use these instead of ad-hoc `serde_json::json!` blocks to get
//! compile-time type safety and consistent serialization.

use pulsewatch_core::Pulse;
use serde::Serialize;

/// `POST /api/pulse` success body: `{ "message": ..., "data": Pulse }`.
#[derive(Debug, Serialize)]
pub struct PulseAccepted {
    pub message: &'static str,
    pub data: Pulse,
}

/// `GET /api/pulse` body: `{ "message": ..., "pulses": [Pulse, ...] }`,
/// newest first.
#[derive(Debug, Serialize)]
pub struct PulseList {
    pub message: &'static str,
    pub pulses: Vec<Pulse>,
}
