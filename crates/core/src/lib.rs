//! Pulsewatch domain core.
//!
//! Pure, side-effect-free building blocks shared by the ingestion API and
//! the dashboard monitor: the [`Pulse`](pulse::Pulse) entity, payload
//! validation, the hourly occurrence histogram, danger classification, and
//! report pagination. Everything here takes "now" as a parameter so it can
//! be tested without touching the wall clock.

pub mod dashboard;
pub mod error;
pub mod pulse;
pub mod report;

pub use error::CoreError;
pub use pulse::Pulse;
