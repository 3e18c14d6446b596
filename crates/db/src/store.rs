//! The store contract shared by all backends.

use async_trait::async_trait;
use pulsewatch_core::Pulse;

/// Error type for pulse store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database was unreachable or rejected the statement.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored payload could not be decoded back into a pulse.
    #[error("Stored pulse payload is not valid: {0}")]
    Payload(#[from] serde_json::Error),
}

/// An ordered-by-time pulse log.
///
/// Implementations must key records by `received_at` exactly, so that
/// [`recent`](PulseStore::recent) returns true chronological order.
/// Appends are at-most-once: a failed append is reported to the caller and
/// never retried by the store.
#[async_trait]
pub trait PulseStore: Send + Sync {
    /// Append one pulse to the log.
    async fn append(&self, pulse: &Pulse) -> Result<(), StoreError>;

    /// Fetch the newest `limit` pulses, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<Pulse>, StoreError>;
}
