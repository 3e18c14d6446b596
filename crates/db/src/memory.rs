//! In-memory pulse store.
//!
//! Backs local development and tests; selected with
//! `PULSE_STORE_BACKEND=memory`. Semantics mirror the Postgres backend:
//! records ordered by `received_at`, newest-first reads, capped retention.

use async_trait::async_trait;
use pulsewatch_core::Pulse;
use tokio::sync::RwLock;

use crate::store::{PulseStore, StoreError};

/// Pulse store held entirely in process memory.
pub struct InMemoryPulseStore {
    /// Pulses ordered oldest first by `received_at`.
    pulses: RwLock<Vec<Pulse>>,
    /// Retention cap; `0` disables trimming.
    max_stored: usize,
}

impl InMemoryPulseStore {
    pub fn new(max_stored: usize) -> Self {
        Self {
            pulses: RwLock::new(Vec::new()),
            max_stored,
        }
    }
}

#[async_trait]
impl PulseStore for InMemoryPulseStore {
    async fn append(&self, pulse: &Pulse) -> Result<(), StoreError> {
        let mut pulses = self.pulses.write().await;

        // Server timestamps are non-decreasing, so this is normally a push;
        // the partition point keeps ordering correct even if a caller hands
        // us out-of-order records.
        let index = pulses.partition_point(|p| p.received_at <= pulse.received_at);
        pulses.insert(index, pulse.clone());

        if self.max_stored > 0 && pulses.len() > self.max_stored {
            let excess = pulses.len() - self.max_stored;
            pulses.drain(..excess);
        }
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Pulse>, StoreError> {
        let pulses = self.pulses.read().await;
        Ok(pulses.iter().rev().take(limit).cloned().collect())
    }
}
