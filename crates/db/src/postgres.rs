//! Postgres-backed pulse store.

use async_trait::async_trait;
use pulsewatch_core::Pulse;

use crate::store::{PulseStore, StoreError};
use crate::DbPool;

/// Pulse store backed by the `pulses` table.
///
/// Rows are ordered by `received_at` (ties broken by insertion id), matching
/// the entity's invariant that the ordering key equals `received_at`
/// exactly.
pub struct PostgresPulseStore {
    pool: DbPool,
    /// Retention cap: newest `max_stored` rows are kept, older rows are
    /// trimmed after each append. `0` disables trimming.
    max_stored: usize,
}

impl PostgresPulseStore {
    pub fn new(pool: DbPool, max_stored: usize) -> Self {
        Self { pool, max_stored }
    }

    /// Delete every row past the newest `max_stored`.
    async fn trim(&self) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM pulses WHERE id IN ( \
                 SELECT id FROM pulses \
                 ORDER BY received_at DESC, id DESC \
                 OFFSET $1 \
             )",
        )
        .bind(self.max_stored as i64)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::debug!(
                trimmed = result.rows_affected(),
                max_stored = self.max_stored,
                "Trimmed pulse log to retention cap"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl PulseStore for PostgresPulseStore {
    async fn append(&self, pulse: &Pulse) -> Result<(), StoreError> {
        let payload = serde_json::to_value(pulse)?;

        sqlx::query("INSERT INTO pulses (received_at, payload) VALUES ($1, $2)")
            .bind(pulse.received_at)
            .bind(&payload)
            .execute(&self.pool)
            .await?;

        if self.max_stored > 0 {
            self.trim().await?;
        }
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Pulse>, StoreError> {
        let payloads: Vec<serde_json::Value> = sqlx::query_scalar(
            "SELECT payload FROM pulses \
             ORDER BY received_at DESC, id DESC \
             LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        payloads
            .into_iter()
            .map(|p| serde_json::from_value(p).map_err(StoreError::from))
            .collect()
    }
}
