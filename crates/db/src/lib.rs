//! Pulse persistence.
//!
//! The store is an ordered-by-time collection with exactly two operations:
//! append a pulse and fetch the newest N. [`PulseStore`] is the contract;
//! [`PostgresPulseStore`] is the production backend and
//! [`InMemoryPulseStore`] the dev/test backend, chosen by configuration.

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryPulseStore;
pub use postgres::PostgresPulseStore;
pub use store::{PulseStore, StoreError};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
///
/// The pool is created once at process start and reused for every request;
/// reconnection after a dropped connection is handled by sqlx at call time.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
