//! Integration tests for the Postgres pulse store.

use chrono::{TimeZone, Utc};
use pulsewatch_core::Pulse;
use pulsewatch_db::{PostgresPulseStore, PulseStore};
use sqlx::PgPool;

fn pulse_at(minute: u32) -> Pulse {
    let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, minute, 0).unwrap();
    Pulse::record(true, now)
}

#[sqlx::test(migrations = "./migrations")]
async fn append_then_recent_round_trips_all_fields(pool: PgPool) {
    let store = PostgresPulseStore::new(pool, 0);
    let pulse = pulse_at(30);

    store.append(&pulse).await.unwrap();
    let fetched = store.recent(10).await.unwrap();

    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].sensor, pulse.sensor);
    assert_eq!(fetched[0].received_at, pulse.received_at);
    assert_eq!(fetched[0].human_time, pulse.human_time);
}

#[sqlx::test(migrations = "./migrations")]
async fn recent_is_newest_first_and_limited(pool: PgPool) {
    let store = PostgresPulseStore::new(pool, 0);
    for minute in 0..5 {
        store.append(&pulse_at(minute)).await.unwrap();
    }

    let pulses = store.recent(3).await.unwrap();
    assert_eq!(pulses.len(), 3);
    assert_eq!(pulses[0], pulse_at(4));
    assert_eq!(pulses[1], pulse_at(3));
    assert_eq!(pulses[2], pulse_at(2));
}

#[sqlx::test(migrations = "./migrations")]
async fn reads_without_intervening_writes_are_identical(pool: PgPool) {
    let store = PostgresPulseStore::new(pool, 0);
    for minute in 0..3 {
        store.append(&pulse_at(minute)).await.unwrap();
    }

    let first = store.recent(10).await.unwrap();
    let second = store.recent(10).await.unwrap();
    assert_eq!(first, second);
}

#[sqlx::test(migrations = "./migrations")]
async fn retention_cap_trims_the_oldest_rows(pool: PgPool) {
    let store = PostgresPulseStore::new(pool, 3);
    for minute in 0..5 {
        store.append(&pulse_at(minute)).await.unwrap();
    }

    let pulses = store.recent(10).await.unwrap();
    assert_eq!(pulses.len(), 3);
    assert_eq!(pulses[0], pulse_at(4));
    assert_eq!(pulses[2], pulse_at(2));
}
