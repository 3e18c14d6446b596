//! Dashboard view-model: hourly occurrence histogram and danger status.
//!
//! The live dashboard shows "today" as 24 fixed hourly buckets in a civil
//! timezone (Brasilia by default) plus a danger/safe flag derived from the
//! recency of the newest pulse. All functions here are pure in `now`, the
//! timezone offset, and the pulse list, so "today" rolling over while the
//! process runs is handled simply by recomputing on every refresh.

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::Serialize;

use crate::pulse::Pulse;

/// Hours in a civil day; the histogram always has exactly this many buckets.
pub const HOURS_PER_DAY: usize = 24;

/// A pulse newer than this many minutes means flood danger.
pub const DANGER_WINDOW_MINUTES: i64 = 60;

/// Default dashboard timezone: Brasilia, UTC-3 (no DST since 2019).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -3;

/// Build a [`FixedOffset`] from whole hours east of UTC.
///
/// Returns `None` for offsets outside `-23..=23`.
pub fn civil_offset(hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(hours * 3600)
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// One hourly slot of today's occurrence chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourBucket {
    /// Display label for the start of the hour, `"HH:00"`.
    pub time: String,
    /// Hour of day, `0..=23`.
    pub hour: u32,
    /// Number of pulses recorded in this hour today.
    pub occurrences: u32,
    /// Whether any pulse fell in this bucket (distinguishes a genuine
    /// zero-count hour from an hour that simply has no data point).
    pub has_data: bool,
}

/// Bucket today's pulses into 24 hourly slots in the given civil timezone.
///
/// Each pulse's `humanTime` (UTC) is shifted to `offset`; pulses whose
/// civil date does not match today's civil date are excluded from the
/// histogram (they remain in the raw list). Pulses with an unparseable
/// `humanTime` are skipped.
pub fn hourly_histogram(
    now: DateTime<Utc>,
    offset: FixedOffset,
    pulses: &[Pulse],
) -> Vec<HourBucket> {
    let today = now.with_timezone(&offset).date_naive();

    let mut buckets: Vec<HourBucket> = (0..HOURS_PER_DAY as u32)
        .map(|hour| HourBucket {
            time: format!("{hour:02}:00"),
            hour,
            occurrences: 0,
            has_data: false,
        })
        .collect();

    for pulse in pulses {
        let Some(timestamp) = pulse.human_timestamp() else {
            continue;
        };
        let local = timestamp.with_timezone(&offset);
        if local.date_naive() != today {
            continue;
        }

        let bucket = &mut buckets[local.hour() as usize];
        bucket.occurrences += 1;
        bucket.has_data = true;
    }

    buckets
}

/// Total number of pulses recorded today across all buckets.
pub fn total_occurrences(buckets: &[HourBucket]) -> u32 {
    buckets.iter().map(|b| b.occurrences).sum()
}

// ---------------------------------------------------------------------------
// Danger classification
// ---------------------------------------------------------------------------

/// Classify flood danger from the newest pulse.
///
/// `pulses` must be ordered newest first (the read path's contract).
/// Danger means the newest pulse is at most [`DANGER_WINDOW_MINUTES`] old;
/// an empty list is safe.
pub fn is_flood_danger(now: DateTime<Utc>, pulses: &[Pulse]) -> bool {
    match pulses.first() {
        Some(latest) => {
            let elapsed_ms = now.timestamp_millis() - latest.received_at;
            elapsed_ms <= DANGER_WINDOW_MINUTES * 60 * 1000
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything the live dashboard renders, computed in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// The 24-bucket occurrence chart for today.
    pub buckets: Vec<HourBucket>,
    /// Total pulses recorded today.
    pub total_today: u32,
    /// Whether the newest pulse falls inside the danger window.
    pub danger: bool,
    /// Newest pulse's timestamp in the dashboard timezone, if any.
    pub last_pulse_local: Option<DateTime<FixedOffset>>,
}

impl DashboardSnapshot {
    /// Compute a snapshot for `now` from a newest-first pulse list.
    pub fn compute(now: DateTime<Utc>, offset: FixedOffset, pulses: &[Pulse]) -> Self {
        let buckets = hourly_histogram(now, offset, pulses);
        let total_today = total_occurrences(&buckets);
        let danger = is_flood_danger(now, pulses);
        let last_pulse_local = pulses
            .first()
            .and_then(Pulse::human_timestamp)
            .map(|ts| ts.with_timezone(&offset));

        Self {
            buckets,
            total_today,
            danger,
            last_pulse_local,
        }
    }
}
