//! Report view: paginated pulse log.
//!
//! The report is a flat, newest-first table of every stored pulse, sliced
//! into fixed-size pages. Page navigation clamps to the valid range instead
//! of failing, so out-of-range requests are always safe.

use chrono::FixedOffset;
use serde::Serialize;

use crate::pulse::Pulse;

/// Rows per report page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of pages needed for `total` items at `page_size` per page.
///
/// Always at least 1 so that "page 1 of 1, empty" is representable and the
/// clamp range `[1, total_pages]` is never empty.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size).max(1)
}

/// One page of a report, borrowing its rows from the full list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<'a, T> {
    /// Rows on this page, in the order of the underlying list.
    pub items: &'a [T],
    /// 1-based page number after clamping.
    pub page: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Total number of rows across all pages.
    pub total_items: usize,
}

/// Slice one page out of `items`.
///
/// `requested_page` is 1-based and clamped to `[1, total_pages]`; both
/// page 0 and pages past the end land on the nearest valid page rather
/// than panicking or returning an error.
pub fn paginate<T>(items: &[T], requested_page: usize, page_size: usize) -> Page<'_, T> {
    let total_pages = page_count(items.len(), page_size);
    let page = requested_page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    // `start` can only reach `items.len()` on the forced single page of an
    // empty list, where the range below is `0..0`.
    let start = start.min(items.len());

    Page {
        items: &items[start..end],
        page,
        total_pages,
        total_items: items.len(),
    }
}

/// Render a pulse as a log line, e.g. `"Pulse recorded at 14:03:27"`.
///
/// The time is the pulse's `humanTime` shifted into the dashboard timezone;
/// a pulse with an unparseable timestamp renders as unknown rather than
/// being dropped from the report.
pub fn format_log_entry(pulse: &Pulse, offset: FixedOffset) -> String {
    match pulse.human_timestamp() {
        Some(ts) => format!(
            "Pulse recorded at {}",
            ts.with_timezone(&offset).format("%H:%M:%S")
        ),
        None => "Pulse recorded at unknown time".to_string(),
    }
}

/// Render a pulse's full local date and time, e.g. `"15/06/2025 14:03"`.
pub fn format_date_time(pulse: &Pulse, offset: FixedOffset) -> Option<String> {
    pulse
        .human_timestamp()
        .map(|ts| ts.with_timezone(&offset).format("%d/%m/%Y %H:%M").to_string())
}
