//! One-shot report view: the full pulse log as formatted, paginated lines.
//!
//! Unlike the live dashboard this fetches once per view-load and does not
//! poll.

use chrono::FixedOffset;

use pulsewatch_core::report::{format_log_entry, paginate};

use crate::client::{ClientError, PulseClient};

/// One rendered page of the pulse log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPage {
    /// One log line per pulse, newest first.
    pub lines: Vec<String>,
    /// 1-based page number after clamping.
    pub page: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Total pulses across all pages.
    pub total_items: usize,
}

/// Fetch the log and render one page of it.
///
/// `requested_page` is clamped to the valid range; an out-of-range request
/// lands on the nearest valid page.
pub async fn fetch_report_page(
    client: &PulseClient,
    offset: FixedOffset,
    requested_page: usize,
    page_size: usize,
) -> Result<ReportPage, ClientError> {
    let pulses = client.latest_pulses().await?;
    let page = paginate(&pulses, requested_page, page_size);

    Ok(ReportPage {
        lines: page
            .items
            .iter()
            .map(|pulse| format_log_entry(pulse, offset))
            .collect(),
        page: page.page,
        total_pages: page.total_pages,
        total_items: page.total_items,
    })
}
