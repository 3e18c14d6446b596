//! Pulsewatch dashboard monitor.
//!
//! Hosts the aggregation view-model: a [`PulseClient`](client::PulseClient)
//! for the API's read path, a cancellable [`DashboardPoller`](poller::DashboardPoller)
//! that re-fetches on a timer and publishes [`DashboardState`](poller::DashboardState)
//! over a watch channel, and the one-shot paginated [report](report) view.

pub mod client;
pub mod poller;
pub mod report;

pub use client::{ClientError, PulseClient};
pub use poller::{DashboardPoller, DashboardState};
