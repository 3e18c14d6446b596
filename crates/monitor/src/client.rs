//! HTTP client for the ingestion API's read path.

use std::time::Duration;

use pulsewatch_core::Pulse;
use serde::Deserialize;

/// Per-request timeout; a hung fetch must not stall the poll loop past the
/// next few ticks.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for read-path fetches.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection, timeout, or body decoding failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Wire envelope of `GET /api/pulse`.
#[derive(Debug, Deserialize)]
struct PulsesEnvelope {
    pulses: Vec<Pulse>,
}

/// Client for `GET /api/pulse`.
pub struct PulseClient {
    http: reqwest::Client,
    base_url: String,
}

impl PulseClient {
    /// Create a client for the API at `base_url` (e.g. `http://host:3000`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch the recent pulse list, newest first.
    ///
    /// An empty list means "no data or store unavailable" -- the read path
    /// degrades rather than erroring, so the distinction is not observable
    /// here.
    pub async fn latest_pulses(&self) -> Result<Vec<Pulse>, ClientError> {
        let url = format!("{}/api/pulse", self.base_url.trim_end_matches('/'));
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let envelope: PulsesEnvelope = response.json().await?;
        Ok(envelope.pulses)
    }
}
