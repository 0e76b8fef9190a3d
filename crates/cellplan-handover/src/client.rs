//! HTTP client for the handover measurement API.

use anyhow::Result;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::HandoverProvider;

/// Best-effort fallback when the measurement API cannot be reached.
pub const DEFAULT_HANDOVER_AVG: f64 = 15.0;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Client for the per-station handover measurement endpoint.
///
/// `GET {base_url}/{station_id}` returns the measured average as a bare
/// float in the response body; 404 means the station is unknown.
pub struct ApiHandoverClient {
    client: Client,
    base_url: String,
}

impl ApiHandoverClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, station_id: u32) -> Result<Option<f64>> {
        let url = format!("{}/{}", self.base_url, station_id);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.error_for_status()?.text().await?;
        Ok(Some(body.trim().parse::<f64>()?))
    }
}

impl HandoverProvider for ApiHandoverClient {
    /// Resolve one station's measured average.
    ///
    /// 404 resolves to unknown; transport or parse failures resolve to
    /// the fallback value so a flaky measurement service never blocks
    /// ingestion.
    async fn handover_avg(&self, station_id: u32) -> Option<f64> {
        match self.fetch(station_id).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(station_id, %err, "handover lookup failed, using fallback");
                Some(DEFAULT_HANDOVER_AVG)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_keeps_base_url() {
        let client = ApiHandoverClient::new("http://localhost:100/api/basestation");
        assert_eq!(client.base_url(), "http://localhost:100/api/basestation");
    }
}
