//! HTTP client for a running relay.
//!
//! Used by the CLI to submit designs and check health the same way a web
//! view would.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::design::model::DesignSubmission;
use crate::error::{RelayError, RelayResult};

/// Default relay URL.
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3001";

/// Response of `POST /api/card/design`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub success: bool,
    pub design: DesignSubmission,
    pub notified_clients: usize,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub connected_clients: usize,
}

/// Talks to the relay over HTTP.
#[derive(Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "RelayClient initialized");
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap_or_default(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit card data for processing and broadcast.
    pub async fn submit_design(&self, card_data: Value) -> RelayResult<SubmitOutcome> {
        let url = format!("{}/api/card/design", self.base_url);
        let payload = serde_json::json!({ "cardData": card_data });
        debug!(url = %url, "Submitting design");

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::internal(format!("request to {} failed: {}", url, e)))?;
        Self::decode(response).await
    }

    /// Fetch the relay's health report.
    pub async fn health(&self) -> RelayResult<HealthStatus> {
        let url = format!("{}/api/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RelayError::internal(format!("request to {} failed: {}", url, e)))?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> RelayResult<T> {
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| RelayError::internal(format!("invalid response body: {}", e)))?;

        if status.is_success() {
            return Ok(serde_json::from_value(body)?);
        }

        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("no error message")
            .to_string();
        if status.is_client_error() {
            Err(RelayError::Validation(message))
        } else {
            Err(RelayError::Internal(format!("relay returned {}: {}", status, message)))
        }
    }
}

impl Default for RelayClient {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_URL)
    }
}
