//! Hosted wrapper API client (primary strategy).

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the hosted wrapper service that fronts the upstream site.
///
/// Failures here are strategy-level values, not hard errors: the caller
/// decides whether to fall back or give up.
#[derive(Debug, Clone)]
pub struct WrapperClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl WrapperClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client for wrapper API"),
        }
    }

    /// GET `{base}/api{endpoint}` and return the JSON payload.
    ///
    /// Any non-success status, malformed body, or `{"error": ...}` payload
    /// is reported as `Err(reason)` for the fallback path to handle.
    pub async fn get_json(&self, endpoint: &str) -> Result<Value, String> {
        let url = format!("{}/api{}", self.base_url, endpoint);
        debug!("wrapper request: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-API-Key", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("wrapper error {} for {}: {}", status, endpoint, body);
            return Err(format!("status {}", status));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| format!("malformed payload: {}", e))?;

        if let Some(err) = payload.get("error").and_then(Value::as_str) {
            warn!("wrapper reported error for {}: {}", endpoint, err);
            return Err(format!("upstream error: {}", err));
        }

        Ok(payload)
    }
}
