//! Direct scrape client (fallback strategy).
//!
//! Talks straight to the upstream site, presenting browser-like transport
//! characteristics: a rotating browser profile (user agent plus matching
//! header set) and the referer the site expects for the chain being
//! queried. The upstream's anti-bot defenses vary by chain and endpoint,
//! so responses may carry fewer fields than the wrapper's.

use rand::seq::SliceRandom;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::chain::Chain;

/// A browser identity the scrape requests impersonate.
struct BrowserProfile {
    user_agent: &'static str,
    accept_language: &'static str,
}

const BROWSER_PROFILES: &[BrowserProfile] = &[
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        accept_language: "en-US,en;q=0.9",
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        accept_language: "en-US,en;q=0.8",
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
        accept_language: "en-US,en;q=0.5",
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.3 Safari/605.1.15",
        accept_language: "en-US,en;q=0.9",
    },
];

#[derive(Debug, Clone)]
pub struct DirectClient {
    base_url: String,
    client: Client,
}

impl DirectClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client for direct scrape"),
        }
    }

    /// GET `{base}{path_and_query}` under a random browser profile and
    /// unwrap the upstream's `{"code": 0, "data": ...}` envelope.
    pub async fn get_data(&self, path_and_query: &str, chain: Chain) -> Result<Value, String> {
        let profile = BROWSER_PROFILES
            .choose(&mut rand::thread_rng())
            .expect("browser profile table is non-empty");
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!("direct scrape: {} ({})", url, profile.user_agent);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .header("accept-language", profile.accept_language)
            .header("user-agent", profile.user_agent)
            .header("referer", format!("{}/?chain={}", self.base_url, chain.short_code()))
            // Some WAF rules relax for sessions carrying analytics cookies.
            .header("cookie", "_ga=GA1.1.123456789.1234567890")
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("direct scrape blocked for {}: {}", path_and_query, status);
            return Err(format!("status {}", status));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| format!("malformed payload: {}", e))?;

        match payload.get("code").and_then(Value::as_i64) {
            Some(0) => payload
                .get("data")
                .cloned()
                .ok_or_else(|| "envelope missing data".to_string()),
            Some(code) => {
                let msg = payload
                    .get("msg")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                Err(format!("upstream code {}: {}", code, msg))
            }
            None => Err("missing envelope code".to_string()),
        }
    }
}
