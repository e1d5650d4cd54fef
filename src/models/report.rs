//! The deep-analysis report and its sections.

use serde::{Deserialize, Serialize};

use crate::models::chain::Chain;
use crate::models::token::{SecurityInfo, TopBuyer};

/// Where the report's underlying data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    /// Per-token detail operations answered directly.
    Direct,
    /// Detail operations failed; data substituted from the cached
    /// trending list (policy-gated, fewer fields populated).
    TrendingSubstitute,
}

/// One degraded sub-fetch inside a deep analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubFetchError {
    pub operation: String,
    pub reason: String,
}

impl SubFetchError {
    pub fn new(operation: &str, reason: impl Into<String>) -> Self {
        Self {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketData {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub liquidity: Option<f64>,
    pub volume_24h: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub holder_count: Option<u64>,
    pub created_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolderSummary {
    pub top_buyers_count: Option<usize>,
    /// Share of the returned holdings owned by the top ten buyers, percent.
    pub whale_concentration_top10: Option<f64>,
    pub top_holders: Vec<TopBuyer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialPresence {
    pub twitter_username: Option<String>,
    pub website: Option<String>,
    pub telegram: Option<String>,
}

/// Adaptive safety score with its audit trail.
///
/// `score` is always within 0..=100 and always equals the sum of points
/// earned across `breakdown` lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyScore {
    pub score: u32,
    pub breakdown: Vec<String>,
}

/// The full aggregated, partially-fault-tolerant analysis for one token.
///
/// `errors` is non-empty exactly when at least one sub-fetch degraded; the
/// report is still produced as long as market data (or its configured
/// substitute) is available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepReport {
    pub address: String,
    pub chain: Chain,
    pub source: ReportSource,
    pub market_data: MarketData,
    pub security: SecurityInfo,
    pub holders: HolderSummary,
    pub socials: SocialPresence,
    pub safety: SafetyScore,
    pub errors: Vec<SubFetchError>,
}
