//! Request and Response DTOs for the Web API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

// ============================================================================
// Query parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TrendingAnalysisQuery {
    pub chain: Option<String>,
    pub min_consistency: Option<usize>,
    pub volume_threshold: Option<f64>,
    pub market_cap_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct GraduationQuery {
    pub chain: Option<String>,
    pub min_progress: Option<f64>,
    pub max_progress: Option<f64>,
    pub min_holders: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct EarlyGemQuery {
    pub chain: Option<String>,
    pub min_liquidity: Option<f64>,
    pub max_age_minutes: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MomentumQuery {
    pub chain: Option<String>,
    pub timeframe: Option<String>,
    pub min_vol_mcap_ratio: Option<f64>,
    pub min_price_change: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MarketTrendingQuery {
    pub chain: Option<String>,
    pub timeframe: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MarketListQuery {
    pub chain: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ChainQuery {
    pub chain: Option<String>,
}
