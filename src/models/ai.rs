//! Payload contract for the AI assessment pass-through.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenContext {
    pub name: String,
    pub symbol: String,
    pub address: String,
    pub chain: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub volume_24h: Option<f64>,
    #[serde(default)]
    pub liquidity: Option<f64>,
    #[serde(default)]
    pub holder_count: Option<u64>,
    #[serde(default)]
    pub age_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityContext {
    #[serde(default)]
    pub is_honeypot: Option<bool>,
    #[serde(default)]
    pub is_mintable: Option<bool>,
    #[serde(default)]
    pub is_open_source: Option<bool>,
    #[serde(default)]
    pub owner_percentage: Option<f64>,
    #[serde(default)]
    pub creator_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialContext {
    #[serde(default)]
    pub twitter_followers: Option<u64>,
    #[serde(default)]
    pub telegram_members: Option<u64>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub twitter_url: Option<String>,
    #[serde(default)]
    pub telegram_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub token: TokenContext,
    pub security: SecurityContext,
    #[serde(default)]
    pub social: Option<SocialContext>,
    #[serde(default)]
    pub safety_score: Option<f64>,
    /// Extra free-form context, e.g. "developer has launched 3 scams before".
    #[serde(default)]
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// LOW, MEDIUM, HIGH, or EXTREME.
    pub risk_level: String,
    /// 0-100 where 100 is safest.
    pub score: i32,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub positive_signals: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResponse {
    /// BULLISH, BEARISH, or NEUTRAL.
    pub verdict: String,
    pub summary: String,
    pub explanation: String,
    pub risk: RiskAssessment,
    #[serde(default)]
    pub entry_suggestion: Option<String>,
    pub meme_potential_score: i32,
}
