//! Wire-level entities returned by the upstream (wrapper or direct scrape).
//!
//! The upstream is loose with types: numeric fields arrive as numbers or
//! strings depending on chain and endpoint, booleans sometimes as 0/1.
//! Every field that can be absent is an `Option` with a lenient
//! deserializer so a partial fallback payload still parses.

use serde::{Deserialize, Serialize};

use crate::models::chain::Chain;

/// One row of a trending list for a single timeframe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendingToken {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub volume: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub price_change_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient::u64_opt")]
    pub holder_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub top_10_holder_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub renounced_mint: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub renounced_freeze_account: Option<bool>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub burn_ratio: Option<f64>,
    #[serde(default)]
    pub burn_status: Option<String>,
    #[serde(default)]
    pub launchpad: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub bluechip_owner_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::i64_opt")]
    pub open_timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub liquidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::u64_opt")]
    pub smart_degen_count: Option<u64>,
}

/// Per-token market detail from the token-info operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub liquidity: Option<f64>,
    #[serde(default, alias = "volume", deserialize_with = "lenient::f64_opt")]
    pub volume_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub price_change_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient::u64_opt")]
    pub holder_count: Option<u64>,
    #[serde(default, alias = "open_timestamp", deserialize_with = "lenient::i64_opt")]
    pub created_timestamp: Option<i64>,
    #[serde(default)]
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
}

/// Contract-level security flags for a token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityInfo {
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub is_honeypot: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub is_open_source: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub is_proxy: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub is_mintable: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub can_take_back_ownership: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub owner_change_balance: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub hidden_owner: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub selfdestruct: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub external_call: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub renounced_mint: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub renounced_freeze_account: Option<bool>,
    #[serde(default)]
    pub owner_address: Option<String>,
    #[serde(default)]
    pub creator_address: Option<String>,
}

/// A buyer/holder row from the top-buyers operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopBuyer {
    #[serde(default, alias = "wallet_address")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub amount: Option<f64>,
}

/// A freshly listed pair from the new-pairs operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPair {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub liquidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub initial_liquidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::i64_opt")]
    pub open_timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient::i64_opt")]
    pub creation_timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient::u64_opt")]
    pub bot_degen_count: Option<u64>,
}

impl NewPair {
    /// Listing time: open timestamp with creation timestamp as a stand-in.
    pub fn listed_at(&self) -> Option<i64> {
        self.open_timestamp.or(self.creation_timestamp)
    }
}

/// A token progressing along a launchpad bonding curve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionToken {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub progress: Option<f64>,
    #[serde(default, deserialize_with = "lenient::u64_opt")]
    pub holder_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::u64_opt")]
    pub sniper_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub market_cap: Option<f64>,
}

impl CompletionToken {
    /// Bonding-curve progress as a percentage. Some endpoints report a
    /// 0..1 fraction, others 0..100.
    pub fn progress_pct(&self) -> Option<f64> {
        self.progress
            .map(|p| if p <= 1.0 { p * 100.0 } else { p })
    }
}

/// A token appearing consistently across trending timeframes.
#[derive(Debug, Clone, Serialize)]
pub struct ConsistentToken {
    pub address: String,
    pub chain: Chain,
    pub symbol: Option<String>,
    pub appearance_count: usize,
    pub timeframes: Vec<String>,
    /// Latest observation in fixed timeframe order (1m..24h).
    pub volume: f64,
    pub market_cap: f64,
    pub avg_price: f64,
    pub avg_price_change: f64,
    pub holder_count: Option<u64>,
    pub top_10_holder_rate: Option<f64>,
}

pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolLike {
        Bool(bool),
        Num(i64),
        Str(String),
    }

    pub fn f64_opt<'de, D>(de: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<NumOrStr>::deserialize(de)?.and_then(|v| match v {
            NumOrStr::Num(n) => Some(n),
            NumOrStr::Str(s) => s.trim().parse().ok(),
        }))
    }

    pub fn i64_opt<'de, D>(de: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(f64_opt(de)?.map(|n| n as i64))
    }

    pub fn u64_opt<'de, D>(de: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(f64_opt(de)?.filter(|n| *n >= 0.0).map(|n| n as u64))
    }

    pub fn bool_opt<'de, D>(de: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<BoolLike>::deserialize(de)?.and_then(|v| match v {
            BoolLike::Bool(b) => Some(b),
            BoolLike::Num(n) => Some(n != 0),
            BoolLike::Str(s) => match s.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => Some(true),
                "0" | "false" | "no" => Some(false),
                _ => None,
            },
        }))
    }
}
