use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::chain::Chain;

/// A single scanner hit over one upstream list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub signal_type: SignalType,
    pub chain: Chain,
    pub address: String,
    pub symbol: Option<String>,
    /// Scanner-specific numbers backing the signal.
    pub metrics: Value,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    PumpGraduation,
    EarlyGem,
    Momentum,
}
