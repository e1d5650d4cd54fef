use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SentinelError;

/// A blockchain network supported as an upstream data source.
///
/// Parsing is strict: anything outside the supported set fails with
/// `UnsupportedChain` before any network activity happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Sol,
    Eth,
    Base,
    Bsc,
}

impl Chain {
    /// Path segment used by the hosted wrapper API.
    pub fn wrapper_path(&self) -> &'static str {
        match self {
            Chain::Sol => "solana",
            Chain::Eth => "ethereum",
            Chain::Base => "base",
            Chain::Bsc => "binance",
        }
    }

    /// Short code used in direct gmgn.ai URLs and API parameters.
    pub fn short_code(&self) -> &'static str {
        match self {
            Chain::Sol => "sol",
            Chain::Eth => "eth",
            Chain::Base => "base",
            Chain::Bsc => "bsc",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_code())
    }
}

impl FromStr for Chain {
    type Err = SentinelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sol" => Ok(Chain::Sol),
            "eth" => Ok(Chain::Eth),
            "base" => Ok(Chain::Base),
            "bsc" => Ok(Chain::Bsc),
            other => Err(SentinelError::UnsupportedChain(other.to_string())),
        }
    }
}

/// Trending list timeframe on the upstream site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "6h")]
    H6,
    #[serde(rename = "24h")]
    H24,
}

/// Fixed set of timeframes the consistency aggregator scans, in order.
pub const ALL_TIMEFRAMES: [Timeframe; 5] = [
    Timeframe::M1,
    Timeframe::M5,
    Timeframe::H1,
    Timeframe::H6,
    Timeframe::H24,
];

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::H1 => "1h",
            Timeframe::H6 => "6h",
            Timeframe::H24 => "24h",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = SentinelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1m" => Ok(Timeframe::M1),
            "5m" => Ok(Timeframe::M5),
            "1h" => Ok(Timeframe::H1),
            "6h" => Ok(Timeframe::H6),
            "24h" => Ok(Timeframe::H24),
            other => Err(SentinelError::UnsupportedTimeframe(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_chains() {
        assert_eq!("sol".parse::<Chain>().unwrap(), Chain::Sol);
        assert_eq!("BSC".parse::<Chain>().unwrap(), Chain::Bsc);
        assert_eq!(" base ".parse::<Chain>().unwrap(), Chain::Base);
    }

    #[test]
    fn rejects_unknown_chain() {
        let err = "dogechain".parse::<Chain>().unwrap_err();
        assert!(matches!(err, SentinelError::UnsupportedChain(c) if c == "dogechain"));
    }

    #[test]
    fn rejects_unknown_timeframe() {
        assert!("12h".parse::<Timeframe>().is_err());
        assert_eq!("24h".parse::<Timeframe>().unwrap(), Timeframe::H24);
    }

    #[test]
    fn wrapper_paths_match_upstream_naming() {
        assert_eq!(Chain::Sol.wrapper_path(), "solana");
        assert_eq!(Chain::Bsc.wrapper_path(), "binance");
        assert_eq!(Chain::Bsc.short_code(), "bsc");
    }
}
