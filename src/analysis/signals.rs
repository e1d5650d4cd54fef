//! Stateless signal scanners over single upstream lists.
//!
//! Each scanner fetches one list and applies a pure filter; the filters
//! are split out so they can be exercised on synthetic data.

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::analysis::trending::TrendingService;
use crate::error::SentinelError;
use crate::models::chain::{Chain, Timeframe};
use crate::models::signal::{Signal, SignalType};
use crate::models::token::{CompletionToken, NewPair, TrendingToken};
use crate::upstream::UpstreamClient;

const SCAN_LIMIT: u32 = 50;

#[derive(Debug, Clone)]
pub struct GraduationParams {
    pub min_progress: f64,
    pub max_progress: f64,
    pub min_holders: u64,
}

impl Default for GraduationParams {
    fn default() -> Self {
        Self {
            min_progress: 95.0,
            max_progress: 100.0,
            min_holders: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EarlyGemParams {
    pub min_liquidity: f64,
    pub max_age_minutes: f64,
}

impl Default for EarlyGemParams {
    fn default() -> Self {
        Self {
            min_liquidity: 5_000.0,
            max_age_minutes: 60.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MomentumParams {
    pub timeframe: Timeframe,
    pub min_vol_mcap_ratio: f64,
    pub min_price_change: f64,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::H1,
            min_vol_mcap_ratio: 0.5,
            min_price_change: 5.0,
        }
    }
}

/// Tokens about to complete their bonding curve and graduate to a DEX.
pub async fn graduation_signals(
    upstream: &UpstreamClient,
    chain: Chain,
    params: &GraduationParams,
) -> Result<Vec<Signal>, SentinelError> {
    let tokens = upstream
        .get_tokens_by_completion(chain, SCAN_LIMIT)
        .await?
        .into_inner();
    let signals = filter_graduation(tokens, chain, params);
    info!("graduation scan on {}: {} signals", chain, signals.len());
    Ok(signals)
}

pub fn filter_graduation(
    tokens: Vec<CompletionToken>,
    chain: Chain,
    params: &GraduationParams,
) -> Vec<Signal> {
    tokens
        .into_iter()
        .filter_map(|token| {
            if token.address.is_empty() {
                return None;
            }
            let progress = token.progress_pct()?;
            let holder_count = token.holder_count.unwrap_or(0);
            if progress < params.min_progress || progress > params.max_progress {
                return None;
            }
            if holder_count < params.min_holders {
                return None;
            }
            Some(Signal {
                signal_type: SignalType::PumpGraduation,
                chain,
                explanation: format!(
                    "Token is {:.2}% through bonding curve (threshold: {}-{}%) with {} holders. \
                     Imminent graduation to DEX expected.",
                    progress, params.min_progress, params.max_progress, holder_count
                ),
                metrics: json!({
                    "progress_pct": (progress * 100.0).round() / 100.0,
                    "holder_count": holder_count,
                    "sniper_count": token.sniper_count.unwrap_or(0),
                    "market_cap": token.market_cap,
                }),
                address: token.address,
                symbol: token.symbol,
            })
        })
        .collect()
}

/// Freshly listed pairs that launched with unusually deep liquidity.
pub async fn early_gem_signals(
    upstream: &UpstreamClient,
    chain: Chain,
    params: &EarlyGemParams,
) -> Result<Vec<Signal>, SentinelError> {
    let pairs = upstream
        .get_new_pairs(chain, SCAN_LIMIT)
        .await?
        .into_inner();
    let signals = filter_early_gems(pairs, chain, params, Utc::now().timestamp());
    info!("early-gem scan on {}: {} signals", chain, signals.len());
    Ok(signals)
}

pub fn filter_early_gems(
    pairs: Vec<NewPair>,
    chain: Chain,
    params: &EarlyGemParams,
    now: i64,
) -> Vec<Signal> {
    pairs
        .into_iter()
        .filter_map(|pair| {
            if pair.address.is_empty() {
                return None;
            }
            let listed_at = pair.listed_at()?;
            let age_minutes = (now - listed_at) as f64 / 60.0;
            let liquidity = pair.liquidity.unwrap_or(0.0);
            if age_minutes > params.max_age_minutes || liquidity < params.min_liquidity {
                return None;
            }
            Some(Signal {
                signal_type: SignalType::EarlyGem,
                chain,
                explanation: format!(
                    "New pair launched {:.1}m ago with high liquidity (${:.0} > ${:.0}). \
                     Potential strong launch.",
                    age_minutes, liquidity, params.min_liquidity
                ),
                metrics: json!({
                    "age_minutes": (age_minutes * 10.0).round() / 10.0,
                    "liquidity": liquidity,
                    "initial_liquidity": pair.initial_liquidity,
                    "bot_degen_count": pair.bot_degen_count.unwrap_or(0),
                }),
                address: pair.address,
                symbol: pair.symbol,
            })
        })
        .collect()
}

/// Trending tokens turning over a large share of their market cap with a
/// strong price move.
pub async fn momentum_signals(
    trending: &TrendingService,
    chain: Chain,
    params: &MomentumParams,
) -> Result<Vec<Signal>, SentinelError> {
    let tokens = trending.trending_cached(chain, params.timeframe).await?;
    let signals = filter_momentum(tokens, chain, params);
    info!("momentum scan on {}: {} signals", chain, signals.len());
    Ok(signals)
}

pub fn filter_momentum(
    tokens: Vec<TrendingToken>,
    chain: Chain,
    params: &MomentumParams,
) -> Vec<Signal> {
    tokens
        .into_iter()
        .filter_map(|token| {
            if token.address.is_empty() {
                return None;
            }
            let volume = token.volume?;
            let market_cap = token.market_cap.filter(|m| *m > 0.0)?;
            let ratio = volume / market_cap;
            let price_change = token.price_change_percent.unwrap_or(0.0);
            if ratio < params.min_vol_mcap_ratio || price_change < params.min_price_change {
                return None;
            }
            Some(Signal {
                signal_type: SignalType::Momentum,
                chain,
                explanation: format!(
                    "Turnover at {:.2}x market cap with {:+.1}% price move over {}.",
                    ratio, price_change, params.timeframe
                ),
                metrics: json!({
                    "vol_mcap_ratio": (ratio * 100.0).round() / 100.0,
                    "price_change_percent": price_change,
                    "volume": volume,
                    "market_cap": market_cap,
                }),
                address: token.address,
                symbol: token.symbol,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graduation_filters_progress_window_and_holders() {
        let tokens = vec![
            CompletionToken {
                address: "ready".into(),
                symbol: Some("RDY".into()),
                progress: Some(0.97),
                holder_count: Some(120),
                ..Default::default()
            },
            CompletionToken {
                address: "early".into(),
                progress: Some(0.40),
                holder_count: Some(500),
                ..Default::default()
            },
            CompletionToken {
                address: "dead".into(),
                progress: Some(99.0),
                holder_count: Some(3),
                ..Default::default()
            },
            CompletionToken {
                address: "no-progress".into(),
                progress: None,
                holder_count: Some(500),
                ..Default::default()
            },
        ];

        let signals = filter_graduation(tokens, Chain::Sol, &GraduationParams::default());
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].address, "ready");
        assert_eq!(signals[0].signal_type, SignalType::PumpGraduation);
        assert_eq!(signals[0].metrics["progress_pct"], 97.0);
    }

    #[test]
    fn early_gems_respect_age_ceiling_and_liquidity_floor() {
        let now = 1_700_000_000;
        let pairs = vec![
            NewPair {
                address: "fresh".into(),
                liquidity: Some(12_000.0),
                open_timestamp: Some(now - 10 * 60),
                ..Default::default()
            },
            NewPair {
                address: "stale".into(),
                liquidity: Some(50_000.0),
                open_timestamp: Some(now - 3 * 3600),
                ..Default::default()
            },
            NewPair {
                address: "shallow".into(),
                liquidity: Some(800.0),
                creation_timestamp: Some(now - 5 * 60),
                ..Default::default()
            },
        ];

        let signals =
            filter_early_gems(pairs, Chain::Base, &EarlyGemParams::default(), now);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].address, "fresh");
        assert_eq!(signals[0].metrics["age_minutes"], 10.0);
    }

    #[test]
    fn momentum_requires_both_turnover_and_price_move() {
        let tokens = vec![
            TrendingToken {
                address: "mover".into(),
                volume: Some(600_000.0),
                market_cap: Some(400_000.0),
                price_change_percent: Some(22.0),
                ..Default::default()
            },
            TrendingToken {
                address: "churner".into(),
                volume: Some(900_000.0),
                market_cap: Some(500_000.0),
                price_change_percent: Some(-4.0),
                ..Default::default()
            },
            TrendingToken {
                address: "sleeper".into(),
                volume: Some(10_000.0),
                market_cap: Some(5_000_000.0),
                price_change_percent: Some(40.0),
                ..Default::default()
            },
            TrendingToken {
                address: "zero-cap".into(),
                volume: Some(10_000.0),
                market_cap: Some(0.0),
                price_change_percent: Some(40.0),
                ..Default::default()
            },
        ];

        let signals = filter_momentum(tokens, Chain::Sol, &MomentumParams::default());
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].address, "mover");
        assert_eq!(signals[0].metrics["vol_mcap_ratio"], 1.5);
    }
}
