//! Deep per-token analysis: concurrent sub-fetches, graceful degradation,
//! and the adaptive safety score.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::analysis::safety;
use crate::analysis::trending::TrendingService;
use crate::error::SentinelError;
use crate::models::chain::Chain;
use crate::models::report::{
    DeepReport, HolderSummary, MarketData, ReportSource, SocialPresence, SubFetchError,
};
use crate::models::token::{TokenInfo, TopBuyer, TrendingToken};
use crate::upstream::UpstreamClient;

/// Orchestrates the per-token sub-fetches and assembles the report.
///
/// Only the market-data sub-fetch is critical: without it there is
/// nothing meaningful to score and the call fails hard. Every other
/// failure is recorded in the report's error list and scored
/// conservatively instead of aborting.
pub struct DeepAnalysisEngine {
    upstream: Arc<UpstreamClient>,
    trending: Arc<TrendingService>,
    /// Chains where failed detail fetches fall back to the cached
    /// trending list instead of erroring (policy, not hard-coding).
    substitute_chains: Vec<Chain>,
}

impl DeepAnalysisEngine {
    pub fn new(
        upstream: Arc<UpstreamClient>,
        trending: Arc<TrendingService>,
        substitute_chains: Vec<Chain>,
    ) -> Self {
        Self {
            upstream,
            trending,
            substitute_chains,
        }
    }

    pub async fn analyze(&self, chain: Chain, address: &str) -> Result<DeepReport, SentinelError> {
        info!("starting deep analysis for {}/{}", chain, address);

        let (info_res, security_res, buyers_res) = tokio::join!(
            self.upstream.get_token_info(chain, address),
            self.upstream.get_security(chain, address),
            self.upstream.get_top_buyers(chain, address),
        );

        let mut errors: Vec<SubFetchError> = Vec::new();
        let mut source = ReportSource::Direct;
        let mut substitute_row: Option<TrendingToken> = None;

        let (market_data, socials) = match info_res {
            Ok(fetched) => {
                let info = fetched.into_inner();
                (market_from_info(&info), socials_from_info(&info))
            }
            Err(e) => {
                if !self.substitute_chains.contains(&chain) {
                    error!("market data unavailable for {}/{}: {}", chain, address, e);
                    return Err(e);
                }
                match self.trending.find_in_trending(chain, address).await {
                    Ok(Some(row)) => {
                        warn!(
                            "detail fetch failed for {}/{}; substituting cached trending data",
                            chain, address
                        );
                        errors.push(SubFetchError::new(
                            "token_info",
                            format!("substituted from cached trending list: {}", e),
                        ));
                        source = ReportSource::TrendingSubstitute;
                        let market = market_from_trending(&row);
                        substitute_row = Some(row);
                        (market, SocialPresence::default())
                    }
                    _ => {
                        error!(
                            "market data unavailable for {}/{} and token absent from trending cache",
                            chain, address
                        );
                        return Err(e);
                    }
                }
            }
        };

        let security = match security_res {
            Ok(fetched) => Some(fetched.into_inner()),
            Err(e) => {
                warn!("security sub-fetch degraded for {}/{}: {}", chain, address, e);
                errors.push(SubFetchError::new("security", e.to_string()));
                None
            }
        };

        let (mut holders, distribution_known) = match buyers_res {
            Ok(fetched) => (summarize_buyers(fetched.into_inner()), true),
            Err(e) => {
                warn!(
                    "top_buyers sub-fetch degraded for {}/{}: {}",
                    chain, address, e
                );
                errors.push(SubFetchError::new("top_buyers", e.to_string()));
                (HolderSummary::default(), false)
            }
        };

        // A trending row carries a few security and holder facts; surface
        // them when the dedicated fetches came back empty. They do not
        // lift the conservative scoring of the degraded dimensions.
        let mut security_section = security.clone().unwrap_or_default();
        if let Some(row) = &substitute_row {
            if security.is_none() {
                security_section.renounced_mint = row.renounced_mint;
                security_section.renounced_freeze_account = row.renounced_freeze_account;
            }
            if !distribution_known {
                holders.whale_concentration_top10 = row.top_10_holder_rate.map(|r| r * 100.0);
            }
        }

        let safety = safety::compute(
            &market_data,
            security.as_ref(),
            &holders,
            distribution_known,
            &socials,
            Utc::now().timestamp(),
        );

        info!(
            "deep analysis complete for {}/{}: score {}/100, {} degraded sub-fetches",
            chain,
            address,
            safety.score,
            errors.len()
        );

        Ok(DeepReport {
            address: address.to_string(),
            chain,
            source,
            market_data,
            security: security_section,
            holders,
            socials,
            safety,
            errors,
        })
    }
}

fn market_from_info(info: &TokenInfo) -> MarketData {
    MarketData {
        symbol: info.symbol.clone(),
        name: info.name.clone(),
        price: info.price,
        market_cap: info.market_cap,
        liquidity: info.liquidity,
        volume_24h: info.volume_24h,
        price_change_24h: info.price_change_24h,
        holder_count: info.holder_count,
        created_timestamp: info.created_timestamp,
    }
}

fn socials_from_info(info: &TokenInfo) -> SocialPresence {
    SocialPresence {
        twitter_username: info.twitter_username.clone(),
        website: info.website.clone(),
        telegram: info.telegram.clone(),
    }
}

fn market_from_trending(row: &TrendingToken) -> MarketData {
    MarketData {
        symbol: row.symbol.clone(),
        name: row.name.clone(),
        price: row.price,
        market_cap: row.market_cap,
        liquidity: row.liquidity,
        volume_24h: row.volume,
        price_change_24h: row.price_change_percent,
        holder_count: row.holder_count,
        created_timestamp: row.open_timestamp,
    }
}

/// Whale concentration across the returned buyer list: share of total
/// returned holdings sitting in the top ten wallets.
fn summarize_buyers(buyers: Vec<TopBuyer>) -> HolderSummary {
    let total: f64 = buyers.iter().filter_map(|b| b.amount).sum();
    let top10: f64 = buyers.iter().take(10).filter_map(|b| b.amount).sum();
    let whale_concentration_top10 = if total > 0.0 {
        Some((top10 / total * 10_000.0).round() / 100.0)
    } else {
        None
    };
    HolderSummary {
        top_buyers_count: Some(buyers.len()),
        whale_concentration_top10,
        top_holders: buyers.into_iter().take(10).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    const DAY: i64 = 86_400;

    fn engine_for(
        wrapper: &mockito::Server,
        direct: &mockito::Server,
        substitute_chains: Vec<Chain>,
    ) -> DeepAnalysisEngine {
        let upstream = Arc::new(UpstreamClient::new(
            &wrapper.url(),
            "test-key",
            &direct.url(),
            Duration::from_secs(2),
        ));
        let trending = Arc::new(TrendingService::new(
            upstream.clone(),
            Duration::from_secs(60),
        ));
        DeepAnalysisEngine::new(upstream, trending, substitute_chains)
    }

    fn market_body(now: i64) -> serde_json::Value {
        json!({
            "symbol": "TEST", "name": "Test Token",
            "price": 1.5, "market_cap": 1_000_000,
            "liquidity": 50_000, "volume": 100_000,
            "price_change_24h": 5.5, "holder_count": 500,
            "created_timestamp": now - 10 * DAY
        })
    }

    fn clean_security_body() -> serde_json::Value {
        json!({"security_info": {
            "is_honeypot": false, "is_open_source": true, "is_mintable": false
        }})
    }

    fn buyers_body() -> serde_json::Value {
        // 12 buyers, top ten hold 12/14 of returned supply (~85.7%).
        let buyers: Vec<_> = (0..12)
            .map(|i| json!({"address": format!("w{}", i), "amount": if i < 2 { 2.0 } else { 1.0 }}))
            .collect();
        json!({ "top_buyers": buyers })
    }

    #[tokio::test]
    async fn full_success_produces_clean_report() {
        let mut wrapper = mockito::Server::new_async().await;
        let direct = mockito::Server::new_async().await;
        let now = Utc::now().timestamp();

        wrapper
            .mock("GET", "/api/solana/token-info/T1")
            .with_body(market_body(now).to_string())
            .create_async()
            .await;
        wrapper
            .mock("GET", "/api/solana/security-info/T1")
            .with_body(clean_security_body().to_string())
            .create_async()
            .await;
        wrapper
            .mock("GET", "/api/solana/top-buyers/T1")
            .with_body(buyers_body().to_string())
            .create_async()
            .await;

        let engine = engine_for(&wrapper, &direct, vec![]);
        let report = engine.analyze(Chain::Sol, "T1").await.unwrap();

        assert!(report.errors.is_empty());
        assert_eq!(report.source, ReportSource::Direct);
        assert_eq!(report.market_data.symbol.as_deref(), Some("TEST"));
        assert_eq!(report.security.is_honeypot, Some(false));
        assert_eq!(report.holders.top_buyers_count, Some(12));
        // Whale concentration over the full list, not just the top slice.
        let conc = report.holders.whale_concentration_top10.unwrap();
        assert!((conc - 85.71).abs() < 0.1);
        // Liquidity 25 + holders (500, conc > 60 => 9-5) 4 + age 12 + security 30.
        assert_eq!(report.safety.score, 71);
    }

    #[tokio::test]
    async fn security_failure_degrades_instead_of_erroring() {
        let mut wrapper = mockito::Server::new_async().await;
        let mut direct = mockito::Server::new_async().await;
        let now = Utc::now().timestamp();

        wrapper
            .mock("GET", "/api/solana/token-info/T1")
            .with_body(market_body(now).to_string())
            .create_async()
            .await;
        wrapper
            .mock("GET", "/api/solana/security-info/T1")
            .with_status(500)
            .create_async()
            .await;
        direct
            .mock("GET", "/defi/quotation/v1/tokens/security/sol/T1")
            .with_status(403)
            .create_async()
            .await;
        wrapper
            .mock("GET", "/api/solana/top-buyers/T1")
            .with_body(buyers_body().to_string())
            .create_async()
            .await;

        let engine = engine_for(&wrapper, &direct, vec![]);
        let report = engine.analyze(Chain::Sol, "T1").await.unwrap();

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].operation, "security");
        assert_eq!(report.security.is_honeypot, None);
        // Security dimension forced to zero: strictly below the
        // all-success score for the same inputs.
        assert_eq!(report.safety.score, 41);
        assert!(report.safety.breakdown.iter().any(|l| l == "Security: 0/30"));
    }

    #[tokio::test]
    async fn holders_failure_lands_in_documented_band() {
        let mut wrapper = mockito::Server::new_async().await;
        let mut direct = mockito::Server::new_async().await;
        let now = Utc::now().timestamp();

        wrapper
            .mock("GET", "/api/solana/token-info/T1")
            .with_body(market_body(now).to_string())
            .create_async()
            .await;
        wrapper
            .mock("GET", "/api/solana/security-info/T1")
            .with_body(clean_security_body().to_string())
            .create_async()
            .await;
        wrapper
            .mock("GET", "/api/solana/top-buyers/T1")
            .with_status(500)
            .create_async()
            .await;
        direct
            .mock("GET", "/defi/quotation/v1/tokens/top_buyers/sol/T1")
            .with_status(403)
            .create_async()
            .await;

        let engine = engine_for(&wrapper, &direct, vec![]);
        let report = engine.analyze(Chain::Sol, "T1").await.unwrap();

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].operation, "top_buyers");
        assert!((70..=90).contains(&report.safety.score));
        assert!(report.safety.breakdown.iter().any(|l| l == "Holders: 4/15"));
    }

    #[tokio::test]
    async fn market_failure_is_fatal_without_substitute_policy() {
        let mut wrapper = mockito::Server::new_async().await;
        let mut direct = mockito::Server::new_async().await;

        wrapper
            .mock("GET", "/api/ethereum/token-info/0xdead")
            .with_status(502)
            .create_async()
            .await;
        direct
            .mock("GET", "/defi/quotation/v1/tokens/eth/0xdead")
            .with_status(403)
            .create_async()
            .await;

        let engine = engine_for(&wrapper, &direct, vec![Chain::Bsc]);
        let err = engine.analyze(Chain::Eth, "0xdead").await.unwrap_err();
        assert!(matches!(
            err,
            SentinelError::UpstreamUnavailable {
                operation: "token_info",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn substitute_chain_falls_back_to_trending_cache() {
        let mut wrapper = mockito::Server::new_async().await;
        let direct = mockito::Server::new_async().await;
        let now = Utc::now().timestamp();

        // All three detail fetches fail at the wrapper; the direct server
        // has no mocks, so fallbacks fail too.
        for path in [
            "/api/binance/token-info/0xbsc",
            "/api/binance/security-info/0xbsc",
            "/api/binance/top-buyers/0xbsc",
        ] {
            wrapper.mock("GET", path).with_status(502).create_async().await;
        }
        wrapper
            .mock("GET", "/api/binance/trending-tokens?timeframe=1h")
            .with_body(
                json!({"tokens": [{
                    "address": "0xbsc", "symbol": "BTOK",
                    "volume": 80_000, "market_cap": 3_000_000,
                    "holder_count": 900, "open_timestamp": now - 40 * DAY,
                    "top_10_holder_rate": 0.35, "renounced_mint": 1
                }]})
                .to_string(),
            )
            .create_async()
            .await;

        let engine = engine_for(&wrapper, &direct, vec![Chain::Bsc]);
        let report = engine.analyze(Chain::Bsc, "0xbsc").await.unwrap();

        assert_eq!(report.source, ReportSource::TrendingSubstitute);
        assert_eq!(report.errors.len(), 3);
        assert!(report.errors.iter().any(|e| e.operation == "token_info"));
        assert_eq!(report.market_data.symbol.as_deref(), Some("BTOK"));
        assert_eq!(report.security.renounced_mint, Some(true));
        assert_eq!(report.holders.whale_concentration_top10, Some(35.0));
        // Liquidity unknown from the trending row and security fetch
        // degraded: both dimensions bottom out.
        assert!(report.safety.breakdown.iter().any(|l| l == "Liquidity: 0/30"));
        assert!(report.safety.breakdown.iter().any(|l| l == "Security: 0/30"));
    }
}
