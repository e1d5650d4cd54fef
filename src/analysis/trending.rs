//! Trending list access and cross-timeframe consistency aggregation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::error::SentinelError;
use crate::models::chain::{Chain, Timeframe, ALL_TIMEFRAMES};
use crate::models::token::{ConsistentToken, TrendingToken};
use crate::upstream::UpstreamClient;

#[derive(Debug, Clone)]
pub struct AggregationParams {
    /// Minimum number of timeframes a token must appear in.
    pub min_consistency: usize,
    pub volume_threshold: f64,
    pub market_cap_threshold: f64,
}

impl Default for AggregationParams {
    fn default() -> Self {
        Self {
            min_consistency: 3,
            volume_threshold: 1_000.0,
            market_cap_threshold: 10_000.0,
        }
    }
}

/// Cached trending access plus the consistency aggregator.
///
/// Each chain+timeframe list is cached independently under its own key so
/// one expiring does not force refetching the others.
pub struct TrendingService {
    upstream: Arc<UpstreamClient>,
    cache: TtlCache<Vec<TrendingToken>>,
    ttl: Duration,
}

impl TrendingService {
    pub fn new(upstream: Arc<UpstreamClient>, ttl: Duration) -> Self {
        Self {
            upstream,
            cache: TtlCache::new(),
            ttl,
        }
    }

    /// Trending list for one timeframe, served from cache within the TTL.
    pub async fn trending_cached(
        &self,
        chain: Chain,
        timeframe: Timeframe,
    ) -> Result<Vec<TrendingToken>, SentinelError> {
        let key = format!("trending:{}:{}", chain, timeframe);
        self.cache
            .get_or_fetch(&key, self.ttl, || async move {
                Ok(self
                    .upstream
                    .get_trending(chain, timeframe)
                    .await?
                    .into_inner())
            })
            .await
    }

    /// Look a token up in the cached 1h trending list (the most
    /// comprehensive window). Used as a substitute data source on chains
    /// where per-token detail scraping is unreliable.
    pub async fn find_in_trending(
        &self,
        chain: Chain,
        address: &str,
    ) -> Result<Option<TrendingToken>, SentinelError> {
        let list = self.trending_cached(chain, Timeframe::H1).await?;
        Ok(list.into_iter().find(|t| t.address == address))
    }

    /// Find tokens trending consistently across all scanned timeframes.
    ///
    /// All five timeframe lists are fetched concurrently through the
    /// cache; any single fetch failure fails the whole request rather
    /// than aggregating a partial view. The fold runs in fixed timeframe
    /// order, so concurrent fetch completion order never changes the
    /// output set.
    pub async fn aggregate(
        &self,
        chain: Chain,
        params: &AggregationParams,
    ) -> Result<Vec<ConsistentToken>, SentinelError> {
        debug!("aggregating trending consistency for {}", chain);
        let fetches = ALL_TIMEFRAMES
            .iter()
            .map(|tf| self.trending_cached(chain, *tf));
        let results = join_all(fetches).await;

        let mut lists = Vec::with_capacity(ALL_TIMEFRAMES.len());
        for (tf, result) in ALL_TIMEFRAMES.iter().zip(results) {
            lists.push((*tf, result?));
        }

        let mut by_address: HashMap<String, Accumulator> = HashMap::new();
        for (tf, tokens) in &lists {
            for token in tokens {
                if token.address.is_empty() {
                    continue;
                }
                by_address
                    .entry(token.address.clone())
                    .or_default()
                    .observe(*tf, token);
            }
        }

        let consistent: Vec<ConsistentToken> = by_address
            .into_iter()
            .filter_map(|(address, acc)| acc.finish(address, chain, params))
            .collect();

        info!(
            "consistency aggregation for {}: {} tokens past filters",
            chain,
            consistent.len()
        );
        Ok(consistent)
    }
}

#[derive(Default)]
struct Accumulator {
    symbol: Option<String>,
    timeframes: Vec<Timeframe>,
    // Latest observation in fixed timeframe order.
    volume: f64,
    market_cap: f64,
    price_sum: f64,
    price_change_sum: f64,
    samples: usize,
    holder_count: Option<u64>,
    top_10_holder_rate: Option<f64>,
}

impl Accumulator {
    fn observe(&mut self, tf: Timeframe, token: &TrendingToken) {
        if self.symbol.is_none() {
            self.symbol = token.symbol.clone();
        }
        if !self.timeframes.contains(&tf) {
            self.timeframes.push(tf);
        }
        self.volume = token.volume.unwrap_or(0.0);
        self.market_cap = token.market_cap.unwrap_or(0.0);
        self.price_sum += token.price.unwrap_or(0.0);
        self.price_change_sum += token.price_change_percent.unwrap_or(0.0);
        self.samples += 1;
        self.holder_count = self.holder_count.max(token.holder_count);
        if let Some(rate) = token.top_10_holder_rate {
            self.top_10_holder_rate =
                Some(self.top_10_holder_rate.map_or(rate, |r| r.max(rate)));
        }
    }

    fn finish(
        self,
        address: String,
        chain: Chain,
        params: &AggregationParams,
    ) -> Option<ConsistentToken> {
        let appearance_count = self.timeframes.len();
        if appearance_count < params.min_consistency
            || self.volume < params.volume_threshold
            || self.market_cap < params.market_cap_threshold
        {
            return None;
        }
        let samples = self.samples.max(1) as f64;
        Some(ConsistentToken {
            address,
            chain,
            symbol: self.symbol,
            appearance_count,
            timeframes: self
                .timeframes
                .iter()
                .map(|tf| tf.as_str().to_string())
                .collect(),
            volume: self.volume,
            market_cap: self.market_cap,
            avg_price: self.price_sum / samples,
            avg_price_change: self.price_change_sum / samples,
            holder_count: self.holder_count,
            top_10_holder_rate: self.top_10_holder_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service_for(wrapper: &mockito::Server) -> TrendingService {
        let upstream = Arc::new(UpstreamClient::new(
            &wrapper.url(),
            "test-key",
            "http://127.0.0.1:1", // fallback never reached in these tests
            Duration::from_secs(2),
        ));
        TrendingService::new(upstream, Duration::from_secs(60))
    }

    async fn mock_timeframe(
        server: &mut mockito::Server,
        timeframe: &str,
        tokens: serde_json::Value,
    ) -> mockito::Mock {
        server
            .mock(
                "GET",
                format!("/api/solana/trending-tokens?timeframe={}", timeframe).as_str(),
            )
            .with_status(200)
            .with_body(json!({ "tokens": tokens }).to_string())
            .expect(1)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn consistency_filter_keeps_repeat_performers_only() {
        let mut wrapper = mockito::Server::new_async().await;
        let a = json!({"address": "A", "symbol": "AAA", "volume": 5000, "market_cap": 50000});
        let b = json!({"address": "B", "symbol": "BBB", "volume": 9000, "market_cap": 90000});

        mock_timeframe(&mut wrapper, "1m", json!([a])).await;
        mock_timeframe(&mut wrapper, "5m", json!([a])).await;
        mock_timeframe(&mut wrapper, "1h", json!([a])).await;
        mock_timeframe(&mut wrapper, "6h", json!([])).await;
        mock_timeframe(&mut wrapper, "24h", json!([b])).await;

        let service = service_for(&wrapper);
        let params = AggregationParams {
            min_consistency: 3,
            volume_threshold: 1_000.0,
            market_cap_threshold: 10_000.0,
        };
        let result = service.aggregate(Chain::Sol, &params).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].address, "A");
        assert_eq!(result[0].appearance_count, 3);
    }

    #[tokio::test]
    async fn two_timeframe_token_passes_thresholds() {
        let mut wrapper = mockito::Server::new_async().await;
        let t1 = json!({
            "address": "T1", "symbol": "TONE",
            "volume": 50_000, "market_cap": 2_000_000
        });

        mock_timeframe(&mut wrapper, "1m", json!([])).await;
        mock_timeframe(&mut wrapper, "5m", json!([])).await;
        mock_timeframe(&mut wrapper, "1h", json!([t1])).await;
        mock_timeframe(&mut wrapper, "6h", json!([t1])).await;
        mock_timeframe(&mut wrapper, "24h", json!([])).await;

        let service = service_for(&wrapper);
        let params = AggregationParams {
            min_consistency: 2,
            volume_threshold: 1_000.0,
            market_cap_threshold: 10_000.0,
        };
        let result = service.aggregate(Chain::Sol, &params).await.unwrap();

        assert_eq!(result.len(), 1);
        let token = &result[0];
        assert_eq!(token.address, "T1");
        assert_eq!(token.appearance_count, 2);
        assert_eq!(token.volume, 50_000.0);
        assert_eq!(token.market_cap, 2_000_000.0);
        assert_eq!(token.timeframes, vec!["1h", "6h"]);
    }

    #[tokio::test]
    async fn repeat_aggregation_within_ttl_hits_upstream_once_per_timeframe() {
        let mut wrapper = mockito::Server::new_async().await;
        let mut mocks = Vec::new();
        for tf in ["1m", "5m", "1h", "6h", "24h"] {
            mocks.push(mock_timeframe(&mut wrapper, tf, json!([])).await);
        }

        let service = service_for(&wrapper);
        let params = AggregationParams::default();
        service.aggregate(Chain::Sol, &params).await.unwrap();
        service.aggregate(Chain::Sol, &params).await.unwrap();

        // expect(1) on each mock: second pass must be served from cache.
        for mock in mocks {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn single_timeframe_failure_fails_the_request() {
        let mut wrapper = mockito::Server::new_async().await;
        let mut direct = mockito::Server::new_async().await;
        for tf in ["1m", "5m", "6h", "24h"] {
            mock_timeframe(&mut wrapper, tf, json!([])).await;
        }
        wrapper
            .mock("GET", "/api/solana/trending-tokens?timeframe=1h")
            .with_status(500)
            .create_async()
            .await;
        direct
            .mock(
                "GET",
                "/defi/quotation/v1/rank/sol/swaps/1h?orderby=swaps&direction=desc",
            )
            .with_status(403)
            .create_async()
            .await;

        let upstream = Arc::new(UpstreamClient::new(
            &wrapper.url(),
            "test-key",
            &direct.url(),
            Duration::from_secs(2),
        ));
        let service = TrendingService::new(upstream, Duration::from_secs(60));
        let err = service
            .aggregate(Chain::Sol, &AggregationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SentinelError::UpstreamUnavailable { .. }));
    }
}
