//! Typed logical operations over the two access strategies.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

use crate::error::SentinelError;
use crate::models::chain::{Chain, Timeframe};
use crate::models::token::{
    CompletionToken, NewPair, SecurityInfo, TokenInfo, TopBuyer, TrendingToken,
};

use super::direct::DirectClient;
use super::wrapper::WrapperClient;

/// Outcome tag for a successful fetch.
///
/// `Partial` means the fallback strategy answered; its field set may be
/// smaller than the wrapper's and downstream scoring treats missing
/// fields conservatively.
#[derive(Debug, Clone)]
pub enum Fetched<T> {
    Full(T),
    Partial(T),
}

impl<T> Fetched<T> {
    pub fn into_inner(self) -> T {
        match self {
            Fetched::Full(v) | Fetched::Partial(v) => v,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Fetched::Partial(_))
    }
}

/// Fetcher for the fixed set of logical upstream operations.
///
/// Per operation: one primary attempt through the hosted wrapper, then at
/// most one direct-scrape fallback attempt. No internal retry loops;
/// freshness comes from the cache TTL and caller cadence.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    wrapper: WrapperClient,
    direct: DirectClient,
}

impl UpstreamClient {
    pub fn new(
        wrapper_base_url: &str,
        wrapper_api_key: &str,
        direct_base_url: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            wrapper: WrapperClient::new(wrapper_base_url, wrapper_api_key, timeout),
            direct: DirectClient::new(direct_base_url, timeout),
        }
    }

    /// Trending list for one timeframe.
    pub async fn get_trending(
        &self,
        chain: Chain,
        timeframe: Timeframe,
    ) -> Result<Fetched<Vec<TrendingToken>>, SentinelError> {
        const OP: &str = "trending";
        let endpoint = format!(
            "/{}/trending-tokens?timeframe={}",
            chain.wrapper_path(),
            timeframe
        );
        let primary_err = match self.wrapper.get_json(&endpoint).await {
            Ok(payload) => match parse_list(&payload, &["tokens", "rank"]) {
                Ok(tokens) => return Ok(Fetched::Full(tokens)),
                Err(e) => e,
            },
            Err(e) => e,
        };
        warn!(
            "trending primary failed for {}/{}: {}; trying direct scrape",
            chain, timeframe, primary_err
        );

        // The upstream rank endpoint rejects the 1m window without an
        // explicit limit.
        let limit = if timeframe == Timeframe::M1 { "&limit=20" } else { "" };
        let path = format!(
            "/defi/quotation/v1/rank/{}/swaps/{}?orderby=swaps&direction=desc{}",
            chain.short_code(),
            timeframe,
            limit
        );
        match self.direct.get_data(&path, chain).await {
            Ok(data) => parse_list(&data, &["rank", "tokens"])
                .map(Fetched::Partial)
                .map_err(|e| SentinelError::upstream(OP, &primary_err, &e)),
            Err(e) => Err(SentinelError::upstream(OP, &primary_err, &e)),
        }
    }

    /// Market detail for a single token.
    pub async fn get_token_info(
        &self,
        chain: Chain,
        address: &str,
    ) -> Result<Fetched<TokenInfo>, SentinelError> {
        const OP: &str = "token_info";
        let endpoint = format!("/{}/token-info/{}", chain.wrapper_path(), address);
        let primary_err = match self.wrapper.get_json(&endpoint).await {
            Ok(payload) => match parse_object(&payload, &["token"]) {
                Ok(info) => return Ok(Fetched::Full(info)),
                Err(e) => e,
            },
            Err(e) => e,
        };
        warn!(
            "token_info primary failed for {}/{}: {}; trying direct scrape",
            chain, address, primary_err
        );

        let path = format!(
            "/defi/quotation/v1/tokens/{}/{}",
            chain.short_code(),
            address
        );
        match self.direct.get_data(&path, chain).await {
            Ok(data) => parse_object(&data, &["token"])
                .map(Fetched::Partial)
                .map_err(|e| SentinelError::upstream(OP, &primary_err, &e)),
            Err(e) => Err(SentinelError::upstream(OP, &primary_err, &e)),
        }
    }

    /// Contract security flags for a single token.
    pub async fn get_security(
        &self,
        chain: Chain,
        address: &str,
    ) -> Result<Fetched<SecurityInfo>, SentinelError> {
        const OP: &str = "security";
        let endpoint = format!("/{}/security-info/{}", chain.wrapper_path(), address);
        let primary_err = match self.wrapper.get_json(&endpoint).await {
            Ok(payload) => match parse_object(&payload, &["security_info"]) {
                Ok(info) => return Ok(Fetched::Full(info)),
                Err(e) => e,
            },
            Err(e) => e,
        };
        warn!(
            "security primary failed for {}/{}: {}; trying direct scrape",
            chain, address, primary_err
        );

        let path = format!(
            "/defi/quotation/v1/tokens/security/{}/{}",
            chain.short_code(),
            address
        );
        match self.direct.get_data(&path, chain).await {
            Ok(data) => parse_object(&data, &["security_info"])
                .map(Fetched::Partial)
                .map_err(|e| SentinelError::upstream(OP, &primary_err, &e)),
            Err(e) => Err(SentinelError::upstream(OP, &primary_err, &e)),
        }
    }

    /// Top buyers / largest holders of a single token.
    pub async fn get_top_buyers(
        &self,
        chain: Chain,
        address: &str,
    ) -> Result<Fetched<Vec<TopBuyer>>, SentinelError> {
        const OP: &str = "top_buyers";
        let endpoint = format!("/{}/top-buyers/{}", chain.wrapper_path(), address);
        let primary_err = match self.wrapper.get_json(&endpoint).await {
            Ok(payload) => match parse_list(&payload, &["top_buyers", "holders"]) {
                Ok(buyers) => return Ok(Fetched::Full(buyers)),
                Err(e) => e,
            },
            Err(e) => e,
        };
        warn!(
            "top_buyers primary failed for {}/{}: {}; trying direct scrape",
            chain, address, primary_err
        );

        let path = format!(
            "/defi/quotation/v1/tokens/top_buyers/{}/{}",
            chain.short_code(),
            address
        );
        match self.direct.get_data(&path, chain).await {
            Ok(data) => parse_list(&data, &["top_buyers", "holders"])
                .map(Fetched::Partial)
                .map_err(|e| SentinelError::upstream(OP, &primary_err, &e)),
            Err(e) => Err(SentinelError::upstream(OP, &primary_err, &e)),
        }
    }

    /// Freshly listed pairs. Wrapper-only: the upstream has no stable
    /// scrape endpoint for this list.
    pub async fn get_new_pairs(
        &self,
        chain: Chain,
        limit: u32,
    ) -> Result<Fetched<Vec<NewPair>>, SentinelError> {
        const OP: &str = "new_pairs";
        let endpoint = format!("/{}/new-pairs?limit={}", chain.wrapper_path(), limit);
        self.wrapper_only(OP, &endpoint, &["pairs", "tokens"]).await
    }

    /// Tokens ordered by bonding-curve completion. Wrapper-only.
    pub async fn get_tokens_by_completion(
        &self,
        chain: Chain,
        limit: u32,
    ) -> Result<Fetched<Vec<CompletionToken>>, SentinelError> {
        const OP: &str = "tokens_by_completion";
        let endpoint = format!(
            "/{}/tokens-by-completion?limit={}",
            chain.wrapper_path(),
            limit
        );
        self.wrapper_only(OP, &endpoint, &["tokens", "rank"]).await
    }

    async fn wrapper_only<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        endpoint: &str,
        keys: &[&str],
    ) -> Result<Fetched<Vec<T>>, SentinelError> {
        let reason = match self.wrapper.get_json(endpoint).await {
            Ok(payload) => match parse_list(&payload, keys) {
                Ok(items) => return Ok(Fetched::Full(items)),
                Err(e) => e,
            },
            Err(e) => e,
        };
        Err(SentinelError::upstream(
            operation,
            &reason,
            "no direct fallback for this operation",
        ))
    }
}

/// Pull a list out of a payload that is either the list itself or an
/// object carrying it under one of `keys`.
fn parse_list<T: DeserializeOwned>(value: &Value, keys: &[&str]) -> Result<Vec<T>, String> {
    let list = if value.is_array() {
        value
    } else {
        keys.iter()
            .find_map(|k| value.get(*k))
            .filter(|v| v.is_array())
            .ok_or_else(|| format!("no list under any of {:?}", keys))?
    };
    serde_json::from_value(list.clone()).map_err(|e| format!("decode failed: {}", e))
}

/// Pull an object out of a payload that may nest it under one of `keys`.
fn parse_object<T: DeserializeOwned>(value: &Value, keys: &[&str]) -> Result<T, String> {
    let obj = keys
        .iter()
        .find_map(|k| value.get(*k))
        .filter(|v| v.is_object())
        .unwrap_or(value);
    serde_json::from_value(obj.clone()).map_err(|e| format!("decode failed: {}", e))
}
