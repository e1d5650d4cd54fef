use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

use crate::models::chain::Chain;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub api_host: Option<String>,
    pub api_port: Option<u16>,

    // Hosted wrapper (primary strategy)
    pub wrapper_base_url: String,
    pub wrapper_api_key: String,

    // Direct scrape target (fallback strategy)
    pub direct_base_url: String,

    // Chains where per-token detail scraping is unreliable; the deep engine
    // substitutes data from the cached trending list instead of erroring.
    pub trending_substitute_chains: Vec<Chain>,

    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,

    // AI assessment provider
    pub ai_provider: String,
    pub ai_model: String,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let trending_substitute_chains = env::var("TRENDING_SUBSTITUTE_CHAINS")
            .unwrap_or_else(|_| "bsc".to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<Chain>().map_err(anyhow::Error::from))
            .collect::<Result<Vec<_>>>()
            .context("Failed to parse TRENDING_SUBSTITUTE_CHAINS")?;

        Ok(Self {
            api_host: env::var("API_HOST").ok(),
            api_port: env::var("API_PORT")
                .ok()
                .map(|v| v.parse().context("Failed to parse API_PORT"))
                .transpose()?,

            wrapper_base_url: env::var("GMGN_WRAPPER_URL")
                .context("GMGN_WRAPPER_URL not set in environment")?,
            wrapper_api_key: env::var("GMGN_API_KEY")
                .context("GMGN_API_KEY not set in environment")?,

            direct_base_url: env::var("GMGN_DIRECT_URL")
                .unwrap_or_else(|_| "https://gmgn.ai".to_string()),

            trending_substitute_chains,

            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),

            ai_provider: env::var("AI_PROVIDER").unwrap_or_else(|_| "anthropic".to_string()),
            ai_model: env::var("AI_MODEL")
                .unwrap_or_else(|_| "claude-3-5-sonnet-latest".to_string()),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
        })
    }
}
