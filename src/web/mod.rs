//! Web API module for gmgn-sentinel
//!
//! Thin HTTP surface over the analysis services. Handlers translate
//! query parameters and map typed errors to status codes; everything
//! else lives in the core modules.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use crate::ai::AiAssessor;
use crate::analysis::deep::DeepAnalysisEngine;
use crate::analysis::trending::TrendingService;
use crate::config::Config;
use crate::upstream::UpstreamClient;

/// Shared application state for all API handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Dual-strategy upstream fetcher
    pub upstream: Arc<UpstreamClient>,
    /// Cached trending access + consistency aggregator
    pub trending: Arc<TrendingService>,
    /// Per-token deep analysis engine
    pub deep: Arc<DeepAnalysisEngine>,
    /// LLM assessor; None when no provider key is configured
    pub assessor: Option<Arc<AiAssessor>>,
}

impl AppState {
    pub fn new(config: Arc<Config>, assessor: Option<Arc<AiAssessor>>) -> Self {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let upstream = Arc::new(UpstreamClient::new(
            &config.wrapper_base_url,
            &config.wrapper_api_key,
            &config.direct_base_url,
            timeout,
        ));
        let trending = Arc::new(TrendingService::new(
            upstream.clone(),
            Duration::from_secs(config.cache_ttl_secs),
        ));
        let deep = Arc::new(DeepAnalysisEngine::new(
            upstream.clone(),
            trending.clone(),
            config.trending_substitute_chains.clone(),
        ));

        Self {
            config,
            upstream,
            trending,
            deep,
            assessor,
        }
    }
}
