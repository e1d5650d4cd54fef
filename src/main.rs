use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod ai;
mod analysis;
mod cache;
mod config;
mod error;
mod models;
mod upstream;
mod web;

use crate::ai::AiAssessor;
use crate::config::Config;
use crate::web::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load environment variables
    dotenv().ok();

    let config = Arc::new(Config::load()?);
    info!("Configuration loaded successfully");

    // The AI assessor is optional: without a provider key the endpoint
    // reports unavailable instead of blocking startup.
    let assessor = match AiAssessor::from_config(&config) {
        Ok(assessor) => {
            info!("AI assessor initialized ({})", config.ai_provider);
            Some(Arc::new(assessor))
        }
        Err(e) => {
            warn!("AI assessment disabled: {}", e);
            None
        }
    };

    let state = AppState::new(config.clone(), assessor);
    info!(
        "Upstream clients and analysis services initialized (cache TTL {}s)",
        config.cache_ttl_secs
    );

    web::server::start_server(state, config).await
}
