//! Request handlers for all API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::error;

use super::models::*;
use super::AppState;
use crate::analysis::signals::{
    self, EarlyGemParams, GraduationParams, MomentumParams,
};
use crate::analysis::trending::AggregationParams;
use crate::error::SentinelError;
use crate::models::ai::{AssessmentRequest, AssessmentResponse};
use crate::models::chain::{Chain, Timeframe};
use crate::models::report::DeepReport;
use crate::models::signal::Signal;
use crate::models::token::{
    CompletionToken, ConsistentToken, NewPair, SecurityInfo, TokenInfo, TopBuyer, TrendingToken,
};

type HandlerError = (StatusCode, Json<ErrorResponse>);
type HandlerResult<T> = Result<Json<T>, HandlerError>;

/// Map a typed core error to the HTTP surface.
fn error_response(err: SentinelError) -> HandlerError {
    let status = match &err {
        SentinelError::UnsupportedChain(_) | SentinelError::UnsupportedTimeframe(_) => {
            StatusCode::BAD_REQUEST
        }
        SentinelError::UpstreamUnavailable { .. } | SentinelError::AssessmentError(_) => {
            StatusCode::BAD_GATEWAY
        }
        SentinelError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            details: None,
        }),
    )
}

fn parse_chain(raw: Option<&str>) -> Result<Chain, HandlerError> {
    raw.unwrap_or("sol").parse::<Chain>().map_err(error_response)
}

fn parse_timeframe(raw: Option<&str>) -> Result<Timeframe, HandlerError> {
    raw.unwrap_or("1h")
        .parse::<Timeframe>()
        .map_err(error_response)
}

// ============================================================================
// Health
// ============================================================================

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

// ============================================================================
// Analysis
// ============================================================================

pub async fn analysis_trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingAnalysisQuery>,
) -> HandlerResult<Vec<ConsistentToken>> {
    let chain = parse_chain(query.chain.as_deref())?;
    let defaults = AggregationParams::default();
    let params = AggregationParams {
        min_consistency: query.min_consistency.unwrap_or(defaults.min_consistency),
        volume_threshold: query.volume_threshold.unwrap_or(defaults.volume_threshold),
        market_cap_threshold: query
            .market_cap_threshold
            .unwrap_or(defaults.market_cap_threshold),
    };

    state
        .trending
        .aggregate(chain, &params)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn analysis_deep(
    State(state): State<AppState>,
    Path((chain, address)): Path<(String, String)>,
) -> HandlerResult<DeepReport> {
    let chain = chain.parse::<Chain>().map_err(error_response)?;
    state
        .deep
        .analyze(chain, &address)
        .await
        .map(Json)
        .map_err(error_response)
}

// ============================================================================
// Signals
// ============================================================================

pub async fn signals_graduation(
    State(state): State<AppState>,
    Query(query): Query<GraduationQuery>,
) -> HandlerResult<Vec<Signal>> {
    let chain = parse_chain(query.chain.as_deref())?;
    let defaults = GraduationParams::default();
    let params = GraduationParams {
        min_progress: query.min_progress.unwrap_or(defaults.min_progress),
        max_progress: query.max_progress.unwrap_or(defaults.max_progress),
        min_holders: query.min_holders.unwrap_or(defaults.min_holders),
    };

    signals::graduation_signals(&state.upstream, chain, &params)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn signals_early_gems(
    State(state): State<AppState>,
    Query(query): Query<EarlyGemQuery>,
) -> HandlerResult<Vec<Signal>> {
    let chain = parse_chain(query.chain.as_deref())?;
    let defaults = EarlyGemParams::default();
    let params = EarlyGemParams {
        min_liquidity: query.min_liquidity.unwrap_or(defaults.min_liquidity),
        max_age_minutes: query.max_age_minutes.unwrap_or(defaults.max_age_minutes),
    };

    signals::early_gem_signals(&state.upstream, chain, &params)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn signals_momentum(
    State(state): State<AppState>,
    Query(query): Query<MomentumQuery>,
) -> HandlerResult<Vec<Signal>> {
    let chain = parse_chain(query.chain.as_deref())?;
    let defaults = MomentumParams::default();
    let params = MomentumParams {
        timeframe: parse_timeframe(query.timeframe.as_deref())?,
        min_vol_mcap_ratio: query
            .min_vol_mcap_ratio
            .unwrap_or(defaults.min_vol_mcap_ratio),
        min_price_change: query.min_price_change.unwrap_or(defaults.min_price_change),
    };

    signals::momentum_signals(&state.trending, chain, &params)
        .await
        .map(Json)
        .map_err(error_response)
}

// ============================================================================
// Market pass-through
// ============================================================================

pub async fn market_trending(
    State(state): State<AppState>,
    Query(query): Query<MarketTrendingQuery>,
) -> HandlerResult<Vec<TrendingToken>> {
    let chain = parse_chain(query.chain.as_deref())?;
    let timeframe = parse_timeframe(query.timeframe.as_deref())?;
    state
        .trending
        .trending_cached(chain, timeframe)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn market_new_pairs(
    State(state): State<AppState>,
    Query(query): Query<MarketListQuery>,
) -> HandlerResult<Vec<NewPair>> {
    let chain = parse_chain(query.chain.as_deref())?;
    let limit = query.limit.unwrap_or(50).min(50);
    state
        .upstream
        .get_new_pairs(chain, limit)
        .await
        .map(|fetched| Json(fetched.into_inner()))
        .map_err(error_response)
}

pub async fn market_completion(
    State(state): State<AppState>,
    Query(query): Query<MarketListQuery>,
) -> HandlerResult<Vec<CompletionToken>> {
    let chain = parse_chain(query.chain.as_deref())?;
    let limit = query.limit.unwrap_or(50).min(50);
    state
        .upstream
        .get_tokens_by_completion(chain, limit)
        .await
        .map(|fetched| Json(fetched.into_inner()))
        .map_err(error_response)
}

// ============================================================================
// Token detail pass-through
// ============================================================================

pub async fn token_info(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<ChainQuery>,
) -> HandlerResult<TokenInfo> {
    let chain = parse_chain(query.chain.as_deref())?;
    state
        .upstream
        .get_token_info(chain, &address)
        .await
        .map(|fetched| Json(fetched.into_inner()))
        .map_err(error_response)
}

pub async fn token_security(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<ChainQuery>,
) -> HandlerResult<SecurityInfo> {
    let chain = parse_chain(query.chain.as_deref())?;
    state
        .upstream
        .get_security(chain, &address)
        .await
        .map(|fetched| Json(fetched.into_inner()))
        .map_err(error_response)
}

pub async fn token_top_buyers(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<ChainQuery>,
) -> HandlerResult<Vec<TopBuyer>> {
    let chain = parse_chain(query.chain.as_deref())?;
    state
        .upstream
        .get_top_buyers(chain, &address)
        .await
        .map(|fetched| Json(fetched.into_inner()))
        .map_err(error_response)
}

// ============================================================================
// AI assessment
// ============================================================================

pub async fn ai_assess(
    State(state): State<AppState>,
    Json(request): Json<AssessmentRequest>,
) -> HandlerResult<AssessmentResponse> {
    let assessor = state.assessor.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "AI assessment is not configured".to_string(),
                details: Some("Set AI_PROVIDER and the matching API key".to_string()),
            }),
        )
    })?;

    assessor.assess(&request).await.map(Json).map_err(|e| {
        error!("AI assessment failed: {}", e);
        error_response(e)
    })
}
