//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::AppState;

/// Create all API routes
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Aggregated analysis
        .route("/api/v1/analysis/trending", get(handlers::analysis_trending))
        .route(
            "/api/v1/analysis/deep/:chain/:address",
            get(handlers::analysis_deep),
        )

        // Signal scanners
        .route(
            "/api/v1/signals/pump-graduation",
            get(handlers::signals_graduation),
        )
        .route("/api/v1/signals/early-gems", get(handlers::signals_early_gems))
        .route("/api/v1/signals/momentum", get(handlers::signals_momentum))

        // Market pass-through
        .route(
            "/api/v1/market/tokens/trending",
            get(handlers::market_trending),
        )
        .route("/api/v1/market/pairs/new", get(handlers::market_new_pairs))
        .route(
            "/api/v1/market/tokens/pump-completion",
            get(handlers::market_completion),
        )

        // Token detail pass-through
        .route("/api/v1/tokens/:address/info", get(handlers::token_info))
        .route(
            "/api/v1/tokens/:address/security",
            get(handlers::token_security),
        )
        .route(
            "/api/v1/tokens/:address/top-buyers",
            get(handlers::token_top_buyers),
        )

        // AI assessment
        .route("/api/v1/ai/assess", post(handlers::ai_assess))

        // Add state to all routes
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let config = Config {
            api_host: None,
            api_port: None,
            wrapper_base_url: "http://127.0.0.1:1".to_string(),
            wrapper_api_key: "test-key".to_string(),
            direct_base_url: "http://127.0.0.1:1".to_string(),
            trending_substitute_chains: vec![],
            cache_ttl_secs: 60,
            request_timeout_secs: 1,
            ai_provider: "anthropic".to_string(),
            ai_model: "test".to_string(),
            anthropic_api_key: None,
            openai_api_key: None,
        };
        AppState::new(Arc::new(config), None)
    }

    #[tokio::test]
    async fn health_endpoint_responds_ok() {
        let app = create_routes(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unsupported_chain_is_rejected_before_any_fetch() {
        let app = create_routes(test_state());
        // The configured upstream endpoints are unroutable; a 400 here
        // proves validation happens before any network call.
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/analysis/trending?chain=dogechain")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deep_analysis_validates_path_chain() {
        let app = create_routes(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/analysis/deep/tron/some-address")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn ai_assess_without_provider_is_service_unavailable() {
        let app = create_routes(test_state());
        let body = serde_json::json!({
            "token": {"name": "T", "symbol": "T", "address": "a", "chain": "sol"},
            "security": {}
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/ai/assess")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
