use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentinelError {
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(String),

    #[error("Unsupported timeframe: {0}")]
    UnsupportedTimeframe(String),

    #[error("Upstream unavailable for {operation}: {reason}")]
    UpstreamUnavailable {
        operation: &'static str,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("AI assessment error: {0}")]
    AssessmentError(String),
}

impl SentinelError {
    /// Both strategies failed for one logical operation.
    pub fn upstream(operation: &'static str, primary: &str, fallback: &str) -> Self {
        SentinelError::UpstreamUnavailable {
            operation,
            reason: format!("primary: {}; fallback: {}", primary, fallback),
        }
    }
}
