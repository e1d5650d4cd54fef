//! LLM-backed token assessment (collaborator, not core).
//!
//! Takes a deep-report-shaped payload and asks the configured provider
//! for a verdict, risk level, and narrative. The core never depends on
//! this module; it only supplies the payload contract.

use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::SentinelError;
use crate::models::ai::{AssessmentRequest, AssessmentResponse};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str = "You are a crypto analysis AI assistant that outputs strict JSON.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provider {
    Anthropic,
    OpenAi,
}

#[derive(Debug, Clone)]
pub struct AiAssessor {
    provider: Provider,
    model: String,
    api_key: String,
    client: Client,
}

impl AiAssessor {
    /// Build the assessor from config, or fail if the selected provider
    /// has no API key.
    pub fn from_config(config: &Config) -> Result<Self, SentinelError> {
        let (provider, api_key) = match config.ai_provider.to_lowercase().as_str() {
            "anthropic" => (Provider::Anthropic, config.anthropic_api_key.clone()),
            "openai" => (Provider::OpenAi, config.openai_api_key.clone()),
            other => {
                return Err(SentinelError::ConfigError(format!(
                    "Unknown AI provider: {}",
                    other
                )))
            }
        };
        let api_key = api_key.ok_or_else(|| {
            SentinelError::ConfigError(format!(
                "No API key configured for AI provider {}",
                config.ai_provider
            ))
        })?;

        Ok(Self {
            provider,
            model: config.ai_model.clone(),
            api_key,
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .expect("Failed to create HTTP client for AI provider"),
        })
    }

    pub async fn assess(
        &self,
        request: &AssessmentRequest,
    ) -> Result<AssessmentResponse, SentinelError> {
        let prompt = construct_prompt(request)
            .map_err(|e| SentinelError::AssessmentError(format!("prompt build failed: {}", e)))?;

        let content = match self.provider {
            Provider::Anthropic => self.call_anthropic(&prompt).await,
            Provider::OpenAi => self.call_openai(&prompt).await,
        }
        .map_err(|e| {
            error!("AI assessment failed for {}: {}", request.token.symbol, e);
            SentinelError::AssessmentError(e)
        })?;

        parse_response(&content)
    }

    async fn call_anthropic(&self, prompt: &str) -> Result<String, String> {
        debug!("calling Anthropic model {}", self.model);
        let body = json!({
            "model": self.model,
            "max_tokens": 1000,
            "system": SYSTEM_PROMPT,
            "messages": [{"role": "user", "content": prompt}],
        });
        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| format!("malformed provider response: {}", e))?;
        if !status.is_success() {
            return Err(format!("provider status {}: {}", status, payload));
        }
        payload["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| "provider response missing content text".to_string())
    }

    async fn call_openai(&self, prompt: &str) -> Result<String, String> {
        debug!("calling OpenAI model {}", self.model);
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
            "response_format": {"type": "json_object"},
        });
        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| format!("malformed provider response: {}", e))?;
        if !status.is_success() {
            return Err(format!("provider status {}: {}", status, payload));
        }
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| "provider response missing message content".to_string())
    }
}

fn construct_prompt(request: &AssessmentRequest) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string_pretty(request)?;
    Ok(format!(
        r#"You are a seasoned crypto degen analyst and meme coin expert. Your job is to analyze the provided token data and give a brutally honest assessment.
You speak the language of crypto twitter (CT) - using terms like "aped", "jeets", "rug", "moon", "alpha", etc., but keep it professional enough to be actionable.

Analyze the following token data:
{data}

Your analysis must be returned as a VALID JSON object matching the following structure exactly:
{{
    "verdict": "BULLISH" | "BEARISH" | "NEUTRAL",
    "summary": "A concise 2-3 sentence summary of your thoughts in degen style.",
    "explanation": "A clear, logical explanation of WHY you chose this verdict. Cite specific metrics (e.g., 'Liquidity is too low at $5k', 'Whale concentration is safe at 15%'). This helps the user decide.",
    "risk": {{
        "risk_level": "LOW" | "MEDIUM" | "HIGH" | "EXTREME",
        "score": 0-100, (integer, 100 = safest),
        "risk_factors": ["List of specific concerns..."],
        "positive_signals": ["List of bullish indicators..."]
    }},
    "entry_suggestion": "Specific advice on when/if to buy (e.g., 'Wait for dip to X', 'Ape small now', 'Avoid completely').",
    "meme_potential_score": 0-100 (integer)
}}

Evaluation Criteria:
- High holder count and liquidity are good.
- High whale concentration is bad (risk of dumps).
- Honeypots or mintable functions are EXTREME risks.
- Active social (if provided) is a strong plus for meme coins.
- Low safety score (if provided) is a major red flag.

IMPORTANT: Return ONLY the JSON object. No markdown formatting, no explanations outside the JSON."#
    ))
}

/// Parse the provider's reply, tolerating markdown code fences some
/// models wrap around the JSON despite instructions.
fn parse_response(content: &str) -> Result<AssessmentResponse, SentinelError> {
    let cleaned = if let Some(inner) = content.split("```json").nth(1) {
        inner.split("```").next().unwrap_or(inner).trim()
    } else if let Some(inner) = content.split("```").nth(1) {
        inner.trim()
    } else {
        content.trim()
    };

    serde_json::from_str(cleaned)
        .map_err(|e| SentinelError::AssessmentError(format!("invalid verdict JSON: {}", e)))
}
