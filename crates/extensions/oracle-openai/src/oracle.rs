//! [`MatchOracle`] over an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use stepwise_config::OracleConfig;
use stepwise_protocols::{MatchOracle, MatchRequest, MatchVerdict, OracleError};

use crate::api::{ApiMessage, ApiRequest, ApiResponse, ResponseFormat};
use crate::prompt::{user_prompt, SYSTEM_PROMPT};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_TOKENS: u32 = 256;

/// Longest slice of an error body quoted in an [`OracleError`].
const ERROR_BODY_LIMIT: usize = 200;

pub struct OpenAiMatchOracle {
    api_key: Option<String>,
    api_url: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiMatchOracle {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::build(
            Some(api_key.into()),
            DEFAULT_API_URL.to_string(),
            model.into(),
            DEFAULT_MAX_TOKENS,
            DEFAULT_TIMEOUT,
        )
    }

    /// Point at another OpenAI-compatible endpoint.
    pub fn with_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Build from the `[oracle]` section; fails with `Disabled` when it is switched off.
    pub fn from_config(config: &OracleConfig) -> Result<Self, OracleError> {
        if !config.enabled {
            return Err(OracleError::Disabled);
        }
        Ok(Self::build(
            config.api_key.clone().filter(|k| !k.is_empty()),
            config.api_url.clone(),
            config.model.clone(),
            config.max_tokens,
            Duration::from_secs(config.timeout_secs),
        ))
    }

    fn build(
        api_key: Option<String>,
        api_url: String,
        model: String,
        max_tokens: u32,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key,
            api_url,
            model,
            max_tokens,
            client,
        }
    }

    fn build_request(&self, request: &MatchRequest) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            messages: vec![
                ApiMessage::system(SYSTEM_PROMPT),
                ApiMessage::user(user_prompt(request)),
            ],
            max_tokens: Some(self.max_tokens),
            temperature: Some(0.0),
            response_format: Some(ResponseFormat::json_object()),
        }
    }

    async fn send_request(&self, api_request: &ApiRequest) -> Result<ApiResponse, OracleError> {
        let mut http = self.client.post(&self.api_url).json(api_request);
        if let Some(key) = &self.api_key {
            http = http.bearer_auth(key);
        }

        let response = http
            .send()
            .await
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(OracleError::Unavailable(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        response
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(format!("malformed completion: {}", e)))
    }
}

#[async_trait]
impl MatchOracle for OpenAiMatchOracle {
    async fn match_element(&self, request: &MatchRequest) -> Result<MatchVerdict, OracleError> {
        let api_request = self.build_request(request);
        let response = self.send_request(&api_request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                "Oracle used {} prompt / {} completion tokens (finish: {})",
                usage.prompt_tokens,
                usage.completion_tokens,
                response.finish_reason()
            );
        }

        let content = response.first_content().ok_or_else(|| {
            OracleError::InvalidResponse(format!(
                "completion has no content (finish: {})",
                response.finish_reason()
            ))
        })?;
        let verdict = MatchVerdict::parse_strict(content)?;

        debug!(
            "Oracle picked candidate {} of {} for '{}' ({})",
            verdict.index,
            request.candidates.len(),
            request.description,
            verdict.confidence
        );
        Ok(verdict)
    }
}

#[cfg(test)]
#[path = "oracle_tests.rs"]
mod tests;
