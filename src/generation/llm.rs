/*!
 * Creative generation backed by a language model.
 */

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use std::time::Duration;

use crate::app_config::GenerationConfig;
use crate::errors::ProviderError;
use crate::pipeline::{ScreenplayState, Stage};
use crate::providers::Provider;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};

use super::CreativeGenerator;
use super::prompts::StagePrompt;

/// Longest wait between two attempts
const MAX_BACKOFF_MS: u64 = 60_000;

/// Stage generator that prompts an Anthropic model and returns its JSON.
///
/// Transient failures are retried with exponential backoff; a completion that
/// contains no JSON is treated as a parse error and not retried.
#[derive(Debug)]
pub struct LlmGenerator {
    client: Anthropic,
    model: String,
    max_tokens: u32,
    temperature: f32,
    retry_count: u32,
    retry_backoff_ms: u64,
}

impl LlmGenerator {
    /// Build a generator from configuration
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            client: Anthropic::new(
                config.api_key.clone(),
                config.endpoint.clone(),
                config.model.clone(),
                Duration::from_secs(config.timeout_secs),
            ),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            retry_count: config.retry_count,
            retry_backoff_ms: config.retry_backoff_ms,
        }
    }

    /// Check that the API answers
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.client.test_connection().await
    }

    fn request_for(&self, prompt: &StagePrompt) -> AnthropicRequest {
        AnthropicRequest::new(self.model.clone(), self.max_tokens)
            .system(prompt.system.clone())
            .temperature(self.temperature)
            .add_message("user", prompt.user.clone())
    }

    async fn complete_with_retry(&self, stage: Stage, request: AnthropicRequest) -> Result<String, ProviderError> {
        let mut attempt = 0;
        loop {
            match self.client.complete(request.clone()).await {
                Ok(response) => return Ok(Anthropic::extract_text(&response)),
                Err(e) if e.is_retryable() && attempt < self.retry_count => {
                    attempt += 1;
                    let delay = backoff_delay(self.retry_backoff_ms, attempt);
                    warn!(
                        "{} stage request failed ({}), retry {}/{} in {}ms",
                        stage, e, attempt, self.retry_count, delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Delay before retry `attempt` (1-based): the base doubled per attempt, capped
pub fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor).min(MAX_BACKOFF_MS))
}

#[async_trait]
impl CreativeGenerator for LlmGenerator {
    async fn generate(&self, stage: Stage, state: &ScreenplayState) -> Result<Value, ProviderError> {
        let prompt = StagePrompt::for_stage(stage, state);
        let text = self.complete_with_retry(stage, self.request_for(&prompt)).await?;
        debug!("{} stage completion: {} chars", stage, text.len());

        let json = extract_json(&text)?;
        serde_json::from_str(json)
            .map_err(|e| ProviderError::ParseError(format!("{} stage returned invalid JSON: {}", stage, e)))
    }
}

/// Extract a JSON object from a completion that may wrap it in prose or fences.
pub fn extract_json(response: &str) -> Result<&str, ProviderError> {
    let trimmed = response.trim();

    if trimmed.starts_with('{') {
        return Ok(trimmed);
    }

    // Markdown code fence, with or without a language tag
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let body = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = body.find("```") {
            let json = body[..end].trim();
            if json.starts_with('{') {
                return Ok(json);
            }
        }
    }

    // First { to last }
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if end > start {
            return Ok(&trimmed[start..=end]);
        }
    }

    Err(ProviderError::ParseError("Could not extract JSON from response".to_string()))
}
