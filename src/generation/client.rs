//! HTTP inference client with retry and circuit breaker
//!
//! Talks to a text-generation service that hosts the fine-tuned model. The
//! client owns the prompt template and output cleanup; concurrent requests
//! are bounded by a semaphore so a shared model backend is never hammered
//! in parallel (the default permit count of 1 serializes inference).

use super::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use super::config::ModelConfig;
use super::provider::{GenerationError, GenerationOptions, GenerativeProvider};
use crate::metrics::METRICS;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

/// Prompt template the model was fine-tuned with
const PROMPT_PREFIX: &str = "### Medical Question:\n";
const ANSWER_MARKER: &str = "### Answer:";

/// Inference client for the generative tier
pub struct InferenceClient {
    http: Client,
    config: ModelConfig,
    semaphore: Arc<Semaphore>,
    breaker: Arc<CircuitBreaker>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    generated_text: String,
}

impl InferenceClient {
    /// Create a new inference client
    pub fn new(config: ModelConfig) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GenerationError::RequestFailed(e.to_string()))?;

        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_generations.max(1)));

        let breaker_config = CircuitBreakerConfig {
            failure_threshold: config.circuit_breaker_failures,
            reset_timeout: config.breaker_reset_timeout(),
        };
        let breaker = Arc::new(CircuitBreaker::new(breaker_config));

        Ok(Self {
            http,
            config,
            semaphore,
            breaker,
        })
    }

    /// Check that the backend is reachable and ready. Called once at
    /// startup; a failure reason is returned so the caller can degrade to
    /// knowledge-base-only mode.
    pub async fn probe(&self) -> Result<(), GenerationError> {
        if !self.config.enabled {
            return Err(GenerationError::Disabled);
        }

        let url = format!("{}/health", self.config.endpoint);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GenerationError::Unavailable(format!(
                "health check returned status {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// Build the instruction prompt for a question
    fn build_prompt(&self, question: &str) -> String {
        format!("{}{}\n\n{}\n", PROMPT_PREFIX, question.trim(), ANSWER_MARKER)
    }

    /// Strip the prompt template and special tokens from raw model output
    fn extract_answer(&self, raw: &str) -> String {
        let answer = match raw.rsplit_once(ANSWER_MARKER) {
            Some((_, tail)) => tail,
            None => raw,
        };
        answer.replace(&self.config.eos_token, "").trim().to_string()
    }

    /// Call the generation endpoint once
    async fn call_generate_api(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let url = format!("{}/v1/generate", self.config.endpoint);

        let request_body = serde_json::json!({
            "model": self.config.model_id,
            "prompt": prompt,
            "parameters": {
                "max_new_tokens": options.max_new_tokens,
                "temperature": options.temperature,
                "repetition_penalty": options.repetition_penalty,
                "no_repeat_ngram_size": options.no_repeat_ngram_size,
                "stop": [self.config.eos_token],
            }
        });

        debug!(model = %self.config.model_id, "calling generation API");

        let mut req = self.http.post(&url).json(&request_body);

        // Add bearer auth if an API key is configured
        if let Some(api_key) = &self.config.api_key {
            req = req.bearer_auth(api_key);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout(e.to_string())
            } else {
                GenerationError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::UpstreamError(format!(
                "Status {}: {}",
                status, error_text
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        Ok(body.generated_text)
    }

    /// Calculate exponential backoff
    fn calculate_backoff(&self, attempt: usize) -> Duration {
        let base = self.config.retry_backoff();
        let multiplier = 2_u32.pow((attempt - 1) as u32);
        base.saturating_mul(multiplier)
    }
}

#[async_trait]
impl GenerativeProvider for InferenceClient {
    async fn generate(
        &self,
        question: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let start = Instant::now();

        if !self.config.enabled {
            return Err(GenerationError::Disabled);
        }

        if self.breaker.is_open() {
            METRICS.generation_circuit_open.inc();
            error!("circuit breaker is open, rejecting generation request");
            return Err(GenerationError::CircuitOpen);
        }

        let _permit = self.semaphore.acquire().await.unwrap();

        let prompt = self.build_prompt(question);

        // Retry with exponential backoff
        let mut attempt = 0;
        let raw = loop {
            attempt += 1;

            match self.call_generate_api(&prompt, options).await {
                Ok(text) => {
                    self.breaker.mark_success();
                    METRICS.record_generation(true);
                    break text;
                }
                Err(e) => {
                    self.breaker.mark_failure();
                    METRICS.record_generation(false);

                    if attempt > self.config.retry_attempts {
                        error!("generation failed after {} attempts: {}", attempt, e);
                        return Err(e);
                    }

                    let backoff = self.calculate_backoff(attempt);
                    warn!(
                        "generation attempt {} failed: {}, retrying in {:?}",
                        attempt, e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        };

        METRICS
            .generation_duration
            .with_label_values(&["generate"])
            .observe(start.elapsed().as_secs_f64());

        Ok(self.extract_answer(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt() {
        let client = InferenceClient::new(ModelConfig::default()).unwrap();
        let prompt = client.build_prompt("What is a heart attack?");
        assert_eq!(
            prompt,
            "### Medical Question:\nWhat is a heart attack?\n\n### Answer:\n"
        );
    }

    #[test]
    fn test_extract_answer_strips_template() {
        let client = InferenceClient::new(ModelConfig::default()).unwrap();
        let raw = "### Medical Question:\nWhat is a heart attack?\n\n### Answer:\nBlocked blood flow to the heart muscle.<|endoftext|>";
        assert_eq!(
            client.extract_answer(raw),
            "Blocked blood flow to the heart muscle."
        );
    }

    #[test]
    fn test_extract_answer_without_marker() {
        let client = InferenceClient::new(ModelConfig::default()).unwrap();
        assert_eq!(client.extract_answer("  plain output "), "plain output");
    }

    #[test]
    fn test_calculate_backoff() {
        let client = InferenceClient::new(ModelConfig::default()).unwrap();
        assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
        assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
        assert_eq!(client.calculate_backoff(3), Duration::from_millis(800));
    }

    #[tokio::test]
    async fn test_disabled_client() {
        let mut config = ModelConfig::default();
        config.enabled = false;

        let client = InferenceClient::new(config).unwrap();
        let result = client
            .generate("question", &GenerationOptions::default())
            .await;

        assert!(matches!(result, Err(GenerationError::Disabled)));
    }

    #[test]
    fn test_disabled_probe() {
        let mut config = ModelConfig::default();
        config.enabled = false;

        let client = InferenceClient::new(config).unwrap();
        let result = tokio_test::block_on(client.probe());
        assert!(matches!(result, Err(GenerationError::Disabled)));
    }
}
