//! Generative provider abstraction
//!
//! The resolution engine only sees this trait, so the HTTP-backed client
//! can be swapped for a mock in tests or replaced outright without
//! touching resolution logic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generation error types
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generation is disabled")]
    Disabled,

    #[error("Model backend unavailable: {0}")]
    Unavailable(String),

    #[error("Circuit breaker is open")]
    CircuitOpen,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Sampling options for a generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Maximum number of generated tokens
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: usize,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Repetition penalty
    #[serde(default = "default_repetition_penalty")]
    pub repetition_penalty: f32,

    /// Disallow repeating n-grams of this size
    #[serde(default = "default_no_repeat_ngram_size")]
    pub no_repeat_ngram_size: usize,
}

fn default_max_new_tokens() -> usize {
    200
}
fn default_temperature() -> f32 {
    0.7
}
fn default_repetition_penalty() -> f32 {
    1.2
}
fn default_no_repeat_ngram_size() -> usize {
    3
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            repetition_penalty: default_repetition_penalty(),
            no_repeat_ngram_size: default_no_repeat_ngram_size(),
        }
    }
}

/// A source of generated answer text
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Generate an answer for a question. Implementations own prompt
    /// templating and output cleanup; callers decide whether to accept the
    /// result.
    async fn generate(
        &self,
        question: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = GenerationOptions::default();
        assert_eq!(options.max_new_tokens, 200);
        assert_eq!(options.temperature, 0.7);
        assert_eq!(options.repetition_penalty, 1.2);
        assert_eq!(options.no_repeat_ngram_size, 3);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: GenerationOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.max_new_tokens, 200);

        let options: GenerationOptions =
            serde_json::from_str(r#"{"temperature": 0.9}"#).unwrap();
        assert_eq!(options.temperature, 0.9);
        assert_eq!(options.no_repeat_ngram_size, 3);
    }

    #[test]
    fn test_error_display() {
        let err = GenerationError::UpstreamError("Status 500".to_string());
        assert!(err.to_string().contains("Status 500"));
        assert_eq!(GenerationError::CircuitOpen.to_string(), "Circuit breaker is open");
    }
}
