//! Configuration for the generative model backend

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inference client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Enable/disable the generative tier globally
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Inference service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier passed to the backend
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// API key (read from env MODEL_API_KEY if not set)
    #[serde(default)]
    pub api_key: Option<String>,

    /// End-of-sequence token; also used as the pad token when the backend
    /// does not define one
    #[serde(default = "default_eos_token")]
    pub eos_token: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Number of retry attempts
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: usize,

    /// Base backoff in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Maximum concurrent generation requests; the default of 1 serializes
    /// access to a shared model backend
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_generations: usize,

    /// Circuit breaker failure threshold
    #[serde(default = "default_breaker_failures")]
    pub circuit_breaker_failures: usize,

    /// Circuit breaker reset timeout in seconds
    #[serde(default = "default_breaker_reset")]
    pub circuit_breaker_reset_secs: u64,
}

// Default value functions
fn default_enabled() -> bool {
    true
}
fn default_endpoint() -> String {
    "http://localhost:8000".to_string()
}
fn default_model_id() -> String {
    "heart-attack-distilgpt2".to_string()
}
fn default_eos_token() -> String {
    "<|endoftext|>".to_string()
}
fn default_timeout_ms() -> u64 {
    30_000
}
fn default_retry_attempts() -> usize {
    2
}
fn default_retry_backoff_ms() -> u64 {
    200
}
fn default_max_concurrent() -> usize {
    1
}
fn default_breaker_failures() -> usize {
    5
}
fn default_breaker_reset() -> u64 {
    30
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            model_id: default_model_id(),
            api_key: None,
            eos_token: default_eos_token(),
            timeout_ms: default_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            max_concurrent_generations: default_max_concurrent(),
            circuit_breaker_failures: default_breaker_failures(),
            circuit_breaker_reset_secs: default_breaker_reset(),
        }
    }
}

impl ModelConfig {
    /// Load configuration overrides from environment variables
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("MODEL_ENABLED") {
            self.enabled = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("MODEL_ENDPOINT") {
            self.endpoint = val;
        }

        if let Ok(val) = std::env::var("MODEL_ID") {
            self.model_id = val;
        }

        if let Ok(val) = std::env::var("MODEL_API_KEY") {
            self.api_key = Some(val);
        }

        if let Ok(val) = std::env::var("MODEL_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.timeout_ms = timeout;
            }
        }

        if let Ok(val) = std::env::var("MODEL_MAX_RETRIES") {
            if let Ok(retries) = val.parse() {
                self.retry_attempts = retries;
            }
        }

        if let Ok(val) = std::env::var("MODEL_RETRY_BACKOFF_MS") {
            if let Ok(ms) = val.parse() {
                self.retry_backoff_ms = ms;
            }
        }

        if let Ok(val) = std::env::var("MODEL_MAX_CONCURRENT") {
            if let Ok(max) = val.parse() {
                self.max_concurrent_generations = max;
            }
        }

        if let Ok(val) = std::env::var("MODEL_CIRCUIT_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                self.circuit_breaker_failures = threshold;
            }
        }

        if let Ok(val) = std::env::var("MODEL_CIRCUIT_COOLDOWN_SECS") {
            if let Ok(secs) = val.parse() {
                self.circuit_breaker_reset_secs = secs;
            }
        }

        self
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get circuit breaker reset timeout as Duration
    pub fn breaker_reset_timeout(&self) -> Duration {
        Duration::from_secs(self.circuit_breaker_reset_secs)
    }

    /// Get retry backoff as Duration
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
