//! Application configuration
//!
//! Configuration is layered: defaults, then an optional TOML file, then
//! environment variables with the `MEDASSIST_` prefix (e.g.
//! `MEDASSIST_SERVER__PORT=9000`). The model section additionally honors a
//! set of flat `MODEL_*` variables, see [`crate::generation::ModelConfig`].

use crate::error::{AssistantError, Result};
use crate::generation::ModelConfig;
use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON-formatted log lines instead of human-readable ones
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Knowledge base configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Verified knowledge source files, loaded in order at startup.
    /// Supported formats: JSON object (key -> answer) and pipe-delimited
    /// `key|answer` lines. Missing files are reported once and skipped.
    #[serde(default = "default_verified_sources")]
    pub verified_sources: Vec<String>,
}

fn default_verified_sources() -> Vec<String> {
    vec![
        "knowledge_bases/verified/who_cardiovascular.json".to_string(),
        "knowledge_bases/verified/mayo_clinic_heart_attack.json".to_string(),
        "knowledge_bases/verified/heart_attack_aha.txt".to_string(),
    ]
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            verified_sources: default_verified_sources(),
        }
    }
}

/// Chat history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_path")]
    pub path: String,

    /// Maximum number of retained records; older records are discarded
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

fn default_history_path() -> String {
    "chat_history.json".to_string()
}
fn default_max_records() -> usize {
    100
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
            max_records: default_max_records(),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Generative model section; absent means knowledge-base-only mode
    #[serde(default)]
    pub model: Option<ModelConfig>,

    #[serde(default)]
    pub history: HistoryConfig,
}

impl Config {
    /// Load configuration from an optional TOML file plus environment
    /// overrides. A missing file is not an error; a malformed one is.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let path = path.unwrap_or("config/default.toml");

        let mut builder = config::Config::builder();
        if std::path::Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("MEDASSIST")
                .separator("__")
                .try_parsing(true),
        );

        let raw = builder
            .build()
            .map_err(|e| AssistantError::Configuration(e.to_string()))?;

        raw.try_deserialize()
            .map_err(|e| AssistantError::Configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.history.max_records, 100);
        assert_eq!(config.knowledge.verified_sources.len(), 3);
        assert!(config.model.is_none());
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let config = Config::load(Some("does/not/exist.toml")).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_history_defaults() {
        let config = HistoryConfig::default();
        assert_eq!(config.path, "chat_history.json");
        assert_eq!(config.max_records, 100);
    }
}
