//! Error types for the assistant

use thiserror::Error;

/// Top-level error type
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Knowledge source error: {0}")]
    KnowledgeSource(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AssistantError>;
