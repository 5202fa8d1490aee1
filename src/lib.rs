//! Medical information assistant with tiered knowledge resolution
//!
//! The core is the resolution engine: given a free-text question, it
//! evaluates knowledge tiers in a strict order (verified fact store, then
//! the safety-gated generative model, then topic-classified canned
//! responses, then a fixed default) and returns the first accepted answer
//! with a provenance tag. Everything else (HTTP transport, chat history,
//! metrics) is plumbing around `resolve(question) -> ResolutionResult`.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod history;
pub mod knowledge;
pub mod metrics;

/// Common imports for consumers of the crate
pub mod prelude {
    pub use crate::api::{build_router, AppState};
    pub use crate::config::Config;
    pub use crate::engine::{ResolutionEngine, SafetyConfig, SafetyFilter, DEFAULT_RESPONSE};
    pub use crate::error::{AssistantError, Result};
    pub use crate::generation::{
        GenerationError, GenerationOptions, GenerativeProvider, InferenceClient, ModelConfig,
    };
    pub use crate::history::{ChatLog, ChatRecord};
    pub use crate::knowledge::{
        register_verified_facts, Aspect, CannedResponses, FactEntry, FactStore, Provenance,
        ResolutionResult, Topic, TopicMatcher, VerifiedStore,
    };
}
