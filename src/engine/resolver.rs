//! Tiered resolution engine
//!
//! Tiers are evaluated in a strict forward-only order, short-circuiting at
//! the first accepted answer:
//!
//! 1. verified store lookup
//! 2. generative model, gated by the safety filter
//! 3. topic-classified canned response
//! 4. fixed default message
//!
//! The order is a safety policy: authoritative static text always beats
//! generated text, generated text is never surfaced unvetted, and the
//! default tier guarantees a non-empty answer. A provider failure is a
//! tier miss, not an error.

use super::safety::SafetyFilter;
use crate::generation::{GenerationOptions, GenerativeProvider};
use crate::knowledge::{CannedResponses, Provenance, ResolutionResult, TopicMatcher, VerifiedStore};
use crate::metrics::METRICS;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Default response when no tier produces an answer
pub const DEFAULT_RESPONSE: &str =
    "For medical concerns, it's always best to consult with a qualified healthcare \
     professional who can provide personalized advice based on your specific situation \
     and medical history.";

/// The tiered resolution engine
pub struct ResolutionEngine {
    verified: VerifiedStore,
    matcher: TopicMatcher,
    canned: CannedResponses,
    safety: SafetyFilter,
    provider: Option<Arc<dyn GenerativeProvider>>,
    options: GenerationOptions,
}

impl ResolutionEngine {
    /// Create an engine without a generative provider
    pub fn new(
        verified: VerifiedStore,
        matcher: TopicMatcher,
        canned: CannedResponses,
        safety: SafetyFilter,
    ) -> Self {
        Self {
            verified,
            matcher,
            canned,
            safety,
            provider: None,
            options: GenerationOptions::default(),
        }
    }

    /// Attach a generative provider
    pub fn with_provider(mut self, provider: Arc<dyn GenerativeProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Override the generation options
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether a generative provider is attached
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Number of verified knowledge entries
    pub fn knowledge_entries(&self) -> usize {
        self.verified.len()
    }

    /// Resolve a question to an answer. Always returns a non-empty result;
    /// at most four tiers are evaluated.
    pub async fn resolve(&self, question: &str) -> ResolutionResult {
        let start = Instant::now();
        let result = self.resolve_inner(question).await;

        METRICS.record_resolution(result.provenance.as_str(), start.elapsed().as_secs_f64());
        info!(
            provenance = result.provenance.as_str(),
            "question resolved"
        );

        result
    }

    async fn resolve_inner(&self, question: &str) -> ResolutionResult {
        // Tier 1: verified store
        if let Some(answer) = self.verified.lookup(question) {
            debug!("verified store hit");
            return ResolutionResult::new(answer, Provenance::VerifiedStore);
        }

        // Tier 2: generative model, only if configured and vetted
        if let Some(provider) = &self.provider {
            match provider.generate(question, &self.options).await {
                Ok(text) => {
                    if self.safety.is_acceptable(&text, question) {
                        return ResolutionResult::new(text, Provenance::Generative);
                    }
                    debug!("generated response rejected by safety filter, falling through");
                }
                Err(e) => {
                    // Never fatal: generation failures degrade to the next tier
                    warn!("generation failed, falling through: {}", e);
                }
            }
        }

        // Tier 3: topic-classified canned response
        let (topic, aspect) = self.matcher.classify(question);
        if let Some(topic) = topic {
            if let Some(text) = self.canned.response(topic, aspect) {
                debug!(topic = topic.as_str(), "canned topic response");
                return ResolutionResult::new(text, Provenance::FactStore);
            }
        }

        // Tier 4: fixed default
        ResolutionResult::new(DEFAULT_RESPONSE, Provenance::Default)
    }
}
