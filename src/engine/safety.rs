//! Safety filter for generated text
//!
//! An allow/deny heuristic, not a semantic validator: it catches the
//! failure modes actually observed from the fine-tuned model (truncated
//! fragments, code-like artifacts, off-topic completions, and unrelated
//! training data bleeding through), and nothing more. Curated store
//! answers never pass through this filter.

use crate::metrics::METRICS;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Why a generated response was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    TooShort,
    TooFewWords,
    CodeLikeCharacters,
    OffTopic,
    DeniedTerm,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::TooShort => "too_short",
            RejectReason::TooFewWords => "too_few_words",
            RejectReason::CodeLikeCharacters => "code_like_characters",
            RejectReason::OffTopic => "off_topic",
            RejectReason::DeniedTerm => "deny_list",
        }
    }
}

/// Safety filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Minimum response length in characters
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Minimum response word count
    #[serde(default = "default_min_words")]
    pub min_words: usize,

    /// Terms whose presence indicates hallucinated unrelated content
    #[serde(default = "default_deny_list")]
    pub deny_list: Vec<String>,
}

fn default_min_length() -> usize {
    10
}
fn default_min_words() -> usize {
    2
}
fn default_deny_list() -> Vec<String> {
    // Observed hallucination markers: obstetric and travel-time phrases
    // from unrelated training data
    ["trimester", "pregnant", "baby", "9:30", "p.m.", "local time"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            min_words: default_min_words(),
            deny_list: default_deny_list(),
        }
    }
}

/// Characters that mark code-like or garbled output
const CODE_LIKE_CHARS: [char; 6] = ['{', '}', '[', ']', '<', '>'];

/// On-topic terms expected in answers to heart-related questions
const HEART_TERMS: [&str; 5] = ["heart", "chest", "blood", "attack", "cardiac"];

/// On-topic terms expected in answers to stroke-related questions
const STROKE_TERMS: [&str; 5] = ["brain", "stroke", "blood", "attack", "neurolog"];

/// Post-generation relevance and gibberish filter
#[derive(Debug, Clone, Default)]
pub struct SafetyFilter {
    config: SafetyConfig,
}

impl SafetyFilter {
    pub fn new(config: SafetyConfig) -> Self {
        Self { config }
    }

    /// Check generated text against the question it answers
    pub fn check(&self, text: &str, question: &str) -> Result<(), RejectReason> {
        let text_lower = text.to_lowercase();
        let question_lower = question.to_lowercase();

        if text.trim().len() < self.config.min_length {
            return Err(RejectReason::TooShort);
        }

        if text.split_whitespace().count() < self.config.min_words {
            return Err(RejectReason::TooFewWords);
        }

        if text.chars().any(|c| CODE_LIKE_CHARS.contains(&c)) {
            return Err(RejectReason::CodeLikeCharacters);
        }

        if question_lower.contains("heart")
            && !HEART_TERMS.iter().any(|t| text_lower.contains(t))
        {
            return Err(RejectReason::OffTopic);
        }

        if question_lower.contains("stroke")
            && !STROKE_TERMS.iter().any(|t| text_lower.contains(t))
        {
            return Err(RejectReason::OffTopic);
        }

        if self
            .config
            .deny_list
            .iter()
            .any(|term| text_lower.contains(term.as_str()))
        {
            return Err(RejectReason::DeniedTerm);
        }

        Ok(())
    }

    /// Boolean form of [`check`](Self::check), recording rejections
    pub fn is_acceptable(&self, text: &str, question: &str) -> bool {
        match self.check(text, question) {
            Ok(()) => true,
            Err(reason) => {
                METRICS.record_safety_rejection(reason.as_str());
                debug!(reason = reason.as_str(), "generated response rejected");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> SafetyFilter {
        SafetyFilter::new(SafetyConfig::default())
    }

    #[test]
    fn test_rejects_empty_string() {
        assert_eq!(filter().check("", "any question"), Err(RejectReason::TooShort));
    }

    #[test]
    fn test_rejects_single_word() {
        assert_eq!(
            filter().check("Cardiomyopathy", "any question"),
            Err(RejectReason::TooFewWords)
        );
    }

    #[test]
    fn test_rejects_bracket_characters() {
        let f = filter();
        for text in [
            "this response contains a { brace",
            "this response contains a } brace",
            "this response contains a [ bracket",
            "this response contains a ] bracket",
        ] {
            assert_eq!(f.check(text, "question"), Err(RejectReason::CodeLikeCharacters));
        }
    }

    #[test]
    fn test_rejects_off_topic_for_heart_question() {
        let result = filter().check(
            "The weather tomorrow will be sunny with mild winds.",
            "what are heart attack symptoms",
        );
        assert_eq!(result, Err(RejectReason::OffTopic));
    }

    #[test]
    fn test_rejects_deny_listed_terms() {
        let result = filter().check(
            "During the third trimester the heart works harder.",
            "heart attack risks",
        );
        assert_eq!(result, Err(RejectReason::DeniedTerm));
    }

    #[test]
    fn test_accepts_relevant_answer() {
        let result = filter().check(
            "A heart attack happens when blood flow to the heart muscle is blocked.",
            "what is a heart attack",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_accepts_stroke_answer_with_brain_term() {
        let result = filter().check(
            "A stroke interrupts blood supply to part of the brain.",
            "what is a stroke",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_unrelated_question_skips_topic_check() {
        let result = filter().check(
            "Please consult a healthcare professional for that.",
            "what about diabetes",
        );
        assert!(result.is_ok());
    }
}
