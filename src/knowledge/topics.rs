//! Keyword-based topic and aspect classification
//!
//! Classification is a declarative, ordered rule table evaluated with a
//! first-match-wins rule. Keywords match on word boundaries, so "heart"
//! does not match inside "heartburn-like" compound tokens it is not a word
//! of. Emergency/action keywords are registered ahead of generic symptom
//! keywords: a panicked "what should I do right now" question must never be
//! classified as a definitional one.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::models::normalize;

/// Medical topic of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    HeartAttack,
    Stroke,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::HeartAttack => "heart attack",
            Topic::Stroke => "stroke",
        }
    }
}

/// Aspect of a topic the question asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    Emergency,
    Symptoms,
    Treatment,
    Causes,
    Prevention,
    Definition,
}

/// One topic rule: an ordered keyword set defining a topic
struct TopicRule {
    topic: Topic,
    patterns: Vec<Regex>,
}

/// One aspect rule, evaluated within an already-matched topic
struct AspectRule {
    aspect: Aspect,
    patterns: Vec<Regex>,
}

fn keyword_patterns(keywords: &[&str]) -> Vec<Regex> {
    keywords
        .iter()
        .map(|kw| {
            Regex::new(&format!(r"\b{}\b", regex::escape(kw)))
                .expect("keyword pattern must compile")
        })
        .collect()
}

/// Keyword classifier mapping free text to `(topic, aspect)`
pub struct TopicMatcher {
    topic_rules: Vec<TopicRule>,
    aspect_rules: Vec<AspectRule>,
}

impl TopicMatcher {
    /// Build the default rule tables. Rule order is part of the contract:
    /// earlier rules win, and the emergency aspect outranks everything
    /// else.
    pub fn new() -> Self {
        let topic_rules = vec![
            TopicRule {
                topic: Topic::HeartAttack,
                patterns: keyword_patterns(&[
                    "heart attack",
                    "myocardial",
                    "cardiac",
                    "heart",
                    "chest pain",
                    "chest",
                ]),
            },
            TopicRule {
                topic: Topic::Stroke,
                patterns: keyword_patterns(&["stroke", "cerebrovascular"]),
            },
        ];

        let aspect_rules = vec![
            AspectRule {
                aspect: Aspect::Emergency,
                patterns: keyword_patterns(&[
                    "emergency",
                    "right now",
                    "immediately",
                    "what should i do",
                    "help",
                ]),
            },
            AspectRule {
                aspect: Aspect::Symptoms,
                patterns: keyword_patterns(&["symptom", "symptoms", "sign", "signs", "feel"]),
            },
            AspectRule {
                aspect: Aspect::Treatment,
                patterns: keyword_patterns(&[
                    "treat",
                    "treatment",
                    "treated",
                    "cure",
                    "what to do",
                    "how to",
                    "medication",
                    "therapy",
                ]),
            },
            AspectRule {
                aspect: Aspect::Causes,
                patterns: keyword_patterns(&["cause", "causes", "why", "reason", "risk factor"]),
            },
            AspectRule {
                aspect: Aspect::Prevention,
                patterns: keyword_patterns(&["prevent", "prevention", "avoid", "reduce risk"]),
            },
            AspectRule {
                aspect: Aspect::Definition,
                patterns: keyword_patterns(&["what is", "what are", "define", "explain"]),
            },
        ];

        Self {
            topic_rules,
            aspect_rules,
        }
    }

    /// Classify a question into `(topic, aspect)`; no topic match yields
    /// `(None, None)`
    pub fn classify(&self, question: &str) -> (Option<Topic>, Option<Aspect>) {
        let question = normalize(question);

        let topic = self
            .topic_rules
            .iter()
            .find(|rule| rule.patterns.iter().any(|p| p.is_match(&question)))
            .map(|rule| rule.topic);

        if topic.is_none() {
            return (None, None);
        }

        let aspect = self
            .aspect_rules
            .iter()
            .find(|rule| rule.patterns.iter().any(|p| p.is_match(&question)))
            .map(|rule| rule.aspect);

        (topic, aspect)
    }
}

impl Default for TopicMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heart_attack_symptoms() {
        let matcher = TopicMatcher::new();
        let (topic, aspect) = matcher.classify("What are the symptoms of a heart attack?");
        assert_eq!(topic, Some(Topic::HeartAttack));
        assert_eq!(aspect, Some(Aspect::Symptoms));
    }

    #[test]
    fn test_stroke_prevention() {
        let matcher = TopicMatcher::new();
        let (topic, aspect) = matcher.classify("How can I prevent a stroke?");
        assert_eq!(topic, Some(Topic::Stroke));
        assert_eq!(aspect, Some(Aspect::Prevention));
    }

    #[test]
    fn test_emergency_outranks_symptoms() {
        let matcher = TopicMatcher::new();
        // Both "emergency" and "symptoms" keywords appear; emergency wins
        let (topic, aspect) =
            matcher.classify("heart attack symptoms happening, is this an emergency?");
        assert_eq!(topic, Some(Topic::HeartAttack));
        assert_eq!(aspect, Some(Aspect::Emergency));
    }

    #[test]
    fn test_word_boundary_no_partial_match() {
        let matcher = TopicMatcher::new();
        // "heart" must not match inside an unrelated longer word
        let (topic, _) = matcher.classify("I feel disheartened lately");
        assert_eq!(topic, None);
    }

    #[test]
    fn test_topic_without_aspect() {
        let matcher = TopicMatcher::new();
        let (topic, aspect) = matcher.classify("tell me about stroke");
        assert_eq!(topic, Some(Topic::Stroke));
        assert_eq!(aspect, None);
    }

    #[test]
    fn test_no_match() {
        let matcher = TopicMatcher::new();
        let (topic, aspect) = matcher.classify("xyz unrelated gibberish");
        assert_eq!(topic, None);
        assert_eq!(aspect, None);
    }

    #[test]
    fn test_heart_registered_before_stroke() {
        let matcher = TopicMatcher::new();
        // A question mentioning both resolves to the first-registered topic
        let (topic, _) = matcher.classify("is a heart attack worse than a stroke");
        assert_eq!(topic, Some(Topic::HeartAttack));
    }
}
