//! Data models for the knowledge stores

use serde::{Deserialize, Serialize};

/// Normalize a question or key for matching: lowercase, trimmed
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A single curated fact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactEntry {
    /// Normalized lookup key
    pub key: String,
    /// Answer text; verified entries carry the attribution suffix baked in
    pub answer: String,
    /// Raw attribution, if the entry was inserted with one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl FactEntry {
    /// Create a new fact entry; the key is normalized on construction
    pub fn new(key: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            key: normalize(&key.into()),
            answer: answer.into(),
            source: None,
        }
    }

    /// Attach an attribution source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Which tier produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    FactStore,
    VerifiedStore,
    Generative,
    Default,
}

impl Provenance {
    /// Stable label used for metrics and serialized records
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::FactStore => "fact_store",
            Provenance::VerifiedStore => "verified_store",
            Provenance::Generative => "generative",
            Provenance::Default => "default",
        }
    }
}

/// The answer to a single question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub text: String,
    pub provenance: Provenance,
}

impl ResolutionResult {
    pub fn new(text: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            text: text.into(),
            provenance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  What Is A Heart Attack?  "), "what is a heart attack?");
        assert_eq!(normalize("STROKE"), "stroke");
    }

    #[test]
    fn test_fact_entry_key_normalized() {
        let entry = FactEntry::new("Heart Attack Symptoms", "Chest pain.");
        assert_eq!(entry.key, "heart attack symptoms");
        assert!(entry.source.is_none());
    }

    #[test]
    fn test_provenance_labels() {
        assert_eq!(Provenance::VerifiedStore.as_str(), "verified_store");
        assert_eq!(Provenance::Default.as_str(), "default");
    }

    #[test]
    fn test_provenance_serialization() {
        let json = serde_json::to_string(&Provenance::FactStore).unwrap();
        assert_eq!(json, "\"fact_store\"");
    }
}
