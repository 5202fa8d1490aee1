//! In-memory fact stores
//!
//! Lookup tries three strategies in order: an exact match of the
//! normalized question, the first key that is a substring of the question,
//! and finally the first key all of whose words appear in the question
//! (so "What are the symptoms of a heart attack?" still reaches the
//! "heart attack symptoms" entry). All passes iterate in insertion order.
//! The substring pass is order-dependent: a short generic key inserted
//! early can shadow a more specific key inserted later. That matches the
//! documented lookup contract; shadowed lookups are logged so table
//! authors can spot the hazard.

use super::models::{normalize, FactEntry};
use crate::metrics::METRICS;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Insertion-ordered fact table
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    entries: IndexMap<String, FactEntry>,
}

impl FactStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; a later insert with the same key overwrites
    pub fn insert(&mut self, entry: FactEntry) {
        self.entries.insert(entry.key.clone(), entry);
    }

    /// Look up an answer for a question
    pub fn lookup(&self, question: &str) -> Option<&FactEntry> {
        let question = normalize(question);

        // Exact match
        if let Some(entry) = self.entries.get(&question) {
            debug!(key = %entry.key, "exact fact match");
            return Some(entry);
        }

        // Substring match, first key wins in insertion order
        let mut matches = self
            .entries
            .values()
            .filter(|entry| question.contains(&entry.key));

        if let Some(hit) = matches.next() {
            let shadowed: Vec<&str> = matches.map(|e| e.key.as_str()).collect();
            if !shadowed.is_empty() {
                METRICS.knowledge_shadowed_lookups.inc();
                warn!(
                    winner = %hit.key,
                    shadowed = ?shadowed,
                    "substring lookup shadowed later keys"
                );
            }
            debug!(key = %hit.key, "substring fact match");
            return Some(hit);
        }

        // Keyword match: the first key all of whose words appear in the
        // question, so phrasing variations still reach the entry
        let question_words: HashSet<&str> = question
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let hit = self.entries.values().find(|entry| {
            entry
                .key
                .split_whitespace()
                .all(|word| question_words.contains(word))
        })?;

        debug!(key = %hit.key, "keyword fact match");
        Some(hit)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Fact table whose entries carry source attribution, appended to the
/// stored answer at insert time. The store never separates attribution
/// from content at query time.
#[derive(Debug, Clone, Default)]
pub struct VerifiedStore {
    store: FactStore,
}

impl VerifiedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fact with explicit attribution; the `[Source: …]` suffix is
    /// baked into the stored answer
    pub fn add_fact(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
        source: impl Into<String>,
    ) {
        let source = source.into();
        let attributed = format!("{}\n\n[Source: {}]", answer.into(), source);
        self.store
            .insert(FactEntry::new(question, attributed).with_source(source));
        METRICS.knowledge_entries_loaded.inc();
    }

    /// Merge pre-attributed entries (e.g. loaded from a verified source
    /// file whose answers already carry their attribution)
    pub fn merge(&mut self, entries: Vec<FactEntry>) {
        for entry in entries {
            self.store.insert(entry);
            METRICS.knowledge_entries_loaded.inc();
        }
    }

    /// Look up an attributed answer
    pub fn lookup(&self, question: &str) -> Option<&str> {
        self.store.lookup(question).map(|e| e.answer.as_str())
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[(&str, &str)]) -> FactStore {
        let mut store = FactStore::new();
        for (key, answer) in entries {
            store.insert(FactEntry::new(*key, *answer));
        }
        store
    }

    #[test]
    fn test_exact_match_wins() {
        let store = store_with(&[
            ("heart attack", "generic"),
            ("heart attack symptoms", "specific"),
        ]);

        let hit = store.lookup("Heart Attack Symptoms").unwrap();
        assert_eq!(hit.answer, "specific");
    }

    #[test]
    fn test_substring_match_insertion_order() {
        // The short generic key was inserted first, so it shadows the more
        // specific later key for questions containing both
        let store = store_with(&[
            ("heart attack", "generic"),
            ("heart attack symptoms", "specific"),
        ]);

        let hit = store.lookup("tell me about heart attack symptoms please").unwrap();
        assert_eq!(hit.answer, "generic");
    }

    #[test]
    fn test_no_match_returns_none() {
        let store = store_with(&[("stroke", "stroke info")]);
        assert!(store.lookup("xyz unrelated gibberish").is_none());
    }

    #[test]
    fn test_keyword_match_reordered_words() {
        let store = store_with(&[("heart attack symptoms", "symptom list")]);

        let hit = store.lookup("What are the symptoms of a heart attack?").unwrap();
        assert_eq!(hit.answer, "symptom list");
    }

    #[test]
    fn test_keyword_match_requires_all_words() {
        let store = store_with(&[("heart attack symptoms", "symptom list")]);
        assert!(store.lookup("what causes a heart attack").is_none());
    }

    #[test]
    fn test_insert_overwrites() {
        let mut store = FactStore::new();
        store.insert(FactEntry::new("stroke", "old"));
        store.insert(FactEntry::new("stroke", "new"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("stroke").unwrap().answer, "new");
    }

    #[test]
    fn test_verified_store_bakes_attribution() {
        let mut store = VerifiedStore::new();
        store.add_fact("heart attack symptoms", "Chest pain.", "CDC");

        let answer = store.lookup("heart attack symptoms").unwrap();
        assert_eq!(answer, "Chest pain.\n\n[Source: CDC]");
    }

    #[test]
    fn test_verified_store_substring_lookup() {
        let mut store = VerifiedStore::new();
        store.add_fact("stroke symptoms", "FAST signs.", "WHO");

        let answer = store
            .lookup("What are the stroke symptoms I should know?")
            .unwrap();
        assert!(answer.starts_with("FAST signs."));
        assert!(answer.ends_with("[Source: WHO]"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let entries = vec![
            FactEntry::new("a", "1"),
            FactEntry::new("b", "2"),
        ];

        let mut store = VerifiedStore::new();
        store.merge(entries.clone());
        store.merge(entries);

        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("a").unwrap(), "1");
    }
}
