//! Declarative knowledge source loader
//!
//! Supports a closed set of formats: a JSON object mapping question keys to
//! answer text, and pipe-delimited `key|answer` lines. Loaded content is
//! data only, never executed. Loading the same source twice produces the
//! same table (keys overwrite on re-insert).

use super::models::FactEntry;
use crate::error::{AssistantError, Result};
use indexmap::IndexMap;
use std::path::Path;
use tracing::info;

/// Load fact entries from a source file, dispatching on extension
pub fn load_source(path: &Path) -> Result<Vec<FactEntry>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let content = std::fs::read_to_string(path)?;

    let entries = match ext.as_str() {
        "json" => parse_json(&content)?,
        "txt" => parse_pipe_delimited(&content),
        other => {
            return Err(AssistantError::KnowledgeSource(format!(
                "unsupported knowledge source format '{}' for {}",
                other,
                path.display()
            )))
        }
    };

    info!(
        path = %path.display(),
        entries = entries.len(),
        "loaded knowledge source"
    );

    Ok(entries)
}

/// Parse a JSON object of key -> answer, preserving document order
fn parse_json(content: &str) -> Result<Vec<FactEntry>> {
    let map: IndexMap<String, String> = serde_json::from_str(content)?;
    Ok(map
        .into_iter()
        .map(|(key, answer)| FactEntry::new(key, answer))
        .collect())
}

/// Parse pipe-delimited `key|answer` lines; lines without a pipe are skipped
fn parse_pipe_delimited(content: &str) -> Vec<FactEntry> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let (key, answer) = line.split_once('|')?;
            if key.trim().is_empty() || answer.trim().is_empty() {
                return None;
            }
            Some(FactEntry::new(key, answer.trim()))
        })
        .collect()
}
