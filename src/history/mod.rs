//! Bounded, append-only chat history
//!
//! Records are kept in insertion order and persisted as a JSON array.
//! Persistence failures are logged and never block returning a response.

use crate::config::HistoryConfig;
use crate::knowledge::Provenance;
use crate::metrics::METRICS;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};

/// One question/answer exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRecord {
    pub timestamp: DateTime<Utc>,
    pub question: String,
    pub answer: String,
    pub provenance: Provenance,
}

impl ChatRecord {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        provenance: Provenance,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            question: question.into(),
            answer: answer.into(),
            provenance,
        }
    }
}

/// Append-only chat log bounded to the most recent `max_records` entries
pub struct ChatLog {
    path: PathBuf,
    max_records: usize,
    records: Mutex<Vec<ChatRecord>>,
}

impl ChatLog {
    /// Open the chat log, restoring any previously persisted records. A
    /// missing or unreadable file starts an empty log.
    pub fn open(config: &HistoryConfig) -> Self {
        let path = PathBuf::from(&config.path);

        let mut records: Vec<ChatRecord> = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(records) => records,
                Err(e) => {
                    warn!(path = %path.display(), "ignoring malformed chat history: {}", e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        if records.len() > config.max_records {
            let drop = records.len() - config.max_records;
            records.drain(..drop);
        }

        if !records.is_empty() {
            info!(path = %path.display(), records = records.len(), "restored chat history");
        }

        Self {
            path,
            max_records: config.max_records,
            records: Mutex::new(records),
        }
    }

    /// Append a record, discarding the oldest entries beyond the retention
    /// bound, and persist. IO failures are logged and swallowed.
    pub fn append(&self, record: ChatRecord) {
        let snapshot = {
            let mut records = self.records.lock().unwrap();
            records.push(record);
            if records.len() > self.max_records {
                let drop = records.len() - self.max_records;
                records.drain(..drop);
            }
            records.clone()
        };

        if let Err(e) = self.persist(&snapshot) {
            METRICS.history_append_failures.inc();
            warn!(path = %self.path.display(), "failed to persist chat history: {}", e);
        }
    }

    /// All retained records in insertion order, oldest first
    pub fn read_all(&self) -> Vec<ChatRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }

    fn persist(&self, records: &[ChatRecord]) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(max_records: usize) -> (ChatLog, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = HistoryConfig {
            path: dir.path().join("chat_history.json").display().to_string(),
            max_records,
        };
        (ChatLog::open(&config), dir)
    }

    #[test]
    fn test_append_and_read() {
        let (log, _dir) = temp_log(100);

        log.append(ChatRecord::new("q1", "a1", Provenance::Default));
        log.append(ChatRecord::new("q2", "a2", Provenance::VerifiedStore));

        let records = log.read_all();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "q1");
        assert_eq!(records[1].question, "q2");
    }

    #[test]
    fn test_retention_bound_oldest_discarded() {
        let (log, _dir) = temp_log(100);

        for i in 0..150 {
            log.append(ChatRecord::new(
                format!("q{}", i),
                "answer text",
                Provenance::Default,
            ));
        }

        let records = log.read_all();
        assert_eq!(records.len(), 100);
        assert_eq!(records[0].question, "q50");
        assert_eq!(records[99].question, "q149");
    }

    #[test]
    fn test_restore_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = HistoryConfig {
            path: dir.path().join("chat_history.json").display().to_string(),
            max_records: 100,
        };

        {
            let log = ChatLog::open(&config);
            log.append(ChatRecord::new("persisted", "answer", Provenance::Generative));
        }

        let log = ChatLog::open(&config);
        let records = log.read_all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "persisted");
        assert_eq!(records[0].provenance, Provenance::Generative);
    }

    #[test]
    fn test_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_history.json");
        std::fs::write(&path, "not json at all").unwrap();

        let config = HistoryConfig {
            path: path.display().to_string(),
            max_records: 100,
        };
        let log = ChatLog::open(&config);
        assert!(log.is_empty());
    }

    #[test]
    fn test_append_with_unwritable_path_is_non_fatal() {
        let config = HistoryConfig {
            path: "/nonexistent-dir/chat_history.json".to_string(),
            max_records: 100,
        };
        let log = ChatLog::open(&config);

        // Persisting fails, but the record is still retained in memory
        log.append(ChatRecord::new("q", "a", Provenance::Default));
        assert_eq!(log.len(), 1);
    }
}
