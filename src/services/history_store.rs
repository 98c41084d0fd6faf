//! Reply history persistence
//!
//! The history file is the single source of truth for "already replied".
//! A post id is written at most once, and only after a submission was judged
//! at least likely successful. The file is a JSON object keyed by post id and
//! is rewritten in full on every save; there are no incremental writes and no
//! concurrent writers.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// In-memory shape of the history file
pub type History = BTreeMap<String, HistoryRecord>;

/// What we remember about one posted reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// RFC 3339 timestamp of when the reply was recorded
    pub timestamp: String,
    /// The reply text as generated
    pub reply: String,
    /// Prefix of the post we replied to, for later inspection
    pub original_tweet: String,
}

impl HistoryRecord {
    /// Build a record for a reply posted just now; the original text is
    /// capped at 100 characters
    pub fn new(reply: &str, original_text: &str) -> Self {
        Self {
            timestamp: chrono::Local::now().to_rfc3339(),
            reply: reply.to_string(),
            original_tweet: original_text.chars().take(100).collect(),
        }
    }
}

pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted history; a missing or unreadable file is treated
    /// as an empty history, never as a fatal condition
    pub fn load(&self) -> History {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("no history file at {:?} ({}), starting fresh", self.path, e);
                return History::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(e) => {
                warn!("history file {:?} is unreadable ({}), starting fresh", self.path, e);
                History::new()
            }
        }
    }

    /// Overwrite the file with exactly the given mapping
    pub fn save(&self, history: &History) -> Result<()> {
        let json = serde_json::to_string_pretty(history)?;
        fs::write(&self.path, json)?;
        debug!("history saved, {} entries", history.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::new(dir.path().join("comment_history.json"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comment_history.json");
        fs::write(&path, "{ not json ").unwrap();
        let store = HistoryStore::new(path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut history = History::new();
        history.insert(
            "123".to_string(),
            HistoryRecord::new(
                "nice one, feels like a good time for gems",
                "Great news about the market",
            ),
        );
        store.save(&history).unwrap();

        let reloaded = store.load();
        assert_eq!(reloaded, history);
        assert_eq!(
            reloaded["123"].original_tweet,
            "Great news about the market"
        );
    }

    #[test]
    fn save_of_loaded_history_is_equivalent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut history = History::new();
        history.insert("1".to_string(), HistoryRecord::new("a", "b"));
        history.insert("2".to_string(), HistoryRecord::new("c", "d"));
        store.save(&history).unwrap();

        let loaded = store.load();
        store.save(&loaded).unwrap();
        assert_eq!(store.load(), loaded);
    }

    #[test]
    fn save_overwrites_removed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut history = History::new();
        history.insert("1".to_string(), HistoryRecord::new("a", "b"));
        history.insert("2".to_string(), HistoryRecord::new("c", "d"));
        store.save(&history).unwrap();

        history.remove("1");
        store.save(&history).unwrap();

        let reloaded = store.load();
        assert_eq!(reloaded.len(), 1);
        assert!(!reloaded.contains_key("1"));
    }

    #[test]
    fn record_caps_original_text_at_100_chars() {
        let long = "x".repeat(250);
        let record = HistoryRecord::new("reply", &long);
        assert_eq!(record.original_tweet.chars().count(), 100);
    }
}
