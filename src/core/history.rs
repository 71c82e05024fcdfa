//! Conversion history log
//!
//! A newest-first list of completed conversions, capped at
//! `MAX_HISTORY_SIZE` and persisted as one JSON blob under `HISTORY_KEY`.
//! Storage problems never reach the caller: reads fall back to an empty log
//! and failed writes are logged and dropped.

use std::sync::Arc;

use chrono::Utc;

use crate::core::storage::KeyValueStore;
use crate::shared::types::{EntryKind, HistoryEntry, ReplayRequest};

/// Maximum number of conversions kept
pub const MAX_HISTORY_SIZE: usize = 50;

/// Well-known key of the history blob
pub const HISTORY_KEY: &str = "uc_history";

/// Decode a persisted blob. Anything that is not a JSON array of entries
/// decodes to an empty history.
pub fn decode(blob: &str) -> Vec<HistoryEntry> {
    match serde_json::from_str::<Vec<HistoryEntry>>(blob) {
        Ok(mut entries) => {
            entries.truncate(MAX_HISTORY_SIZE);
            entries
        }
        Err(e) => {
            eprintln!("[HistoryLog] Ignoring malformed history blob: {}", e);
            Vec::new()
        }
    }
}

pub fn encode(entries: &[HistoryEntry]) -> serde_json::Result<String> {
    serde_json::to_string(entries)
}

/// Rebuild the inputs of the entry at `index`, or None when out of bounds
pub fn replay(index: usize, entries: &[HistoryEntry]) -> Option<ReplayRequest> {
    let entry = entries.get(index)?;

    Some(match &entry.kind {
        EntryKind::Unit { category } => ReplayRequest::Unit {
            category: *category,
            from: entry.from.clone(),
            to: entry.to.clone(),
            value: entry.input_value,
        },
        EntryKind::Currency { .. } => ReplayRequest::Currency {
            from: entry.from.clone(),
            to: entry.to.clone(),
            amount: entry.input_value,
        },
    })
}

/// Bounded, persisted conversion history
#[derive(Clone)]
pub struct HistoryLog {
    store: Arc<dyn KeyValueStore>,
}

impl HistoryLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current history, newest first
    pub fn load(&self) -> Vec<HistoryEntry> {
        match self.store.get(HISTORY_KEY) {
            Ok(Some(blob)) => decode(&blob),
            Ok(None) => Vec::new(),
            Err(e) => {
                eprintln!("[HistoryLog] Failed to load history: {}", e);
                Vec::new()
            }
        }
    }

    /// Record `entry` at the front, stamped with the current time, and
    /// return the new history.
    pub fn append(&self, mut entry: HistoryEntry) -> Vec<HistoryEntry> {
        entry.timestamp = Utc::now();

        let mut entries = self.load();
        entries.insert(0, entry);
        entries.truncate(MAX_HISTORY_SIZE);

        self.persist(&entries);
        entries
    }

    /// Forget all history
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            eprintln!("[HistoryLog] Failed to clear history: {}", e);
        }
    }

    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, entries: &[HistoryEntry]) {
        let blob = match encode(entries) {
            Ok(blob) => blob,
            Err(e) => {
                eprintln!("[HistoryLog] Failed to encode history: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(HISTORY_KEY, &blob) {
            eprintln!("[HistoryLog] Failed to save history: {}", e);
        }
    }
}
