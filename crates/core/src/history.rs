//! Bounded snapshot history, newest first.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::model::ContentDocument;
use crate::store::local::{LocalStore, StoreError, HISTORY_KEY};

pub const DEFAULT_HISTORY_LIMIT: usize = 3;

/// Where a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistorySource {
    #[serde(rename = "supabase")]
    Remote,
    #[serde(rename = "manual-save")]
    ManualSave,
    #[serde(rename = "import")]
    Import,
    #[serde(rename = "pre-import-backup")]
    PreImportBackup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub content: ContentDocument,
    pub timestamp: DateTime<Utc>,
    pub source: HistorySource,
}

/// Ring buffer of [`HistoryEntry`] persisted under one local key.
#[derive(Clone)]
pub struct History {
    store: Arc<dyn LocalStore>,
    limit: usize,
}

impl History {
    pub fn new(store: Arc<dyn LocalStore>, limit: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
        }
    }

    /// All entries, newest first. Missing or corrupt history reads as empty.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read content history");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Content history is corrupt, treating it as empty");
            Vec::new()
        })
    }

    pub fn get(&self, index: usize) -> Option<HistoryEntry> {
        self.entries().into_iter().nth(index)
    }

    pub fn latest(&self) -> Option<HistoryEntry> {
        self.get(0)
    }

    /// Prepend a snapshot and drop whatever falls past the limit.
    pub fn push(&self, content: &ContentDocument, source: HistorySource) -> Result<(), StoreError> {
        let mut entries = self.entries();
        entries.insert(
            0,
            HistoryEntry {
                content: content.clone(),
                timestamp: Utc::now(),
                source,
            },
        );
        entries.truncate(self.limit);

        let raw = serde_json::to_string(&entries).map_err(|source| StoreError::Serialize {
            key: HISTORY_KEY.to_string(),
            source,
        })?;
        self.store.set(HISTORY_KEY, &raw)?;

        tracing::debug!(?source, len = entries.len(), "Recorded history snapshot");
        Ok(())
    }
}
