//! Reconciliation engine.
//!
//! Decides which copy of the content document is authoritative on load, and
//! writes through the local store and the remote store on save.
//!
//! Load precedence, with a remote configured:
//!
//! 1. remote row with real (non-blank, non-default) content wins and is cached
//!    locally;
//! 2. a blank or default remote row, for an install that has saved real data
//!    before, is treated as suspicious: a real local copy wins and is pushed
//!    back to the remote;
//! 3. a missing row falls back to local data, which is pushed to the remote
//!    when the install has saved real data before;
//! 4. a failed fetch falls back to local data.
//!
//! Local data itself resolves as cache, then newest history entry (only for an
//! install with user data), then the built-in default.

mod debounce;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::model::ContentDocument;
use crate::document::{default_document, is_default};
use crate::error::ContentError;
use crate::events::{ContentEvent, EventBus, SaveOutcome};
use crate::history::{History, HistoryEntry, HistorySource, DEFAULT_HISTORY_LIMIT};
use crate::store::cache::LocalContent;
use crate::store::local::LocalStore;
use crate::store::remote::RemoteStore;

pub use debounce::DebouncedSave;
use debounce::PendingSave;

/// Row id of the single remote content record.
pub const CONTENT_ROW_ID: &str = "main";

pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_secs(1);

const SAVED_LOCAL_ONLY: &str = "Saved to local storage only";
const SAVED: &str = "Saved";
const SAVED_REMOTE_FAILED: &str = "Saved to local storage only; remote sync failed";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Trailing window for [`ContentEngine::save_debounced`].
    pub debounce: Duration,
    /// Maximum number of history snapshots kept.
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_SAVE_DEBOUNCE,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Where the current content most likely came from. Diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    #[serde(rename = "supabase")]
    Remote,
    #[serde(rename = "localStorage")]
    LocalStorage,
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "unknown")]
    Unknown,
}

/// Owns both stores, the history, the user-data flag and the debounce slot.
///
/// The user-data flag is cached in memory and persisted in the local store; it
/// goes from false to true at most once per install and no engine operation
/// clears it. The debounce slot holds at most one pending save.
pub struct ContentEngine {
    local: LocalContent,
    remote: Option<Arc<dyn RemoteStore>>,
    history: History,
    has_user_data: AtomicBool,
    events: EventBus,
    config: EngineConfig,
    pending: Mutex<Option<PendingSave>>,
    next_ticket: AtomicU64,
}

impl ContentEngine {
    pub fn new(local: Arc<dyn LocalStore>, config: EngineConfig) -> Self {
        let cache = LocalContent::new(Arc::clone(&local));
        let has_user_data = cache.has_user_data();
        Self {
            local: cache,
            remote: None,
            history: History::new(local, config.history_limit),
            has_user_data: AtomicBool::new(has_user_data),
            events: EventBus::default(),
            config,
            pending: Mutex::new(None),
            next_ticket: AtomicU64::new(1),
        }
    }

    /// Attach a remote store. Without one the engine runs local-only.
    pub fn with_remote(mut self, remote: Arc<dyn RemoteStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    pub fn has_user_data(&self) -> bool {
        self.has_user_data.load(Ordering::SeqCst)
    }

    pub fn data_source(&self) -> DataSource {
        match (self.has_user_data(), self.local.has_cached_content()) {
            (true, true) if self.remote_enabled() => DataSource::Remote,
            (_, true) => DataSource::LocalStorage,
            (false, false) => DataSource::Default,
            (true, false) => DataSource::Unknown,
        }
    }

    /// Produce the authoritative document.
    pub async fn load(&self) -> ContentDocument {
        let document = self.reconcile().await;
        self.events.publish(ContentEvent::Loaded {
            source: self.data_source(),
        });
        document
    }

    async fn reconcile(&self) -> ContentDocument {
        let remote = match self.remote() {
            Ok(remote) => remote,
            Err(e) => {
                tracing::debug!(reason = %e, "Loading from local storage");
                return self.load_local();
            }
        };

        let row = match remote.fetch(CONTENT_ROW_ID).await {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load from remote store, using local storage");
                return self.load_local();
            }
        };

        let Some(row) = row else {
            let document = self.load_local();
            if self.has_user_data() {
                tracing::info!("Remote row missing for an install with user data, restoring it");
                self.push_remote_logged(remote, &document).await;
            }
            return document;
        };

        let remote_document = match decode_remote_content(row.content) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(error = %e, "Remote content is unreadable, using local storage");
                return self.load_local();
            }
        };

        match remote_document {
            Some(document) if !looks_empty(&document) => {
                self.adopt_remote(&document);
                document
            }
            remote_document => {
                let remote_document = remote_document.unwrap_or_else(default_document);
                if !self.has_user_data() {
                    return remote_document;
                }

                let local = self.load_local();
                if looks_empty(&local) {
                    return remote_document;
                }

                tracing::warn!(
                    "Remote content is blank or default but this install has user data, \
                     keeping the local copy and pushing it back"
                );
                self.push_remote_logged(remote, &local).await;
                local
            }
        }
    }

    /// Cache a real remote document locally. History only grows when the
    /// remote copy differs from what was cached, so repeated loads are stable.
    fn adopt_remote(&self, document: &ContentDocument) {
        self.mark_user_data();
        if self.local.read_content().as_ref() == Some(document) {
            return;
        }

        self.record_history(document, HistorySource::Remote);
        if let Err(e) = self.local.write_content(document) {
            tracing::error!(error = %e, "Failed to cache remote content locally");
        }
    }

    /// Resolve the document from local data alone. Never fails.
    pub fn load_local(&self) -> ContentDocument {
        if let Some(document) = self.local.read_content() {
            return document;
        }
        if !self.has_user_data() {
            return default_document();
        }

        match self.history.latest() {
            Some(entry) => {
                tracing::warn!(
                    snapshot_at = %entry.timestamp,
                    "Local content missing for an install with user data, restoring newest snapshot"
                );
                entry.content
            }
            None => {
                tracing::error!("Local content and history both missing, falling back to default");
                default_document()
            }
        }
    }

    /// Persist a document locally and, when configured, remotely.
    ///
    /// A local write failure stops the pipeline before the remote is touched.
    /// The outcome is returned and also published as [`ContentEvent::Saved`].
    pub async fn save(&self, document: &ContentDocument) -> SaveOutcome {
        let outcome = self.write_through(document).await;
        self.events.publish(ContentEvent::Saved(outcome.clone()));
        outcome
    }

    async fn write_through(&self, document: &ContentDocument) -> SaveOutcome {
        if !is_default(document) {
            self.mark_user_data();
            self.record_history(document, HistorySource::ManualSave);
        }

        if let Err(e) = self.local.write_content(document) {
            let err = ContentError::StorageWrite(e);
            tracing::error!(error = %err, "Save aborted, remote write skipped");
            return SaveOutcome::failed(err.to_string());
        }

        let Ok(remote) = self.remote() else {
            return SaveOutcome::saved(SAVED_LOCAL_ONLY);
        };

        match push_remote(remote, document).await {
            Ok(()) => SaveOutcome::saved(SAVED),
            Err(e) => {
                tracing::error!(error = %e, "Saved locally but remote write failed");
                SaveOutcome::partial(SAVED_REMOTE_FAILED, e.to_string())
            }
        }
    }

    /// History snapshots, newest first.
    pub fn get_history(&self) -> Vec<HistoryEntry> {
        self.history.entries()
    }

    /// The document stored at `index`, if any. Does not save it.
    pub fn restore_from_history(&self, index: usize) -> Option<ContentDocument> {
        self.history.get(index).map(|entry| entry.content)
    }

    fn remote(&self) -> Result<&dyn RemoteStore, ContentError> {
        self.remote.as_deref().ok_or(ContentError::RemoteUnavailable)
    }

    pub(crate) fn mark_user_data(&self) {
        if self.has_user_data.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.local.set_has_user_data() {
            tracing::error!(error = %e, "Failed to persist user-data flag");
        }
    }

    pub(crate) fn record_history(&self, document: &ContentDocument, source: HistorySource) {
        if let Err(e) = self.history.push(document, source) {
            tracing::warn!(error = %e, ?source, "Failed to record history snapshot");
        }
    }

    pub(crate) fn publish(&self, event: ContentEvent) {
        self.events.publish(event);
    }

    async fn push_remote_logged(&self, remote: &dyn RemoteStore, document: &ContentDocument) {
        if let Err(e) = push_remote(remote, document).await {
            tracing::error!(error = %e, "Failed to push local content to remote store");
        }
    }
}

async fn push_remote(remote: &dyn RemoteStore, document: &ContentDocument) -> Result<(), ContentError> {
    let content = serde_json::to_value(document)?;
    remote.upsert(CONTENT_ROW_ID, &content, Utc::now()).await?;
    Ok(())
}

/// Decode the stored remote value. `None` means the row holds nothing.
///
/// Older rows may hold the document as a JSON string rather than an object.
fn decode_remote_content(content: Value) -> Result<Option<ContentDocument>, serde_json::Error> {
    match content {
        Value::Null => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        Value::String(raw) => {
            let value: Value = serde_json::from_str(&raw)?;
            decode_remote_content(value)
        }
        value => ContentDocument::from_value(value).map(Some),
    }
}

/// No blocks, or nothing but the built-in default.
fn looks_empty(document: &ContentDocument) -> bool {
    document.blocks.is_empty() || is_default(document)
}

#[cfg(test)]
mod tests;
