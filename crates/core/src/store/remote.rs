//! Remote single-table content store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("remote store rejected the request: {0}")]
    Rejected(String),
}

/// One row of the remote `site_content` table.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRow {
    pub id: String,
    pub content: Value,
    pub updated_at: DateTime<Utc>,
}

/// Point read and upsert by row id.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Read a row. `Ok(None)` means the row does not exist.
    async fn fetch(&self, id: &str) -> Result<Option<RemoteRow>, RemoteError>;

    /// Insert or replace a row.
    async fn upsert(
        &self,
        id: &str,
        content: &Value,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RemoteError>;
}

/// In-process remote store with failure injection and call counters.
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    rows: Mutex<HashMap<String, RemoteRow>>,
    fail_fetch: AtomicBool,
    fail_upsert: AtomicBool,
    fetches: AtomicUsize,
    upserts: AtomicUsize,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a row directly, bypassing the upsert counter.
    pub fn insert_row(&self, id: &str, content: Value) {
        let row = RemoteRow {
            id: id.to_string(),
            content,
            updated_at: Utc::now(),
        };
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), row);
    }

    pub fn row(&self, id: &str) -> Option<RemoteRow> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_upsert(&self, fail: bool) {
        self.fail_upsert.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn fetch(&self, id: &str) -> Result<Option<RemoteRow>, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(RemoteError::Rejected("fetch failed".to_string()));
        }
        Ok(self.row(id))
    }

    async fn upsert(
        &self,
        id: &str,
        content: &Value,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RemoteError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_upsert.load(Ordering::SeqCst) {
            return Err(RemoteError::Rejected("upsert failed".to_string()));
        }
        let row = RemoteRow {
            id: id.to_string(),
            content: content.clone(),
            updated_at,
        };
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), row);
        Ok(())
    }
}
