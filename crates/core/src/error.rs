use thiserror::Error;

use crate::store::local::StoreError;
use crate::store::remote::RemoteError;

/// Errors produced by the reconciliation engine and backup/restore.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Local write failed (quota, disk, serialization). Aborts a save.
    #[error("failed to write local storage: {0}")]
    StorageWrite(#[from] StoreError),

    /// No remote store is configured. A routing signal, not a failure.
    #[error("remote store is not configured")]
    RemoteUnavailable,

    #[error("remote store error: {0}")]
    Remote(#[from] RemoteError),

    #[error("invalid content data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

impl ContentError {
    /// Short machine-readable kind, used in logs and API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentError::StorageWrite(_) => "storageWrite",
            ContentError::RemoteUnavailable => "remoteUnavailable",
            ContentError::Remote(_) => "remote",
            ContentError::Parse(_) => "parse",
            ContentError::Io(_) => "io",
        }
    }
}
