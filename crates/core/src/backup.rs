//! Backup export and import.
//!
//! A backup is the current document wrapped with a little metadata. Imports
//! also accept a bare document, which is what older exports contained.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::model::ContentDocument;
use crate::document::validate::validate_document;
use crate::engine::{ContentEngine, DataSource};
use crate::error::ContentError;
use crate::events::{ContentEvent, SaveOutcome};
use crate::history::HistorySource;

pub const BACKUP_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    pub has_user_data: bool,
    pub last_modified: DateTime<Utc>,
    pub source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupEnvelope {
    pub metadata: BackupMetadata,
    pub content: ContentDocument,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

/// A serialized backup ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFile {
    pub file_name: String,
    pub contents: String,
}

impl BackupFile {
    pub fn bytes(&self) -> &[u8] {
        self.contents.as_bytes()
    }

    /// Write the file into `dir`, returning its path.
    pub async fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ContentError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, self.bytes()).await?;
        Ok(path)
    }
}

/// Parse backup bytes into a document.
///
/// An object carrying both `metadata` and `content` is an envelope; anything
/// else is read as a bare document.
pub fn parse_backup(bytes: &[u8]) -> Result<ContentDocument, ContentError> {
    let value: Value = serde_json::from_slice(bytes)?;

    let is_envelope = value
        .as_object()
        .is_some_and(|map| map.contains_key("metadata") && map.contains_key("content"));

    let document = if is_envelope {
        let envelope: BackupEnvelope = serde_json::from_value(value)?;
        tracing::debug!(
            version = %envelope.version,
            exported_at = %envelope.export_date,
            "Parsed backup envelope"
        );
        envelope.content
    } else {
        tracing::debug!("Backup has no metadata, reading it as a bare document");
        ContentDocument::from_value(value)?
    };

    Ok(document)
}

impl ContentEngine {
    /// Serialize the authoritative document with metadata.
    pub async fn export_backup(&self) -> Result<BackupFile, ContentError> {
        let content = self.load().await;
        let now = Utc::now();
        let last_modified = self
            .get_history()
            .first()
            .map_or(now, |entry| entry.timestamp);

        let envelope = BackupEnvelope {
            metadata: BackupMetadata {
                has_user_data: self.has_user_data(),
                last_modified,
                source: self.data_source(),
            },
            content,
            export_date: now,
            version: BACKUP_FORMAT_VERSION.to_string(),
        };

        let contents = serde_json::to_string_pretty(&envelope).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialize backup");
            ContentError::Parse(e)
        })?;

        Ok(BackupFile {
            file_name: format!("site-backup-{}.json", now.format("%Y-%m-%d")),
            contents,
        })
    }

    /// Replace the current document with a backup.
    ///
    /// Nothing is touched unless the bytes parse. The current document is
    /// snapshotted first so the import can be undone from history.
    pub async fn import_backup(&self, bytes: &[u8]) -> Result<SaveOutcome, ContentError> {
        let imported = parse_backup(bytes).map_err(|e| {
            tracing::warn!(error = %e, "Rejected backup import");
            e
        })?;

        for issue in validate_document(&imported) {
            tracing::warn!(%issue, "Imported backup has a validation issue");
        }

        let current = self.load().await;
        self.record_history(&current, HistorySource::PreImportBackup);

        self.mark_user_data();
        let outcome = self.save(&imported).await;
        self.record_history(&imported, HistorySource::Import);

        tracing::info!(success = outcome.success, "Imported backup");
        self.publish(ContentEvent::Imported);
        Ok(outcome)
    }

    /// Read a backup file from disk and import it.
    pub async fn import_backup_file(&self, path: &Path) -> Result<SaveOutcome, ContentError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            tracing::warn!(error = %e, path = %path.display(), "Failed to read backup file");
            ContentError::Io(e)
        })?;
        self.import_backup(&bytes).await
    }
}
