use std::sync::Arc;

use crate::document::model::ContentDocument;

use super::local::{LocalStore, StoreError, CONTENT_KEY, USER_DATA_KEY};

/// Typed view over the content and user-data keys of a [`LocalStore`].
///
/// Reads never fail: unreadable or corrupt values are logged and treated as
/// absent. Writes report their error so callers can abort.
#[derive(Clone)]
pub struct LocalContent {
    store: Arc<dyn LocalStore>,
}

impl LocalContent {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    pub fn read_content(&self) -> Option<ContentDocument> {
        let raw = match self.store.get(CONTENT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read cached content");
                return None;
            }
        };

        match ContentDocument::from_json(&raw) {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::error!(error = %e, "Cached content is not valid JSON, ignoring it");
                None
            }
        }
    }

    /// Whether a readable document is cached. A corrupt value does not count.
    pub fn has_cached_content(&self) -> bool {
        self.read_content().is_some()
    }

    pub fn write_content(&self, document: &ContentDocument) -> Result<(), StoreError> {
        let raw = serde_json::to_string(document).map_err(|source| StoreError::Serialize {
            key: CONTENT_KEY.to_string(),
            source,
        })?;
        self.store.set(CONTENT_KEY, &raw)
    }

    pub fn has_user_data(&self) -> bool {
        match self.store.get(USER_DATA_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, raw = %raw, "Unreadable user-data flag, assuming false");
                false
            }),
            Ok(None) => false,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read user-data flag");
                false
            }
        }
    }

    pub fn set_has_user_data(&self) -> Result<(), StoreError> {
        self.store.set(USER_DATA_KEY, "true")
    }
}
