use serde::{Deserialize, Serialize};

use crate::engine::DataSource;

/// Events emitted by the engine, consumed by whoever drives the admin UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentEvent {
    Saved(SaveOutcome),
    Loaded { source: DataSource },
    Imported,
}

/// Result of one `save()` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveOutcome {
    pub fn saved(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }

    /// Local write succeeded but the remote leg did not.
    pub fn partial(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcome_omits_absent_fields() {
        let value = serde_json::to_value(SaveOutcome::failed("disk full")).unwrap();
        assert_eq!(value, json!({ "success": false, "error": "disk full" }));
    }

    #[test]
    fn events_are_tagged() {
        let value = serde_json::to_value(ContentEvent::Loaded {
            source: DataSource::LocalStorage,
        })
        .unwrap();
        assert_eq!(value, json!({ "type": "loaded", "source": "localStorage" }));
    }
}
