//! Sync conflict model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One field that both the offline copy and the server changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConflict {
    /// Field name
    pub field: String,
    /// Value in the offline copy
    pub local_value: Value,
    /// Value currently on the server
    pub server_value: Value,
    /// Baseline captured at cache time, if one was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_value: Option<Value>,
}

/// Outcome of comparing an offline record with the server copy.
///
/// Recomputed on every sync attempt; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub has_conflict: bool,
    #[serde(default)]
    pub conflicts: Vec<FieldConflict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_updated_at: Option<DateTime<Utc>>,
    /// The target record no longer exists on the server
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted_on_server: bool,
    /// The check itself failed and should be retried later
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl ConflictReport {
    /// Nothing to reconcile
    pub const fn none() -> Self {
        Self {
            has_conflict: false,
            conflicts: Vec::new(),
            local_modified_at: None,
            server_updated_at: None,
            deleted_on_server: false,
            error: false,
        }
    }

    /// The server no longer has the record the offline action targets
    pub fn deleted_on_server() -> Self {
        Self {
            has_conflict: true,
            deleted_on_server: true,
            ..Self::none()
        }
    }

    /// The server copy could not be fetched; not a verified clean result
    pub fn fetch_failed() -> Self {
        Self {
            error: true,
            ..Self::none()
        }
    }

    /// Names of the conflicting fields, in detection order
    pub fn field_names(&self) -> Vec<&str> {
        self.conflicts
            .iter()
            .map(|conflict| conflict.field.as_str())
            .collect()
    }
}
