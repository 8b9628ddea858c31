//! Pending offline action model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{keys, Record, RecordId};

/// What a pending action points at on the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTarget {
    /// `payload.id` is absent or null: the action creates a new record
    Create,
    /// An existing record to check against the server copy
    Existing(RecordId),
    /// `payload.id` is set but cannot be used to look the record up
    Unusable(Value),
}

/// A mutation queued while offline, waiting to be pushed to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    /// Record type the action targets (e.g. `area`, `tm_ticket`)
    #[serde(rename = "type")]
    pub action_type: String,
    /// The record as edited offline; `payload.id` names the target
    #[serde(default)]
    pub payload: Record,
}

impl PendingAction {
    pub fn new(action_type: impl Into<String>, payload: Record) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
        }
    }

    /// Classify `payload.id`.
    ///
    /// Only a missing or null id marks a create; any other value that is not
    /// a usable [`RecordId`] is reported as [`ActionTarget::Unusable`].
    pub fn target(&self) -> ActionTarget {
        match self.payload.get(keys::ID) {
            None | Some(Value::Null) => ActionTarget::Create,
            Some(raw) => RecordId::from_record(&self.payload)
                .map_or_else(|| ActionTarget::Unusable(raw.clone()), ActionTarget::Existing),
        }
    }

    /// Target record id, when `payload.id` holds a usable one
    pub fn target_id(&self) -> Option<RecordId> {
        RecordId::from_record(&self.payload)
    }
}
