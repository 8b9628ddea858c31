//! Record model
//!
//! A record is whatever JSON object the remote store hands back for one
//! entity (project area, T&M ticket, daily report, ...). No schema is
//! enforced here; the conflict core works over the keys that are present.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A single entity snapshot keyed by field name
pub type Record = Map<String, Value>;

/// Keys beginning with this prefix are offline bookkeeping, not entity data
pub const METADATA_PREFIX: &str = "_";

/// Well-known record keys
pub mod keys {
    /// When this snapshot was captured from the server
    pub const CACHED_AT: &str = "_cachedAt";
    /// Baseline copies of tracked fields taken at cache time
    pub const CACHED_VALUES: &str = "_cachedValues";
    /// When the offline edit was made
    pub const OFFLINE_MODIFIED_AT: &str = "_offlineModifiedAt";
    /// Set once a conflict has been resolved
    pub const RESOLVED: &str = "_resolved";
    /// When the conflict was resolved
    pub const RESOLVED_AT: &str = "_resolvedAt";
    pub const ID: &str = "id";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
}

/// Returns true for offline bookkeeping keys such as `_cachedAt`
pub fn is_metadata_key(key: &str) -> bool {
    key.starts_with(METADATA_PREFIX)
}

/// Convert any serializable entity into a [`Record`].
///
/// Fails when the value does not serialize to a JSON object.
pub fn to_record<T: Serialize>(value: &T) -> Result<Record> {
    match serde_json::to_value(value)? {
        Value::Object(record) => Ok(record),
        other => Err(Error::InvalidInput(format!(
            "expected a JSON object, got {}",
            value_kind(&other)
        ))),
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Identifier of a record in the remote store (text or integer)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Read the `id` field of a record, if it holds a usable identifier.
    ///
    /// `null`, empty strings, and non-scalar values are treated as absent.
    pub fn from_record(record: &Record) -> Option<Self> {
        match record.get(keys::ID)? {
            Value::Number(number) => number.as_i64().map(Self::Number),
            Value::String(text) if !text.trim().is_empty() => Some(Self::Text(text.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}
