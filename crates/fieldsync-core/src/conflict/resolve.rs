//! Conflict resolution strategies

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{keys, Record};
use crate::util::format_timestamp;

/// Which copy of a field wins in a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Local,
    #[default]
    Server,
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "server" => Ok(Self::Server),
            other => Err(Error::InvalidInput(format!(
                "merge side must be 'local' or 'server', got '{other}'"
            ))),
        }
    }
}

/// Per-field winners for a merge; unlisted fields keep the server value
pub type MergeSelection = BTreeMap<String, Side>;

/// How to produce the record written back after a conflict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// The offline copy wins wholesale
    KeepLocal,
    /// The server copy wins wholesale
    KeepServer,
    /// Server copy with the selected fields taken from the offline copy
    Merge(MergeSelection),
}

impl ResolutionStrategy {
    pub const KEEP_LOCAL: &'static str = "keep_local";
    pub const KEEP_SERVER: &'static str = "keep_server";
    pub const MERGE: &'static str = "merge";

    /// Wire tag for this strategy
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::KeepLocal => Self::KEEP_LOCAL,
            Self::KeepServer => Self::KEEP_SERVER,
            Self::Merge(_) => Self::MERGE,
        }
    }

    /// Build a strategy from its tag.
    ///
    /// `selection` is only used for `merge`. Unrecognized tags are an error
    /// rather than a silent fall back to the server copy.
    pub fn from_tag(tag: &str, selection: MergeSelection) -> Result<Self> {
        match tag.trim() {
            Self::KEEP_LOCAL => Ok(Self::KeepLocal),
            Self::KEEP_SERVER => Ok(Self::KeepServer),
            Self::MERGE => Ok(Self::Merge(selection)),
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }
}

impl FromStr for ResolutionStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s, MergeSelection::new())
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Produce the reconciled record for a detected conflict.
///
/// The result is stamped with `_resolved: true` and `_resolvedAt`.
pub fn resolve_conflict(local: &Record, server: &Record, strategy: &ResolutionStrategy) -> Record {
    resolve_conflict_at(local, server, strategy, Utc::now())
}

/// [`resolve_conflict`] with an explicit resolution time.
pub fn resolve_conflict_at(
    local: &Record,
    server: &Record,
    strategy: &ResolutionStrategy,
    resolved_at: DateTime<Utc>,
) -> Record {
    let mut resolved = match strategy {
        ResolutionStrategy::KeepLocal => local.clone(),
        ResolutionStrategy::KeepServer => server.clone(),
        ResolutionStrategy::Merge(selection) => merge_records(local, server, selection),
    };

    tracing::debug!(strategy = %strategy, "Resolved sync conflict");

    resolved.insert(keys::RESOLVED.to_string(), Value::Bool(true));
    resolved.insert(
        keys::RESOLVED_AT.to_string(),
        Value::String(format_timestamp(resolved_at)),
    );
    resolved
}

// A field picked from the local side but absent there keeps the server value.
fn merge_records(local: &Record, server: &Record, selection: &MergeSelection) -> Record {
    let mut merged = server.clone();
    for (field, side) in selection {
        if *side != Side::Local {
            continue;
        }
        if let Some(value) = local.get(field) {
            merged.insert(field.clone(), value.clone());
        }
    }
    merged
}
