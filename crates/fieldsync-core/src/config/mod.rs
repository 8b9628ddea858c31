//! Conflict handling configuration.
//!
//! Provides `ConflictConfig`, the per-record-type field lists used when
//! stamping and comparing records, plus batch tuning. Stored as JSON.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::conflict::BatchOptions;
use crate::error::{Error, Result};
use crate::util::normalize_field_names;

const CONFIG_SCHEMA_VERSION: u32 = 1;
const MAX_BATCH_CONCURRENCY: usize = 64;

/// Field lists and tuning for offline conflict handling.
///
/// Record types without an entry fall back to reflective field enumeration
/// when comparing and to no baseline when stamping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConflictConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub record_types: BTreeMap<String, RecordTypeConfig>,
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

/// Field lists for one record type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RecordTypeConfig {
    /// Fields whose values are copied into `_cachedValues` when stamping
    #[serde(default)]
    pub tracked_fields: Vec<String>,
    /// Fields compared at sync time; empty means every entity field
    #[serde(default)]
    pub compare_fields: Vec<String>,
}

const fn default_config_version() -> u32 {
    CONFIG_SCHEMA_VERSION
}

const fn default_batch_concurrency() -> usize {
    1
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_SCHEMA_VERSION,
            record_types: BTreeMap::new(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

impl ConflictConfig {
    /// Parse, normalize and validate a JSON config payload.
    pub fn parse(payload: &str) -> Result<Self> {
        let mut config = serde_json::from_str::<Self>(payload)
            .map_err(|error| Error::Config(format!("invalid config JSON: {error}")))?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Load the config at `path`; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No conflict config found, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!("Failed to read config at {}: {error}", path.display()))
        })?;
        Self::parse(&raw).map_err(|error| match error {
            Error::Config(message) => Error::Config(format!("{message} ({})", path.display())),
            other => other,
        })
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        normalized.validate()?;
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Trim record type names and field lists, dropping empties and duplicates.
    pub fn normalize(&mut self) {
        let record_types = std::mem::take(&mut self.record_types);
        self.record_types = record_types
            .into_iter()
            .filter_map(|(name, entry)| {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return None;
                }
                Some((
                    name,
                    RecordTypeConfig {
                        tracked_fields: normalize_field_names(&entry.tracked_fields),
                        compare_fields: normalize_field_names(&entry.compare_fields),
                    },
                ))
            })
            .collect();
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != CONFIG_SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "unsupported config version {} (expected {CONFIG_SCHEMA_VERSION})",
                self.version
            )));
        }
        if self.batch_concurrency == 0 || self.batch_concurrency > MAX_BATCH_CONCURRENCY {
            return Err(Error::Config(format!(
                "batch_concurrency must be between 1 and {MAX_BATCH_CONCURRENCY}, got {}",
                self.batch_concurrency
            )));
        }
        Ok(())
    }

    /// Fields to baseline when stamping a record of `record_type`
    pub fn tracked_fields_for(&self, record_type: &str) -> &[String] {
        self.record_types
            .get(record_type)
            .map(|entry| entry.tracked_fields.as_slice())
            .unwrap_or_default()
    }

    /// Fields to compare for `record_type`; `None` means every entity field
    pub fn compare_fields_for(&self, record_type: &str) -> Option<&[String]> {
        self.record_types
            .get(record_type)
            .map(|entry| entry.compare_fields.as_slice())
            .filter(|fields| !fields.is_empty())
    }

    /// Batch options derived from this config
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            compare_fields: self
                .record_types
                .iter()
                .filter(|(_, entry)| !entry.compare_fields.is_empty())
                .map(|(name, entry)| (name.clone(), entry.compare_fields.clone()))
                .collect(),
            concurrency: self.batch_concurrency,
        }
    }
}
