//! fieldsync-core - Core library for FieldSync
//!
//! This crate contains the record model, offline cache stamping, and the sync
//! conflict detection/resolution logic shared by every FieldSync client.

pub mod config;
pub mod conflict;
pub mod error;
pub mod models;
pub mod util;

pub use config::ConflictConfig;
pub use conflict::{
    build_conflict_summary, detect_batch_conflicts, detect_conflict, resolve_conflict,
    stamp_for_offline, ConflictSummary, ResolutionStrategy, Severity,
};
pub use error::{Error, Result};
pub use models::{ActionTarget, ConflictReport, FieldConflict, PendingAction, Record, RecordId};
