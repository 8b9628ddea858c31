//! Data models for FieldSync

mod action;
mod conflict;
mod record;

pub use action::{ActionTarget, PendingAction};
pub use conflict::{ConflictReport, FieldConflict};
pub use record::{is_metadata_key, keys, to_record, Record, RecordId, METADATA_PREFIX};
