//! Offline conflict handling.
//!
//! Records are stamped when cached for offline use, compared against the
//! server copy at sync time, and reconciled with a user-chosen strategy.

mod batch;
mod detect;
mod equality;
mod resolve;
mod stamp;
mod summary;

pub use batch::{detect_batch_conflicts, BatchConflict, BatchOptions, RecordFetcher};
pub use detect::{default_compare_fields, detect_conflict};
pub use equality::deep_equal;
pub use resolve::{
    resolve_conflict, resolve_conflict_at, MergeSelection, ResolutionStrategy, Side,
};
pub use stamp::{stamp_for_offline, stamp_for_offline_at, stamp_serializable};
pub use summary::{build_conflict_summary, ConflictSummary, Severity};
