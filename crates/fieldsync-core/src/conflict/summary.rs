//! Human-readable conflict summaries for the resolution prompt

use serde::{Deserialize, Serialize};

use crate::models::{ConflictReport, FieldConflict};
use crate::util::capitalize;

/// Fields at or above this count escalate the summary to a warning
const WARNING_FIELD_COUNT: usize = 3;

/// How loudly the UI should surface a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

/// What the resolution prompt shows the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictSummary {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub conflict_count: usize,
    pub conflicts: Vec<FieldConflict>,
}

/// Summarize a detection result for display.
///
/// Returns `None` when there is nothing to resolve. `entity_type` is a label
/// such as `"area"` or `"T&M ticket"`.
pub fn build_conflict_summary(report: &ConflictReport, entity_type: &str) -> Option<ConflictSummary> {
    if !report.has_conflict {
        return None;
    }

    let entity_type = match entity_type.trim() {
        "" => "record",
        label => label,
    };

    if report.deleted_on_server {
        return Some(ConflictSummary {
            title: format!("{} deleted", capitalize(entity_type)),
            description: format!(
                "This {entity_type} was deleted on the server while you were offline."
            ),
            severity: Severity::Warning,
            conflict_count: report.conflicts.len(),
            conflicts: report.conflicts.clone(),
        });
    }

    let conflict_count = report.conflicts.len();
    let severity = if conflict_count >= WARNING_FIELD_COUNT {
        Severity::Warning
    } else {
        Severity::Info
    };

    Some(ConflictSummary {
        title: format!("{} conflict", capitalize(entity_type)),
        description: format!(
            "This {entity_type} was changed on the server while you were offline. Conflicting fields: {}",
            report.field_names().join(", ")
        ),
        severity,
        conflict_count,
        conflicts: report.conflicts.clone(),
    })
}
