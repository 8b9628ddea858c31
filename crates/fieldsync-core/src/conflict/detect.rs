//! Conflict detection between an offline copy and the server copy

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::equality::deep_equal;
use crate::models::{is_metadata_key, keys, ConflictReport, FieldConflict, Record};
use crate::util::parse_timestamp;

/// Decide whether `local` and `server` were both edited since the local copy
/// was cached.
///
/// A field is reported only when the two sides disagree *and* each side moved
/// away from the `_cachedValues` baseline. Without a baseline for a field, any
/// difference counts as a change on both sides. When the server has not been
/// updated since `_cachedAt`, nothing is reported: the local edit simply wins.
///
/// `compare_fields` restricts the check to the given fields; `None` compares
/// every non-metadata field of `local` except `id` and `created_at`.
pub fn detect_conflict(
    local: Option<&Record>,
    server: Option<&Record>,
    compare_fields: Option<&[String]>,
) -> ConflictReport {
    let (Some(local), Some(server)) = (local, server) else {
        return ConflictReport::none();
    };

    let local_cached_at = timestamp_or_epoch(local, keys::CACHED_AT);
    let server_updated_at = timestamp_or_epoch(server, keys::UPDATED_AT);
    let local_modified_at = local
        .get(keys::OFFLINE_MODIFIED_AT)
        .or_else(|| local.get(keys::UPDATED_AT))
        .and_then(parse_timestamp);

    if let (Some(updated_at), Some(cached_at)) = (server_updated_at, local_cached_at) {
        if updated_at <= cached_at {
            tracing::debug!(
                server_updated_at = %updated_at,
                local_cached_at = %cached_at,
                "Server unchanged since local copy was cached"
            );
            return ConflictReport {
                local_modified_at,
                server_updated_at,
                ..ConflictReport::none()
            };
        }
    }

    let fields = compare_fields.map_or_else(|| default_compare_fields(local), <[String]>::to_vec);
    let cached_values = local.get(keys::CACHED_VALUES).and_then(Value::as_object);

    let mut conflicts = Vec::new();
    for field in &fields {
        let (Some(local_value), Some(server_value)) = (local.get(field), server.get(field)) else {
            continue;
        };
        if deep_equal(local_value, server_value) {
            continue;
        }

        let cached_value = cached_values.and_then(|cached| cached.get(field));
        let local_changed = !cached_value.is_some_and(|cached| deep_equal(cached, local_value));
        let server_changed = !cached_value.is_some_and(|cached| deep_equal(cached, server_value));

        if local_changed && server_changed {
            conflicts.push(FieldConflict {
                field: field.clone(),
                local_value: local_value.clone(),
                server_value: server_value.clone(),
                cached_value: cached_value.cloned(),
            });
        } else {
            tracing::debug!(
                field = %field,
                local_changed,
                server_changed,
                "Field differs on one side only"
            );
        }
    }

    ConflictReport {
        has_conflict: !conflicts.is_empty(),
        conflicts,
        local_modified_at,
        server_updated_at,
        ..ConflictReport::none()
    }
}

/// Every entity field of `record`, skipping offline metadata, `id` and
/// `created_at`.
pub fn default_compare_fields(record: &Record) -> Vec<String> {
    record
        .keys()
        .filter(|key| !is_metadata_key(key))
        .filter(|key| key.as_str() != keys::ID && key.as_str() != keys::CREATED_AT)
        .cloned()
        .collect()
}

// Missing timestamps count as the Unix epoch, i.e. older than everything.
// Unparseable ones yield `None`, which never short-circuits the field check.
fn timestamp_or_epoch(record: &Record, key: &str) -> Option<DateTime<Utc>> {
    match record.get(key) {
        None | Some(Value::Null) => Some(DateTime::UNIX_EPOCH),
        Some(value) => {
            let parsed = parse_timestamp(value);
            if parsed.is_none() {
                tracing::warn!(
                    field = key,
                    value = %value,
                    "Unparseable timestamp, comparing fields anyway"
                );
            }
            parsed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn missing_records_report_no_conflict() {
        let server = record(json!({"id": 1, "updated_at": "2025-01-10T14:00:00Z"}));
        assert_eq!(detect_conflict(None, Some(&server), None), ConflictReport::none());
        assert_eq!(detect_conflict(Some(&server), None, None), ConflictReport::none());
    }

    #[test]
    fn server_not_newer_than_cache_is_never_a_conflict() {
        let local = record(json!({
            "id": 1,
            "status": "done",
            "weight": 10,
            "_cachedAt": "2025-01-10T12:00:00Z",
            "_cachedValues": {"status": "working"}
        }));
        for updated_at in ["2025-01-10T12:00:00Z", "2025-01-10T11:00:00Z"] {
            let server = record(json!({
                "id": 1,
                "status": "not_started",
                "weight": 99,
                "updated_at": updated_at
            }));
            let report = detect_conflict(Some(&local), Some(&server), None);
            assert!(!report.has_conflict);
            assert!(report.conflicts.is_empty());
        }
    }

    #[test]
    fn double_edit_is_reported() {
        let local = record(json!({
            "id": 1,
            "status": "done",
            "_cachedAt": "2025-01-10T12:00:00Z",
            "_cachedValues": {"status": "working"},
            "updated_at": "2025-01-10T13:00:00Z"
        }));
        let server = record(json!({
            "id": 1,
            "status": "not_started",
            "updated_at": "2025-01-10T14:00:00Z"
        }));

        let report = detect_conflict(Some(&local), Some(&server), Some(fields(&["status"]).as_slice()));

        assert!(report.has_conflict);
        assert_eq!(
            report.conflicts,
            vec![FieldConflict {
                field: "status".to_string(),
                local_value: json!("done"),
                server_value: json!("not_started"),
                cached_value: Some(json!("working")),
            }]
        );
        assert_eq!(
            report.local_modified_at,
            parse_timestamp(&json!("2025-01-10T13:00:00Z"))
        );
        assert_eq!(
            report.server_updated_at,
            parse_timestamp(&json!("2025-01-10T14:00:00Z"))
        );
    }

    #[test]
    fn server_only_change_is_a_fast_forward() {
        let local = record(json!({
            "id": 1,
            "status": "working",
            "_cachedAt": "2025-01-10T12:00:00Z",
            "_cachedValues": {"status": "working"}
        }));
        let server = record(json!({
            "id": 1,
            "status": "not_started",
            "updated_at": "2025-01-10T14:00:00Z"
        }));

        let report = detect_conflict(Some(&local), Some(&server), Some(fields(&["status"]).as_slice()));
        assert!(!report.has_conflict);
    }

    #[test]
    fn local_only_change_is_a_push() {
        let local = record(json!({
            "id": 1,
            "status": "done",
            "_cachedAt": "2025-01-10T12:00:00Z",
            "_cachedValues": {"status": "working"}
        }));
        let server = record(json!({
            "id": 1,
            "status": "working",
            "updated_at": "2025-01-10T14:00:00Z"
        }));

        let report = detect_conflict(Some(&local), Some(&server), Some(fields(&["status"]).as_slice()));
        assert!(!report.has_conflict);
    }

    #[test]
    fn missing_baseline_treats_any_difference_as_conflict() {
        let local = record(json!({
            "id": 1,
            "weight": 5,
            "_cachedAt": "2025-01-10T12:00:00Z"
        }));
        let server = record(json!({
            "id": 1,
            "weight": 8,
            "updated_at": "2025-01-10T14:00:00Z"
        }));

        let report = detect_conflict(Some(&local), Some(&server), None);
        assert_eq!(report.field_names(), vec!["weight"]);
        assert_eq!(report.conflicts[0].cached_value, None);
    }

    #[test]
    fn default_fields_skip_metadata_and_identity() {
        let local = record(json!({
            "id": 1,
            "created_at": "2025-01-01T00:00:00Z",
            "name": "Level 2",
            "_offlineModifiedAt": "2025-01-10T13:00:00Z",
            "_cachedAt": "2025-01-10T12:00:00Z"
        }));
        let mut compared = default_compare_fields(&local);
        compared.sort();
        assert_eq!(compared, vec!["name".to_string()]);

        let server = record(json!({
            "id": 2,
            "created_at": "2024-12-31T00:00:00Z",
            "name": "Level 2",
            "updated_at": "2025-01-10T14:00:00Z"
        }));
        let report = detect_conflict(Some(&local), Some(&server), None);
        assert!(!report.has_conflict);
        assert_eq!(
            report.local_modified_at,
            parse_timestamp(&json!("2025-01-10T13:00:00Z"))
        );
    }

    #[test]
    fn fields_missing_on_either_side_are_skipped() {
        let local = record(json!({
            "id": 1,
            "notes": "poured slab",
            "_cachedAt": "2025-01-10T12:00:00Z"
        }));
        let server = record(json!({
            "id": 1,
            "status": "done",
            "updated_at": "2025-01-10T14:00:00Z"
        }));

        let report =
            detect_conflict(Some(&local), Some(&server), Some(fields(&["notes", "status"]).as_slice()));
        assert!(!report.has_conflict);
    }

    #[test]
    fn structured_values_compare_deeply() {
        let local = record(json!({
            "id": 1,
            "crew": {"lead": "Ana", "size": 4},
            "_cachedAt": "2025-01-10T12:00:00Z",
            "_cachedValues": {"crew": {"lead": "Ana", "size": 3}}
        }));
        let same_as_baseline = record(json!({
            "id": 1,
            "crew": {"size": 3, "lead": "Ana"},
            "updated_at": "2025-01-10T14:00:00Z"
        }));
        let also_changed = record(json!({
            "id": 1,
            "crew": {"lead": "Raj", "size": 3},
            "updated_at": "2025-01-10T14:00:00Z"
        }));

        assert!(!detect_conflict(Some(&local), Some(&same_as_baseline), None).has_conflict);
        assert!(detect_conflict(Some(&local), Some(&also_changed), None).has_conflict);
    }

    #[test]
    fn missing_server_timestamp_suppresses_detection() {
        let local = record(json!({"id": 1, "status": "done"}));
        let server = record(json!({"id": 1, "status": "not_started"}));

        let report = detect_conflict(Some(&local), Some(&server), None);
        assert!(!report.has_conflict);
        assert_eq!(report.server_updated_at, Some(DateTime::UNIX_EPOCH));
    }

    #[test]
    fn unparseable_timestamps_still_compare_fields() {
        let local = record(json!({
            "id": 1,
            "status": "done",
            "_cachedAt": "2025-01-10T12:00:00Z",
            "_cachedValues": {"status": "working"}
        }));
        let server = record(json!({
            "id": 1,
            "status": "not_started",
            "updated_at": "2025/01/10 14:00"
        }));

        let report = detect_conflict(Some(&local), Some(&server), None);
        assert_eq!(report.field_names(), vec!["status"]);
        assert_eq!(report.server_updated_at, None);

        let mut garbled_cache = local.clone();
        garbled_cache.insert(keys::CACHED_AT.to_string(), json!("yesterday"));
        let server = record(json!({
            "id": 1,
            "status": "not_started",
            "updated_at": "2025-01-10T11:00:00Z"
        }));
        let report = detect_conflict(Some(&garbled_cache), Some(&server), None);
        assert_eq!(report.field_names(), vec!["status"]);
    }

    #[test]
    fn missing_cache_stamp_compares_against_epoch() {
        let local = record(json!({"id": 1, "status": "done"}));
        let server = record(json!({
            "id": 1,
            "status": "not_started",
            "updated_at": "2025-01-10T14:00:00Z"
        }));

        let report = detect_conflict(Some(&local), Some(&server), None);
        assert_eq!(report.field_names(), vec!["status"]);
    }

    #[test]
    fn conflicts_follow_compare_field_order() {
        let local = record(json!({
            "id": 1,
            "weight": 1,
            "status": "done",
            "_cachedAt": "2025-01-10T12:00:00Z"
        }));
        let server = record(json!({
            "id": 1,
            "weight": 2,
            "status": "not_started",
            "updated_at": "2025-01-10T14:00:00Z"
        }));

        let report = detect_conflict(
            Some(&local),
            Some(&server),
            Some(fields(&["status", "weight"]).as_slice()),
        );
        assert_eq!(report.field_names(), vec!["status", "weight"]);
    }
}
