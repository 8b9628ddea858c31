//! Offline cache stamping

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::models::{keys, to_record, Record};
use crate::util::format_timestamp;

/// Stamp a freshly fetched record before it goes into the offline cache.
///
/// The returned copy carries `_cachedAt` and, when `track_fields` is not
/// empty, a `_cachedValues` baseline with a deep copy of each tracked field
/// present on `record`. The input is left untouched.
pub fn stamp_for_offline<S: AsRef<str>>(record: &Record, track_fields: &[S]) -> Record {
    stamp_for_offline_at(record, track_fields, Utc::now())
}

/// [`stamp_for_offline`] with an explicit capture time.
pub fn stamp_for_offline_at<S: AsRef<str>>(
    record: &Record,
    track_fields: &[S],
    cached_at: DateTime<Utc>,
) -> Record {
    let mut stamped = record.clone();
    stamped.insert(
        keys::CACHED_AT.to_string(),
        Value::String(format_timestamp(cached_at)),
    );

    if track_fields.is_empty() {
        // A baseline from an earlier stamp no longer matches this snapshot.
        stamped.remove(keys::CACHED_VALUES);
        return stamped;
    }

    let cached_values = track_fields
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|field| {
            record
                .get(field)
                .map(|value| (field.to_string(), value.clone()))
        })
        .collect::<Record>();
    stamped.insert(
        keys::CACHED_VALUES.to_string(),
        Value::Object(cached_values),
    );
    stamped
}

/// Serialize a typed entity and stamp it for offline caching.
pub fn stamp_serializable<T: Serialize, S: AsRef<str>>(
    entity: &T,
    track_fields: &[S],
) -> Result<Record> {
    let record = to_record(entity)?;
    Ok(stamp_for_offline(&record, track_fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn stamp_sets_cached_at_and_leaves_input_untouched() {
        let original = record(json!({"id": 1, "status": "working"}));
        let stamped = stamp_for_offline_at(&original, &["status"], fixed_time());

        assert_eq!(
            stamped.get(keys::CACHED_AT),
            Some(&json!("2025-01-10T12:00:00.000Z"))
        );
        assert_eq!(
            stamped.get(keys::CACHED_VALUES),
            Some(&json!({"status": "working"}))
        );
        assert!(original.get(keys::CACHED_AT).is_none());
        assert!(original.get(keys::CACHED_VALUES).is_none());
    }

    #[test]
    fn empty_track_list_omits_cached_values() {
        let original = record(json!({"id": 1, "status": "working"}));
        let stamped = stamp_for_offline(&original, &[] as &[&str]);

        assert!(stamped.contains_key(keys::CACHED_AT));
        assert!(!stamped.contains_key(keys::CACHED_VALUES));
    }

    #[test]
    fn restamp_without_fields_drops_stale_baseline() {
        let original = record(json!({"id": 1, "_cachedValues": {"status": "old"}}));
        let stamped = stamp_for_offline(&original, &[] as &[&str]);
        assert!(!stamped.contains_key(keys::CACHED_VALUES));
    }

    #[test]
    fn absent_tracked_fields_are_skipped() {
        let original = record(json!({"id": 1, "status": "working"}));
        let stamped = stamp_for_offline(&original, &["status", "weight"]);

        assert_eq!(
            stamped.get(keys::CACHED_VALUES),
            Some(&json!({"status": "working"}))
        );
    }

    #[test]
    fn baseline_is_isolated_from_later_mutation() {
        let mut original = record(json!({"id": 1, "items": [{"qty": 1}]}));
        let stamped = stamp_for_offline(&original, &["items"]);

        original
            .get_mut("items")
            .and_then(Value::as_array_mut)
            .unwrap()
            .push(json!({"qty": 2}));

        assert_eq!(
            stamped[keys::CACHED_VALUES]["items"],
            json!([{"qty": 1}])
        );
    }

    #[test]
    fn stamp_serializable_propagates_shape_errors() {
        #[derive(Serialize)]
        struct Ticket {
            id: i64,
            status: String,
        }

        let stamped = stamp_serializable(
            &Ticket {
                id: 9,
                status: "draft".to_string(),
            },
            &["status"],
        )
        .unwrap();
        assert_eq!(stamped[keys::CACHED_VALUES], json!({"status": "draft"}));

        assert!(stamp_serializable(&"not a record", &["status"]).is_err());
    }
}
