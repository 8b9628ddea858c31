//! Shared utility functions used across multiple modules.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Trim field names, drop empties and duplicates while keeping first-seen order.
pub fn normalize_field_names<S: AsRef<str>>(fields: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    fields
        .iter()
        .map(|field| field.as_ref().trim())
        .filter(|field| !field.is_empty())
        .filter(|field| seen.insert((*field).to_string()))
        .map(str::to_string)
        .collect()
}

/// Uppercase the first character of `value`.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Parse a JSON timestamp value.
///
/// Strings are read as RFC 3339, then as an offset-less ISO-8601 date-time or
/// a bare date (both taken as UTC). Numbers are Unix milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_timestamp_str(raw),
        Value::Number(number) => {
            #[allow(clippy::cast_possible_truncation)]
            let millis = number
                .as_i64()
                .or_else(|| number.as_f64().map(|value| value.trunc() as i64))?;
            DateTime::from_timestamp_millis(millis)
        }
        _ => None,
    }
}

fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format a timestamp the way records store it (`2025-01-10T12:00:00.000Z`).
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
