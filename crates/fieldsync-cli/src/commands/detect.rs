use std::path::Path;

use fieldsync_core::{build_conflict_summary, detect_conflict, ConflictConfig, ConflictReport};

use crate::commands::common::{format_value, read_record};
use crate::error::CliError;

pub async fn run_detect(
    local_path: &Path,
    server_path: &Path,
    record_type: Option<&str>,
    fields: &[String],
    entity: Option<&str>,
    as_json: bool,
    config: &ConflictConfig,
) -> Result<(), CliError> {
    let local = read_record(local_path).await?;
    let server = read_record(server_path).await?;

    let compare_fields = resolve_compare_fields(fields, record_type, config);
    let report = detect_conflict(Some(&local), Some(&server), compare_fields.as_deref());

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let label = entity.or(record_type).unwrap_or("record");
    for line in format_detect_lines(&report, label) {
        println!("{line}");
    }
    Ok(())
}

/// Explicit `--fields` win over the config entry for `--type`.
pub fn resolve_compare_fields(
    fields: &[String],
    record_type: Option<&str>,
    config: &ConflictConfig,
) -> Option<Vec<String>> {
    let explicit = fieldsync_core::util::normalize_field_names(fields);
    if !explicit.is_empty() {
        return Some(explicit);
    }
    record_type
        .and_then(|record_type| config.compare_fields_for(record_type))
        .map(<[String]>::to_vec)
}

pub fn format_detect_lines(report: &ConflictReport, entity: &str) -> Vec<String> {
    let Some(summary) = build_conflict_summary(report, entity) else {
        return vec!["No conflict.".to_string()];
    };

    let severity = match summary.severity {
        fieldsync_core::Severity::Info => "info",
        fieldsync_core::Severity::Warning => "warning",
    };
    let mut lines = vec![
        format!("[{severity}] {}", summary.title),
        summary.description,
    ];
    for conflict in &summary.conflicts {
        let cached = conflict
            .cached_value
            .as_ref()
            .map_or_else(|| "-".to_string(), format_value);
        lines.push(format!(
            "  {:<16}  local={}  server={}  cached={}",
            conflict.field,
            format_value(&conflict.local_value),
            format_value(&conflict.server_value),
            cached
        ));
    }
    lines
}
