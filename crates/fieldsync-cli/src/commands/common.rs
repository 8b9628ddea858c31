use std::path::Path;

use fieldsync_core::conflict::{MergeSelection, Side};
use fieldsync_core::{ConflictReport, PendingAction, Record};
use serde_json::Value;

use crate::error::CliError;

pub async fn read_json(path: &Path) -> Result<Value, CliError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(serde_json::from_str(&raw)?)
}

pub async fn read_record(path: &Path) -> Result<Record, CliError> {
    match read_json(path).await? {
        Value::Object(record) => Ok(record),
        _ => Err(CliError::NotARecord(path.to_path_buf())),
    }
}

pub async fn read_actions(path: &Path) -> Result<Vec<PendingAction>, CliError> {
    let value = read_json(path).await?;
    if !value.is_array() {
        return Err(CliError::NotAnActionList(path.to_path_buf()));
    }
    Ok(serde_json::from_value(value)?)
}

/// Print `content` or write it to `output_path`, echoing the path.
pub fn write_output(content: &str, output_path: Option<&Path>) -> Result<(), CliError> {
    if let Some(path) = output_path {
        std::fs::write(path, format!("{content}\n"))?;
        println!("{}", path.display());
    } else {
        println!("{content}");
    }
    Ok(())
}

pub fn render_record(record: &Record) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Parse repeated `FIELD=local|server` flags into a merge selection.
pub fn parse_merge_selection(picks: &[String]) -> Result<MergeSelection, CliError> {
    let mut selection = MergeSelection::new();
    for pick in picks {
        let (field, side) = pick
            .split_once('=')
            .ok_or_else(|| CliError::InvalidPick(pick.clone()))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(CliError::InvalidPick(pick.clone()));
        }
        let side = side
            .parse::<Side>()
            .map_err(|_| CliError::InvalidPick(pick.clone()))?;
        selection.insert(field.to_string(), side);
    }
    Ok(selection)
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(text) => format!("{text:?}"),
        other => other.to_string(),
    }
}

pub fn format_report_status(report: &ConflictReport) -> String {
    if report.error {
        "check failed, retry later".to_string()
    } else if report.deleted_on_server {
        "deleted on server".to_string()
    } else if report.has_conflict {
        format!("conflict: {}", report.field_names().join(", "))
    } else {
        "clean".to_string()
    }
}
