use std::path::Path;

use fieldsync_core::conflict::BatchConflict;
use fieldsync_core::{detect_batch_conflicts, ActionTarget, ConflictConfig};

use crate::commands::common::{format_report_status, read_actions};
use crate::error::CliError;
use crate::fetcher::DirectoryFetcher;

pub async fn run_batch(
    actions_path: &Path,
    server_dir: &Path,
    concurrency: Option<usize>,
    as_json: bool,
    config: &ConflictConfig,
) -> Result<(), CliError> {
    let actions = read_actions(actions_path).await?;
    let fetcher = DirectoryFetcher::new(server_dir);

    let mut options = config.batch_options();
    if let Some(concurrency) = concurrency {
        options.concurrency = concurrency.max(1);
    }

    let results = detect_batch_conflicts(&actions, &fetcher, &options).await;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No pending actions.");
        return Ok(());
    }

    for line in format_batch_lines(&results) {
        println!("{line}");
    }
    Ok(())
}

pub fn format_batch_lines(results: &[BatchConflict]) -> Vec<String> {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            let id = match result.action.target() {
                ActionTarget::Create => "new".to_string(),
                ActionTarget::Existing(id) => id.to_string(),
                ActionTarget::Unusable(raw) => raw.to_string(),
            };
            format!(
                "{:>3}  {:<14}  id={:<10}  {}",
                index + 1,
                result.action.action_type,
                id,
                format_report_status(&result.report)
            )
        })
        .collect()
}
