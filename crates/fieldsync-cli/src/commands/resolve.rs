use std::path::Path;

use fieldsync_core::{resolve_conflict, ResolutionStrategy};

use crate::commands::common::{parse_merge_selection, read_record, render_record, write_output};
use crate::error::CliError;

pub async fn run_resolve(
    local_path: &Path,
    server_path: &Path,
    strategy: &str,
    picks: &[String],
    output_path: Option<&Path>,
) -> Result<(), CliError> {
    let strategy = parse_strategy(strategy, picks)?;
    let local = read_record(local_path).await?;
    let server = read_record(server_path).await?;

    let resolved = resolve_conflict(&local, &server, &strategy);
    tracing::info!(strategy = %strategy, "Conflict resolved");
    write_output(&render_record(&resolved)?, output_path)
}

pub fn parse_strategy(tag: &str, picks: &[String]) -> Result<ResolutionStrategy, CliError> {
    let selection = parse_merge_selection(picks)?;
    let strategy = ResolutionStrategy::from_tag(tag, selection)?;
    if !picks.is_empty() && !matches!(strategy, ResolutionStrategy::Merge(_)) {
        return Err(CliError::PickWithoutMerge);
    }
    Ok(strategy)
}
