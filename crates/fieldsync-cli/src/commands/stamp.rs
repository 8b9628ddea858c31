use std::path::Path;

use fieldsync_core::{stamp_for_offline, ConflictConfig};

use crate::commands::common::{read_record, render_record, write_output};
use crate::error::CliError;

pub async fn run_stamp(
    record_path: &Path,
    record_type: Option<&str>,
    track: &[String],
    output_path: Option<&Path>,
    config: &ConflictConfig,
) -> Result<(), CliError> {
    let record = read_record(record_path).await?;
    let track_fields = resolve_track_fields(track, record_type, config);

    let stamped = stamp_for_offline(&record, track_fields.as_slice());
    tracing::debug!(
        path = %record_path.display(),
        tracked = track_fields.len(),
        "Stamped record for offline cache"
    );
    write_output(&render_record(&stamped)?, output_path)
}

/// Explicit `--track` fields win over the config entry for `--type`.
pub fn resolve_track_fields(
    track: &[String],
    record_type: Option<&str>,
    config: &ConflictConfig,
) -> Vec<String> {
    let explicit = fieldsync_core::util::normalize_field_names(track);
    if !explicit.is_empty() {
        return explicit;
    }
    record_type
        .map(|record_type| config.tracked_fields_for(record_type).to_vec())
        .unwrap_or_default()
}
