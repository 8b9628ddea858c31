//! Locating and loading the conflict config file.

use std::path::{Path, PathBuf};

use fieldsync_core::util::normalize_text_option;
use fieldsync_core::ConflictConfig;

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "config.json";
pub const CONFIG_PATH_ENV: &str = "FIELDSYNC_CONFIG";

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fieldsync").join(CONFIG_FILE_NAME))
}

/// Pick the config path: `--config`, then `FIELDSYNC_CONFIG`, then the
/// platform config directory.
pub fn resolve_config_path(
    explicit: Option<PathBuf>,
    env_value: Option<String>,
) -> Result<PathBuf, CliError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = normalize_text_option(env_value) {
        return Ok(PathBuf::from(path));
    }
    default_config_path()
        .ok_or_else(|| CliError::Config("Failed to resolve config directory".to_string()))
}

pub fn load_config(path: &Path) -> Result<ConflictConfig, CliError> {
    let config = ConflictConfig::load_from_path(path)?;
    tracing::debug!(
        path = %path.display(),
        record_types = config.record_types.len(),
        "Loaded conflict config"
    );
    Ok(config)
}
