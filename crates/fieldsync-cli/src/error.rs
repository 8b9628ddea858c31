use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] fieldsync_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0} does not contain a JSON object")]
    NotARecord(PathBuf),
    #[error("{0} does not contain a JSON array of pending actions")]
    NotAnActionList(PathBuf),
    #[error("Invalid --pick value '{0}'; expected FIELD=local or FIELD=server")]
    InvalidPick(String),
    #[error("--pick is only valid with --strategy merge")]
    PickWithoutMerge,
    #[error("Configuration error: {0}")]
    Config(String),
}
