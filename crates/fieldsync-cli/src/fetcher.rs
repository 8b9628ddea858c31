//! Server records read from a directory tree (`TYPE/ID.json`).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fieldsync_core::conflict::RecordFetcher;
use fieldsync_core::{Error, Record, RecordId};
use serde_json::Value;

pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn record_path(&self, record_type: &str, id: &RecordId) -> fieldsync_core::Result<PathBuf> {
        let id = id.to_string();
        validate_path_segment(record_type)?;
        validate_path_segment(&id)?;
        Ok(self.root.join(record_type).join(format!("{id}.json")))
    }
}

impl RecordFetcher for DirectoryFetcher {
    async fn fetch_server_record(
        &self,
        record_type: &str,
        id: &RecordId,
    ) -> fieldsync_core::Result<Option<Record>> {
        let path = self.record_path(record_type, id)?;
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(record) => Ok(Some(record)),
            _ => Err(Error::InvalidInput(format!(
                "{} does not contain a JSON object",
                path.display()
            ))),
        }
    }
}

fn validate_path_segment(segment: &str) -> fieldsync_core::Result<()> {
    let invalid = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\'])
        || Path::new(segment).is_absolute();
    if invalid {
        Err(Error::Fetch(format!(
            "'{segment}' cannot be used as a record path segment"
        )))
    } else {
        Ok(())
    }
}
