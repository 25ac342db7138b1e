//! Source documents: read from disk fresh on every run, payload extracted.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::{io_err, SyncError};

/// Read the YAML document at `path` and return the mapping under `payload_key`.
pub fn load_payload(path: &Path, payload_key: &str) -> Result<Mapping, SyncError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let document: Value = serde_yaml::from_str(&contents).map_err(|e| SyncError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    match document.get(payload_key) {
        Some(Value::Mapping(payload)) => Ok(payload.clone()),
        _ => Err(SyncError::MissingPayload {
            path: path.to_path_buf(),
            key: payload_key.to_owned(),
        }),
    }
}
