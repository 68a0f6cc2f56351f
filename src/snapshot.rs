//! The JSON snapshot: one object keyed by page path.

use crate::error::SnapshotError;
use crate::types::Record;
use std::collections::BTreeMap;
use std::path::Path;

/// Write records as pretty-printed JSON with sorted keys, creating parent directories.
pub fn write(path: &Path, records: &BTreeMap<String, Record>) -> Result<(), SnapshotError> {
    let write_error = |error: String| SnapshotError::Write {
        path: path.to_path_buf(),
        error,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
    }

    let mut json = serde_json::to_string_pretty(records).map_err(|e| write_error(e.to_string()))?;
    json.push('\n');
    std::fs::write(path, json).map_err(|e| write_error(e.to_string()))?;

    tracing::debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Load a snapshot. Records come back in path order with their paths filled in.
pub fn load(path: &Path) -> Result<Vec<Record>, SnapshotError> {
    if !path.exists() {
        return Err(SnapshotError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let parse_error = |error: String| SnapshotError::Parse {
        path: path.to_path_buf(),
        error,
    };
    let text = std::fs::read_to_string(path).map_err(|e| parse_error(e.to_string()))?;
    let entries: BTreeMap<String, Record> =
        serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))?;

    let records: Vec<Record> = entries
        .into_iter()
        .map(|(path, mut record)| {
            record.path = path;
            record
        })
        .collect();

    tracing::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
