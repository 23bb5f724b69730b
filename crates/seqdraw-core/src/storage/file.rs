//! File-based storage.

use super::{StorageError, StorageResult, encode};
use crate::diagram::Diagram;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a diagram from a JSON file.
pub fn read_diagram(path: &Path) -> StorageResult<Diagram> {
    let json = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    Diagram::from_json(&json).map_err(|e| {
        StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Write a diagram as JSON.
///
/// The data goes to a sibling temporary file first, so a failed write never
/// truncates an existing document.
pub fn write_diagram(path: &Path, diagram: &Diagram) -> StorageResult<()> {
    let json = encode(diagram)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, json)
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|e| {
            let _ = fs::remove_file(&tmp);
            StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
        })
}
