use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::SyncError;

/// Locate the single export file dropped into the input directory.
///
/// The feed is delivered as exactly one file per run; anything else means a
/// delivery problem and the run aborts before touching the store.
/// Subdirectories are ignored.
pub fn discover_input_file(dir: &Path) -> Result<PathBuf, SyncError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| SyncError::IoError(format!("Cannot read input dir {}: {e}", dir.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| SyncError::IoError(format!("Cannot read dir entry: {e}")))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    if files.len() > 1 {
        return Err(SyncError::InputDiscovery(format!(
            "more than one input file in {}",
            dir.display()
        )));
    }
    files.pop().ok_or_else(|| {
        SyncError::InputDiscovery(format!("no input file in {}", dir.display()))
    })
}
