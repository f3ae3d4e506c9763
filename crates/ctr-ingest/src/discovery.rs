//! Locating offline export files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// CSV files directly inside `dir`, ordered by file name.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let read_error = |source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = fs::read_dir(dir)
        .map_err(read_error)?
        .map(|entry| entry.map(|entry| entry.path()).map_err(read_error))
        .filter(|path| {
            path.as_ref()
                .map_or(true, |path| path.is_file() && has_csv_extension(path))
        })
        .collect::<Result<Vec<_>>>()?;
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(dir = %dir.display(), files = files.len(), "found export files");
    Ok(files)
}

/// Directories are replaced by their CSV files; plain paths pass through in order.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::with_capacity(inputs.len());
    for input in inputs {
        if input.is_dir() {
            files.extend(list_csv_files(input)?);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}
