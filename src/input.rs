//! Input-side helpers: loading a file into memory and deriving the archive
//! entry name from its path.

use std::fs;
use std::path::Path;

use crate::ArchiveError;

/// Reads a file's full contents into memory.
///
/// Inputs are whole files, not streams, so the pipeline holds each file's raw
/// and compressed bytes simultaneously while it is in flight.
pub fn read_file(path: &Path) -> Result<Vec<u8>, ArchiveError> {
    fs::read(path).map_err(|e| ArchiveError::FileRead {
        source: e,
        path: path.to_path_buf(),
    })
}

/// Derives the archive entry name from a path: the last segment after the
/// final `/` or `\`. A path with neither separator is its own name.
///
/// Both separators are split on regardless of platform, so archives built
/// from Windows-style path strings still get bare file names. Trailing
/// separators are skipped rather than yielding an empty name; a path made
/// entirely of separators is returned unchanged.
pub fn entry_name(path: &Path) -> String {
    let raw = path.to_string_lossy();
    match raw.rsplit(['/', '\\']).find(|segment| !segment.is_empty()) {
        Some(name) => name.to_string(),
        None => raw.into_owned(),
    }
}
