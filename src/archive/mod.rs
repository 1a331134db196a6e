//! # ZIP Container Layer
//!
//! Thin wrapper around the `zip` crate that exposes exactly the capabilities
//! the pipeline consumes: create/truncate the container, add a named entry
//! with raw bytes, finalize.
//!
//! Entry payloads arrive already deflated by the workers, so they are written
//! with the Stored method and never re-compressed. The single writer thread
//! is the sole owner of an [`ArchiveSink`] while the pipeline runs; ZIP
//! central directories cannot be mutated from two threads.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::ArchiveError;

/// The open, mutable archive container. Exclusively owned by the writer
/// thread between creation and finalization.
pub struct ArchiveSink {
    writer: ZipWriter<File>,
}

impl ArchiveSink {
    /// Creates (or truncates) the container file.
    ///
    /// Failure here is the one fatal error of a pipeline run: no handle is
    /// left open and no thread has been spawned yet.
    pub fn create(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::create(path).map_err(|e| ArchiveError::ArchiveCreate {
            source: e,
            path: path.to_path_buf(),
        })?;
        Ok(Self {
            writer: ZipWriter::new(file),
        })
    }

    /// Adds one named entry holding `payload` verbatim.
    pub fn add_entry(&mut self, name: &str, payload: &[u8]) -> Result<(), ArchiveError> {
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        self.writer
            .start_file(name, options)
            .map_err(|e| ArchiveError::EntryAdd {
                source: e,
                name: name.to_string(),
            })?;
        self.writer
            .write_all(payload)
            .map_err(|e| ArchiveError::EntryAdd {
                source: ZipError::Io(e),
                name: name.to_string(),
            })?;
        Ok(())
    }

    /// Writes the central directory and closes the container.
    pub fn finish(mut self) -> Result<(), ArchiveError> {
        self.writer.finish()?;
        Ok(())
    }
}

/// Reads back an archive's central directory as `(entry name, stored size)`
/// pairs, in directory order.
pub fn list_entries(path: &Path) -> Result<Vec<(String, u64)>, ArchiveError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        entries.push((entry.name().to_string(), entry.size()));
    }
    Ok(entries)
}
