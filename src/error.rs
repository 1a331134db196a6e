use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for all operations in the `zippack` crate.
///
/// Only `ArchiveCreate` and `WorkerPanic` abort a whole run; the per-file and
/// per-entry variants are recovered inside the pipeline (the offending input
/// is logged and skipped) and never surface to callers of
/// [`Pipeline::run`](crate::pipeline::Pipeline::run).
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The output archive could not be created or truncated. Fatal: the
    /// pipeline does not start and no threads are spawned.
    #[error("cannot create archive '{path}': {source}")]
    ArchiveCreate {
        source: std::io::Error,
        path: PathBuf,
    },

    /// An input file could not be opened or fully read. That input is
    /// skipped; the rest of the batch continues.
    #[error("cannot read input '{path}': {source}")]
    FileRead {
        source: std::io::Error,
        path: PathBuf,
    },

    /// The deflate encoder could not be initialized, e.g. the requested
    /// compression level is outside 0-9.
    #[error("invalid deflate level {0} (expected 0-9)")]
    CompressionInit(u32),

    /// The deflate encoder reported an unrecoverable error mid-stream.
    #[error("deflate stream failed: {0}")]
    CompressionStream(String),

    /// An entry could not be written into the archive. The writer skips it
    /// and keeps draining the queue.
    #[error("cannot add entry '{name}': {source}")]
    EntryAdd {
        source: zip::result::ZipError,
        name: String,
    },

    /// A worker or writer thread panicked before finishing its work.
    ///
    /// When a *worker* panicked, the writer still drained the queue and the
    /// archive was finalized with every entry the surviving workers produced.
    /// When the *writer* panicked, the archive was never finalized. Either
    /// way the output must not be trusted as a complete batch.
    #[error("a pipeline thread panicked")]
    WorkerPanic,

    /// An error from the `zip` crate outside the entry-add path, e.g. while
    /// finalizing the central directory or listing an archive.
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A plain I/O error without a more specific home.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
