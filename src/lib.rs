//! # Zippack Core Library
//!
//! This crate provides the core functionality for the `zippack` archiver: a
//! concurrent pipeline that deflate-compresses each input file independently
//! on a pool of worker threads and serializes the finished entries through a
//! single writer thread into one ZIP container.
//!
//! ## Key Modules
//!
//! - [`pipeline`]: The coordinator, worker pool, and writer thread.
//! - [`compress`]: Pure deflate compression of in-memory buffers.
//! - [`queue`]: The producer/consumer queue with its termination protocol.
//! - [`archive`]: The ZIP container layer (create, add entry, finalize, list).
//! - [`input`]: File loading and entry-name derivation.
//! - [`progress`]: The per-file progress callback contract.
//!
//! ## Example
//!
//! ```no_run
//! use zippack::{PackOptions, Pipeline};
//!
//! let pipeline = Pipeline::new(PackOptions::default())
//!     .with_progress(|pct| eprintln!("{pct:.0}%"));
//! let report = pipeline.run(
//!     &["a.txt".into(), "b.txt".into()],
//!     std::path::Path::new("out.zip"),
//! )?;
//! assert_eq!(report.inputs, 2);
//! # Ok::<(), zippack::ArchiveError>(())
//! ```

pub mod archive;
pub mod cli;
pub mod compress;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod progress;
pub mod queue;

pub use error::ArchiveError;
pub use pipeline::{PackOptions, PackReport, Pipeline};
pub use progress::ProgressFn;
