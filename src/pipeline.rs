//! # The Archiving Pipeline
//!
//! Orchestrates one archive-creation run: a pool of compression workers
//! producing finished entries, one dedicated writer thread serializing them
//! into the ZIP container, and a coordinator that owns the lifecycle.
//!
//! Entries land in completion order, not input order, since compression
//! finishes nondeterministically across files of different sizes. The set of
//! entries and their payloads is still deterministic for a fixed input list.
//!
//! All state (queue, counters, threads) belongs to the run, never to the
//! process, so one [`Pipeline`] value can execute overlapping runs from
//! different threads.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::archive::ArchiveSink;
use crate::progress::ProgressFn;
use crate::queue::{WorkItem, WorkQueue};
use crate::{compress, input, ArchiveError};

/// Tuning knobs for a pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PackOptions {
    /// Deflate level (0-9).
    pub level: u32,
    /// Worker thread cap. `0` ⇒ one per CPU core. Never more threads than
    /// inputs are spawned.
    pub threads: usize,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            level: 6,
            threads: 0,
        }
    }
}

/// Outcome of a successful run. `entries_written < inputs` means some inputs
/// were skipped (unreadable, or their entry failed to write); callers wanting
/// all-or-nothing semantics compare the two counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackReport {
    pub inputs: usize,
    pub entries_written: usize,
}

impl PackReport {
    pub fn skipped(&self) -> usize {
        self.inputs - self.entries_written
    }
}

/// Lifecycle phases of a run, in order. Logged at each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Draining,
    Closed,
}

/// Coordinator for archive creation. Cheap to construct; reusable across
/// runs because every run owns its own queue, counters, and thread set.
pub struct Pipeline {
    options: PackOptions,
    progress: Option<Arc<ProgressFn>>,
}

impl Pipeline {
    pub fn new(options: PackOptions) -> Self {
        Self {
            options,
            progress: None,
        }
    }

    /// Installs a progress callback, invoked with a percentage in
    /// `0.0..=100.0` once per finished input. It runs on worker threads under
    /// the queue lock, so it must be `Send + Sync` and should return quickly.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    /// Compresses every readable input into `output` and returns the entry
    /// counts.
    ///
    /// The only fatal failures are archive creation (nothing is spawned, no
    /// handle is left open) and a panicked pipeline thread. Unreadable inputs
    /// and failed entry writes are logged at `warn` and skipped.
    ///
    /// A [`WorkerPanic`](ArchiveError::WorkerPanic) from a worker thread is
    /// reported only after the writer has drained the queue and the archive
    /// has been finalized, so a usable (but possibly incomplete) archive
    /// exists at `output`; the error supersedes the entry counts because the
    /// batch can no longer be trusted as complete.
    pub fn run(&self, inputs: &[PathBuf], output: &Path) -> Result<PackReport, ArchiveError> {
        let mut phase = Phase::Idle;

        // Idle → Running: open the container before any thread exists.
        let sink = ArchiveSink::create(output)?;
        set_phase(&mut phase, Phase::Running);

        let input_count = inputs.len();
        let queue = Arc::new(WorkQueue::new(input_count, self.progress.clone()));

        let writer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || drain_queue(sink, &queue))
        };

        let inputs: Arc<Vec<PathBuf>> = Arc::new(inputs.to_vec());
        let next_input = Arc::new(AtomicUsize::new(0));
        let worker_count = effective_workers(input_count, self.options.threads);
        tracing::debug!(inputs = input_count, workers = worker_count, "spawning workers");

        let mut workers = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let queue = Arc::clone(&queue);
            let inputs = Arc::clone(&inputs);
            let next_input = Arc::clone(&next_input);
            let level = self.options.level;
            workers.push(thread::spawn(move || {
                loop {
                    let i = next_input.fetch_add(1, Ordering::SeqCst);
                    let Some(path) = inputs.get(i) else { break };
                    compress_one(path, level, &queue);
                }
            }));
        }

        // Running → Draining: all producers joined, tell the writer no new
        // items can appear once the queue empties.
        let mut worker_panicked = false;
        for handle in workers {
            if handle.join().is_err() {
                worker_panicked = true;
            }
        }
        queue.set_producers_done();
        set_phase(&mut phase, Phase::Draining);

        // Draining → Closed: join the writer, then finalize the container.
        let (sink, entries_written) = writer.join().map_err(|_| ArchiveError::WorkerPanic)?;
        sink.finish()?;
        set_phase(&mut phase, Phase::Closed);

        if worker_panicked {
            return Err(ArchiveError::WorkerPanic);
        }
        Ok(PackReport {
            inputs: input_count,
            entries_written,
        })
    }
}

fn set_phase(phase: &mut Phase, next: Phase) {
    tracing::debug!(from = ?phase, to = ?next, "pipeline phase");
    *phase = next;
}

fn effective_workers(input_count: usize, requested: usize) -> usize {
    let cap = if requested == 0 {
        num_cpus::get()
    } else {
        requested
    };
    input_count.min(cap.max(1))
}

/// Processes a single input end to end on the calling worker thread.
///
/// Whatever happens, exactly one `complete_one` is recorded for the input
/// (the completion guard fires even if the read/compress path unwinds), so
/// the active-worker count always reaches zero and progress reaches 100.
fn compress_one(path: &Path, level: u32, queue: &WorkQueue) {
    struct Completion<'a>(&'a WorkQueue);
    impl Drop for Completion<'_> {
        fn drop(&mut self) {
            self.0.complete_one();
        }
    }
    let _completion = Completion(queue);

    let payload = input::read_file(path).and_then(|raw| compress::compress(&raw, level));
    match payload {
        Ok(payload) => queue.push(WorkItem {
            entry_name: input::entry_name(path),
            payload,
        }),
        Err(e) => tracing::warn!("skipping '{}': {e}", path.display()),
    }
}

/// Writer-thread body: the sole consumer and the sole owner of the container
/// while the run is live. Returns the sink (for the coordinator to finalize)
/// and the number of entries actually written.
fn drain_queue(mut sink: ArchiveSink, queue: &WorkQueue) -> (ArchiveSink, usize) {
    let mut entries_written = 0usize;
    while let Some(item) = queue.pop_blocking() {
        match sink.add_entry(&item.entry_name, &item.payload) {
            Ok(()) => entries_written += 1,
            Err(e) => tracing::warn!("{e}"),
        }
    }
    (sink, entries_written)
}
