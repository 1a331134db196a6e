//! Progress reporting for archive creation.
//!
//! The pipeline reports once per finished input, from whichever worker thread
//! completed it, while holding the queue lock. That makes the reported
//! percentages strictly tied to the remaining-work count: non-decreasing, at
//! most one call per input, ending at 100 when there was any work at all.
//! Callbacks therefore must be `Send + Sync`; cheap callbacks are preferred
//! since they run inside the pipeline's critical section.

/// Progress callback invoked with a percentage in `0.0..=100.0`.
pub type ProgressFn = dyn Fn(f32) + Send + Sync;

/// Percent of work done given the total input count and how many inputs are
/// still in flight.
pub(crate) fn percent_done(total: usize, remaining: usize) -> f32 {
    if total == 0 {
        return 100.0;
    }
    (total - remaining) as f32 / total as f32 * 100.0
}
