//! Work-item queue shared between the compression workers and the single
//! archive writer.
//!
//! A FIFO deque and the pipeline's termination state live behind one mutex,
//! with a condvar for the writer's blocking pop. The writer only concludes
//! that no more work is coming when the queue is empty, all producers have
//! been joined, and the in-flight input count is zero, checked together
//! under the lock. A worker that is mid-enqueue keeps the count nonzero, so
//! the writer cannot exit early on a momentarily empty queue.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

use crate::progress::{percent_done, ProgressFn};

/// The unit of transfer from a compression worker to the archive writer: an
/// entry name paired with its finished (compressed) payload.
#[derive(Debug)]
pub struct WorkItem {
    pub entry_name: String,
    pub payload: Vec<u8>,
}

struct QueueState {
    items: VecDeque<WorkItem>,
    /// Inputs not yet fully processed. The authoritative "more work may still
    /// arrive" signal; wall-clock thread completion is not.
    active_workers: usize,
    /// Set exactly once, after the coordinator has joined every worker.
    producers_done: bool,
}

/// Multi-producer/single-consumer queue owned by one pipeline run.
///
/// Unbounded by design: inputs are a finite file list, so the queue can hold
/// at most one item per input.
pub struct WorkQueue {
    state: Mutex<QueueState>,
    available: Condvar,
    input_count: usize,
    progress: Option<Arc<ProgressFn>>,
}

impl WorkQueue {
    pub fn new(input_count: usize, progress: Option<Arc<ProgressFn>>) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                active_workers: input_count,
                producers_done: false,
            }),
            available: Condvar::new(),
            input_count,
            progress,
        }
    }

    /// Enqueues a finished work item. Never blocks the producer.
    pub fn push(&self, item: WorkItem) {
        let mut state = self.state.lock().unwrap();
        state.items.push_back(item);
        self.available.notify_one();
    }

    /// Records one input as fully processed (whether or not it produced an
    /// item) and reports progress.
    ///
    /// Decrement, progress callback, and condvar notification happen under a
    /// single lock acquisition, so the writer can never observe the count
    /// torn apart from the report that describes it.
    pub fn complete_one(&self) {
        let mut state = self.state.lock().unwrap();
        state.active_workers = state.active_workers.saturating_sub(1);
        if let Some(cb) = &self.progress {
            cb(percent_done(self.input_count, state.active_workers));
        }
        self.available.notify_all();
    }

    /// Marks that all producers have been joined; called by the coordinator
    /// exactly once per run.
    pub fn set_producers_done(&self) {
        let mut state = self.state.lock().unwrap();
        state.producers_done = true;
        self.available.notify_all();
    }

    /// Blocks until an item is available or no item can ever arrive again.
    /// Returns `None` as the termination sentinel.
    pub fn pop_blocking(&self) -> Option<WorkItem> {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.producers_done && state.active_workers == 0 {
                return None;
            }
            state = self.available.wait(state).unwrap();
        }
    }
}
