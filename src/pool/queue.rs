//! Task queue and result sink shared by the worker pool.
//!
//! The queue pairs an unbounded FIFO channel with an outstanding-work
//! counter. The counter goes up when a task is admitted and down when
//! a worker calls [`TaskQueue::mark_done`], so [`TaskQueue::await_drained`]
//! covers tasks that are in flight as well as tasks still sitting in
//! the channel.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::warn;

/// A request to fingerprint one file
#[derive(Debug, Clone)]
pub struct Task {
    /// Full path to the file
    pub path: String,
}

impl Task {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Unbounded FIFO of pending fingerprint tasks
pub struct TaskQueue {
    tx: Sender<Task>,
    rx: Receiver<Task>,
    outstanding: Mutex<u64>,
    drained: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            outstanding: Mutex::new(0),
            drained: Condvar::new(),
        }
    }

    /// Append a task to the tail of the queue. Never blocks.
    ///
    /// Empty paths are rejected with a warning and not admitted;
    /// returns whether the task was accepted.
    pub fn enqueue(&self, path: &str) -> bool {
        if path.is_empty() {
            warn!("Empty file path, skipping from fingerprinting");
            return false;
        }
        *self.lock_outstanding() += 1;
        self.tx
            .send(Task::new(path))
            .expect("queue receiver lives as long as the queue");
        true
    }

    /// Remove and return the head task, waiting up to `timeout` for one
    /// to arrive. Returns `None` when the queue stayed empty.
    pub fn dequeue(&self, timeout: Duration) -> Option<Task> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Approximate number of tasks currently waiting in the queue.
    ///
    /// Tasks in flight (dequeued but not yet marked done) are not
    /// counted; see [`TaskQueue::outstanding`] for those.
    pub fn size(&self) -> usize {
        self.rx.len()
    }

    /// Number of admitted tasks not yet matched by a `mark_done` call
    pub fn outstanding(&self) -> u64 {
        *self.lock_outstanding()
    }

    /// Record that one dequeued task finished, successfully or not.
    ///
    /// Must be called exactly once per dequeued task.
    pub fn mark_done(&self) {
        let mut n = self.lock_outstanding();
        if *n == 0 {
            warn!("mark_done called with no outstanding tasks");
            return;
        }
        *n -= 1;
        if *n == 0 {
            self.drained.notify_all();
        }
    }

    /// Block until every admitted task has been matched by `mark_done`.
    pub fn await_drained(&self) {
        let mut n = self.lock_outstanding();
        while *n > 0 {
            n = self
                .drained
                .wait(n)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn lock_outstanding(&self) -> MutexGuard<'_, u64> {
        // A poisoned lock only means another worker panicked; the
        // counter itself is still valid
        self.outstanding
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe unordered accumulator of fingerprint payloads
pub struct ResultSink {
    inner: Mutex<Vec<String>>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, wfp: String) {
        self.lock_inner().push(wfp);
    }

    pub fn len(&self) -> usize {
        self.lock_inner().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_inner().is_empty()
    }

    /// Copy out everything accumulated so far
    pub fn snapshot(&self) -> Vec<String> {
        self.lock_inner().clone()
    }

    fn lock_inner(&self) -> MutexGuard<'_, Vec<String>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ResultSink {
    fn default() -> Self {
        Self::new()
    }
}
