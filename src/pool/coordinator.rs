//! Pool coordinator - owns sizing, startup and the termination sequence
//!
//! The coordinator is responsible for:
//! - Computing the effective worker count
//! - Spawning workers with a shared run context
//! - The termination protocol: drain the queue, set the stop flag,
//!   join every worker with a bounded timeout, finish the progress bar
//! - Reporting the aggregate run status

use crate::config::ScanConfig;
use crate::fingerprint::Fingerprinter;
use crate::pool::context::RunContext;
use crate::pool::queue::{ResultSink, TaskQueue};
use crate::pool::worker::Worker;
use crate::progress::ProgressTracker;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, error, warn};

/// How long `complete()` waits for each worker to finish
pub(crate) const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Coordinates a pool of fingerprinting workers over one task queue.
///
/// Lifecycle: enqueue tasks, call [`FingerprintPool::run`], then read
/// [`FingerprintPool::results`]. One pool serves one run; workers do
/// not outlive it.
pub struct FingerprintPool {
    config: ScanConfig,
    queue: Arc<TaskQueue>,
    results: Arc<ResultSink>,
    progress: Arc<ProgressTracker>,
    ctx: Arc<RunContext>,
    fingerprinter: Arc<dyn Fingerprinter>,
    workers: Vec<Worker>,
    spawned: usize,
    final_status: Mutex<Option<bool>>,
}

impl FingerprintPool {
    /// Create a new pool around the given fingerprinting capability
    pub fn new(config: ScanConfig, fingerprinter: Arc<dyn Fingerprinter>) -> Self {
        let progress = Arc::new(ProgressTracker::new(config.quiet));
        Self {
            config,
            queue: Arc::new(TaskQueue::new()),
            results: Arc::new(ResultSink::new()),
            progress,
            ctx: Arc::new(RunContext::new()),
            fingerprinter,
            workers: Vec::new(),
            spawned: 0,
            final_status: Mutex::new(None),
        }
    }

    /// Handle on the shared run flags (for signal handlers and producers)
    pub fn context(&self) -> Arc<RunContext> {
        Arc::clone(&self.ctx)
    }

    /// Admit one file path for fingerprinting
    pub fn enqueue(&self, path: &str) -> bool {
        self.queue.enqueue(path)
    }

    /// Approximate pending task count
    pub fn queue_size(&self) -> usize {
        self.queue.size()
    }

    /// Whether a worker asked the producer to stop feeding new work
    pub fn abort_requested(&self) -> bool {
        self.ctx.abort_requested()
    }

    /// Number of workers spawned by `run()`
    pub fn worker_count(&self) -> usize {
        self.spawned
    }

    /// Copy of the fingerprints accumulated so far
    pub fn results(&self) -> Vec<String> {
        self.results.snapshot()
    }

    /// Size the pool, spawn the workers and, if `wait`, block until all
    /// pending tasks complete.
    ///
    /// Returns `true` iff no error was recorded (startup errors when
    /// `wait` is false, the whole run otherwise).
    pub fn run(&mut self, wait: bool) -> bool {
        let pending = self.queue.size();
        let count = effective_workers(
            self.config.requested_workers,
            self.config.max_allowed_workers,
            pending,
        );
        debug!(workers = count, pending, "Starting fingerprint pool");

        self.progress.create_if_needed(pending as u64);

        for id in 0..count {
            match Worker::spawn(
                id,
                Arc::clone(&self.ctx),
                Arc::clone(&self.queue),
                Arc::clone(&self.results),
                Arc::clone(&self.progress),
                Arc::clone(&self.fingerprinter),
                self.config.scan_root_len,
            ) {
                Ok(worker) => self.workers.push(worker),
                Err(e) => {
                    error!(error = %e, "Problem starting fingerprint workers");
                    self.ctx.record_error();
                    break;
                }
            }
        }
        self.spawned = self.workers.len();

        if wait {
            return self.complete();
        }
        !self.ctx.had_errors()
    }

    /// Wait for the queue to drain, stop the workers and join them.
    ///
    /// Returns `true` iff no error flag was set at any point of the
    /// run. Idempotent: later calls return the cached status without
    /// touching the (already joined) workers.
    pub fn complete(&mut self) -> bool {
        if let Some(status) = *self.lock_status() {
            return status;
        }

        // A pool with live workers drains normally; a pool that failed
        // to spawn any cannot make progress on pending work
        if self.workers.is_empty() && self.queue.outstanding() > 0 {
            warn!(
                pending = self.queue.outstanding(),
                "No workers running, abandoning pending tasks"
            );
            self.ctx.record_error();
        } else {
            self.queue.await_drained();
        }

        self.ctx.request_stop();

        for worker in std::mem::take(&mut self.workers) {
            let id = worker.id();
            if let Err(e) = worker.join_timeout(JOIN_TIMEOUT) {
                warn!(worker = id, error = %e, "Issue terminating fingerprint worker");
                self.ctx.record_error();
            }
        }

        self.progress.finish();

        let ok = !self.ctx.had_errors();
        *self.lock_status() = Some(ok);
        ok
    }

    fn lock_status(&self) -> std::sync::MutexGuard<'_, Option<bool>> {
        self.final_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Compute the worker count for a run: the requested count clamped to
/// the allowed ceiling, then shrunk to the pending task count.
pub(crate) fn effective_workers(requested: usize, max_allowed: usize, pending: usize) -> usize {
    let mut count = requested;
    if count > max_allowed {
        warn!(
            requested = count,
            max = max_allowed,
            "Requested thread count too large, reducing"
        );
        count = max_allowed;
    }
    if pending < count {
        debug!(
            pending,
            requested = count,
            "Fewer pending tasks than threads, reducing to queue size"
        );
        count = pending;
    }
    count
}
