//! Worker thread logic for the fingerprint pool
//!
//! Each worker repeatedly pulls a task from the shared queue, invokes
//! the fingerprinting capability, and pushes any produced record into
//! the result sink. A failed task marks the run as errored and raises
//! the abort advisory, but the worker keeps consuming until the stop
//! flag is set.

use crate::error::WorkerError;
use crate::fingerprint::{relative_label, Fingerprinter};
use crate::pool::context::RunContext;
use crate::pool::queue::{ResultSink, TaskQueue};
use crate::progress::ProgressTracker;
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, trace};

/// How long a worker blocks waiting for a task before re-checking the
/// stop flag. Bounds shutdown latency without busy-spinning.
pub(crate) const DEQUEUE_TIMEOUT: Duration = Duration::from_millis(100);

/// Poll interval while waiting for a worker thread to finish
const JOIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A worker thread that processes fingerprint tasks
pub struct Worker {
    id: usize,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(
        id: usize,
        ctx: Arc<RunContext>,
        queue: Arc<TaskQueue>,
        results: Arc<ResultSink>,
        progress: Arc<ProgressTracker>,
        fingerprinter: Arc<dyn Fingerprinter>,
        scan_root_len: usize,
    ) -> Result<Self, WorkerError> {
        let handle = thread::Builder::new()
            .name(format!("fpscan-{}", id))
            .spawn(move || {
                worker_loop(id, ctx, queue, results, progress, fingerprinter, scan_root_len)
            })
            .map_err(|e| WorkerError::SpawnFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Wait up to `timeout` for the worker to finish.
    ///
    /// A worker that does not stop in time is not force-killed; it is
    /// left detached and reported as [`WorkerError::JoinTimeout`].
    pub fn join_timeout(mut self, timeout: Duration) -> Result<(), WorkerError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        let deadline = Instant::now() + timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                return Err(WorkerError::JoinTimeout { id: self.id });
            }
            thread::sleep(JOIN_POLL_INTERVAL);
        }

        handle.join().map_err(|_| WorkerError::Panicked { id: self.id })
    }
}

/// Main worker loop
fn worker_loop(
    id: usize,
    ctx: Arc<RunContext>,
    queue: Arc<TaskQueue>,
    results: Arc<ResultSink>,
    progress: Arc<ProgressTracker>,
    fingerprinter: Arc<dyn Fingerprinter>,
    scan_root_len: usize,
) {
    trace!(worker = id, "Worker starting");

    while !ctx.stop_requested() {
        // Blocking dequeue with timeout doubles as the idle backoff
        let Some(task) = queue.dequeue(DEQUEUE_TIMEOUT) else {
            continue;
        };

        trace!(worker = id, path = %task.path, "Processing request");

        // Catch panics from the injected capability so the task is
        // always marked done and the drain cannot hang on it
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let label = relative_label(&task.path, scan_root_len);
            fingerprinter.fingerprint(Path::new(&task.path), label)
        }));
        match outcome {
            Ok(Ok(Some(wfp))) => {
                results.push(wfp);
                progress.advance(1);
            }
            Ok(Ok(None)) => {
                debug!(worker = id, path = %task.path, "No fingerprint produced");
            }
            Ok(Err(e)) => {
                error!(worker = id, path = %task.path, error = %e, "Fingerprinting failed");
                ctx.record_error();
                // Advise the producer to stop feeding new work; queued
                // tasks still drain
                ctx.request_abort();
            }
            Err(_) => {
                error!(worker = id, path = %task.path, "Fingerprinting panicked");
                ctx.record_error();
                ctx.request_abort();
            }
        }

        queue.mark_done();
        trace!(worker = id, "Request complete");
    }

    trace!(worker = id, "Worker stopped");
}
