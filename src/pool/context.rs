//! Shared run state handed to every worker at spawn time.

use std::sync::atomic::{AtomicBool, Ordering};

/// Cross-thread control flags for one pool run.
///
/// All flags are monotonic: once set they stay set for the rest of the
/// run. `stop` tells workers to exit their loop, `abort` advises the
/// task producer to stop feeding new work, and `errors` records that
/// something went wrong at any point of the run.
#[derive(Debug, Default)]
pub struct RunContext {
    stop: AtomicBool,
    abort: AtomicBool,
    errors: AtomicBool,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tell the workers to exit their loop
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Advise the task producer to stop feeding new work.
    ///
    /// Does not interrupt in-flight or already-queued tasks.
    pub fn request_abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
    }

    pub fn abort_requested(&self) -> bool {
        self.abort.load(Ordering::SeqCst)
    }

    /// Record that an error occurred somewhere in the run
    pub fn record_error(&self) {
        self.errors.store(true, Ordering::SeqCst);
    }

    pub fn had_errors(&self) -> bool {
        self.errors.load(Ordering::SeqCst)
    }
}
