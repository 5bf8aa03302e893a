//! fpscan - Parallel File Fingerprinting
//!
//! Walks a directory tree and computes a content fingerprint (WFP) for
//! every regular file, distributing the work across a bounded pool of
//! worker threads.
//!
//! # Features
//!
//! - **Bounded worker pool**: the thread count is clamped to a
//!   configurable ceiling and shrunk to the pending task count, so
//!   small scans never over-spawn.
//!
//! - **Graceful termination**: the coordinator drains the queue,
//!   signals the workers to stop, and joins each one with a bounded
//!   timeout. A failed task marks the run but never stops the drain.
//!
//! - **Injectable fingerprinting**: the pool only depends on the
//!   [`fingerprint::Fingerprinter`] trait; the signature algorithm can
//!   be swapped without touching the concurrency machinery.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Scan Root                          │
//! └───────────────────────────┬─────────────────────────────┘
//!                             │ walkdir
//!                             ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  Discovery (producer)                                   │
//! │  - enqueues one task per regular file                   │
//! │  - stops when the abort advisory is raised              │
//! └───────────────────────────┬─────────────────────────────┘
//!                             ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  FingerprintPool                                        │
//! │  ┌─────────┐  ┌─────────┐           ┌─────────┐         │
//! │  │Worker 1 │  │Worker 2 │   ...     │Worker N │         │
//! │  └────┬────┘  └────┬────┘           └────┬────┘         │
//! │       └────────────┼─────────────────────┘              │
//! │                    ▼                                    │
//! │      TaskQueue (crossbeam) ──▶ ResultSink (WFPs)        │
//! └───────────────────────────┬─────────────────────────────┘
//!                             ▼
//!                     scan.wfp / stdout
//! ```
//!
//! # Example
//!
//! ```bash
//! # Fingerprint a source tree
//! fpscan /src/project -o scan.wfp
//!
//! # High parallelism, verbose logs
//! fpscan /src/project -w 16 --debug
//! ```

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod pool;
pub mod progress;
pub mod walk;

pub use config::{CliArgs, ScanConfig};
pub use error::{Result, ScanError};
pub use fingerprint::{Fingerprinter, WfpFingerprinter};
pub use pool::FingerprintPool;
