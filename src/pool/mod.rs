//! Concurrent fingerprint dispatch and collection
//!
//! File fingerprint requests are loaded into a shared task queue.
//! A fixed pool of worker threads pulls requests off the queue,
//! invokes the fingerprinting capability, and pushes results into a
//! shared sink. The coordinator owns pool sizing and the termination
//! protocol.
//!
//! # Architecture
//!
//! ```text
//!  producer ──enqueue──▶ ┌────────────────────┐
//!                        │     TaskQueue      │
//!                        │ (crossbeam FIFO +  │
//!                        │ outstanding count) │
//!                        └─────────┬──────────┘
//!                                  │ dequeue(timeout)
//!            ┌─────────────┬───────┴─────┬─────────────┐
//!      ┌─────▼─────┐ ┌─────▼─────┐       │       ┌─────▼─────┐
//!      │  Worker 1 │ │  Worker 2 │  ...  │       │  Worker N │
//!      └─────┬─────┘ └─────┬─────┘       │       └─────┬─────┘
//!            └─────────────┴──────┬──────┴─────────────┘
//!                                 ▼
//!                        ┌────────────────┐
//!                        │   ResultSink   │──▶ caller
//!                        └────────────────┘
//! ```
//!
//! Tasks are admitted first-in-first-out but may complete in any
//! order; per-file processing time varies.

pub mod context;
pub mod coordinator;
pub mod queue;
pub mod worker;

pub use context::RunContext;
pub use coordinator::FingerprintPool;
pub use queue::{ResultSink, Task, TaskQueue};
pub use worker::Worker;
