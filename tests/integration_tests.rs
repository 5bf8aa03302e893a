//! Integration tests for the fingerprint pool
//!
//! These drive the full enqueue -> run -> complete cycle with a stub
//! fingerprinting capability, plus one end-to-end pass over real files
//! with the default WFP implementation.

use fpscan::config::{scan_root_len, ScanConfig};
use fpscan::error::FingerprintError;
use fpscan::fingerprint::{Fingerprinter, WfpFingerprinter};
use fpscan::pool::FingerprintPool;
use fpscan::progress::DiscoverySpinner;
use fpscan::walk;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Stub capability: fingerprints every path, failing those that
/// contain a poison marker and skipping those that contain a skip
/// marker.
struct StubFingerprinter {
    calls: AtomicUsize,
}

impl StubFingerprinter {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fingerprinter for StubFingerprinter {
    fn fingerprint(&self, path: &Path, label: &str) -> Result<Option<String>, FingerprintError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let p = path.to_string_lossy();
        if p.contains("poison") {
            return Err(FingerprintError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, "corrupt"),
            });
        }
        if p.contains("panic") {
            panic!("capability blew up");
        }
        if p.contains("skipme") {
            return Ok(None);
        }
        Ok(Some(format!("file=deadbeef,1,{}", label)))
    }
}

fn test_config(requested_workers: usize) -> ScanConfig {
    let root = Path::new("/data/src");
    ScanConfig {
        scan_root: root.to_path_buf(),
        scan_root_len: scan_root_len(root),
        output: PathBuf::from("-"),
        requested_workers,
        max_allowed_workers: 30,
        quiet: true,
        debug: false,
        trace: false,
    }
}

#[test]
fn test_ten_tasks_five_workers_all_fingerprinted() {
    let stub = Arc::new(StubFingerprinter::new());
    let mut pool = FingerprintPool::new(test_config(5), Arc::clone(&stub) as Arc<dyn Fingerprinter>);

    for i in 0..10 {
        assert!(pool.enqueue(&format!("/data/src/file-{i}.c")));
    }

    assert!(pool.run(true));

    let results = pool.results();
    assert_eq!(results.len(), 10);
    assert_eq!(stub.calls(), 10);
    assert!(pool.worker_count() <= 5);

    // Every admitted task is accounted for, with its root-relative label
    for i in 0..10 {
        let label = format!("file-{i}.c");
        assert!(
            results.iter().any(|w| w.ends_with(&label)),
            "missing fingerprint for {label}"
        );
    }
}

#[test]
fn test_one_failure_marks_run_but_pool_keeps_draining() {
    let stub = Arc::new(StubFingerprinter::new());
    let mut pool = FingerprintPool::new(test_config(2), Arc::clone(&stub) as Arc<dyn Fingerprinter>);

    pool.enqueue("/data/src/good-1.c");
    pool.enqueue("/data/src/poison.c");
    pool.enqueue("/data/src/good-2.c");

    let ok = pool.run(true);

    assert!(!ok, "a failed task must mark the run");
    assert!(pool.abort_requested(), "a failed task must raise the abort advisory");
    assert_eq!(stub.calls(), 3, "remaining tasks still processed");

    let results = pool.results();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|w| !w.contains("poison")));
}

#[test]
fn test_panicking_capability_does_not_hang_the_drain() {
    let stub = Arc::new(StubFingerprinter::new());
    let mut pool = FingerprintPool::new(test_config(2), Arc::clone(&stub) as Arc<dyn Fingerprinter>);

    pool.enqueue("/data/src/good-1.c");
    pool.enqueue("/data/src/panic.c");
    pool.enqueue("/data/src/good-2.c");

    // complete() must still drain and return, with the run marked
    let ok = pool.run(true);

    assert!(!ok);
    assert!(pool.abort_requested());
    assert_eq!(stub.calls(), 3);
    assert_eq!(pool.results().len(), 2);
}

#[test]
fn test_empty_run_completes_immediately() {
    let stub = Arc::new(StubFingerprinter::new());
    let mut pool = FingerprintPool::new(test_config(5), stub);

    assert!(pool.run(true));
    assert!(pool.results().is_empty());
    assert_eq!(pool.worker_count(), 0);
}

#[test]
fn test_complete_is_idempotent() {
    let stub = Arc::new(StubFingerprinter::new());
    let mut pool = FingerprintPool::new(test_config(3), stub);

    for i in 0..6 {
        pool.enqueue(&format!("/data/src/f{i}"));
    }

    let first = pool.run(true);
    let second = pool.complete();
    let third = pool.complete();

    assert!(first);
    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(pool.results().len(), 6);
}

#[test]
fn test_requested_workers_clamped_to_ceiling() {
    let mut config = test_config(50);
    config.max_allowed_workers = 30;
    let mut pool = FingerprintPool::new(config, Arc::new(StubFingerprinter::new()));

    for i in 0..40 {
        pool.enqueue(&format!("/data/src/f{i}"));
    }

    assert!(pool.run(true));
    assert!(pool.worker_count() <= 30);
    assert_eq!(pool.results().len(), 40);
}

#[test]
fn test_pool_shrinks_to_pending_task_count() {
    let mut pool = FingerprintPool::new(test_config(10), Arc::new(StubFingerprinter::new()));

    pool.enqueue("/data/src/only-1");
    pool.enqueue("/data/src/only-2");

    assert!(pool.run(true));
    assert_eq!(pool.worker_count(), 2);
}

#[test]
fn test_empty_path_rejected_at_admission() {
    let pool = FingerprintPool::new(test_config(2), Arc::new(StubFingerprinter::new()));

    assert!(!pool.enqueue(""));
    assert!(pool.enqueue("/data/src/fine.c"));
    assert_eq!(pool.queue_size(), 1);
}

#[test]
fn test_skipped_payloads_are_not_stored() {
    let stub = Arc::new(StubFingerprinter::new());
    let mut pool = FingerprintPool::new(test_config(2), Arc::clone(&stub) as Arc<dyn Fingerprinter>);

    pool.enqueue("/data/src/skipme.bin");
    pool.enqueue("/data/src/keep.c");

    assert!(pool.run(true), "a skipped payload is not an error");
    assert_eq!(stub.calls(), 2);

    let results = pool.results();
    assert_eq!(results.len(), 1);
    assert!(results[0].ends_with("keep.c"));
}

#[test]
fn test_end_to_end_with_real_fingerprinter() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("main.c"), "int main() {}\n").unwrap();
    std::fs::create_dir(dir.path().join("lib")).unwrap();
    std::fs::write(dir.path().join("lib/util.c"), "void util() {}\n").unwrap();
    std::fs::write(dir.path().join("empty.c"), "").unwrap();

    let config = ScanConfig {
        scan_root: dir.path().to_path_buf(),
        scan_root_len: scan_root_len(dir.path()),
        output: PathBuf::from("-"),
        requested_workers: 4,
        max_allowed_workers: 30,
        quiet: true,
        debug: false,
        trace: false,
    };

    let mut pool = FingerprintPool::new(config, Arc::new(WfpFingerprinter::new()));
    let spinner = DiscoverySpinner::new(true);
    let stats = walk::discover_and_enqueue(dir.path(), &pool, &spinner);
    assert_eq!(stats.files, 3);

    assert!(pool.run(true));

    // The empty file produces no fingerprint and is not stored
    let results = pool.results();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|w| w.starts_with("file=")));
    assert!(results.iter().any(|w| w.ends_with("main.c")));
    assert!(results.iter().any(|w| w.ends_with("lib/util.c")));
}
