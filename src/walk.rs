//! File discovery - feeds the fingerprint pool
//!
//! Walks the scan root, enqueues one task per regular file, and stops
//! producing as soon as the pool raises the abort advisory. Unreadable
//! entries are logged and skipped; they never fail the discovery pass.

use crate::pool::FingerprintPool;
use crate::progress::DiscoverySpinner;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Totals gathered while enumerating the scan root
#[derive(Debug, Default)]
pub struct DiscoveryStats {
    /// Files admitted to the task queue
    pub files: u64,

    /// Sum of admitted file sizes
    pub bytes: u64,

    /// Entries skipped (unreadable or rejected)
    pub skipped: u64,
}

/// Enumerate regular files under `root` and enqueue them on the pool.
///
/// Checks the pool's abort flag between files and stops early when it
/// is set, returning the totals gathered so far.
pub fn discover_and_enqueue(
    root: &Path,
    pool: &FingerprintPool,
    spinner: &DiscoverySpinner,
) -> DiscoveryStats {
    let mut stats = DiscoveryStats::default();

    for entry in WalkDir::new(root).follow_links(false) {
        if pool.abort_requested() {
            warn!("Abort requested, stopping file discovery");
            break;
        }

        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                stats.skipped += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path().to_string_lossy();
        if pool.enqueue(&path) {
            stats.files += 1;
            stats.bytes += entry.metadata().map_or(0, |m| m.len());
            spinner.tick();
        } else {
            stats.skipped += 1;
        }
    }

    debug!(
        files = stats.files,
        bytes = stats.bytes,
        skipped = stats.skipped,
        "File discovery complete"
    );
    stats
}
