//! File fingerprinting capability
//!
//! The worker pool is generic over how a fingerprint is produced; it
//! only needs the [`Fingerprinter`] trait. The default implementation
//! emits a WFP record keyed by the file's MD5 digest. Swap in another
//! implementation to change the signature algorithm without touching
//! the pool.

use crate::error::FingerprintError;
use std::fmt::Write as _;
use std::path::Path;

use md5::{Digest, Md5};

/// Marker that starts every WFP file record
pub const WFP_FILE_MARKER: &str = "file=";

/// Produces a content fingerprint for one file.
///
/// Implementations are invoked concurrently from multiple worker
/// threads with distinct arguments and must not rely on shared mutable
/// state. Returning `Ok(None)` means "no fingerprint produced" and is
/// not an error; the pool discards such outcomes silently.
pub trait Fingerprinter: Send + Sync {
    /// Fingerprint the file at `path`, labelling it `label` in the
    /// produced record.
    fn fingerprint(&self, path: &Path, label: &str) -> Result<Option<String>, FingerprintError>;
}

/// Default fingerprinter producing `file=<md5>,<size>,<label>` records
#[derive(Debug, Default)]
pub struct WfpFingerprinter;

impl WfpFingerprinter {
    pub fn new() -> Self {
        Self
    }
}

impl Fingerprinter for WfpFingerprinter {
    fn fingerprint(&self, path: &Path, label: &str) -> Result<Option<String>, FingerprintError> {
        let contents = std::fs::read(path).map_err(|source| FingerprintError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        // Nothing to sign in an empty file
        if contents.is_empty() {
            return Ok(None);
        }

        let digest = Md5::digest(&contents);
        let mut record = String::with_capacity(WFP_FILE_MARKER.len() + 32 + label.len() + 16);
        record.push_str(WFP_FILE_MARKER);
        for byte in digest {
            let _ = write!(record, "{:02x}", byte);
        }
        let _ = write!(record, ",{},{}", contents.len(), label);
        Ok(Some(record))
    }
}

/// Strip the scan root prefix from a task path.
///
/// `root_len` counts the root's bytes plus its trailing separator (see
/// [`crate::config::scan_root_len`]). Paths at or below that length
/// are returned unchanged.
pub fn relative_label(path: &str, root_len: usize) -> &str {
    path.get(root_len..).filter(|s| !s.is_empty()).unwrap_or(path)
}
