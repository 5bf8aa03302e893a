//! Error types for fpscan
//!
//! Individual task failures never propagate out of the worker pool as
//! errors; they are logged and folded into the run's aggregate status.
//! The types here cover everything else: configuration validation,
//! worker lifecycle problems, and fingerprinting failures inside a
//! single task.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the fpscan application
#[derive(Error, Debug)]
pub enum ScanError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Fingerprinting errors
    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),

    /// I/O errors (output writing, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Scan root missing
    #[error("Scan directory '{path}' does not exist")]
    ScanRootNotFound { path: PathBuf },

    /// Scan root is not a directory
    #[error("Scan path '{path}' is not a directory")]
    ScanRootNotADirectory { path: PathBuf },

    /// Invalid worker count
    #[error("Invalid worker count {count}: must be at least 1")]
    InvalidWorkerCount { count: usize },

    /// Output path error
    #[error("Invalid output path '{path}': {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker initialization failed
    #[error("Failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },

    /// Worker panicked
    #[error("Worker {id} panicked")]
    Panicked { id: usize },

    /// Worker did not finish within the join timeout
    #[error("Worker {id} did not stop within the shutdown timeout")]
    JoinTimeout { id: usize },
}

/// Errors produced while fingerprinting a single file
#[derive(Error, Debug)]
pub enum FingerprintError {
    /// Could not read the file contents
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for ScanError
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let cfg_err = ConfigError::InvalidWorkerCount { count: 0 };
        let scan_err: ScanError = cfg_err.into();
        assert!(matches!(scan_err, ScanError::Config(_)));
    }

    #[test]
    fn test_fingerprint_error_display() {
        let err = FingerprintError::Read {
            path: PathBuf::from("/data/file.c"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/file.c"));
        assert!(msg.contains("gone"));
    }
}
