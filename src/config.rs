//! Configuration types for fpscan
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - The environment-controlled upper bound on worker threads

use crate::error::ConfigError;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable overriding the worker thread ceiling
pub const MAX_THREADS_ENV: &str = "FPSCAN_MAX_ALLOWED_THREADS";

/// Default ceiling on worker threads when the environment is silent
pub const DEFAULT_MAX_ALLOWED_THREADS: usize = 30;

/// Parallel file fingerprinting with a bounded worker pool
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fpscan",
    version,
    about = "Parallel file fingerprinting with a bounded worker pool",
    long_about = "Walks a directory tree, computes a content fingerprint (WFP) for every\n\
                  regular file using a pool of worker threads, and writes the collected\n\
                  fingerprints to a file or stdout.",
    after_help = "EXAMPLES:\n    \
        fpscan /src/project -o scan.wfp\n    \
        fpscan /src/project -w 8 --debug\n    \
        fpscan /src/project -o - -q > scan.wfp"
)]
pub struct CliArgs {
    /// Directory to fingerprint
    #[arg(value_name = "DIR")]
    pub scan_dir: PathBuf,

    /// Output file for collected fingerprints ("-" for stdout)
    #[arg(short, long, default_value = "scan.wfp", value_name = "FILE")]
    pub output: PathBuf,

    /// Number of worker threads
    #[arg(
        short = 'w',
        long,
        default_value_t = default_workers(),
        value_name = "NUM"
    )]
    pub workers: usize,

    /// Quiet mode - suppress progress output and summary
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose diagnostic logging
    #[arg(long)]
    pub debug: bool,

    /// Fine-grained per-task logging
    #[arg(long)]
    pub trace: bool,
}

fn default_workers() -> usize {
    // Hashing is CPU-bound, so default to one worker per core
    num_cpus::get()
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directory being fingerprinted
    pub scan_root: PathBuf,

    /// Leading bytes to strip from a task path to get its relative label
    pub scan_root_len: usize,

    /// Output path ("-" means stdout)
    pub output: PathBuf,

    /// Requested worker thread count
    pub requested_workers: usize,

    /// Ceiling on worker threads (env override, default 30)
    pub max_allowed_workers: usize,

    /// Suppress progress visuals and summary
    pub quiet: bool,

    /// Verbose diagnostic logging
    pub debug: bool,

    /// Fine-grained per-task logging
    pub trace: bool,
}

impl ScanConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if !args.scan_dir.exists() {
            return Err(ConfigError::ScanRootNotFound {
                path: args.scan_dir,
            });
        }
        if !args.scan_dir.is_dir() {
            return Err(ConfigError::ScanRootNotADirectory {
                path: args.scan_dir,
            });
        }

        if args.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.workers,
            });
        }

        if args.output.to_str() != Some("-") {
            if let Some(parent) = args.output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(ConfigError::InvalidOutputPath {
                        path: args.output.clone(),
                        reason: format!("Parent directory '{}' does not exist", parent.display()),
                    });
                }
            }
        }

        let scan_root_len = scan_root_len(&args.scan_dir);

        Ok(Self {
            scan_root: args.scan_dir,
            scan_root_len,
            output: args.output,
            requested_workers: args.workers,
            max_allowed_workers: max_allowed_workers(),
            quiet: args.quiet,
            debug: args.debug,
            trace: args.trace,
        })
    }
}

/// Number of leading bytes to strip from a task path to obtain its
/// label relative to `root`, accounting for a trailing separator.
pub fn scan_root_len(root: &Path) -> usize {
    let root = root.to_string_lossy();
    if root.ends_with(std::path::MAIN_SEPARATOR) {
        root.len()
    } else {
        root.len() + 1
    }
}

/// Read the worker thread ceiling from the environment
pub fn max_allowed_workers() -> usize {
    parse_max_allowed(std::env::var(MAX_THREADS_ENV).ok().as_deref())
}

fn parse_max_allowed(raw: Option<&str>) -> usize {
    match raw {
        None => DEFAULT_MAX_ALLOWED_THREADS,
        Some(s) => match s.trim().parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                warn!(
                    value = s,
                    default = DEFAULT_MAX_ALLOWED_THREADS,
                    "Ignoring invalid {} value",
                    MAX_THREADS_ENV
                );
                DEFAULT_MAX_ALLOWED_THREADS
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_root_len_without_separator() {
        assert_eq!(scan_root_len(Path::new("/data/src")), "/data/src".len() + 1);
    }

    #[test]
    fn test_scan_root_len_with_separator() {
        assert_eq!(scan_root_len(Path::new("/data/src/")), "/data/src/".len());
    }

    #[test]
    fn test_parse_max_allowed() {
        assert_eq!(parse_max_allowed(None), DEFAULT_MAX_ALLOWED_THREADS);
        assert_eq!(parse_max_allowed(Some("12")), 12);
        assert_eq!(parse_max_allowed(Some(" 8 ")), 8);
        assert_eq!(parse_max_allowed(Some("0")), DEFAULT_MAX_ALLOWED_THREADS);
        assert_eq!(
            parse_max_allowed(Some("plenty")),
            DEFAULT_MAX_ALLOWED_THREADS
        );
    }

    #[test]
    fn test_from_args_rejects_missing_root() {
        let args = CliArgs {
            scan_dir: PathBuf::from("/definitely/not/here"),
            output: PathBuf::from("-"),
            workers: 4,
            quiet: true,
            debug: false,
            trace: false,
        };
        assert!(matches!(
            ScanConfig::from_args(args),
            Err(ConfigError::ScanRootNotFound { .. })
        ));
    }

    #[test]
    fn test_from_args_rejects_zero_workers() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            scan_dir: dir.path().to_path_buf(),
            output: PathBuf::from("-"),
            workers: 0,
            quiet: true,
            debug: false,
            trace: false,
        };
        assert!(matches!(
            ScanConfig::from_args(args),
            Err(ConfigError::InvalidWorkerCount { .. })
        ));
    }

    #[test]
    fn test_from_args_accepts_valid() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            scan_dir: dir.path().to_path_buf(),
            output: PathBuf::from("-"),
            workers: 4,
            quiet: true,
            debug: false,
            trace: false,
        };
        let config = ScanConfig::from_args(args).unwrap();
        assert_eq!(config.requested_workers, 4);
        assert_eq!(config.scan_root_len, scan_root_len(dir.path()));
    }
}
