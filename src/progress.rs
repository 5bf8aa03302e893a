//! Progress reporting for fingerprint runs
//!
//! Provides a lock-guarded completed-task tracker backed by an
//! indicatif bar, a best-effort spinner for the discovery phase, and
//! the styled header/summary printed around a run.

use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Tracks completed tasks and drives the visual bar.
///
/// The counter and the bar are updated together under one lock so the
/// displayed position never drifts from the count, no matter how many
/// workers call [`ProgressTracker::advance`] concurrently.
pub struct ProgressTracker {
    state: Mutex<BarState>,
    enabled: bool,
}

struct BarState {
    bar: Option<ProgressBar>,
    count: u64,
}

impl ProgressTracker {
    /// Create a tracker. Visuals stay off in quiet mode or when stderr
    /// is not an interactive terminal; the counter works regardless.
    pub fn new(quiet: bool) -> Self {
        Self {
            state: Mutex::new(BarState {
                bar: None,
                count: 0,
            }),
            enabled: !quiet && console::user_attended_stderr(),
        }
    }

    /// Lazily create the bar with `total` as its length.
    ///
    /// No-op when visuals are disabled or the bar already exists. A bar
    /// created late starts from the current count.
    pub fn create_if_needed(&self, total: u64) {
        let mut state = self.lock_state();
        if !self.enabled || state.bar.is_some() {
            return;
        }
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} {bar:40.cyan/blue} {pos}/{len}")
                .expect("Invalid progress template"),
        );
        bar.set_message("Fingerprinting");
        bar.set_position(state.count);
        state.bar = Some(bar);
    }

    /// Advance the completed-task count by `n`. Safe to call from any
    /// worker thread.
    pub fn advance(&self, n: u64) {
        let mut state = self.lock_state();
        state.count += n;
        if let Some(bar) = &state.bar {
            bar.inc(n);
        }
    }

    /// Completed-task count so far
    pub fn count(&self) -> u64 {
        self.lock_state().count
    }

    /// Finish and clear the bar. Called once, after all workers stop.
    pub fn finish(&self) {
        let state = self.lock_state();
        if let Some(bar) = &state.bar {
            bar.finish_and_clear();
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, BarState> {
        // A poisoned lock would only lose a cosmetic update
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Spinner for phases where the total is unknown in advance.
///
/// Ticks are deliberately unsynchronized; interleaved rendering from
/// concurrent callers is harmless and tolerated.
pub struct DiscoverySpinner {
    bar: Option<ProgressBar>,
}

impl DiscoverySpinner {
    pub fn new(quiet: bool) -> Self {
        if quiet || !console::user_attended_stderr() {
            return Self { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("Invalid spinner template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
        );
        bar.set_message("Discovering files");
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    pub fn tick(&self) {
        if let Some(bar) = &self.bar {
            bar.tick();
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Print a header at the start of a run
pub fn print_header(root: &str, workers: usize, output: &str) {
    println!();
    println!(
        "{} {}",
        style("fpscan").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Scanning:").bold(), root);
    println!("  {} {}", style("Workers:").bold(), workers);
    println!("  {} {}", style("Output:").bold(), output);
    println!();
}

/// Print a summary of the run results
pub fn print_summary(
    fingerprinted: u64,
    discovered: u64,
    bytes: u64,
    had_errors: bool,
    duration: Duration,
    output: &str,
) {
    let duration_secs = duration.as_secs_f64();
    let rate = if duration_secs > 0.0 {
        fingerprinted as f64 / duration_secs
    } else {
        0.0
    };

    println!();
    if had_errors {
        println!("{}", style("Scan finished with errors").yellow().bold());
    } else {
        println!("{}", style("Scan complete").green().bold());
    }
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Files found:").bold(), discovered);
    println!("  {} {}", style("Fingerprinted:").bold(), fingerprinted);
    println!(
        "  {} {}",
        style("Total size:").bold(),
        format_size(bytes, BINARY)
    );
    println!(
        "  {} {:.1}s ({:.0} files/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    println!("  {} {}", style("Output:").bold(), output);
    println!();
}
