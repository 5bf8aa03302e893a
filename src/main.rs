//! fpscan - Parallel File Fingerprinting
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use fpscan::config::{CliArgs, ScanConfig};
use fpscan::fingerprint::WfpFingerprinter;
use fpscan::pool::FingerprintPool;
use fpscan::progress::{print_header, print_summary, DiscoverySpinner};
use fpscan::walk;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<bool> {
    let args = CliArgs::parse();
    setup_logging(args.debug, args.trace);

    let config = ScanConfig::from_args(args).context("Invalid configuration")?;

    // Keep stdout clean for fingerprint data when it is the destination
    let show_banner = !config.quiet && config.output.to_str() != Some("-");

    if show_banner {
        print_header(
            &config.scan_root.display().to_string(),
            config.requested_workers,
            &config.output.display().to_string(),
        );
    }

    let mut pool = FingerprintPool::new(config.clone(), Arc::new(WfpFingerprinter::new()));

    // Ctrl-C stops the producer; admitted tasks still drain
    let abort = pool.context();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, aborting scan...");
        abort.request_abort();
    })
    .context("Failed to set signal handler")?;

    let start = Instant::now();

    let spinner = DiscoverySpinner::new(config.quiet);
    let stats = walk::discover_and_enqueue(&config.scan_root, &pool, &spinner);
    spinner.finish();

    info!(files = stats.files, "Discovery complete, starting fingerprinting");

    let ok = pool.run(true);
    let results = pool.results();

    write_output(&config, &results).context("Failed to write fingerprints")?;

    if !ok {
        info!("Scan finished with errors");
    }

    if show_banner {
        print_summary(
            results.len() as u64,
            stats.files,
            stats.bytes,
            !ok,
            start.elapsed(),
            &config.output.display().to_string(),
        );
    }

    Ok(ok)
}

/// Write the collected WFP records to the configured destination
fn write_output(config: &ScanConfig, results: &[String]) -> Result<()> {
    let mut body = results.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }

    if config.output.to_str() == Some("-") {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(body.as_bytes())?;
        handle.flush()?;
    } else {
        std::fs::write(&config.output, body)
            .with_context(|| format!("writing '{}'", config.output.display()))?;
    }
    Ok(())
}

fn setup_logging(debug: bool, trace: bool) {
    let filter = if trace {
        EnvFilter::new("fpscan=trace")
    } else if debug {
        EnvFilter::new("fpscan=debug,warn")
    } else {
        EnvFilter::new("fpscan=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
