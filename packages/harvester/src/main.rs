//! CLI entry point for the harvester.

use clap::Parser;
use oai_harvester::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // WARN level by default (INFO with --verbose), respecting RUST_LOG.
    // Logs go to stderr; stdout may carry the harvested document.
    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = cli::run(&cli) {
        tracing::error!(error = %e, "Harvest failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
