//! Command-line interface for the harvester.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{ClientConfig, HarvestRequest, DEFAULT_MAX_RESPONSE_SIZE, HTTP_TIMEOUT_SECS};
use crate::error::Result;
use crate::http::HttpTransport;
use crate::output::{harvest_document, open_output};
use crate::types::HarvestSummary;

/// OAI-PMH Harvester - Download all records of a repository into one XML document.
#[derive(Debug, Parser)]
#[command(name = "oai-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Repository base URL (e.g., https://example.org/oai)
    #[arg(short, long)]
    pub base_url: String,

    /// Metadata format to harvest (e.g., oai_dc)
    #[arg(short, long)]
    pub metadata_prefix: String,

    /// Only records changed on or after this datestamp
    #[arg(short, long)]
    pub from: Option<String>,

    /// Only records changed on or before this datestamp
    #[arg(short, long)]
    pub until: Option<String>,

    /// Only records in this set
    #[arg(short, long)]
    pub set: Option<String>,

    /// Output file (default: standard output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log every request, record count and resumption token
    #[arg(short, long)]
    pub verbose: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = HTTP_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum size of a single response in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_RESPONSE_SIZE)]
    pub max_size: u64,
}

impl Cli {
    /// The `ListRecords` request described by the arguments.
    pub fn request(&self) -> HarvestRequest {
        HarvestRequest {
            base_url: self.base_url.clone(),
            metadata_prefix: self.metadata_prefix.clone(),
            from: self.from.clone(),
            until: self.until.clone(),
            set: self.set.clone(),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout_secs: self.timeout,
            max_response_size: self.max_size,
        }
    }
}

/// Run a harvest as described by `cli`.
pub fn run(cli: &Cli) -> Result<HarvestSummary> {
    let request = cli.request();
    let mut transport = HttpTransport::new(&cli.client_config())?;
    let mut out = open_output(cli.output.as_deref())?;

    // Verbose logging goes to stderr too, so the spinner would only garble it.
    let pb = if cli.verbose {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(format!("Harvesting {}...", request.base_url));
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut total = 0;
    let result = harvest_document(&mut transport, &request, &mut out, |page| {
        total += page.record_count;
        pb.set_message(format!(
            "Page {}: {} records ({} total)",
            page.page, page.record_count, total
        ));
    });
    pb.finish_and_clear();
    let summary = result?;

    eprintln!(
        "{} {} records from {} pages",
        style("Harvested").green().bold(),
        style(summary.records).cyan(),
        summary.pages
    );
    if summary.protocol_errors > 0 {
        eprintln!(
            "  Protocol errors: {}",
            style(summary.protocol_errors).yellow().bold()
        );
    }
    if let Some(path) = &cli.output {
        eprintln!("{} {}", style("Saved to:").green().bold(), path.display());
    }

    Ok(summary)
}
