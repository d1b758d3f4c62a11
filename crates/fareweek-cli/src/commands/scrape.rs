//! Scrape command - turn a batch of receipts into weekly expense forms.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use fareweek_core::pipeline;
use fareweek_core::report::{ReportEmitter, ReportLayout};
use fareweek_core::receipt::TripParser;

use super::{OUTPUT_PREFIX, config_dir, expand_inputs, load_settings, remove_if_exists};

/// Arguments for the scrape command.
#[derive(Args)]
pub struct ScrapeArgs {
    /// PDF or HTML files or glob patterns. Without any, file names are read
    /// from standard input.
    files: Vec<String>,

    /// Expense form template (default: <config dir>/template.xlsx)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Directory to create report directories in
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Delete input files after processing
    #[arg(long)]
    clean: bool,

    /// Include your mailing address in the expense forms
    #[arg(long)]
    with_address: bool,
}

pub async fn run(args: ScrapeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let template = args
        .template
        .clone()
        .unwrap_or_else(|| config_dir(config_path).join("template.xlsx"));
    if !template.exists() {
        anyhow::bail!("Could not find expense form at {}", template.display());
    }

    let settings = load_settings(config_path)?;
    let files = expand_inputs(&args.files)?;
    if files.is_empty() {
        warn!("No receipts to scrape");
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}")?,
    );

    let parser = TripParser::new();
    let mut trips = Vec::with_capacity(files.len());
    for path in &files {
        pb.set_message(path.display().to_string());
        let trip = parser
            .parse_receipt(path)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        trips.push(trip);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let layout = ReportLayout {
        output_prefix: OUTPUT_PREFIX.to_string(),
        ..ReportLayout::default()
    };
    let emitter = ReportEmitter::new(&template, &settings)
        .with_layout(layout)
        .with_output_root(&args.output_dir);

    let dirs = pipeline::emit_trips(trips, &emitter, args.with_address)?;
    for dir in &dirs {
        println!("{}", dir.display());
    }

    if args.clean {
        for path in &files {
            remove_if_exists(path)?;
            debug!("Removed {}", path.display());
        }
    }

    eprintln!(
        "{} Wrote {} report(s) from {} receipt(s) in {:?}",
        style("✓").green(),
        dirs.len(),
        files.len(),
        start.elapsed()
    );

    Ok(())
}
