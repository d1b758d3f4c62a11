//! Fetch command - save receipt messages as HTML files.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use fareweek_core::mail::{MailboxSource, SearchRange};
use fareweek_core::models::ConfigLookup;
use fareweek_core::models::config::MAIL_SENDER;

use super::{OUTPUT_PREFIX, load_settings};

const DATE_HELP: &str = "Dates look like 08-Jan-2024 (strftime \"%d-%b-%Y\")";

/// Arguments for the fetch command.
#[derive(Args)]
#[command(after_help = DATE_HELP)]
pub struct FetchArgs {
    /// Directory of saved .eml messages
    #[arg(default_value = ".")]
    mailbox: PathBuf,

    /// Keep messages sent on or after this date
    #[arg(long, value_parser = parse_search_date)]
    since: Option<chrono::NaiveDate>,

    /// Keep messages sent before this date
    #[arg(long, value_parser = parse_search_date)]
    until: Option<chrono::NaiveDate>,

    /// Keep only messages from this sender (default: MAIL_SENDER setting)
    #[arg(long)]
    sender: Option<String>,

    /// Directory to write the HTML files to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn parse_search_date(value: &str) -> Result<chrono::NaiveDate, String> {
    SearchRange::parse_date(value).map_err(|e| e.to_string())
}

pub async fn run(args: FetchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let settings = load_settings(config_path)?;
    let sender = args
        .sender
        .or_else(|| settings.get(MAIL_SENDER))
        .unwrap_or_default();

    let range = SearchRange::new(args.since, args.until);
    info!(
        "fetching receipts from {} (since {:?}, until {:?})",
        args.mailbox.display(),
        range.since,
        range.until
    );

    let source = MailboxSource::new(&args.mailbox)
        .with_sender(sender)
        .with_range(range);

    fs::create_dir_all(&args.output_dir)?;
    for document in source.fetch()? {
        let path = document.save(&args.output_dir, OUTPUT_PREFIX)?;
        println!("{}", path.display());
    }

    Ok(())
}
