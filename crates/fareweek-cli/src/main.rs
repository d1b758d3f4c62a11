//! CLI application for turning ride receipts into weekly expense reports.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, fetch, scrape, send};

/// Ride receipts to weekly expense reports
#[derive(Parser)]
#[command(name = "fareweek")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration directory (default: ~/.fareweek)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape receipts into weekly expense forms
    Scrape(scrape::ScrapeArgs),

    /// Save receipt messages as HTML files
    Fetch(fetch::FetchArgs),

    /// Mail report directories
    Send(send::SendArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Scrape(args) => scrape::run(args, cli.config.as_deref()).await,
        Commands::Fetch(args) => fetch::run(args, cli.config.as_deref()).await,
        Commands::Send(args) => send::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
