//! Send command - mail each report directory as one message.

use std::fs;

use clap::Args;
use console::style;
use tracing::{debug, info};

use fareweek_core::mail::SmtpMailer;
use fareweek_core::models::config::{MAIL_ADDRESS, MAIL_PASSWORD, MAIL_SMTP, SEND_ADDRESS};

use super::{OUTPUT_PREFIX, expand_inputs, load_settings, require};

/// Arguments for the send command.
#[derive(Args)]
pub struct SendArgs {
    /// Report directories or glob patterns. Without any, directory names
    /// are read from standard input.
    dirs: Vec<String>,

    /// Delete the directories after sending
    #[arg(long)]
    clean: bool,

    /// Compose the messages without sending them
    #[arg(short = 'n', long)]
    dry_run: bool,
}

pub async fn run(args: SendArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let settings = load_settings(config_path)?;
    let from = require(&settings, MAIL_ADDRESS)?;
    let to = require(&settings, SEND_ADDRESS)?;
    let (password, host) = if args.dry_run {
        (String::new(), String::new())
    } else {
        (require(&settings, MAIL_PASSWORD)?, require(&settings, MAIL_SMTP)?)
    };

    let mailer = SmtpMailer::new(host, from, password).with_dry_run(args.dry_run);

    let dirs: Vec<_> = expand_inputs(&args.dirs)?
        .into_iter()
        .filter(|d| d.is_dir())
        .collect();
    if dirs.is_empty() {
        anyhow::bail!("No report directories to send");
    }

    for dir in &dirs {
        let report = mailer.send_dir(dir, &to, OUTPUT_PREFIX).await?;
        let verb = if mailer.is_dry_run() { "Composed" } else { "Sent" };
        println!(
            "{} {} '{}' ({} attachments)",
            style("✓").green(),
            verb,
            report.subject,
            report.attachments.len()
        );
    }

    if args.clean {
        for dir in &dirs {
            fs::remove_dir_all(dir)?;
            debug!("Removed {}", dir.display());
        }
        info!("Removed {} directories", dirs.len());
    }

    Ok(())
}
