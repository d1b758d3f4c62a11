//! Config command - manage configuration.

use std::fs;

use clap::{Args, Subcommand};
use console::style;

use fareweek_core::models::config::{
    ADDRESS_LINE1, ADDRESS_LINE2, DEPT, MAIL_ADDRESS, MAIL_PASSWORD, MAIL_SENDER, MAIL_SMTP,
    MANAGER, NAME, OFFICE, SEND_ADDRESS,
};
use fareweek_core::models::{ConfigLookup, Settings};

use super::{config_dir, load_settings};

/// Every key the commands read.
const KNOWN_KEYS: [&str; 11] = [
    NAME,
    OFFICE,
    DEPT,
    MANAGER,
    ADDRESS_LINE1,
    ADDRESS_LINE2,
    MAIL_ADDRESS,
    MAIL_PASSWORD,
    MAIL_SMTP,
    MAIL_SENDER,
    SEND_ADDRESS,
];

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the stored configuration
    Show,

    /// Create a configuration file with every known key
    Init {
        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Get a value, environment variables first
    Get {
        /// Configuration key (e.g., "NAME")
        key: String,
    },

    /// Store a value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(config_path),
        ConfigCommand::Init { force } => init_config(config_path, force),
        ConfigCommand::Get { key } => get_config(config_path, &key),
        ConfigCommand::Set { key, value } => set_config(config_path, &key, &value),
        ConfigCommand::Path => show_path(config_path),
    }
}

fn show_config(config_path: Option<&str>) -> anyhow::Result<()> {
    let path = Settings::file_in(&config_dir(config_path));
    if !path.exists() {
        println!("{} No config file found.", style("ℹ").blue());
    }

    let mut settings = load_settings(config_path)?.without_env();
    if settings.values.get(MAIL_PASSWORD).is_some_and(|v| !v.is_empty()) {
        settings.set(MAIL_PASSWORD, "********");
    }
    println!("{}", serde_json::to_string_pretty(&settings)?);

    Ok(())
}

fn init_config(config_path: Option<&str>, force: bool) -> anyhow::Result<()> {
    let dir = config_dir(config_path);
    let path = Settings::file_in(&dir);

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    fs::create_dir_all(&dir)?;

    let mut settings = Settings::new();
    for key in KNOWN_KEYS {
        settings.set(key, "");
    }
    settings.save(&path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        path.display()
    );

    Ok(())
}

fn get_config(config_path: Option<&str>, key: &str) -> anyhow::Result<()> {
    let settings = load_settings(config_path)?;
    let value = settings
        .get(key)
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    println!("{}", value);

    Ok(())
}

fn set_config(config_path: Option<&str>, key: &str, value: &str) -> anyhow::Result<()> {
    let dir = config_dir(config_path);
    fs::create_dir_all(&dir)?;

    let mut settings = load_settings(config_path)?.without_env();
    settings.set(key, value);
    settings.save(&Settings::file_in(&dir))?;

    if !KNOWN_KEYS.contains(&key) {
        println!("{} {} is not a key fareweek reads", style("!").yellow(), key);
    }
    println!("{} Set {} = {}", style("✓").green(), key, value);

    Ok(())
}

fn show_path(config_path: Option<&str>) -> anyhow::Result<()> {
    let path = Settings::file_in(&config_dir(config_path));

    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'fareweek config init' to create a configuration file.");
    }

    Ok(())
}
