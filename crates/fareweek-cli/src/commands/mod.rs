//! Subcommands and the helpers they share.

pub mod config;
pub mod fetch;
pub mod scrape;
pub mod send;

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use glob::glob;

use fareweek_core::FareweekError;
use fareweek_core::models::{ConfigLookup, Settings};

/// Prefix of generated file and directory names.
pub const OUTPUT_PREFIX: &str = "fareweek";

/// `<home>/.fareweek`, or `--config` when given.
pub fn config_dir(config_path: Option<&str>) -> PathBuf {
    match config_path {
        Some(path) => PathBuf::from(path),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fareweek"),
    }
}

/// Load settings from the configuration directory.
pub fn load_settings(config_path: Option<&str>) -> anyhow::Result<Settings> {
    let dir = config_dir(config_path);
    let settings = Settings::load_dir(&dir).map_err(|e| {
        FareweekError::Config(format!("failed to read settings from {}: {}", dir.display(), e))
    })?;
    Ok(settings)
}

/// Look up a required setting.
pub fn require(settings: &Settings, key: &str) -> anyhow::Result<String> {
    settings
        .get(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Missing setting {}; set it with 'fareweek config set {} <value>'", key, key))
}

/// Expand glob patterns, or read one path per line from stdin when there
/// are none. Patterns matching nothing expand to nothing.
pub fn expand_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    if patterns.is_empty() {
        return read_stdin_paths(io::stdin().lock());
    }

    let mut paths = Vec::new();
    for pattern in patterns {
        paths.extend(glob(pattern)?.filter_map(|r| r.ok()));
    }
    Ok(paths)
}

fn read_stdin_paths(reader: impl BufRead) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();
        if !line.is_empty() {
            paths.push(PathBuf::from(line));
        }
    }
    Ok(paths)
}

/// Remove a file if it is still there.
pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
