//! Key/value settings used to fill personal report fields and mail credentials.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the settings file inside the configuration directory.
pub const CONFIG_FILE: &str = "config.json";

/// Customer name, written to the report header and every day column.
pub const NAME: &str = "NAME";
/// Office location, written to every day column.
pub const OFFICE: &str = "OFFICE";
pub const DEPT: &str = "DEPT";
pub const MANAGER: &str = "MANAGER";
pub const ADDRESS_LINE1: &str = "ADDRESSLINE1";
pub const ADDRESS_LINE2: &str = "ADDRESSLINE2";
/// Mailbox login used by `send`.
pub const MAIL_ADDRESS: &str = "MAIL_ADDRESS";
pub const MAIL_PASSWORD: &str = "MAIL_PASSWORD";
pub const MAIL_SMTP: &str = "MAIL_SMTP";
/// Sender whose messages `fetch` keeps.
pub const MAIL_SENDER: &str = "MAIL_SENDER";
/// Recipient of the weekly report.
pub const SEND_ADDRESS: &str = "SEND_ADDRESS";

/// Capability for looking up configuration values by key.
///
/// Absent keys resolve to the default and never fail.
pub trait ConfigLookup {
    /// Look up a key.
    fn get(&self, key: &str) -> Option<String>;

    /// Look up a key, falling back to `default`.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

impl ConfigLookup for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl ConfigLookup for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

/// Settings backed by a JSON file, overridden by environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Values stored in the settings file.
    #[serde(flatten)]
    pub values: BTreeMap<String, String>,

    /// Whether non-empty environment variables take precedence.
    #[serde(skip)]
    use_env: bool,
}

impl Settings {
    /// Create empty settings that consult the environment.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            use_env: true,
        }
    }

    /// Load settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let mut settings: Settings = serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        settings.use_env = true;
        Ok(settings)
    }

    /// Load `config.json` from `dir`, or empty settings if it does not exist.
    pub fn load_dir(dir: &Path) -> Result<Self, std::io::Error> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::new())
        }
    }

    /// Save settings to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Ignore environment variables (file values only).
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Set a stored value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Path of the settings file inside `dir`.
    pub fn file_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLookup for Settings {
    fn get(&self, key: &str) -> Option<String> {
        if self.use_env {
            if let Ok(value) = std::env::var(key) {
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
        self.values.get(key).cloned()
    }
}
