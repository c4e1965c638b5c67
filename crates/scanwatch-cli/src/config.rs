//! Configuration management for the CLI.
//!
//! The file lives at `~/.scanwatch/config.toml` unless `--config` names
//! another one:
//!
//! ```toml
//! active_profile = "default"
//!
//! [profiles.default]
//! server_url = "https://scans.example.com"
//! access_key_file = "/home/me/.scanwatch/access-key"
//!
//! [settings]
//! color = true
//! format = "table"
//!
//! [walker]
//! max_records = 100
//!
//! [detector]
//! resolve_cases = true
//! ```

use crate::error::{CliError, Result};
use scanwatch_engine::{DetectorConfig, WalkerConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Walk defaults for the builds command
    #[serde(default)]
    pub walker: WalkerConfig,

    /// Detection defaults for the tests command
    #[serde(default)]
    pub detector: DetectorConfig,

    #[serde(skip)]
    path: PathBuf,
}

/// Connection profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Server URL
    pub server_url: String,

    /// File holding the API access key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_file: Option<PathBuf>,

    /// Default project filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable
    Table,
    /// JSON lines
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".scanwatch").join("config.toml"))
    }

    /// Load configuration from `path` (or the default path), falling back to
    /// defaults when the file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            toml::from_str::<Config>(&contents)?
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            Self::default()
        };
        config.walker.validate()?;
        config.detector.validate()?;
        config.path = path;
        Ok(config)
    }

    /// Where the configuration is saved.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        self.profiles.get(&self.active_profile).ok_or_else(|| {
            CliError::Config(format!("Profile '{}' not found", self.active_profile))
        })
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_profile: default_profile(),
            profiles: BTreeMap::new(),
            settings: Settings::default(),
            walker: WalkerConfig::default(),
            detector: DetectorConfig::default(),
            path: PathBuf::new(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
