//! Configuration file support for the lucky calendar.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/luckycal/config.toml`.

use crate::export::ExportFormat;
use crate::tables::{default_tables, ReferenceTables};
use crate::{Error, LeapBirthdayPolicy, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub reading: ReadingConfig,

    #[serde(default)]
    pub tables: TablesConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// The person the calendar is read for
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ProfileConfig {
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

/// Reading rules
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ReadingConfig {
    #[serde(default)]
    pub leap_birthday: LeapBirthdayPolicy,
}

/// Reference table source
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct TablesConfig {
    /// TOML tables replacing the built-in ones
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Export destination
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    #[serde(default)]
    pub format: ExportFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: ExportFormat::default(),
        }
    }
}

// Default value functions
fn default_output_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("luckycal").join("exports")
}

/// Birth date used when neither the command line nor the profile gives one
pub fn fallback_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or(NaiveDate::MIN)
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("luckycal").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Birth date from the profile, else the fallback
    pub fn birth_date(&self) -> NaiveDate {
        self.profile.birth_date.unwrap_or_else(fallback_birth_date)
    }

    /// Reference tables named by `override_path`, else by the config, else
    /// the built-in tables
    pub fn reference_tables(
        &self,
        override_path: Option<&Path>,
    ) -> Result<Cow<'static, ReferenceTables>> {
        match override_path.or(self.tables.path.as_deref()) {
            Some(path) => Ok(Cow::Owned(ReferenceTables::load_from(path)?)),
            None => Ok(Cow::Borrowed(default_tables())),
        }
    }
}
