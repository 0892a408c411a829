//! Configuration management for complaintdesk.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::render::Theme;
use crate::storage::DEFAULT_SLOT_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "complaintdesk";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "origin.db";

/// Environment variable prefix.
const ENV_PREFIX: &str = "COMPLAINTDESK_";

/// Upper bound on id redraw attempts.
pub const MAX_ID_REDRAWS: u8 = 16;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `COMPLAINTDESK_`, `__` between levels)
/// 2. TOML config file at `~/.config/complaintdesk/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Form configuration.
    pub form: FormConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the origin database.
    /// Defaults to `~/.local/share/complaintdesk/origin.db`
    pub database_path: Option<PathBuf>,
    /// Slot the complaint collection is stored under.
    pub slot_key: String,
    /// Byte limit for one slot. Set to 0 for unlimited.
    pub quota_bytes: usize,
}

/// Form-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// How long the submission notice stays up, in milliseconds.
    pub notice_duration_ms: u64,
    /// How many times to redraw a complaint id that is already taken.
    /// 0 keeps the first draw even if it collides.
    pub id_redraws: u8,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Initial presentation mode.
    pub theme: Theme,
    /// Colour urgency badges in table output.
    pub color: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            quota_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            notice_duration_ms: 5_000,
            id_redraws: 0,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            color: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.slot_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "slot_key must not be empty".to_string(),
            });
        }

        if self.form.notice_duration_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "notice_duration_ms must be greater than 0".to_string(),
            });
        }

        if self.form.id_redraws > MAX_ID_REDRAWS {
            return Err(Error::ConfigValidation {
                message: format!(
                    "id_redraws ({}) cannot be greater than {MAX_ID_REDRAWS}",
                    self.form.id_redraws
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the slot quota, `None` meaning unlimited.
    #[must_use]
    pub fn quota(&self) -> Option<usize> {
        (self.storage.quota_bytes > 0).then_some(self.storage.quota_bytes)
    }

    /// Get the notice duration as a Duration.
    #[must_use]
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.form.notice_duration_ms)
    }
}
