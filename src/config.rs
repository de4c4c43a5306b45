use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::{
    DEFAULT_PROGRESS_PERSIST_SECS, DEFAULT_SEEK_STEP_MS, DEFAULT_TICK_INTERVAL_MS,
};
use crate::utils::AppError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default tracing filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the local stores. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_true")]
    pub autoplay_enabled: bool,

    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_seek_step_ms")]
    pub seek_step_ms: i64,

    #[serde(default = "default_progress_persist_interval_secs")]
    pub progress_persist_interval_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read the config at `path`, writing defaults there when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {:?}", path);
            let contents = fs::read_to_string(path).context("Failed to read config file")?;
            let config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.validate()?;
            info!("Config loaded successfully");
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.playback.tick_interval_ms == 0 {
            return Err(AppError::Configuration(
                "playback.tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.playback.seek_step_ms <= 0 {
            return Err(AppError::Configuration(
                "playback.seek_step_ms must be greater than zero".to_string(),
            ));
        }
        if self.playback.progress_persist_interval_secs == 0 {
            return Err(AppError::Configuration(
                "playback.progress_persist_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory for the local stores: the configured one, else `<data_dir>/reeltv`
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir().context("Failed to get data directory")?;
        Ok(data_dir.join("reeltv"))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("reeltv").join("config.toml"))
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn progress_persist_interval(&self) -> Duration {
        Duration::from_secs(self.progress_persist_interval_secs)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            autoplay_enabled: true,
            tick_interval_ms: default_tick_interval_ms(),
            seek_step_ms: default_seek_step_ms(),
            progress_persist_interval_secs: default_progress_persist_interval_secs(),
        }
    }
}

fn default_log_filter() -> String {
    "reeltv=debug".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_seek_step_ms() -> i64 {
    DEFAULT_SEEK_STEP_MS
}

fn default_progress_persist_interval_secs() -> u64 {
    DEFAULT_PROGRESS_PERSIST_SECS
}
