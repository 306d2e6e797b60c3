use browser::{GroupingMode, ParseGroupingError};
use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Prefix of the environment variables read on top of the config file.
pub const ENV_PREFIX: &str = "PHOTOCAT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("{0}")]
    Grouping(#[from] ParseGroupingError),
    #[error("Failed to write configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub log_level: String,
    pub grouping: String,
    pub log_dir: PathBuf,
}

#[derive(Debug, Default)]
pub struct AppConfigOverrides {
    pub api_base_url: Option<String>,
    pub log_level: Option<String>,
    pub grouping: Option<String>,
}

/// `~/.photocat`, or `./.photocat` without a home directory.
pub fn base_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".photocat")
}

pub fn default_config_path() -> PathBuf {
    base_dir().join("config.toml")
}

impl AppConfig {
    /// Defaults, then the TOML file at `path` if it exists, then `PHOTOCAT_*`
    /// environment variables.
    pub fn load_from(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(default_config_path);
        let cfg = config::Config::builder()
            .set_default("api_base_url", api_client::DEFAULT_BASE_URL)?
            .set_default("log_level", "info")?
            .set_default("grouping", GroupingMode::default().to_string())?
            .set_default("log_dir", base_dir().to_string_lossy().to_string())?
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;
        let loaded: AppConfig = cfg.try_deserialize()?;
        // Reject a bad mode at startup rather than on first use
        loaded.grouping_mode()?;
        Ok(loaded)
    }

    pub fn apply_overrides(mut self, ov: &AppConfigOverrides) -> Self {
        if let Some(url) = &ov.api_base_url {
            self.api_base_url = url.clone();
        }
        if let Some(level) = &ov.log_level {
            self.log_level = level.clone();
        }
        if let Some(grouping) = &ov.grouping {
            self.grouping = grouping.clone();
        }
        self
    }

    pub fn grouping_mode(&self) -> Result<GroupingMode, ParseGroupingError> {
        self.grouping.parse()
    }

    pub fn save_to(&self, path: Option<PathBuf>) -> Result<(), ConfigError> {
        let path = path.unwrap_or_else(default_config_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }
}
