use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::provider::{
    PanelKind,
    forecast::{DEFAULT_AIR_QUALITY_URL, DEFAULT_FORECAST_URL},
    geocoding::DEFAULT_GEOCODING_URL,
};

/// City resolved automatically when a session starts.
pub const DEFAULT_CITY: &str = "Merit";

/// Base URLs of the three Open-Meteo services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding: String,
    pub forecast: String,
    pub air_quality: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: DEFAULT_GEOCODING_URL.to_string(),
            forecast: DEFAULT_FORECAST_URL.to_string(),
            air_quality: DEFAULT_AIR_QUALITY_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_city = "Paris"
/// default_tab = "rain"
///
/// [endpoints]
/// forecast = "https://api.open-meteo.com/v1/forecast"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_city: String,

    /// Tab id shown first, e.g. "temp" or "air".
    pub default_tab: Option<String>,

    /// Request timeout; unset means requests may wait indefinitely.
    pub timeout_secs: Option<u64>,

    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_city: DEFAULT_CITY.to_string(),
            default_tab: None,
            timeout_secs: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Return the default tab as a strongly-typed PanelKind.
    pub fn default_tab_kind(&self) -> Result<PanelKind> {
        match &self.default_tab {
            Some(id) => PanelKind::try_from(id.as_str()),
            None => Ok(PanelKind::default()),
        }
    }

    pub fn set_default_tab(&mut self, kind: PanelKind) {
        self.default_tab = Some(kind.as_str().to_string());
    }

    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteo", "meteo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
