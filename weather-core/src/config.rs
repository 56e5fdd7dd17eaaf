use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::Units;

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeather API key. Absent means requests go out with an empty key.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub units: Units,

    #[serde(default = "default_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_timeout")]
    pub read_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            units: Units::default(),
            connect_timeout_secs: default_timeout(),
            read_timeout_secs: default_timeout(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    /// `OPENWEATHER_API_KEY` overrides whatever key the file holds.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env_override(std::env::var(API_KEY_ENV).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
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
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
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
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn apply_env_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// The key sent to the provider; empty when none is configured, in which
    /// case the provider rejects the request with 401.
    pub fn api_key_or_empty(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_ten_second_timeouts_and_metric() {
        let cfg = Config::default();

        assert_eq!(cfg.connect_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.read_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.units, Units::Metric);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn missing_key_yields_empty_string() {
        let cfg = Config::default();

        assert_eq!(cfg.api_key_or_empty(), "");
        assert!(!cfg.has_api_key());
    }

    #[test]
    fn env_override_replaces_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        cfg.apply_env_override(Some("ENV_KEY".into()));
        assert_eq!(cfg.api_key_or_empty(), "ENV_KEY");

        cfg.apply_env_override(Some("   ".into()));
        assert_eq!(cfg.api_key_or_empty(), "ENV_KEY");

        cfg.apply_env_override(None);
        assert_eq!(cfg.api_key_or_empty(), "ENV_KEY");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: Config = toml::from_str(r#"api_key = "K""#).expect("partial config parses");

        assert_eq!(cfg.api_key_or_empty(), "K");
        assert_eq!(cfg.units, Units::Metric);
        assert_eq!(cfg.read_timeout_secs, 10);
    }

    #[test]
    fn save_then_load_from_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("SAVED".into());
        cfg.units = Units::Imperial;
        cfg.save_to(&path).expect("save should succeed");

        let loaded = Config::load_from(&path).expect("load should succeed");
        assert_eq!(loaded.api_key_or_empty(), "SAVED");
        assert_eq!(loaded.units, Units::Imperial);
    }

    #[test]
    fn load_from_missing_path_returns_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).expect("missing file is not an error");

        assert!(!cfg.has_api_key());
    }
}
