use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::keymap::KeyMappings;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub keys: KeySettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Seconds an entity stays live after its last touch.
    #[serde(default = "default_ttl")]
    pub ttl: u64,

    /// Seconds between expiration sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Per-category key overrides, command name to key name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeySettings {
    #[serde(default)]
    pub general: HashMap<String, String>,

    #[serde(default)]
    pub status: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub log_to_file: bool,

    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::NotFound(path.as_ref().display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl == 0 {
            return Err(ConfigError::Invalid(
                "Cache TTL must be greater than 0".to_string(),
            ));
        }

        if self.cache.sweep_interval == 0 {
            return Err(ConfigError::Invalid(
                "Sweep interval must be greater than 0".to_string(),
            ));
        }

        if self.api.timeout == 0 {
            return Err(ConfigError::Invalid(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        url::Url::parse(&self.api.base_url)
            .map_err(|_| ConfigError::InvalidUrl(self.api.base_url.clone()))?;

        // Resolving the tables surfaces unknown commands and key names.
        self.key_mappings()?;

        Ok(())
    }

    /// Resolves the key tables with this configuration's overrides applied.
    pub fn key_mappings(&self) -> Result<KeyMappings> {
        KeyMappings::with_overrides(&self.keys.general, &self.keys.status)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache.sweep_interval)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(ttl) = std::env::var("CHIRPTERM_CACHE_TTL") {
            if let Ok(val) = ttl.parse() {
                self.cache.ttl = val;
            }
        }

        if let Ok(level) = std::env::var("CHIRPTERM_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(base_url) = std::env::var("CHIRPTERM_API_BASE_URL") {
            self.api.base_url = base_url;
        }
    }

    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("chirpterm"))
            .ok_or_else(|| ConfigError::Invalid("Could not determine config directory".to_string()))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            sweep_interval: default_sweep_interval(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_to_file: false,
            log_file: default_log_file(),
        }
    }
}

fn default_ttl() -> u64 {
    3600
}
fn default_sweep_interval() -> u64 {
    300
}
fn default_base_url() -> String {
    "https://twitter.com".to_string()
}
fn default_user_agent() -> String {
    format!("chirpterm/{}", env!("CARGO_PKG_VERSION"))
}
fn default_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_file() -> String {
    "logs/chirpterm.log".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ttl(), Duration::from_secs(3600));
        assert_eq!(config.sweep_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.cache.ttl = 120;
        config
            .keys
            .general
            .insert("quit".to_string(), "^Q".to_string());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.cache.ttl, 120);
        assert_eq!(loaded.keys.general.get("quit").unwrap(), "^Q");
    }

    #[test]
    fn test_load_missing_file_reports_not_found() {
        let result = Config::load("/nonexistent/config.toml");
        assert!(matches!(result, Err(crate::error::Error::NotFound(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[cache]\nttl = 60\n").unwrap();
        assert_eq!(config.cache.ttl, 60);
        assert_eq!(config.cache.sweep_interval, default_sweep_interval());
        assert_eq!(config.api.timeout, default_timeout());
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = Config::default();
        config.cache.ttl = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_key_command() {
        let mut config = Config::default();
        config
            .keys
            .status
            .insert("warp".to_string(), "w".to_string());
        assert!(config.validate().is_err());
    }
}
