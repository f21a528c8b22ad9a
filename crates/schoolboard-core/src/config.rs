//! Application configuration management.
//!
//! This module handles loading and saving the dashboard configuration: the
//! backend URL, an optional access token, and cache freshness settings.
//!
//! Configuration is stored at `~/.config/schoolboard/config.json`. The
//! `SCHOOLBOARD_API_URL` and `SCHOOLBOARD_TOKEN` environment variables take
//! precedence over the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_API_BASE_URL;
use crate::cache::{ResourceKey, TtlPolicy, DEFAULT_TTL};

/// Application name used for config directory paths
const APP_NAME: &str = "schoolboard";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "SCHOOLBOARD_API_URL";
pub const ENV_TOKEN: &str = "SCHOOLBOARD_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub access_token: Option<String>,
    pub default_ttl_secs: u64,
    /// Per-resource freshness, in seconds, for keys that should not use the default.
    pub ttl_overrides: HashMap<ResourceKey, u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            access_token: None,
            default_ttl_secs: DEFAULT_TTL.as_secs(),
            ttl_overrides: HashMap::new(),
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply overrides from the environment. `lookup` is injectable for tests.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api_base_url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.is_empty()) {
            self.access_token = Some(token);
        }
    }

    pub fn ttl_policy(&self) -> TtlPolicy<ResourceKey> {
        self.ttl_overrides.iter().fold(
            TtlPolicy::new(Duration::from_secs(self.default_ttl_secs)),
            |policy, (key, secs)| policy.with_override(*key, Duration::from_secs(*secs)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.ttl_policy().ttl_for(&ResourceKey::Events), DEFAULT_TTL);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"api_base_url": "https://school.test", "ttl_overrides": {"galleryStats": 30}}"#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://school.test");
        assert_eq!(config.default_ttl_secs, 300);
        let policy = config.ttl_policy();
        assert_eq!(policy.ttl_for(&ResourceKey::GalleryStats), Duration::from_secs(30));
        assert_eq!(policy.ttl_for(&ResourceKey::AllUsers), DEFAULT_TTL);
    }

    #[test]
    fn test_unknown_override_key_is_rejected() {
        let result: Result<Config, _> =
            serde_json::from_str(r#"{"ttl_overrides": {"students": 30}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|name| match name {
            ENV_API_URL => Some("https://api.school.test".to_string()),
            ENV_TOKEN => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "https://api.school.test");
        assert_eq!(config.access_token, None);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("schoolboard-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE);
        let mut config = Config::default();
        config.default_ttl_secs = 60;
        config.ttl_overrides.insert(ResourceKey::Schedules, 600);

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded.default_ttl_secs, 60);
        assert_eq!(loaded.ttl_overrides.get(&ResourceKey::Schedules), Some(&600));
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load_from(Path::new("/nonexistent/schoolboard/config.json")).unwrap();
        assert_eq!(config.default_ttl_secs, DEFAULT_TTL.as_secs());
    }
}
