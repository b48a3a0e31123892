//! Application configuration
//!
//! Configuration loaded from `.task-manager.toml`, overridable from the environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Base URL used when neither the config file nor the environment set one
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Environment variable overriding `api_base_url`
pub const API_URL_ENV: &str = "TASK_MANAGER_API_URL";

/// Application configuration loaded from `.task-manager.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the task REST API (e.g. "https://tasks.example.com/api")
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Location of the persistent key/value store.
    /// Defaults to `storage.json` in the config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            storage_path: None,
        }
    }
}

impl AppConfig {
    /// Load config from the first config file found, then apply environment overrides
    pub fn load() -> Self {
        let config = match crate::load_config_file() {
            Some(content) => match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            None => {
                log::debug!("Using default app config");
                Self::default()
            }
        };

        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup` (normally the process environment)
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            log::debug!("API base URL overridden by {}", API_URL_ENV);
            self.api_base_url = url;
        }
        self
    }

    /// Resolve the storage file location
    pub fn resolve_storage_path(&self) -> anyhow::Result<PathBuf> {
        match &self.storage_path {
            Some(path) => Ok(path.clone()),
            None => crate::paths::storage_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert!(config.storage_path.is_none());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            storage_path = "/tmp/tasks.json"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/tasks.json")));
    }

    #[test]
    fn test_env_override() {
        let config = AppConfig::default().with_env_overrides(|key| {
            (key == API_URL_ENV).then(|| "https://tasks.example.com/api".to_string())
        });
        assert_eq!(config.api_base_url, "https://tasks.example.com/api");
    }

    #[test]
    fn test_blank_env_override_is_ignored() {
        let config = AppConfig::default().with_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_explicit_storage_path_wins() {
        let config = AppConfig {
            storage_path: Some(PathBuf::from("/var/lib/tm/storage.json")),
            ..AppConfig::default()
        };
        assert_eq!(
            config.resolve_storage_path().unwrap(),
            PathBuf::from("/var/lib/tm/storage.json")
        );
    }
}
