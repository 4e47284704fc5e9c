//! Process configuration
//!
//! Loaded from a JSON file (default `./aerocms.json`). Only `data_dir` is
//! required; everything else has a default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::upload::ServiceSettings;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Data directory holding uploads, the file index and the config store
    pub data_dir: String,

    /// Active environment (default: "development")
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Known environments
    #[serde(default = "default_environments")]
    pub environments: Vec<String>,

    /// Public host prefixed to relative file urls
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Installed upload providers
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_environments() -> Vec<String> {
    vec![
        "development".to_string(),
        "staging".to_string(),
        "production".to_string(),
    ]
}

fn default_public_url() -> String {
    "http://localhost:1337".to_string()
}

fn default_providers() -> Vec<String> {
    vec!["local".to_string()]
}

impl AppConfig {
    /// Config with defaults for everything but the data directory
    pub fn with_data_dir(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            environment: default_environment(),
            environments: default_environments(),
            public_url: default_public_url(),
            providers: default_providers(),
        }
    }

    /// Load and validate configuration from file
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;

        let config: AppConfig =
            serde_json::from_str(&content).map_err(|e| format!("Invalid config JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.trim().is_empty() {
            return Err("data_dir must not be empty".into());
        }

        if !self.environments.iter().any(|e| e == &self.environment) {
            return Err(format!(
                "Active environment '{}' is not listed in environments",
                self.environment
            ));
        }

        if !(self.public_url.starts_with("http://") || self.public_url.starts_with("https://")) {
            return Err(format!(
                "public_url must start with http:// or https://, got '{}'",
                self.public_url
            ));
        }

        Ok(())
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Path of the persisted config store
    pub fn store_path(&self) -> PathBuf {
        self.data_path().join("core_store.json")
    }

    /// Settings handed to the upload service
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            environment: self.environment.clone(),
            environments: self.environments.clone(),
            public_url: self.public_url.clone(),
            providers: self.providers.clone(),
        }
    }
}
