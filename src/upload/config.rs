//! # Upload Provider Configuration
//!
//! Stored per environment in the config store under the `provider` key of
//! the upload plugin scope. The wire format is camelCase.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{UploadError, UploadResult};

/// Upload provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfig {
    /// Upload gate; false rejects every upload
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Largest accepted file size in bytes (inclusive)
    #[serde(default = "default_size_limit")]
    pub size_limit: u64,

    /// Provider identity
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Provider-specific settings
    #[serde(default = "default_provider_options")]
    pub provider_options: Value,
}

fn default_enabled() -> bool {
    true
}

fn default_size_limit() -> u64 {
    1_000_000 // 1MB
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_provider_options() -> Value {
    Value::Object(Default::default())
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            size_limit: default_size_limit(),
            provider: default_provider(),
            provider_options: default_provider_options(),
        }
    }
}

impl UploadConfig {
    /// Parse a stored or submitted configuration value
    pub fn from_value(value: Value) -> UploadResult<Self> {
        serde_json::from_value(value).map_err(|e| UploadError::InvalidConfig(e.to_string()))
    }

    /// Serialize for storage
    pub fn to_value(&self) -> UploadResult<Value> {
        serde_json::to_value(self).map_err(|e| UploadError::Internal(e.to_string()))
    }

    /// Check a file size against the limit
    pub fn check_size(&self, name: &str, size: u64) -> UploadResult<()> {
        if size > self.size_limit {
            Err(UploadError::FileTooLarge {
                name: name.to_string(),
                size,
                limit: self.size_limit,
            })
        } else {
            Ok(())
        }
    }
}
