//! # Upload Service
//!
//! Controller operations of the upload plugin. Every collaborator is
//! injected at construction; nothing is looked up globally.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::buffer::Bufferizer;
use super::config::UploadConfig;
use super::errors::{UploadError, UploadResult};
use super::file::{FileRecord, IncomingFile, UploadMeta};
use super::gate::UploadPolicyGate;
use super::provider::{FileQuery, UploadProvider};
use super::response::FileResponse;
use super::store::{ConfigStore, StoreScope};
use crate::observability::{log_event_with_fields, Event};

/// Config store key holding the upload provider configuration
pub const PROVIDER_KEY: &str = "provider";

/// Process-level settings the service needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Active environment
    pub environment: String,
    /// Every known environment
    pub environments: Vec<String>,
    /// Public host prefixed to relative urls
    pub public_url: String,
    /// Installed provider names
    pub providers: Vec<String>,
}

/// Environment listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub name: String,
    pub active: bool,
}

/// Provider settings of one environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub providers: Vec<String>,
    pub config: UploadConfig,
}

/// Upload controller with injected collaborators
pub struct UploadService {
    store: Arc<dyn ConfigStore>,
    bufferizer: Arc<dyn Bufferizer>,
    provider: Arc<dyn UploadProvider>,
    settings: ServiceSettings,
}

impl UploadService {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        bufferizer: Arc<dyn Bufferizer>,
        provider: Arc<dyn UploadProvider>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            store,
            bufferizer,
            provider,
            settings,
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Upload configuration of an environment; defaults when none is stored
    pub fn upload_config(&self, environment: &str) -> UploadResult<UploadConfig> {
        match self.store.get(&StoreScope::upload_plugin(environment), PROVIDER_KEY)? {
            Some(value) => UploadConfig::from_value(value),
            None => Ok(UploadConfig::default()),
        }
    }

    /// Admit, persist and shape an upload batch.
    ///
    /// The provider is called at most once, and only after every policy
    /// check has passed.
    pub fn upload(&self, files: Vec<IncomingFile>, meta: &UploadMeta) -> UploadResult<Vec<FileResponse>> {
        let config = self.upload_config(&self.settings.environment)?;
        let count = files.len().to_string();
        log_event_with_fields(Event::UploadBegin, &[("files", count.as_str())]);

        let gate = UploadPolicyGate::new(self.bufferizer.as_ref());
        let admitted = gate.admit(files, meta, &config).map_err(log_failure)?;

        let records = self.provider.upload(admitted, &config).map_err(log_failure)?;

        let stored = records.len().to_string();
        log_event_with_fields(
            Event::UploadComplete,
            &[("files", stored.as_str()), ("provider", config.provider.as_str())],
        );

        Ok(self.shape_all(records))
    }

    /// Every environment, flagging the active one
    pub fn environments(&self) -> Vec<EnvironmentInfo> {
        self.settings
            .environments
            .iter()
            .map(|name| EnvironmentInfo {
                name: name.clone(),
                active: *name == self.settings.environment,
            })
            .collect()
    }

    /// Installed providers and the stored configuration of `environment`
    pub fn get_settings(&self, environment: &str) -> UploadResult<SettingsResponse> {
        self.check_environment(environment)?;
        Ok(SettingsResponse {
            providers: self.settings.providers.clone(),
            config: self.upload_config(environment)?,
        })
    }

    /// Replace the stored configuration of `environment` wholesale.
    ///
    /// The value must parse as an upload configuration; it is stored as given,
    /// never merged with the previous one.
    pub fn update_settings(&self, environment: &str, value: Value) -> UploadResult<()> {
        self.check_environment(environment)?;
        UploadConfig::from_value(value.clone())?;

        self.store
            .set(&StoreScope::upload_plugin(environment), PROVIDER_KEY, value)?;
        log_event_with_fields(Event::SettingsUpdated, &[("environment", environment)]);
        Ok(())
    }

    pub fn find(&self, query: &FileQuery) -> UploadResult<Vec<FileResponse>> {
        let records = self.provider.fetch_all(query)?;
        Ok(self.shape_all(records))
    }

    pub fn find_one(&self, id: Uuid) -> UploadResult<FileResponse> {
        let record = self
            .provider
            .fetch(&FileQuery::by_id(id))?
            .ok_or_else(|| UploadError::NotFound(id.to_string()))?;
        Ok(FileResponse::from_record(record, &self.settings.public_url))
    }

    pub fn count(&self, query: &FileQuery) -> UploadResult<usize> {
        self.provider.count(query)
    }

    /// Remove a file, returning the removed record
    pub fn destroy(&self, id: Uuid) -> UploadResult<FileResponse> {
        let config = self.upload_config(&self.settings.environment)?;
        let record = self
            .provider
            .fetch(&FileQuery::by_id(id))?
            .ok_or_else(|| UploadError::NotFound(id.to_string()))?;

        self.provider.remove(&record, &config).map_err(log_failure)?;

        let id = record.id.to_string();
        log_event_with_fields(Event::FileRemoved, &[("id", id.as_str())]);
        Ok(FileResponse::from_record(record, &self.settings.public_url))
    }

    /// Case-insensitive search over file names and hashes
    pub fn search(&self, term: &str) -> UploadResult<Vec<FileResponse>> {
        let records = self.provider.search(term)?;
        Ok(self.shape_all(records))
    }

    fn shape_all(&self, records: Vec<FileRecord>) -> Vec<FileResponse> {
        records
            .into_iter()
            .map(|r| FileResponse::from_record(r, &self.settings.public_url))
            .collect()
    }

    fn check_environment(&self, environment: &str) -> UploadResult<()> {
        if self.settings.environments.iter().any(|e| e == environment) {
            Ok(())
        } else {
            Err(UploadError::InvalidConfig(format!("Unknown environment: {}", environment)))
        }
    }
}

/// Log a failed step, passing the error through unchanged
fn log_failure(err: UploadError) -> UploadError {
    let reason = err.to_string();
    let event = if err.is_policy_rejection() {
        Event::UploadRejected
    } else {
        Event::StorageFailed
    };
    log_event_with_fields(event, &[("reason", reason.as_str())]);
    err
}
