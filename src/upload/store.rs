//! # Config Store
//!
//! Key-value settings addressed by `(environment, type, name, key)`.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::errors::{UploadError, UploadResult};

/// Address of a group of settings
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreScope {
    pub environment: String,
    /// Owner kind, e.g. "plugin" or "core"
    pub kind: String,
    pub name: String,
}

impl StoreScope {
    pub fn new(environment: impl Into<String>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Scope of the upload plugin in an environment
    pub fn upload_plugin(environment: impl Into<String>) -> Self {
        Self::new(environment, "plugin", "upload")
    }

    /// Flat key used by stores that keep a single map
    fn entry_key(&self, key: &str) -> String {
        format!("{}::{}_{}_{}", self.environment, self.kind, self.name, key)
    }
}

/// Config store collaborator
pub trait ConfigStore: Send + Sync {
    fn get(&self, scope: &StoreScope, key: &str) -> UploadResult<Option<Value>>;

    /// Replace the value at `key`
    fn set(&self, scope: &StoreScope, key: &str, value: Value) -> UploadResult<()>;
}

/// Store kept in memory
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, scope: &StoreScope, key: &str) -> UploadResult<Option<Value>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| UploadError::Internal("Lock poisoned".into()))?;
        Ok(entries.get(&scope.entry_key(key)).cloned())
    }

    fn set(&self, scope: &StoreScope, key: &str, value: Value) -> UploadResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| UploadError::Internal("Lock poisoned".into()))?;
        entries.insert(scope.entry_key(key), value);
        Ok(())
    }
}

/// Store persisted as one JSON object on disk.
///
/// Every `set` rewrites the file; reads are served from memory.
#[derive(Debug)]
pub struct JsonFileConfigStore {
    path: PathBuf,
    entries: RwLock<Map<String, Value>>,
}

impl JsonFileConfigStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub fn open(path: &Path) -> UploadResult<Self> {
        let entries = if path.exists() {
            let data = fs::read(path)?;
            serde_json::from_slice(&data)
                .map_err(|e| UploadError::Io(format!("Corrupt config store: {}", e)))?
        } else {
            Map::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
        })
    }
}

impl ConfigStore for JsonFileConfigStore {
    fn get(&self, scope: &StoreScope, key: &str) -> UploadResult<Option<Value>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| UploadError::Internal("Lock poisoned".into()))?;
        Ok(entries.get(&scope.entry_key(key)).cloned())
    }

    fn set(&self, scope: &StoreScope, key: &str, value: Value) -> UploadResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| UploadError::Internal("Lock poisoned".into()))?;
        let mut next = entries.clone();
        next.insert(scope.entry_key(key), value);

        let data = serde_json::to_vec_pretty(&next)
            .map_err(|e| UploadError::Internal(e.to_string()))?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;

        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_scopes_are_isolated() {
        let store = MemoryConfigStore::new();
        let dev = StoreScope::upload_plugin("development");
        let prod = StoreScope::upload_plugin("production");

        store.set(&dev, "provider", json!({ "enabled": false })).unwrap();

        assert_eq!(store.get(&dev, "provider").unwrap(), Some(json!({ "enabled": false })));
        assert_eq!(store.get(&prod, "provider").unwrap(), None);
    }

    #[test]
    fn test_set_replaces_value() {
        let store = MemoryConfigStore::new();
        let scope = StoreScope::upload_plugin("development");

        store.set(&scope, "provider", json!({ "enabled": false, "sizeLimit": 5 })).unwrap();
        store.set(&scope, "provider", json!({ "provider": "local" })).unwrap();

        assert_eq!(store.get(&scope, "provider").unwrap(), Some(json!({ "provider": "local" })));
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("core_store.json");
        let scope = StoreScope::upload_plugin("development");

        let store = JsonFileConfigStore::open(&path).unwrap();
        store.set(&scope, "provider", json!({ "enabled": true })).unwrap();
        fs::create_dir(temp.path().join("core_store.json.tmp")).unwrap();

        assert!(store.set(&scope, "provider", json!({ "enabled": false })).is_err());
        assert_eq!(store.get(&scope, "provider").unwrap(), Some(json!({ "enabled": true })));
    }

    #[test]
    fn test_file_store_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("core_store.json");
        let scope = StoreScope::upload_plugin("staging");

        {
            let store = JsonFileConfigStore::open(&path).unwrap();
            store.set(&scope, "provider", json!({ "sizeLimit": 10 })).unwrap();
        }

        let reopened = JsonFileConfigStore::open(&path).unwrap();
        assert_eq!(reopened.get(&scope, "provider").unwrap(), Some(json!({ "sizeLimit": 10 })));
    }
}
