//! # Upload Providers
//!
//! The storage collaborator persists admitted batches and answers record
//! lookups. `LocalProvider` keeps bytes in a `StorageBackend` and records in
//! an index optionally persisted as JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use uuid::Uuid;

use super::backend::StorageBackend;
use super::config::UploadConfig;
use super::errors::{UploadError, UploadResult};
use super::file::{FileRecord, UploadFile};
use super::local::LocalBackend;

/// Storage collaborator
pub trait UploadProvider: Send + Sync {
    /// Persist an admitted batch, returning one record per file
    fn upload(&self, files: Vec<UploadFile>, config: &UploadConfig) -> UploadResult<Vec<FileRecord>>;

    /// First record matching the criteria
    fn fetch(&self, query: &FileQuery) -> UploadResult<Option<FileRecord>>;

    /// Every record matching the criteria, paginated
    fn fetch_all(&self, query: &FileQuery) -> UploadResult<Vec<FileRecord>>;

    /// Number of records matching the criteria, ignoring pagination
    fn count(&self, query: &FileQuery) -> UploadResult<usize>;

    /// Delete a record and its content
    fn remove(&self, record: &FileRecord, config: &UploadConfig) -> UploadResult<()>;

    /// Case-insensitive substring match on hash or name
    fn search(&self, term: &str) -> UploadResult<Vec<FileRecord>>;
}

/// Record lookup criteria. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileQuery {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub ref_id: Option<String>,
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl FileQuery {
    pub fn by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn matches(&self, record: &FileRecord) -> bool {
        if self.id.is_some_and(|id| id != record.id) {
            return false;
        }
        if self.name.as_ref().is_some_and(|name| name != &record.name) {
            return false;
        }
        if self.mime.as_ref().is_some_and(|mime| mime != &record.mime) {
            return false;
        }
        if self.ref_id.is_some() || self.reference.is_some() {
            let related = record.related.iter().any(|r| {
                self.ref_id.as_ref().map_or(true, |id| id == &r.ref_id)
                    && self.reference.as_ref().map_or(true, |model| model == &r.reference)
            });
            if !related {
                return false;
            }
        }
        true
    }
}

/// Storage key for a file: `[path/]hash+ext`
pub fn storage_key(hash: &str, ext: &str, path: Option<&str>) -> String {
    match path {
        Some(folder) => format!("{}/{}{}", folder.trim_matches('/'), hash, ext),
        None => format!("{}{}", hash, ext),
    }
}

/// Provider storing bytes in a backend and records in memory
#[derive(Debug)]
pub struct LocalProvider<B: StorageBackend> {
    backend: B,
    records: RwLock<Vec<FileRecord>>,
    index_path: Option<PathBuf>,
}

impl<B: StorageBackend> LocalProvider<B> {
    /// Create a provider whose records live only in memory
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            records: RwLock::new(Vec::new()),
            index_path: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Write the record index to disk, if persistent
    fn persist(&self, records: &[FileRecord]) -> UploadResult<()> {
        let Some(index_path) = &self.index_path else {
            return Ok(());
        };

        let data = serde_json::to_vec_pretty(records)
            .map_err(|e| UploadError::Internal(e.to_string()))?;

        // Write then rename so a crash never leaves a torn index
        let tmp_path = index_path.with_extension("json.tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, index_path)?;
        Ok(())
    }

    /// Best-effort removal of bytes written for a batch that was not committed
    fn discard(&self, keys: &[String]) {
        for key in keys {
            let _ = self.backend.delete(key);
        }
    }

    fn write_records(&self) -> UploadResult<std::sync::RwLockWriteGuard<'_, Vec<FileRecord>>> {
        self.records
            .write()
            .map_err(|_| UploadError::Internal("Lock poisoned".into()))
    }

    fn read_records(&self) -> UploadResult<std::sync::RwLockReadGuard<'_, Vec<FileRecord>>> {
        self.records
            .read()
            .map_err(|_| UploadError::Internal("Lock poisoned".into()))
    }
}

impl LocalProvider<LocalBackend> {
    /// Open a persistent provider rooted at `root`.
    ///
    /// Bytes go under `root/uploads`, the record index is `root/files.json`.
    pub fn open(root: &Path) -> UploadResult<Self> {
        let index_path = root.join("files.json");
        let records = if index_path.exists() {
            let data = fs::read(&index_path)?;
            serde_json::from_slice(&data)
                .map_err(|e| UploadError::Io(format!("Corrupt file index: {}", e)))?
        } else {
            Vec::new()
        };

        Ok(Self {
            backend: LocalBackend::new(root.join("uploads")),
            records: RwLock::new(records),
            index_path: Some(index_path),
        })
    }
}

impl<B: StorageBackend> UploadProvider for LocalProvider<B> {
    fn upload(&self, files: Vec<UploadFile>, config: &UploadConfig) -> UploadResult<Vec<FileRecord>> {
        let mut written = Vec::with_capacity(files.len());
        let mut stored = Vec::with_capacity(files.len());

        for file in &files {
            let key = storage_key(&file.hash, &file.ext, file.path.as_deref());
            if let Err(e) = self.backend.write(&key, &file.content) {
                self.discard(&written);
                return Err(e);
            }
            stored.push(FileRecord::from_upload(file, format!("/uploads/{}", key), &config.provider));
            written.push(key);
        }

        let mut records = self.write_records()?;
        let mut next = records.clone();
        next.extend(stored.iter().cloned());

        if let Err(e) = self.persist(&next) {
            self.discard(&written);
            return Err(e);
        }
        *records = next;

        Ok(stored)
    }

    fn fetch(&self, query: &FileQuery) -> UploadResult<Option<FileRecord>> {
        let records = self.read_records()?;
        Ok(records.iter().find(|r| query.matches(r)).cloned())
    }

    fn fetch_all(&self, query: &FileQuery) -> UploadResult<Vec<FileRecord>> {
        let records = self.read_records()?;
        let matching = records.iter().filter(|r| query.matches(r)).skip(query.start);

        Ok(match query.limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        })
    }

    fn count(&self, query: &FileQuery) -> UploadResult<usize> {
        let records = self.read_records()?;
        Ok(records.iter().filter(|r| query.matches(r)).count())
    }

    fn remove(&self, record: &FileRecord, _config: &UploadConfig) -> UploadResult<()> {
        let key = storage_key(&record.hash, &record.ext, record.path.as_deref());
        match self.backend.delete(&key) {
            // Content already gone; still drop the record
            Ok(()) | Err(UploadError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let mut records = self.write_records()?;
        let next: Vec<FileRecord> = records.iter().filter(|r| r.id != record.id).cloned().collect();
        self.persist(&next)?;
        *records = next;
        Ok(())
    }

    fn search(&self, term: &str) -> UploadResult<Vec<FileRecord>> {
        let needle = term.to_lowercase();
        let records = self.read_records()?;
        Ok(records
            .iter()
            .filter(|r| {
                r.hash.to_lowercase().contains(&needle) || r.name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }
}
