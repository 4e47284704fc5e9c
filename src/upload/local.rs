//! # Local Filesystem Backend

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::backend::{check_key, StorageBackend};
use super::errors::{UploadError, UploadResult};

/// Stores bytes under a root directory
#[derive(Debug)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn full_path(&self, key: &str) -> UploadResult<PathBuf> {
        check_key(key)?;
        Ok(self.root.join(key))
    }
}

fn not_found_or_io(key: &str, e: std::io::Error) -> UploadError {
    if e.kind() == ErrorKind::NotFound {
        UploadError::NotFound(key.to_string())
    } else {
        UploadError::Io(e.to_string())
    }
}

impl StorageBackend for LocalBackend {
    fn write(&self, key: &str, data: &[u8]) -> UploadResult<()> {
        let full_path = self.full_path(key)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&full_path, data)?;
        Ok(())
    }

    fn read(&self, key: &str) -> UploadResult<Vec<u8>> {
        let full_path = self.full_path(key)?;
        fs::read(&full_path).map_err(|e| not_found_or_io(key, e))
    }

    fn delete(&self, key: &str) -> UploadResult<()> {
        let full_path = self.full_path(key)?;
        fs::remove_file(&full_path).map_err(|e| not_found_or_io(key, e))
    }

    fn exists(&self, key: &str) -> UploadResult<bool> {
        Ok(self.full_path(key)?.exists())
    }
}
