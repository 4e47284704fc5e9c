//! # Byte Storage Backend

use super::errors::{UploadError, UploadResult};

/// Byte store used by providers that keep file content themselves
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Write data to key, creating intermediate folders
    fn write(&self, key: &str, data: &[u8]) -> UploadResult<()>;

    /// Read data at key
    fn read(&self, key: &str) -> UploadResult<Vec<u8>>;

    /// Delete data at key
    fn delete(&self, key: &str) -> UploadResult<()>;

    /// Check if key exists
    fn exists(&self, key: &str) -> UploadResult<bool>;
}

/// Rejects keys that could escape the backend root.
pub fn check_key(key: &str) -> UploadResult<()> {
    let escapes = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..");

    if escapes {
        Err(UploadError::InvalidPath(key.to_string()))
    } else {
        Ok(())
    }
}
