//! # Buffering
//!
//! Materializes incoming streams into byte-addressable records.

use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;
use uuid::Uuid;

use super::errors::UploadResult;
use super::file::{IncomingFile, UploadFile};

const DEFAULT_MIME: &str = "application/octet-stream";

/// Buffering collaborator: streams in, buffered files out
pub trait Bufferizer: Send + Sync {
    /// Buffer every file. A read failure aborts the whole batch.
    fn bufferize(&self, files: Vec<IncomingFile>) -> UploadResult<Vec<UploadFile>>;
}

/// Buffers streams fully into memory
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryBufferizer;

impl MemoryBufferizer {
    pub fn new() -> Self {
        Self
    }

    fn buffer_one(&self, mut incoming: IncomingFile) -> UploadResult<UploadFile> {
        let mut content = Vec::new();
        incoming.reader.read_to_end(&mut content)?;

        Ok(UploadFile {
            hash: Uuid::new_v4().simple().to_string(),
            sha256: sha256_hex(&content),
            ext: extension_of(&incoming.name),
            mime: incoming.mime.unwrap_or_else(|| DEFAULT_MIME.to_string()),
            size: content.len() as u64,
            name: incoming.name,
            content,
            related: Vec::new(),
            path: None,
        })
    }
}

impl Bufferizer for MemoryBufferizer {
    fn bufferize(&self, files: Vec<IncomingFile>) -> UploadResult<Vec<UploadFile>> {
        files.into_iter().map(|f| self.buffer_one(f)).collect()
    }
}

/// Calculate checksum for data
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Lowercased extension with its leading dot, or empty
fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}
