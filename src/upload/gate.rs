//! # Upload Policy Gate
//!
//! Admission steps, in order, each able to short-circuit:
//! 1. upload disabled -> `UploadDisabled`
//! 2. no files -> `EmptyUpload`
//! 3. buffer every file (I/O errors propagate unchanged)
//! 4. any file over the size limit -> `FileTooLarge`, whole batch rejected
//! 5. attach relation and destination path
//!
//! Nothing is buffered before step 2 passes and nothing is persisted here.

use super::buffer::Bufferizer;
use super::config::UploadConfig;
use super::errors::{UploadError, UploadResult};
use super::file::{IncomingFile, UploadFile, UploadMeta};

/// Enforces admission policy over an upload batch
pub struct UploadPolicyGate<'a> {
    bufferizer: &'a dyn Bufferizer,
}

impl<'a> UploadPolicyGate<'a> {
    pub fn new(bufferizer: &'a dyn Bufferizer) -> Self {
        Self { bufferizer }
    }

    /// Admits a batch, returning buffered files annotated for persistence.
    ///
    /// # Errors
    ///
    /// - `UploadDisabled` if `config.enabled` is false
    /// - `EmptyUpload` if `files` is empty
    /// - `FileTooLarge` naming the first file whose size exceeds `config.size_limit`
    /// - any error raised by the bufferizer
    pub fn admit(
        &self,
        files: Vec<IncomingFile>,
        meta: &UploadMeta,
        config: &UploadConfig,
    ) -> UploadResult<Vec<UploadFile>> {
        if !config.enabled {
            return Err(UploadError::UploadDisabled);
        }

        if files.is_empty() {
            return Err(UploadError::EmptyUpload);
        }

        let mut buffered = self.bufferizer.bufferize(files)?;

        // All or nothing: one oversized file voids the batch
        for file in &buffered {
            config.check_size(&file.name, file.size)?;
        }

        let related = meta.relation();
        let destination = meta.destination();

        for file in &mut buffered {
            if let Some(related) = &related {
                file.related = vec![related.clone()];
            }
            if let Some(path) = destination {
                file.path = Some(path.to_string());
            }
        }

        Ok(buffered)
    }
}
