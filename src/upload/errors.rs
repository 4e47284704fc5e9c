//! # Upload Errors

use thiserror::Error;

/// Result type for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

/// Upload errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    // Policy rejections
    #[error("File upload is disabled")]
    UploadDisabled,

    #[error("Files are empty")]
    EmptyUpload,

    #[error("{name} file is bigger than limit size ({size} bytes, max: {limit})")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    // Lookup errors
    #[error("File not found: {0}")]
    NotFound(String),

    // Collaborator errors
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid upload configuration: {0}")]
    InvalidConfig(String),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl UploadError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            UploadError::UploadDisabled => 400,
            UploadError::EmptyUpload => 400,
            UploadError::FileTooLarge { .. } => 400,
            UploadError::InvalidConfig(_) => 400,
            UploadError::InvalidPath(_) => 400,
            UploadError::NotFound(_) => 404,
            UploadError::Io(_) => 500,
            UploadError::Internal(_) => 500,
        }
    }

    /// Message catalog id for admin clients
    pub fn message_id(&self) -> &'static str {
        match self {
            UploadError::UploadDisabled => "Upload.status.disabled",
            UploadError::EmptyUpload => "Upload.status.empty",
            UploadError::FileTooLarge { .. } => "Upload.status.sizeLimit",
            UploadError::InvalidConfig(_) => "Upload.status.invalidConfig",
            UploadError::InvalidPath(_) => "Upload.status.invalidPath",
            UploadError::NotFound(_) => "file.notFound",
            UploadError::Io(_) | UploadError::Internal(_) => "Upload.status.error",
        }
    }

    /// True for rejections the caller can correct by changing the request
    pub fn is_policy_rejection(&self) -> bool {
        matches!(
            self,
            UploadError::UploadDisabled | UploadError::EmptyUpload | UploadError::FileTooLarge { .. }
        )
    }
}

impl From<std::io::Error> for UploadError {
    fn from(e: std::io::Error) -> Self {
        UploadError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(UploadError::UploadDisabled.status_code(), 400);
        assert_eq!(UploadError::NotFound("1".into()).status_code(), 404);
        assert_eq!(UploadError::Io("disk".into()).status_code(), 500);
    }

    #[test]
    fn test_file_too_large_names_file() {
        let err = UploadError::FileTooLarge {
            name: "poster.png".into(),
            size: 2048,
            limit: 1024,
        };
        assert!(err.to_string().starts_with("poster.png file is bigger than limit size"));
        assert_eq!(err.message_id(), "Upload.status.sizeLimit");
        assert!(err.is_policy_rejection());
        assert!(!UploadError::Io("x".into()).is_policy_rejection());
    }
}
