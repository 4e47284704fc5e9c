//! Observable events
//!
//! Events are explicit and typed; every log line names one of them.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Process configuration loaded
    ConfigLoaded,
    /// Data directory initialized
    DataDirInitialized,

    // Field rules
    /// A descriptor passed its resolved rule set
    FieldAccepted,
    /// A descriptor violated its resolved rule set
    FieldRejected,

    // Uploads
    /// Upload request received
    UploadBegin,
    /// Upload rejected by policy
    UploadRejected,
    /// Upload persisted
    UploadComplete,
    /// File record and content removed
    FileRemoved,
    /// Buffering or storage collaborator failed
    StorageFailed,

    // Settings
    /// Provider settings replaced
    SettingsUpdated,
}

impl Event {
    pub const ALL: [Event; 10] = [
        Event::ConfigLoaded,
        Event::DataDirInitialized,
        Event::FieldAccepted,
        Event::FieldRejected,
        Event::UploadBegin,
        Event::UploadRejected,
        Event::UploadComplete,
        Event::FileRemoved,
        Event::StorageFailed,
        Event::SettingsUpdated,
    ];

    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DataDirInitialized => "DATA_DIR_INITIALIZED",
            Event::FieldAccepted => "FIELD_ACCEPTED",
            Event::FieldRejected => "FIELD_REJECTED",
            Event::UploadBegin => "UPLOAD_BEGIN",
            Event::UploadRejected => "UPLOAD_REJECTED",
            Event::UploadComplete => "UPLOAD_COMPLETE",
            Event::FileRemoved => "FILE_REMOVED",
            Event::StorageFailed => "STORAGE_FAILED",
            Event::SettingsUpdated => "SETTINGS_UPDATED",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::StorageFailed)
    }

    /// Returns true if this event reports a rejected request
    pub fn is_rejection(&self) -> bool {
        matches!(self, Event::FieldRejected | Event::UploadRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
