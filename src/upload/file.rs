//! # Upload File Types
//!
//! `IncomingFile` is the wire-level stream, `UploadFile` its buffered form
//! annotated by the policy gate, and `FileRecord` what a provider persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use uuid::Uuid;

use super::errors::UploadResult;

/// An incoming file stream, not yet buffered
pub struct IncomingFile {
    pub name: String,
    pub mime: Option<String>,
    pub reader: Box<dyn Read + Send>,
}

impl IncomingFile {
    /// Wrap an arbitrary stream
    pub fn new(name: impl Into<String>, mime: Option<String>, reader: Box<dyn Read + Send>) -> Self {
        Self {
            name: name.into(),
            mime,
            reader,
        }
    }

    /// Wrap in-memory content
    pub fn from_bytes(name: impl Into<String>, mime: Option<String>, data: Vec<u8>) -> Self {
        Self::new(name, mime, Box::new(Cursor::new(data)))
    }

    /// Open a file on disk; the name is the path's file name
    pub fn open(path: &Path, mime: Option<String>) -> UploadResult<Self> {
        let file = File::open(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self::new(name, mime, Box::new(file)))
    }
}

impl fmt::Debug for IncomingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncomingFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .finish_non_exhaustive()
    }
}

/// Relation between an uploaded file and an owning record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedRef {
    /// Owning record id
    pub ref_id: String,
    /// Owning model name
    #[serde(rename = "ref")]
    pub reference: String,
    /// Plugin owning the model, if any
    #[serde(default)]
    pub source: Option<String>,
    /// Attribute on the owning model
    pub field: String,
}

/// Optional relational and destination data sent with an upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMeta {
    #[serde(default)]
    pub ref_id: Option<String>,
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl UploadMeta {
    /// The relation to attach, present only when ref id, model and field are all set
    pub fn relation(&self) -> Option<RelatedRef> {
        match (
            non_empty(&self.ref_id),
            non_empty(&self.reference),
            non_empty(&self.field),
        ) {
            (Some(ref_id), Some(reference), Some(field)) => Some(RelatedRef {
                ref_id: ref_id.to_string(),
                reference: reference.to_string(),
                source: self.source.clone(),
                field: field.to_string(),
            }),
            _ => None,
        }
    }

    /// Destination folder, if one was given
    pub fn destination(&self) -> Option<&str> {
        non_empty(&self.path)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// A buffered file ready for policy checks and persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    /// Storage key, unique per upload
    pub hash: String,
    /// Hex SHA-256 of the content
    pub sha256: String,
    /// Extension including the dot, or empty
    pub ext: String,
    pub mime: String,
    /// Size in bytes
    pub size: u64,
    pub content: Vec<u8>,
    pub related: Vec<RelatedRef>,
    pub path: Option<String>,
}

/// A persisted file record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: Uuid,
    pub name: String,
    pub hash: String,
    pub sha256: String,
    pub ext: String,
    pub mime: String,
    pub size: u64,
    /// Relative (`/uploads/...`) or absolute url
    pub url: String,
    pub provider: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub related: Vec<RelatedRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Build a record for a stored upload
    pub fn from_upload(file: &UploadFile, url: String, provider: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: file.name.clone(),
            hash: file.hash.clone(),
            sha256: file.sha256.clone(),
            ext: file.ext.clone(),
            mime: file.mime.clone(),
            size: file.size,
            url,
            provider: provider.to_string(),
            path: file.path.clone(),
            related: file.related.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}
