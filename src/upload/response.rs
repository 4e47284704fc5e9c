//! # Response Shaping
//!
//! Pure post-processing of persisted records for callers. Nothing here is
//! written back to storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::file::FileRecord;

/// File record as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: Uuid,
    pub name: String,
    pub hash: String,
    pub sha256: String,
    pub ext: String,
    pub mime: String,
    pub size: u64,
    /// Always absolute
    pub url: String,
    pub provider: String,
    pub path: Option<String>,
    /// Bare ids of the owning records
    pub related: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileResponse {
    /// Shape a record: absolute url, relations flattened to owning record ids
    pub fn from_record(record: FileRecord, public_url: &str) -> Self {
        Self {
            url: absolutize_url(&record.url, public_url),
            related: record.related.into_iter().map(|r| r.ref_id).collect(),
            id: record.id,
            name: record.name,
            hash: record.hash,
            sha256: record.sha256,
            ext: record.ext,
            mime: record.mime,
            size: record.size,
            provider: record.provider,
            path: record.path,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Prefixes a server-relative url (`/...`) with the public host.
///
/// Absolute urls are returned unchanged. A trailing `/` on the host is not doubled.
pub fn absolutize_url(url: &str, public_url: &str) -> String {
    if url.starts_with('/') {
        format!("{}{}", public_url.trim_end_matches('/'), url)
    } else {
        url.to_string()
    }
}
