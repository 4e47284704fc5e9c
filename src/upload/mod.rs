//! # Upload Ingestion
//!
//! Accepts file batches, enforces admission policy, and persists them
//! through a pluggable provider, linking uploads to owning records.
//!
//! Collaborators are traits injected into `UploadService`:
//! - `ConfigStore` for provider settings
//! - `Bufferizer` for stream materialization
//! - `UploadProvider` for persistence and lookup

pub mod errors;
pub mod backend;
pub mod buffer;
pub mod config;
pub mod file;
pub mod gate;
pub mod local;
pub mod provider;
pub mod response;
pub mod service;
pub mod store;

pub use errors::{UploadError, UploadResult};
pub use backend::StorageBackend;
pub use buffer::{Bufferizer, MemoryBufferizer};
pub use config::UploadConfig;
pub use file::{FileRecord, IncomingFile, RelatedRef, UploadFile, UploadMeta};
pub use gate::UploadPolicyGate;
pub use local::LocalBackend;
pub use provider::{FileQuery, LocalProvider, UploadProvider};
pub use response::{absolutize_url, FileResponse};
pub use service::{EnvironmentInfo, ServiceSettings, SettingsResponse, UploadService};
pub use store::{ConfigStore, JsonFileConfigStore, MemoryConfigStore, StoreScope};
