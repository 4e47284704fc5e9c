//! Upload Policy Tests
//!
//! Admission policy enforced before storage:
//! - Disabled uploads never reach buffering or storage
//! - Empty batches never reach storage
//! - One oversized file rejects the whole batch
//! - The related tuple is attached only when complete
//! - Relative urls are prefixed with the public host

use aerocms::upload::{
    Bufferizer, FileQuery, FileRecord, IncomingFile, LocalBackend, LocalProvider, MemoryBufferizer,
    MemoryConfigStore, ServiceSettings, UploadConfig, UploadError, UploadFile, UploadMeta,
    UploadPolicyGate, UploadProvider, UploadResult, UploadService,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

// =============================================================================
// Helper Types
// =============================================================================

/// Storage fake counting every call and recording uploaded batches
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
    records: std::sync::Mutex<Vec<FileRecord>>,
}

impl CountingProvider {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UploadProvider for CountingProvider {
    fn upload(&self, files: Vec<UploadFile>, config: &UploadConfig) -> UploadResult<Vec<FileRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let records: Vec<FileRecord> = files
            .iter()
            .map(|f| FileRecord::from_upload(f, format!("/uploads/{}{}", f.hash, f.ext), &config.provider))
            .collect();
        self.records.lock().unwrap().extend(records.iter().cloned());
        Ok(records)
    }

    fn fetch(&self, query: &FileQuery) -> UploadResult<Option<FileRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().unwrap().iter().find(|r| query.matches(r)).cloned())
    }

    fn fetch_all(&self, query: &FileQuery) -> UploadResult<Vec<FileRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().unwrap().iter().filter(|r| query.matches(r)).cloned().collect())
    }

    fn count(&self, query: &FileQuery) -> UploadResult<usize> {
        Ok(self.fetch_all(query)?.len())
    }

    fn remove(&self, record: &FileRecord, _config: &UploadConfig) -> UploadResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().retain(|r| r.id != record.id);
        Ok(())
    }

    fn search(&self, _term: &str) -> UploadResult<Vec<FileRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

/// Bufferizer fake counting calls
#[derive(Default)]
struct CountingBufferizer {
    calls: AtomicUsize,
    inner: MemoryBufferizer,
}

impl Bufferizer for CountingBufferizer {
    fn bufferize(&self, files: Vec<IncomingFile>) -> UploadResult<Vec<UploadFile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.bufferize(files)
    }
}

fn settings(public_url: &str) -> ServiceSettings {
    ServiceSettings {
        environment: "development".into(),
        environments: vec!["development".into()],
        public_url: public_url.into(),
        providers: vec!["local".into()],
    }
}

fn setup(public_url: &str) -> (Arc<CountingProvider>, Arc<CountingBufferizer>, UploadService) {
    let provider = Arc::new(CountingProvider::default());
    let bufferizer = Arc::new(CountingBufferizer::default());
    let service = UploadService::new(
        Arc::new(MemoryConfigStore::new()),
        bufferizer.clone(),
        provider.clone(),
        settings(public_url),
    );
    (provider, bufferizer, service)
}

fn file(name: &str, size: usize) -> IncomingFile {
    IncomingFile::from_bytes(name, Some("application/octet-stream".into()), vec![b'x'; size])
}

fn related_meta() -> UploadMeta {
    UploadMeta {
        ref_id: Some("42".into()),
        reference: Some("article".into()),
        source: Some("content-manager".into()),
        field: Some("cover".into()),
        path: None,
    }
}

// =============================================================================
// Policy
// =============================================================================

/// Disabled uploads are rejected before buffering and storage.
#[test]
fn test_disabled_upload_touches_nothing() {
    let (provider, bufferizer, service) = setup("http://localhost:1337");
    service
        .update_settings("development", json!({ "enabled": false }))
        .unwrap();

    let result = service.upload(vec![file("a.txt", 3)], &UploadMeta::default());

    assert_eq!(result.unwrap_err(), UploadError::UploadDisabled);
    assert_eq!(bufferizer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(provider.calls(), 0);
}

/// Empty batches are rejected before storage.
#[test]
fn test_empty_batch_rejected() {
    let (provider, bufferizer, service) = setup("http://localhost:1337");

    let result = service.upload(Vec::new(), &UploadMeta::default());

    assert_eq!(result.unwrap_err(), UploadError::EmptyUpload);
    assert_eq!(bufferizer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(provider.calls(), 0);
}

/// One oversized file rejects the whole batch, naming that file.
#[test]
fn test_oversized_file_rejects_batch() {
    let (provider, _bufferizer, service) = setup("http://localhost:1337");
    service
        .update_settings("development", json!({ "sizeLimit": 10 }))
        .unwrap();

    let result = service.upload(
        vec![file("small.txt", 5), file("big.bin", 11), file("other.txt", 1)],
        &UploadMeta::default(),
    );

    match result {
        Err(UploadError::FileTooLarge { name, size, limit }) => {
            assert_eq!(name, "big.bin");
            assert_eq!(size, 11);
            assert_eq!(limit, 10);
        }
        other => panic!("expected FileTooLarge, got {:?}", other),
    }
    assert_eq!(provider.calls(), 0);
    assert_eq!(service.count(&FileQuery::default()).unwrap(), 0);
}

/// The size limit is inclusive.
#[test]
fn test_file_at_limit_accepted() {
    let (provider, _bufferizer, service) = setup("http://localhost:1337");
    service
        .update_settings("development", json!({ "sizeLimit": 10 }))
        .unwrap();

    let uploaded = service.upload(vec![file("edge.bin", 10)], &UploadMeta::default()).unwrap();

    assert_eq!(uploaded.len(), 1);
    assert_eq!(uploaded[0].size, 10);
    assert_eq!(provider.calls(), 1);
}

/// Admission is deterministic: the same batch and config give the same outcome.
#[test]
fn test_gate_is_deterministic() {
    let bufferizer = MemoryBufferizer::new();
    let gate = UploadPolicyGate::new(&bufferizer);
    let config = UploadConfig {
        size_limit: 4,
        ..UploadConfig::default()
    };

    for _ in 0..20 {
        let err = gate
            .admit(vec![file("a", 2), file("b", 5)], &UploadMeta::default(), &config)
            .unwrap_err();
        assert!(matches!(err, UploadError::FileTooLarge { ref name, .. } if name == "b"));
    }
}

// =============================================================================
// Annotation
// =============================================================================

/// A complete related tuple links every file in the batch.
#[test]
fn test_related_tuple_attached() {
    let bufferizer = MemoryBufferizer::new();
    let gate = UploadPolicyGate::new(&bufferizer);

    let admitted = gate
        .admit(vec![file("a", 1), file("b", 1)], &related_meta(), &UploadConfig::default())
        .unwrap();

    for f in &admitted {
        assert_eq!(f.related.len(), 1);
        assert_eq!(f.related[0].ref_id, "42");
        assert_eq!(f.related[0].reference, "article");
        assert_eq!(f.related[0].source.as_deref(), Some("content-manager"));
        assert_eq!(f.related[0].field, "cover");
    }
}

/// An incomplete tuple attaches nothing.
#[test]
fn test_incomplete_tuple_ignored() {
    let bufferizer = MemoryBufferizer::new();
    let gate = UploadPolicyGate::new(&bufferizer);
    let meta = UploadMeta {
        field: None,
        ..related_meta()
    };

    let admitted = gate.admit(vec![file("a", 1)], &meta, &UploadConfig::default()).unwrap();
    assert!(admitted[0].related.is_empty());
}

/// Responses flatten relations and prefix relative urls.
#[test]
fn test_response_shaping() {
    let (_provider, _bufferizer, service) = setup("https://cdn.example.com/");

    let uploaded = service.upload(vec![file("a.png", 2)], &related_meta()).unwrap();

    assert_eq!(uploaded[0].related, vec!["42".to_string()]);
    assert!(uploaded[0].url.starts_with("https://cdn.example.com/uploads/"));
    assert!(!uploaded[0].url.contains("com//"));
}

/// The local provider stores bytes under the destination folder.
#[test]
fn test_local_provider_path() {
    let temp = TempDir::new().unwrap();
    let provider = Arc::new(LocalProvider::new(LocalBackend::new(temp.path().to_path_buf())));
    let service = UploadService::new(
        Arc::new(MemoryConfigStore::new()),
        Arc::new(MemoryBufferizer::new()),
        provider.clone(),
        settings("http://localhost:1337"),
    );
    let meta = UploadMeta {
        path: Some("avatars".into()),
        ..UploadMeta::default()
    };

    let uploaded = service.upload(vec![file("me.png", 4)], &meta).unwrap();

    assert_eq!(uploaded[0].path.as_deref(), Some("avatars"));
    assert!(uploaded[0].url.contains("/uploads/avatars/"));
    let stored = temp.path().join("avatars").join(format!("{}.png", uploaded[0].hash));
    assert_eq!(std::fs::read(stored).unwrap(), b"xxxx");
}

/// A batch whose index write fails is neither listed nor left on disk.
#[test]
fn test_failed_index_write_is_not_visible() {
    let temp = TempDir::new().unwrap();
    let service = UploadService::new(
        Arc::new(MemoryConfigStore::new()),
        Arc::new(MemoryBufferizer::new()),
        Arc::new(LocalProvider::open(temp.path()).unwrap()),
        settings("http://localhost:1337"),
    );
    std::fs::create_dir(temp.path().join("files.json.tmp")).unwrap();

    let result = service.upload(vec![file("a.txt", 3)], &UploadMeta::default());

    assert!(matches!(result, Err(UploadError::Io(_))));
    assert_eq!(service.count(&FileQuery::default()).unwrap(), 0);
    let uploads = temp.path().join("uploads");
    let left = std::fs::read_dir(&uploads).map(|d| d.count()).unwrap_or(0);
    assert_eq!(left, 0);
}
