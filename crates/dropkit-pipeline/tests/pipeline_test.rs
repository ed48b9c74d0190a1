//! End-to-end pipeline tests: filesystem-backed success path, injected
//! storage failures, and the attempt-id guard for overlapping runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Notify;
use uuid::Uuid;

use dropkit_core::{FileDescriptor, FileValidator};
use dropkit_pipeline::{FilePicker, FsByteLoader, PathPicker, Phase, UploadPipeline};
use dropkit_storage::{LocalStorage, Storage, StorageBackend, StorageError, StorageResult};

/// Storage double with injectable store/resolve failures and an optional gate
/// that holds the first store call open until released.
#[derive(Default)]
struct MockStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    store_calls: AtomicUsize,
    fail_store_with: Option<String>,
    resolve_none: bool,
    gate_first_store: Option<Arc<Notify>>,
}

#[async_trait]
impl Storage for MockStorage {
    async fn store(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
        overwrite: bool,
    ) -> StorageResult<()> {
        let call = self.store_calls.fetch_add(1, Ordering::SeqCst);

        if call == 0 {
            if let Some(ref gate) = self.gate_first_store {
                gate.notified().await;
            }
        }

        if let Some(ref message) = self.fail_store_with {
            return Err(StorageError::Backend(message.clone()));
        }

        let mut objects = self.objects.lock().unwrap();
        if !overwrite && objects.contains_key(key) {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }
        objects.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn public_url(&self, key: &str) -> StorageResult<Option<String>> {
        if self.resolve_none {
            return Ok(None);
        }
        let objects = self.objects.lock().unwrap();
        Ok(objects.get(key).map(|_| format!("http://mock/{}", key)))
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        let objects = self.objects.lock().unwrap();
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

fn pipeline_with(storage: Arc<dyn Storage>) -> UploadPipeline {
    UploadPipeline::new(storage, Arc::new(FsByteLoader), FileValidator::default())
}

fn descriptor(uri: &str, mime_type: &str, size_bytes: Option<u64>) -> FileDescriptor {
    FileDescriptor::new(uri, Some(mime_type.to_string()), size_bytes, "selection")
}

#[tokio::test]
async fn valid_png_reaches_succeeded_with_uuid_key() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("objects");
    let storage = Arc::new(
        LocalStorage::new(&data_dir, "http://localhost:3000/files".to_string())
            .await
            .unwrap(),
    );

    let file_path = dir.path().join("photo.png");
    let content = vec![0xAB_u8; 1024];
    std::fs::write(&file_path, &content).unwrap();

    let picked = PathPicker::new(&file_path).pick().await.unwrap().unwrap();
    assert_eq!(picked.size_bytes, Some(1024));

    let pipeline = pipeline_with(storage.clone());
    let outcome = pipeline.run(&picked).await;

    match &outcome {
        dropkit_pipeline::UploadOutcome::Succeeded {
            public_url,
            mime_type,
        } => {
            assert_eq!(mime_type, "image/png");

            // Key embedded in the URL matches uploads/<uuid>.png.
            let key = public_url
                .strip_prefix("http://localhost:3000/files/")
                .unwrap();
            let stem = key
                .strip_prefix("uploads/")
                .unwrap()
                .strip_suffix(".png")
                .unwrap();
            Uuid::parse_str(stem).unwrap();

            // Stored object is byte-for-byte the original file.
            assert_eq!(storage.download(key).await.unwrap(), content);
        }
        other => panic!("expected success, got {:?}", other),
    }

    let snapshot = pipeline.snapshot();
    assert_eq!(snapshot.attempt, 1);
    assert_eq!(snapshot.phase, Phase::Succeeded);
    assert_eq!(snapshot.progress, 1.0);
    assert_eq!(snapshot.outcome.as_ref(), Some(&outcome));
}

#[tokio::test]
async fn configured_bucket_prefixes_generated_keys() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("photo.png");
    std::fs::write(&file_path, b"png body").unwrap();

    let storage = Arc::new(MockStorage::default());
    let pipeline = UploadPipeline::with_bucket(
        storage.clone(),
        Arc::new(FsByteLoader),
        FileValidator::default(),
        "attachments",
    );

    let outcome = pipeline
        .run(&descriptor(file_path.to_str().unwrap(), "image/png", None))
        .await;

    match outcome {
        dropkit_pipeline::UploadOutcome::Succeeded { public_url, .. } => {
            assert!(
                public_url.starts_with("http://mock/attachments/"),
                "got: {public_url}"
            );
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn unsupported_type_fails_before_any_io() {
    let storage = Arc::new(MockStorage::default());
    let pipeline = pipeline_with(storage.clone());

    let outcome = pipeline
        .run(&descriptor("/nonexistent/notes.txt", "text/plain", Some(10)))
        .await;

    assert_eq!(outcome.message(), Some("unsupported type"));
    assert_eq!(storage.store_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn oversized_file_fails_before_any_io() {
    let storage = Arc::new(MockStorage::default());
    let pipeline = pipeline_with(storage.clone());

    let outcome = pipeline
        .run(&descriptor(
            "/nonexistent/big.png",
            "image/png",
            Some(6 * 1024 * 1024),
        ))
        .await;

    assert_eq!(outcome.message(), Some("exceeds size limit"));
    assert_eq!(storage.store_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreadable_file_surfaces_a_wrapped_read_error() {
    let storage = Arc::new(MockStorage::default());
    let pipeline = pipeline_with(storage.clone());

    let outcome = pipeline
        .run(&descriptor("/nonexistent/photo.png", "image/png", None))
        .await;

    let message = outcome.message().unwrap();
    assert!(message.starts_with("Upload failed: "), "got: {message}");
    assert_eq!(storage.store_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn store_failure_surfaces_the_underlying_message() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("photo.png");
    std::fs::write(&file_path, b"png body").unwrap();

    let storage = Arc::new(MockStorage {
        fail_store_with: Some("network error".to_string()),
        ..MockStorage::default()
    });
    let pipeline = pipeline_with(storage);

    let outcome = pipeline
        .run(&descriptor(file_path.to_str().unwrap(), "image/png", None))
        .await;

    assert_eq!(outcome.message(), Some("Upload failed: network error"));
    assert_eq!(pipeline.snapshot().phase, Phase::Failed);
}

#[tokio::test]
async fn unresolvable_public_url_uses_the_fixed_message() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("doc.pdf");
    std::fs::write(&file_path, b"%PDF-1.4").unwrap();

    let storage = Arc::new(MockStorage {
        resolve_none: true,
        ..MockStorage::default()
    });
    let pipeline = pipeline_with(storage.clone());

    let outcome = pipeline
        .run(&descriptor(
            file_path.to_str().unwrap(),
            "application/pdf",
            None,
        ))
        .await;

    assert_eq!(
        outcome.message(),
        Some("Could not get public URL for the uploaded file.")
    );
    // The object was stored; the orphan is accepted, not reconciled.
    assert_eq!(storage.store_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stale_attempt_never_overwrites_a_newer_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("photo.png");
    std::fs::write(&file_path, b"png body").unwrap();

    let gate = Arc::new(Notify::new());
    let storage = Arc::new(MockStorage {
        gate_first_store: Some(gate.clone()),
        ..MockStorage::default()
    });
    let pipeline = Arc::new(pipeline_with(storage));
    let first = descriptor(file_path.to_str().unwrap(), "image/png", None);

    let stale = {
        let pipeline = pipeline.clone();
        let first = first.clone();
        tokio::spawn(async move { pipeline.run(&first).await })
    };

    // Let the first attempt park inside store, then start a second attempt.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let second_outcome = pipeline.run(&first).await;
    assert!(second_outcome.is_success());
    assert_eq!(pipeline.snapshot().attempt, 2);

    // Release the stale attempt; it completes but must not touch the snapshot.
    gate.notify_one();
    let stale_outcome = stale.await.unwrap();
    assert!(stale_outcome.is_success());

    let snapshot = pipeline.snapshot();
    assert_eq!(snapshot.attempt, 2);
    assert_eq!(snapshot.outcome.as_ref(), Some(&second_outcome));
}
