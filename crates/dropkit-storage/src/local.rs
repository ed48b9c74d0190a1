use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::traits::{validate_key, Storage, StorageError, StorageResult};
use crate::StorageBackend;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object storage (e.g., "/var/lib/dropkit/uploads")
    /// * `base_url` - Base URL for serving objects (e.g., "http://localhost:3000/uploads")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::Config(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path.
    ///
    /// Key syntax validation rejects `..` and absolute keys, so the joined
    /// path cannot escape the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(key))
    }

    /// Generate public URL for an object
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        overwrite: bool,
    ) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let open_result = if overwrite {
            fs::File::create(&path).await
        } else {
            fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
        };

        let mut file = open_result.map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                StorageError::AlreadyExists(key.to_string())
            } else {
                StorageError::Backend(format!("failed to create file {}: {}", path.display(), e))
            }
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::Backend(format!("failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::Backend(format!("failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage store successful"
        );

        Ok(())
    }

    async fn public_url(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_to_path(key)?;
        // An object that is not on disk is not publicly resolvable.
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }
        Ok(Some(self.generate_url(key)))
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::Backend(format!("failed to read file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage download successful"
        );

        Ok(data)
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::Backend(format!("failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), key = %key, "Local storage delete successful");

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(dir.path(), "http://localhost:3000/uploads".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn store_then_download_round_trips() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        let data = Bytes::from_static(b"\x89PNG\r\n\x1a\nbinary body");
        storage
            .store("uploads/a.png", data.clone(), "image/png", false)
            .await
            .unwrap();

        let downloaded = storage.download("uploads/a.png").await.unwrap();
        assert_eq!(downloaded, data.to_vec());
    }

    #[tokio::test]
    async fn store_refuses_to_overwrite_existing_key() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        storage
            .store("uploads/a.png", Bytes::from_static(b"one"), "image/png", false)
            .await
            .unwrap();

        let result = storage
            .store("uploads/a.png", Bytes::from_static(b"two"), "image/png", false)
            .await;
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));

        // Original content is untouched.
        assert_eq!(storage.download("uploads/a.png").await.unwrap(), b"one");
    }

    #[tokio::test]
    async fn store_overwrites_when_asked() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        storage
            .store("uploads/a.png", Bytes::from_static(b"one"), "image/png", false)
            .await
            .unwrap();
        storage
            .store("uploads/a.png", Bytes::from_static(b"two"), "image/png", true)
            .await
            .unwrap();

        assert_eq!(storage.download("uploads/a.png").await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        let result = storage.download("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn public_url_resolves_only_existing_objects() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        assert_eq!(storage.public_url("uploads/missing.png").await.unwrap(), None);

        storage
            .store("uploads/a.png", Bytes::from_static(b"body"), "image/png", false)
            .await
            .unwrap();

        assert_eq!(
            storage.public_url("uploads/a.png").await.unwrap().as_deref(),
            Some("http://localhost:3000/uploads/uploads/a.png")
        );
    }

    #[tokio::test]
    async fn delete_nonexistent_is_ok() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        storage.delete("uploads/nothing.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn exists_reflects_store_and_delete() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        assert!(!storage.exists("uploads/a.pdf").await.unwrap());
        storage
            .store(
                "uploads/a.pdf",
                Bytes::from_static(b"%PDF-1.4"),
                "application/pdf",
                false,
            )
            .await
            .unwrap();
        assert!(storage.exists("uploads/a.pdf").await.unwrap());

        storage.delete("uploads/a.pdf").await.unwrap();
        assert!(!storage.exists("uploads/a.pdf").await.unwrap());
    }
}
