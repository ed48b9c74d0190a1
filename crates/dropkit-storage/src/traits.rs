//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement. The upload pipeline works against this trait without coupling
//! to backend details.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::StorageBackend;

/// Storage operation errors.
///
/// Variants carry the underlying cause without a "Upload failed" style prefix;
/// the pipeline formats the user-facing message once at its own boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0}")]
    Backend(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("object already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
///
/// **Key format:** `uploads/{uuid}.{ext}`, generated per upload. See the
/// crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key` with the given content type.
    ///
    /// With `overwrite == false` (the normal case), a key that already holds
    /// an object fails with [`StorageError::AlreadyExists`] instead of being
    /// silently replaced.
    async fn store(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        overwrite: bool,
    ) -> StorageResult<()>;

    /// Public retrieval URL for a stored object.
    ///
    /// Returns `Ok(None)` when the object is not publicly resolvable; the
    /// pipeline treats that as a failed attempt.
    async fn public_url(&self, key: &str) -> StorageResult<Option<String>>;

    /// Download an object by its storage key.
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Delete an object by its storage key. Deleting a missing key is not an
    /// error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Validate storage key syntax shared by all backends.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_syntax_rules() {
        assert!(validate_key("uploads/a.png").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/uploads/a.png").is_err());
        assert!(validate_key("uploads/../etc/passwd").is_err());
    }
}
