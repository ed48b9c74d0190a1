//! Dropkit Storage Library
//!
//! This crate provides the storage abstraction the upload pipeline stores
//! objects through, with implementations for local filesystem and
//! S3-compatible backends.
//!
//! # Storage key format
//!
//! Every upload gets a freshly generated key: `uploads/{uuid}.{ext}`, where
//! `ext` is derived from the file's MIME subtype (`bin` when absent). Keys are
//! globally unique per upload and never overwritten; backends fail with
//! [`StorageError::AlreadyExists`] on a collision unless overwrite is
//! explicitly requested. Keys must not contain `..` or a leading `/`. Key
//! generation is centralized in the `keys` module so all backends stay
//! consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use dropkit_core::StorageBackend;
pub use factory::create_storage;
pub use keys::UploadTarget;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
