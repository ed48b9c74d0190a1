//! Dropkit Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared across all Dropkit components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod preview;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::ValidationError;
pub use models::{FileDescriptor, ValidationOutcome};
pub use preview::{resolve_preview, PreviewSpec};
pub use storage_types::StorageBackend;
pub use validation::FileValidator;
