//! File validation
//!
//! Pure, deterministic gate applied before any I/O: a descriptor is rejected
//! when its MIME type is outside the allowed set, or when its declared size
//! exceeds the configured ceiling. A descriptor with no declared size cannot
//! be rejected on the size dimension.

use crate::config::Config;
use crate::constants::{DEFAULT_ALLOWED_CONTENT_TYPES, DEFAULT_MAX_FILE_SIZE_BYTES};
use crate::error::ValidationError;
use crate::models::{FileDescriptor, ValidationOutcome};

/// Normalize a MIME type by stripping parameters and case
/// (e.g. "image/JPEG; charset=utf-8" -> "image/jpeg").
pub(crate) fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// Validator for selected files.
#[derive(Debug, Clone)]
pub struct FileValidator {
    allowed_content_types: Vec<String>,
    max_size_bytes: u64,
}

impl FileValidator {
    pub fn new(allowed_content_types: Vec<String>, max_size_bytes: u64) -> Self {
        let allowed_content_types = allowed_content_types
            .iter()
            .map(|ct| normalize_mime_type(ct))
            .collect();
        Self {
            allowed_content_types,
            max_size_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.allowed_content_types().to_vec(),
            config.max_file_size_bytes(),
        )
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Validate a descriptor against the allowed types and the size ceiling.
    ///
    /// Type is checked first: an unsupported type is reported regardless of
    /// size. A missing size never rejects.
    pub fn validate(&self, descriptor: &FileDescriptor) -> Result<(), ValidationError> {
        let normalized = descriptor.mime_type.as_deref().map(normalize_mime_type);
        let allowed = normalized
            .as_deref()
            .is_some_and(|mime| self.allowed_content_types.iter().any(|ct| ct == mime));
        if !allowed {
            return Err(ValidationError::UnsupportedType {
                mime_type: descriptor.mime_type.clone(),
            });
        }

        if let Some(size_bytes) = descriptor.size_bytes {
            if size_bytes > self.max_size_bytes {
                return Err(ValidationError::SizeExceeded {
                    size_bytes,
                    max_bytes: self.max_size_bytes,
                });
            }
        }

        Ok(())
    }

    /// Record-shaped view of the decision.
    pub fn outcome(&self, descriptor: &FileDescriptor) -> ValidationOutcome {
        self.validate(descriptor).into()
    }
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(
            DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            DEFAULT_MAX_FILE_SIZE_BYTES,
        )
    }
}
