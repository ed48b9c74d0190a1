//! Storage key generation
//!
//! Key format: `uploads/{uuid}.{ext}`. Centralized here so every backend and
//! the pipeline agree on the layout.

use uuid::Uuid;

use dropkit_core::constants::{FALLBACK_EXTENSION, UPLOAD_PREFIX};

/// Destination for one upload: a freshly generated, globally unique key plus
/// the content type the object will be stored with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub storage_key: String,
    pub content_type: String,
}

impl UploadTarget {
    /// Generate a target in the default `uploads` bucket.
    pub fn for_mime_type(mime_type: Option<&str>) -> Self {
        Self::in_bucket(UPLOAD_PREFIX, mime_type)
    }

    /// Generate a target for a file with the given MIME type, keyed under
    /// `bucket`.
    ///
    /// The extension is the MIME subtype (`image/png` -> `png`), falling back
    /// to `bin` when the type is absent or has no subtype.
    pub fn in_bucket(bucket: &str, mime_type: Option<&str>) -> Self {
        let content_type = mime_type.unwrap_or("application/octet-stream").to_string();
        let extension = extension_for_mime(mime_type);
        let storage_key = format!("{}/{}.{}", bucket, Uuid::new_v4(), extension);
        UploadTarget {
            storage_key,
            content_type,
        }
    }
}

/// Extension derived from a MIME type's subtype, `bin` when unusable.
fn extension_for_mime(mime_type: Option<&str>) -> String {
    mime_type
        .and_then(|mime| mime.split(';').next())
        .and_then(|mime| mime.trim().split('/').nth(1))
        .map(|sub| sub.trim().to_lowercase())
        .filter(|sub| !sub.is_empty())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}
