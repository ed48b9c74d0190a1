//! Shared constants

/// Key prefix (and default bucket name) for uploaded objects.
pub const UPLOAD_PREFIX: &str = "uploads";

/// Default ceiling for accepted file sizes: 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Content types accepted by default.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] =
    &["image/png", "image/jpeg", "application/pdf"];

/// Extension used when a MIME type carries no usable subtype.
pub const FALLBACK_EXTENSION: &str = "bin";
