//! Error types module
//!
//! Validation errors carry structured fields; the Display text is the exact
//! rejection reason the pipeline surfaces to callers verbatim. Richer
//! presentation (which types are allowed, the configured ceiling) belongs at
//! the presentation boundary, which can read the fields.

/// Rejection produced by the file validator. Never involves I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The descriptor's MIME type is absent or outside the allowed set.
    #[error("unsupported type")]
    UnsupportedType { mime_type: Option<String> },

    /// The descriptor reports a size above the configured ceiling.
    #[error("exceeds size limit")]
    SizeExceeded { size_bytes: u64, max_bytes: u64 },
}
