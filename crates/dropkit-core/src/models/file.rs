//! Locally selected file model

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A file the user selected locally, as reported by the picker collaborator.
///
/// Read-only after creation: a new selection produces a fresh descriptor and
/// discards interest in the previous one. Nothing here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Opaque local-storage locator (filesystem path or `data:` URI).
    pub uri: String,
    /// Declared MIME type, if the picker knows it.
    pub mime_type: Option<String>,
    /// Declared size in bytes. Pickers on some platforms cannot stat the
    /// selection, so this may be absent.
    pub size_bytes: Option<u64>,
    /// Human-readable name for display and logging.
    pub display_name: String,
}

impl FileDescriptor {
    pub fn new(
        uri: impl Into<String>,
        mime_type: Option<String>,
        size_bytes: Option<u64>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            mime_type,
            size_bytes,
            display_name: display_name.into(),
        }
    }
}

/// Record view of a validation decision. Derived per selection, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub reason: Option<String>,
}

impl From<Result<(), ValidationError>> for ValidationOutcome {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => ValidationOutcome {
                is_valid: true,
                reason: None,
            },
            Err(e) => ValidationOutcome {
                is_valid: false,
                reason: Some(e.to_string()),
            },
        }
    }
}
