//! Upload attempt outcome
//!
//! [`UploadError`] is the structured taxonomy of everything that can end an
//! attempt; [`UploadOutcome`] is the record the presentation layer consumes,
//! with the human-readable message formatted exactly once at the conversion
//! boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dropkit_core::ValidationError;
use dropkit_storage::StorageError;

use crate::loader::ReadError;

/// Everything that can terminate an upload attempt.
///
/// The Display text is the user-facing message: validation reasons are
/// surfaced verbatim, read/store failures are wrapped as "Upload failed: …",
/// and a missing public URL has a fixed message.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Upload failed: {0}")]
    Read(#[from] ReadError),

    #[error("Upload failed: {0}")]
    Store(#[from] StorageError),

    #[error("Could not get public URL for the uploaded file.")]
    Resolve,
}

/// Result of one upload attempt. Superseded by the next attempt's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    Succeeded {
        public_url: String,
        mime_type: String,
    },
    Failed {
        message: String,
    },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Succeeded { .. })
    }

    /// Human-readable failure message, if the attempt failed.
    pub fn message(&self) -> Option<&str> {
        match self {
            UploadOutcome::Succeeded { .. } => None,
            UploadOutcome::Failed { message } => Some(message),
        }
    }
}

impl From<UploadError> for UploadOutcome {
    fn from(error: UploadError) -> Self {
        UploadOutcome::Failed {
            message: error.to_string(),
        }
    }
}
