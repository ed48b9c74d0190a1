//! Picker contract
//!
//! The picker collaborator yields either a cancellation (`None`) or exactly
//! one [`FileDescriptor`]. Only single selection is supported.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use dropkit_core::FileDescriptor;

use crate::loader::ReadError;

/// Source of file selections.
#[async_trait]
pub trait FilePicker: Send + Sync {
    /// `Ok(None)` means the user cancelled the selection.
    async fn pick(&self) -> Result<Option<FileDescriptor>, ReadError>;
}

/// Picker over a known filesystem path, used by the CLI.
///
/// MIME type is guessed from the extension; size comes from file metadata and
/// is left absent when the file cannot be stat'ed (the validator then cannot
/// reject on size, and the loader surfaces the real read failure later).
#[derive(Debug, Clone)]
pub struct PathPicker {
    path: PathBuf,
}

impl PathPicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FilePicker for PathPicker {
    async fn pick(&self) -> Result<Option<FileDescriptor>, ReadError> {
        let size_bytes = tokio::fs::metadata(&self.path).await.ok().map(|m| m.len());

        let display_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned());

        Ok(Some(FileDescriptor::new(
            self.path.to_string_lossy().into_owned(),
            mime_type_for_path(&self.path).map(String::from),
            size_bytes,
            display_name,
        )))
    }
}

/// Guess a MIME type from a path's extension.
fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}
