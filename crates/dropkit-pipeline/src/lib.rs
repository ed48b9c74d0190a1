//! Dropkit Upload Pipeline
//!
//! Orchestrates one upload attempt end to end: pick → validate → read →
//! store → resolve public URL. Each attempt runs as a single sequential async
//! chain with no retries; every failure is terminal for that attempt and a
//! fresh selection is the only recovery path.
//!
//! Observable state is published through a `tokio::sync::watch` channel as
//! [`PipelineSnapshot`] values. Attempts are tagged with a monotonic id and
//! only the latest attempt updates the snapshot, so an overlapping stale
//! attempt can still complete but its result is ignored (explicit
//! last-writer-wins).

pub mod loader;
pub mod outcome;
pub mod picker;
pub mod pipeline;
pub mod state;

// Re-export commonly used types
pub use loader::{ByteLoader, FsByteLoader, ReadError};
pub use outcome::{UploadError, UploadOutcome};
pub use picker::{FilePicker, PathPicker};
pub use pipeline::UploadPipeline;
pub use state::{Phase, PipelineSnapshot};
