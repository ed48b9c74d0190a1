//! Upload orchestration
//!
//! One state machine per invocation:
//! `Idle → Validating → Loading → Uploading → Resolving → {Succeeded | Failed}`.
//!
//! No retries anywhere in this machine. Mid-attempt cancellation is not
//! supported; a stale attempt runs to completion but an attempt-id guard
//! keeps it from touching the published snapshot once a newer attempt has
//! started.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use dropkit_core::constants::UPLOAD_PREFIX;
use dropkit_core::{FileDescriptor, FileValidator};
use dropkit_storage::{Storage, UploadTarget};

use crate::loader::ByteLoader;
use crate::outcome::{UploadError, UploadOutcome};
use crate::state::{Phase, PipelineSnapshot};

/// Sequences one file selection through validation, byte loading, storage,
/// and public-URL resolution.
pub struct UploadPipeline {
    storage: Arc<dyn Storage>,
    loader: Arc<dyn ByteLoader>,
    validator: FileValidator,
    bucket: String,
    attempts: AtomicU64,
    state: watch::Sender<PipelineSnapshot>,
}

impl UploadPipeline {
    /// Pipeline keyed under the default `uploads` bucket.
    pub fn new(
        storage: Arc<dyn Storage>,
        loader: Arc<dyn ByteLoader>,
        validator: FileValidator,
    ) -> Self {
        Self::with_bucket(storage, loader, validator, UPLOAD_PREFIX)
    }

    /// Pipeline whose generated keys live under `bucket`.
    pub fn with_bucket(
        storage: Arc<dyn Storage>,
        loader: Arc<dyn ByteLoader>,
        validator: FileValidator,
        bucket: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(PipelineSnapshot::idle());
        Self {
            storage,
            loader,
            validator,
            bucket: bucket.into(),
            attempts: AtomicU64::new(0),
            state,
        }
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<PipelineSnapshot> {
        self.state.subscribe()
    }

    /// Current snapshot of the latest attempt.
    pub fn snapshot(&self) -> PipelineSnapshot {
        self.state.borrow().clone()
    }

    /// Run one upload attempt for a selected file.
    ///
    /// The returned outcome is always the caller's; the published snapshot is
    /// only updated while this attempt is still the latest.
    pub async fn run(&self, descriptor: &FileDescriptor) -> UploadOutcome {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        tracing::info!(
            attempt,
            file = %descriptor.display_name,
            mime_type = descriptor.mime_type.as_deref().unwrap_or("unknown"),
            size_bytes = descriptor.size_bytes,
            "Starting upload attempt"
        );

        let outcome = match self.execute(attempt, descriptor).await {
            Ok((public_url, mime_type)) => {
                tracing::info!(attempt, public_url = %public_url, "Upload successful");
                UploadOutcome::Succeeded {
                    public_url,
                    mime_type,
                }
            }
            Err(error) => {
                tracing::warn!(attempt, error = %error, "Upload attempt failed");
                error.into()
            }
        };

        self.publish(PipelineSnapshot::terminal(attempt, outcome.clone()));
        outcome
    }

    async fn execute(
        &self,
        attempt: u64,
        descriptor: &FileDescriptor,
    ) -> Result<(String, String), UploadError> {
        self.publish(PipelineSnapshot::at(attempt, Phase::Validating));
        self.validator.validate(descriptor)?;

        self.publish(PipelineSnapshot::at(attempt, Phase::Loading));
        let data = self.loader.load(&descriptor.uri).await?;

        // Key is generated only after a successful read.
        let target = UploadTarget::in_bucket(&self.bucket, descriptor.mime_type.as_deref());
        tracing::debug!(
            attempt,
            key = %target.storage_key,
            size_bytes = data.len(),
            "Storing object"
        );

        self.publish(PipelineSnapshot::at(attempt, Phase::Uploading));
        self.storage
            .store(&target.storage_key, data, &target.content_type, false)
            .await?;

        self.publish(PipelineSnapshot::at(attempt, Phase::Resolving));
        let public_url = self
            .storage
            .public_url(&target.storage_key)
            .await
            .map_err(UploadError::Store)?
            .ok_or(UploadError::Resolve)?;

        Ok((public_url, target.content_type))
    }

    /// Publish a snapshot unless a newer attempt has already published.
    ///
    /// The comparison happens inside the channel's lock, so a stale attempt
    /// can never regress the snapshot between a check and a send.
    fn publish(&self, snapshot: PipelineSnapshot) {
        self.state.send_if_modified(|current| {
            if snapshot.attempt >= current.attempt {
                *current = snapshot;
                true
            } else {
                false
            }
        });
    }
}
