//! Upload coordinator: one upload at a time, progress tracking, error capture.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::storage::{FileRecord, StorageClient, UploadOptions, UploadPayload};

/// Processing context that makes the service run invoice/receipt OCR.
pub const PROCESSING_CONTEXT: &str = "invoice";

/// Provenance tag attached to every upload.
pub const SOURCE_TAG: (&str, &str) = ("source", "receipt-ocr-app");

/// Observable state of the upload widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadState {
    /// An upload is in flight; input is disabled.
    pub is_uploading: bool,
    /// Percentage reported by the storage client (0–100).
    pub progress: u8,
    /// Message of the last failed attempt.
    pub error: Option<String>,
}

/// Coarse phase derived from [`UploadState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    /// Accepting a drop or file-picker selection.
    Idle,
    /// Waiting on the storage service.
    Uploading,
    /// Idle, with the last attempt's error shown.
    Failed,
}

impl UploadState {
    /// Derive the phase.
    #[must_use]
    pub fn phase(&self) -> UploadPhase {
        if self.is_uploading {
            UploadPhase::Uploading
        } else if self.error.is_some() {
            UploadPhase::Failed
        } else {
            UploadPhase::Idle
        }
    }

    fn started() -> Self {
        Self {
            is_uploading: true,
            progress: 0,
            error: None,
        }
    }
}

/// Why a submission did not start an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// The selection contained no file.
    NoFile,
    /// Another upload is still in flight.
    Busy,
}

/// Result of one submission.
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    /// The service returned a record.
    Completed(FileRecord),
    /// The upload failed; the message is also kept in [`UploadState::error`].
    Failed(String),
    /// Nothing was uploaded.
    Refused(Refusal),
}

/// Drives uploads for one workspace.
///
/// State is published on a watch channel so progress can be read while the
/// upload future is pending.
#[derive(Debug, Clone)]
pub struct UploadCoordinator {
    client: Arc<dyn StorageClient>,
    state: Arc<watch::Sender<UploadState>>,
}

impl UploadCoordinator {
    /// Create an idle coordinator.
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        let (tx, _rx) = watch::channel(UploadState::default());
        Self {
            client,
            state: Arc::new(tx),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// Pick the file to upload from a drop or picker selection.
    ///
    /// Only the first file is used; the rest are discarded.
    pub fn select(files: impl IntoIterator<Item = UploadPayload>) -> Option<UploadPayload> {
        files.into_iter().next()
    }

    /// Upload options for a single attempt, wired to this coordinator's state.
    fn options(&self) -> UploadOptions {
        let state = Arc::clone(&self.state);
        UploadOptions::new(PROCESSING_CONTEXT)
            .tag(SOURCE_TAG.0, SOURCE_TAG.1)
            .on_progress(move |percent| {
                state.send_if_modified(|s| {
                    if !s.is_uploading || s.progress == percent {
                        return false;
                    }
                    s.progress = percent.min(100);
                    true
                });
            })
    }

    /// Handle a drop or file-picker selection.
    ///
    /// Idle → Uploading → Idle (with the record) or Idle-with-error. No retries;
    /// the file is passed to the service unvalidated. Dropping the returned
    /// future before it settles puts the coordinator back to Idle.
    pub async fn submit(&self, files: impl IntoIterator<Item = UploadPayload>) -> UploadOutcome {
        self.submit_with(files, |_| {}).await
    }

    /// Like [`submit`](Self::submit), but hands a completed record to
    /// `on_completed` while the state still reads Uploading.
    pub async fn submit_with(
        &self,
        files: impl IntoIterator<Item = UploadPayload>,
        on_completed: impl FnOnce(&FileRecord),
    ) -> UploadOutcome {
        let Some(payload) = Self::select(files) else {
            return UploadOutcome::Refused(Refusal::NoFile);
        };

        let started = self.state.send_if_modified(|s| {
            if s.is_uploading {
                return false;
            }
            *s = UploadState::started();
            true
        });
        if !started {
            tracing::warn!(
                name: "upload.refused",
                file_name = %payload.file_name,
                "Upload already in progress"
            );
            return UploadOutcome::Refused(Refusal::Busy);
        }

        tracing::info!(
            name: "upload.started",
            file_name = %payload.file_name,
            content_type = %payload.content_type,
            size_bytes = payload.len(),
            provider = self.client.provider_name(),
            "Upload started"
        );

        let in_flight = InFlight {
            state: self.state.as_ref(),
            settled: false,
        };
        let result = self.client.upload(payload, self.options()).await;

        match result {
            Ok(record) => {
                on_completed(&record);
                in_flight.settle(UploadState::default());
                tracing::info!(
                    name: "upload.completed",
                    file_id = %record.id,
                    status = %record.processing_status,
                    "Upload completed"
                );
                UploadOutcome::Completed(record)
            }
            Err(e) => {
                let message = e.user_message();
                tracing::error!(name: "upload.failed", error = %e, "Upload failed");
                in_flight.settle(UploadState {
                    is_uploading: false,
                    progress: 0,
                    error: Some(message.clone()),
                });
                UploadOutcome::Failed(message)
            }
        }
    }

    /// Show `message` as a failed attempt that never reached the service.
    ///
    /// Returns `false` (and changes nothing) while an upload is in flight.
    pub fn reject(&self, message: impl Into<String>) -> bool {
        let message = message.into();
        self.state.send_if_modified(|s| {
            if s.is_uploading {
                return false;
            }
            *s = UploadState {
                is_uploading: false,
                progress: 0,
                error: Some(message),
            };
            true
        })
    }

    /// Drop a displayed error, back to plain Idle.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| {
            if s.is_uploading || s.error.is_none() {
                return false;
            }
            s.error = None;
            true
        });
    }
}

/// Marks an upload in flight; resets to Idle if dropped unsettled.
struct InFlight<'a> {
    state: &'a watch::Sender<UploadState>,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, next: UploadState) {
        self.settled = true;
        self.state.send_replace(next);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.state.send_replace(UploadState::default());
            tracing::warn!(name: "upload.abandoned", "Upload dropped before it settled");
        }
    }
}
