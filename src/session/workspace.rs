//! Per-browser workspaces and their storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::view::ViewState;
use crate::storage::{FileRecord, StorageClient, UploadPayload};
use crate::upload::{UploadCoordinator, UploadOutcome};

/// State of one browser session: the displayed file and its upload widget.
#[derive(Debug)]
pub struct Workspace {
    inner: Arc<WorkspaceInner>,
}

#[derive(Debug)]
struct WorkspaceInner {
    /// Unique workspace identifier (the session cookie value).
    id: String,
    /// The "currently displayed file" slot.
    view: RwLock<ViewState>,
    /// Upload widget state and client.
    uploader: UploadCoordinator,
    /// Last activity time.
    last_activity: RwLock<DateTime<Utc>>,
}

impl Clone for Workspace {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Workspace {
    fn new(id: String, client: Arc<dyn StorageClient>) -> Self {
        Self {
            inner: Arc::new(WorkspaceInner {
                id,
                view: RwLock::new(ViewState::NoFile),
                uploader: UploadCoordinator::new(client),
                last_activity: RwLock::new(Utc::now()),
            }),
        }
    }

    /// Get the workspace ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The upload coordinator of this workspace.
    #[must_use]
    pub fn uploader(&self) -> &UploadCoordinator {
        &self.inner.uploader
    }

    /// Snapshot of the view.
    #[must_use]
    pub fn view(&self) -> ViewState {
        self.inner.view.read().unwrap().clone()
    }

    /// The displayed record, if any.
    #[must_use]
    pub fn current_file(&self) -> Option<FileRecord> {
        self.inner.view.read().unwrap().current().cloned()
    }

    /// Switch to the results screen for `record`.
    pub fn show(&self, record: FileRecord) {
        self.inner.view.write().unwrap().show(record);
        self.touch();
    }

    /// Upload a selection and, on success, show the record.
    ///
    /// The record is in place before the coordinator reports Idle, so a
    /// poller never sees a settled upload with nothing displayed.
    pub async fn upload(&self, files: impl IntoIterator<Item = UploadPayload>) -> UploadOutcome {
        self.inner
            .uploader
            .submit_with(files, |record| self.show(record.clone()))
            .await
    }

    /// Discard the displayed record and return to the uploader.
    pub fn reset(&self) -> Option<FileRecord> {
        let discarded = self.inner.view.write().unwrap().reset();
        self.inner.uploader.clear_error();
        self.touch();
        discarded
    }

    /// Update last activity.
    pub fn touch(&self) {
        let mut guard = self.inner.last_activity.write().unwrap();
        *guard = Utc::now();
    }

    /// Check if the workspace has been idle longer than `timeout`.
    ///
    /// A workspace with an upload in flight never counts as idle.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        if self.inner.uploader.state().is_uploading {
            return false;
        }
        let last = *self.inner.last_activity.read().unwrap();
        // Negative duration means clock skew
        (Utc::now() - last)
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }
}

/// Thread-safe store for workspaces, keyed by session ID.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    inner: Arc<WorkspaceStoreInner>,
}

#[derive(Debug)]
struct WorkspaceStoreInner {
    client: Arc<dyn StorageClient>,
    workspaces: RwLock<HashMap<String, Workspace>>,
}

impl WorkspaceStore {
    /// Create a store whose workspaces upload through `client`.
    #[must_use]
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            inner: Arc::new(WorkspaceStoreInner {
                client,
                workspaces: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Create a new workspace and return it.
    #[must_use]
    pub fn create(&self) -> Workspace {
        let id = Uuid::new_v4().to_string();
        self.create_with_id(id)
    }

    /// Create a new workspace with a specific ID.
    #[must_use]
    pub fn create_with_id(&self, id: impl Into<String>) -> Workspace {
        let id = id.into();
        let workspace = Workspace::new(id.clone(), Arc::clone(&self.inner.client));
        let mut guard = self.inner.workspaces.write().unwrap();
        guard.insert(id, workspace.clone());
        workspace
    }

    /// Get a workspace by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Workspace> {
        let guard = self.inner.workspaces.read().unwrap();
        guard.get(id).cloned()
    }

    /// Get a workspace by ID, creating it if it doesn't exist.
    #[must_use]
    pub fn get_or_create(&self, id: &str) -> Workspace {
        if let Some(workspace) = self.get(id) {
            return workspace;
        }
        let mut guard = self.inner.workspaces.write().unwrap();
        guard
            .entry(id.to_string())
            .or_insert_with(|| Workspace::new(id.to_string(), Arc::clone(&self.inner.client)))
            .clone()
    }

    /// Get the number of workspaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.workspaces.read().unwrap().len()
    }

    /// Check if there are no workspaces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove workspaces that have been idle longer than the timeout.
    ///
    /// Returns the number of workspaces removed.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = self.inner.workspaces.write().unwrap();
        let before = guard.len();
        guard.retain(|_, workspace| !workspace.is_expired_with_timeout(timeout));
        before - guard.len()
    }

    /// Periodically drop idle workspaces until the runtime shuts down.
    pub fn spawn_sweeper(
        &self,
        idle_timeout: Duration,
        every: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        // interval() panics on a zero period
        let every = every.max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = store.cleanup_expired_with_timeout(idle_timeout);
                if removed > 0 {
                    tracing::debug!(
                        name: "session.swept",
                        removed,
                        remaining = store.len(),
                        "Dropped idle workspaces"
                    );
                }
            }
        })
    }
}
