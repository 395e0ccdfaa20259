//! Best-effort background deletion of items the user swiped away.
//!
//! The review queue has already advanced past an item by the time its deletion
//! is requested. Each request runs as its own task on the tokio runtime: one
//! primary `delete_by_id` call, and at most one local-file fallback if that
//! fails. Failures are logged and tallied, never returned to the caller.

use crate::domain::ReviewItem;
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Notify};
use tracing::{debug, error, info, warn};

/// Storage collaborator that can destroy items
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Deletes the item identified by `id` from the media store
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;

    /// Removes the local file behind `locator`. Used as a fallback only.
    async fn remove_local(&self, _locator: &str) -> Result<(), StoreError> {
        Err(StoreError::Unsupported)
    }
}

/// Sends files to the operating system's trash.
///
/// Item ids are filesystem paths; locators are `file://` URIs.
#[derive(Debug, Default, Clone)]
pub struct TrashStore;

#[async_trait]
impl MediaStore for TrashStore {
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let path = PathBuf::from(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }

        tokio::task::spawn_blocking(move || trash::delete(&path))
            .await
            .map_err(|e| StoreError::Failed(format!("trash task failed: {}", e)))?
            .map_err(|e| StoreError::Failed(format!("Trash error: {}", e)))
    }

    async fn remove_local(&self, locator: &str) -> Result<(), StoreError> {
        let path = locator_path(locator).ok_or(StoreError::Unsupported)?;
        if !tokio::fs::try_exists(path).await? {
            return Ok(());
        }
        tokio::fs::remove_file(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => StoreError::PermissionDenied(locator.into()),
            _ => StoreError::Io(e),
        })?;
        warn!(path = %path.display(), "trash unavailable, file removed permanently");
        Ok(())
    }
}

/// Store that only logs what it would delete
#[derive(Debug, Default, Clone)]
pub struct DryRunStore;

#[async_trait]
impl MediaStore for DryRunStore {
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        info!(id, "dry run: would delete");
        Ok(())
    }
}

/// Path behind a `file://` locator
fn locator_path(locator: &str) -> Option<&Path> {
    locator.strip_prefix("file://").map(Path::new)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionStatus {
    Queued,
    InFlight,
    Succeeded,
    /// Both the primary delete and the fallback failed; logged and absorbed
    FailedNonfatal,
}

/// Bookkeeping for one requested deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    pub item: ReviewItem,
    /// Generation of the session that requested the deletion
    pub session: u64,
    /// 0 while queued, 1 during the primary delete, 2 during the fallback
    pub attempt: u32,
    pub status: DeletionStatus,
}

/// Report emitted when a deletion resolves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub item_id: String,
    /// Generation of the session that requested the deletion
    pub session: u64,
    pub status: DeletionStatus,
    pub attempts: u32,
}

/// Aggregate view of the coordinator's work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeletionCounts {
    pub pending: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
struct Ledger {
    pending: HashMap<String, PendingDeletion>,
    succeeded: usize,
    failed: usize,
}

struct Shared {
    store: Arc<dyn MediaStore>,
    ledger: Mutex<Ledger>,
    idle: Notify,
    outcome_tx: mpsc::Sender<DeletionOutcome>,
}

impl Shared {
    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_attempt(&self, id: &str, attempt: u32) {
        if let Some(record) = self.ledger().pending.get_mut(id) {
            record.attempt = attempt;
            record.status = DeletionStatus::InFlight;
        }
    }

    fn resolve(&self, id: &str, session: u64, status: DeletionStatus) {
        let attempts = {
            let mut ledger = self.ledger();
            let attempts = ledger.pending.remove(id).map_or(0, |r| r.attempt);
            match status {
                DeletionStatus::Succeeded => ledger.succeeded += 1,
                _ => ledger.failed += 1,
            }
            attempts
        };

        let outcome = DeletionOutcome {
            item_id: id.to_string(),
            session,
            status,
            attempts,
        };
        if let Err(mpsc::error::TrySendError::Full(dropped)) = self.outcome_tx.try_send(outcome) {
            debug!(id = %dropped.item_id, "outcome backlog full, report dropped");
        }
        self.idle.notify_waiters();
    }
}

/// Undrained outcomes kept before new reports are dropped
pub const OUTCOME_BACKLOG: usize = 1024;

/// Runs deletions in the background and keeps an observable record of them.
///
/// Finished deletions are reported through [`drain_outcomes`](Self::drain_outcomes).
/// At most [`OUTCOME_BACKLOG`] reports wait to be drained; later ones are
/// dropped, while [`counts`](Self::counts) stays exact.
pub struct DeletionCoordinator {
    shared: Arc<Shared>,
    runtime: Handle,
    outcome_rx: mpsc::Receiver<DeletionOutcome>,
}

impl DeletionCoordinator {
    pub fn new(store: Arc<dyn MediaStore>, runtime: Handle) -> Self {
        Self::with_outcome_backlog(store, runtime, OUTCOME_BACKLOG)
    }

    pub fn with_outcome_backlog(
        store: Arc<dyn MediaStore>,
        runtime: Handle,
        backlog: usize,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(backlog.max(1));

        Self {
            shared: Arc::new(Shared {
                store,
                ledger: Mutex::new(Ledger::default()),
                idle: Notify::new(),
                outcome_tx,
            }),
            runtime,
            outcome_rx,
        }
    }

    /// Starts deleting `item` and returns immediately.
    ///
    /// A request for an id that is already pending is dropped, so one item is
    /// never deleted twice concurrently. This holds across sessions: the
    /// pending record and its outcome keep the generation that first asked.
    pub fn request_deletion(&self, item: ReviewItem, session: u64) {
        {
            let mut ledger = self.shared.ledger();
            if let Some(existing) = ledger.pending.get(&item.id) {
                if existing.session == session {
                    debug!(id = %item.id, "deletion already pending, ignoring request");
                } else {
                    info!(
                        id = %item.id,
                        pending_session = existing.session,
                        requested_session = session,
                        "deletion still pending from an earlier session, ignoring request"
                    );
                }
                return;
            }
            ledger.pending.insert(
                item.id.clone(),
                PendingDeletion {
                    item: item.clone(),
                    session,
                    attempt: 0,
                    status: DeletionStatus::Queued,
                },
            );
        }

        let shared = Arc::clone(&self.shared);
        self.runtime.spawn(async move {
            Self::run(shared, item, session).await;
        });
    }

    async fn run(shared: Arc<Shared>, item: ReviewItem, session: u64) {
        shared.set_attempt(&item.id, 1);

        let primary = shared.store.delete_by_id(&item.id).await;
        let err = match primary {
            Ok(()) => {
                debug!(id = %item.id, "deleted");
                shared.resolve(&item.id, session, DeletionStatus::Succeeded);
                return;
            }
            Err(e) => e,
        };

        warn!(id = %item.id, error = %err, "delete failed, trying local cleanup");
        shared.set_attempt(&item.id, 2);

        match shared.store.remove_local(&item.locator).await {
            Ok(()) => {
                debug!(id = %item.id, "removed via local cleanup");
                shared.resolve(&item.id, session, DeletionStatus::Succeeded);
            }
            Err(fallback_err) => {
                error!(
                    id = %item.id,
                    error = %err,
                    fallback_error = %fallback_err,
                    "could not delete item; keeping it recorded as deleted"
                );
                shared.resolve(&item.id, session, DeletionStatus::FailedNonfatal);
            }
        }
    }

    /// Snapshot of deletions that have not resolved yet
    pub fn in_flight(&self) -> Vec<PendingDeletion> {
        self.shared.ledger().pending.values().cloned().collect()
    }

    pub fn pending_count(&self) -> usize {
        self.shared.ledger().pending.len()
    }

    pub fn counts(&self) -> DeletionCounts {
        let ledger = self.shared.ledger();
        DeletionCounts {
            pending: ledger.pending.len(),
            succeeded: ledger.succeeded,
            failed: ledger.failed,
        }
    }

    /// Takes every outcome reported since the last call
    pub fn drain_outcomes(&mut self) -> Vec<DeletionOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Waits until no deletion is pending
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.shared.idle.notified();
            if self.pending_count() == 0 {
                return;
            }
            notified.await;
        }
    }
}
