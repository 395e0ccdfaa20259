//! Review session controller.
//!
//! [`ReviewSession`] exclusively owns the review queue. It turns classified
//! gestures (or direct decisions) into queue mutations, and hands DELETE
//! decisions to the [`DeletionCoordinator`] strictly after the cursor has moved
//! on. Readers get counts and [`SessionSnapshot`]s computed from the queue on
//! demand.

use crate::deletion::{DeletionCoordinator, DeletionCounts, DeletionOutcome};
use crate::domain::{
    AdvanceResult, Decision, GestureClassifier, GestureSample, GestureSignal, MediaCatalog,
    Polarity, ReviewItem, ReviewQueue, SessionPhase, SessionStats, SwipeThreshold,
};
use crate::error::Result;
use tracing::{debug, info, warn};

/// Gesture settings for a session
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfig {
    pub threshold: SwipeThreshold,
    pub polarity: Polarity,
}

/// Immutable view of a session for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub current: Option<ReviewItem>,
    pub next: Option<ReviewItem>,
    pub cursor: usize,
    pub stats: SessionStats,
    pub deletions: DeletionCounts,
}

pub struct ReviewSession {
    queue: ReviewQueue,
    loaded: bool,
    generation: u64,
    classifier: GestureClassifier,
    deletions: DeletionCoordinator,
}

impl ReviewSession {
    pub fn new(config: SessionConfig, deletions: DeletionCoordinator) -> Self {
        Self {
            queue: ReviewQueue::default(),
            loaded: false,
            generation: 0,
            classifier: GestureClassifier::new(config.threshold, config.polarity),
            deletions,
        }
    }

    /// Starts a new session over `items`, replacing whatever was loaded.
    ///
    /// Deletions still running for the previous session are left alone.
    pub fn load_session(&mut self, items: Vec<ReviewItem>) -> Result<()> {
        self.reset_session();
        self.install(items)
    }

    fn install(&mut self, items: Vec<ReviewItem>) -> Result<()> {
        self.queue = ReviewQueue::new(items)?;
        self.loaded = true;
        info!(
            generation = self.generation,
            items = self.queue.item_count(),
            "review session loaded"
        );
        Ok(())
    }

    /// Resets, then loads the catalog's items. On failure the session stays in
    /// `Loading` and the error is returned; retrying is up to the caller.
    ///
    /// Catalog failures surface as `SwipeError::PermissionDenied` or
    /// `SwipeError::Io`; a duplicate id gives `SwipeError::DuplicateId`.
    pub async fn load_from<C>(&mut self, catalog: &C) -> Result<usize>
    where
        C: MediaCatalog + ?Sized,
    {
        self.reset_session();
        let items = match catalog.list_items().await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "failed to load media catalog");
                return Err(e.into());
            }
        };
        self.install(items)?;
        Ok(self.queue.item_count())
    }

    /// Returns to an empty `Loading` session without waiting on deletions
    pub fn reset_session(&mut self) {
        self.generation += 1;
        self.queue.reset();
        self.loaded = false;
        self.classifier.reset();
        debug!(generation = self.generation, "review session reset");
    }

    /// Applies one decision to the current item.
    ///
    /// For DELETE the cursor advances first, then the item that was current
    /// before the call is handed to the deletion coordinator.
    pub fn handle_decision(&mut self, decision: Decision) -> Result<AdvanceResult> {
        let result = self.queue.record(decision);
        self.classifier.release();
        let advance = result?;

        debug!(
            id = %advance.decided.id,
            decision = decision.label(),
            cursor = self.queue.cursor(),
            "decision recorded"
        );

        if decision == Decision::Delete {
            self.deletions
                .request_deletion(advance.decided.clone(), self.generation);
        }

        Ok(advance)
    }

    /// Feeds one gesture sample to the classifier.
    ///
    /// Does not touch the queue: a `Decided` signal must be followed by
    /// [`handle_decision`](Self::handle_decision) or
    /// [`dismiss_decision`](Self::dismiss_decision), and further gestures are
    /// ignored until then. Input is ignored while there is no current item.
    pub fn feed_gesture(&mut self, sample: GestureSample) -> GestureSignal {
        if self.queue.current().is_none() {
            return GestureSignal::Ignored;
        }
        self.classifier.handle(sample)
    }

    /// Drops a decided gesture without applying it (e.g. confirmation declined)
    pub fn dismiss_decision(&mut self) {
        self.classifier.release();
    }

    /// True while a decided gesture awaits `handle_decision`/`dismiss_decision`
    pub fn decision_pending(&self) -> bool {
        self.classifier.is_locked()
    }

    /// Viewport width used to resolve a fractional swipe threshold.
    ///
    /// Until it is set, gestures are ignored rather than decided.
    pub fn set_viewport_width(&mut self, width: f64) {
        self.classifier.set_viewport_width(width);
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn polarity(&self) -> Polarity {
        self.classifier.polarity()
    }

    pub fn current(&self) -> Option<&ReviewItem> {
        self.queue.current()
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.loaded {
            SessionPhase::Loading
        } else if self.queue.item_count() == 0 {
            SessionPhase::Empty
        } else if self.queue.is_exhausted() {
            SessionPhase::Complete
        } else {
            SessionPhase::Reviewing {
                cursor: self.queue.cursor(),
            }
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cursor(&self) -> usize {
        self.queue.cursor()
    }

    pub fn item_count(&self) -> usize {
        self.queue.item_count()
    }

    pub fn kept_count(&self) -> usize {
        self.queue.kept().len()
    }

    pub fn deleted_count(&self) -> usize {
        self.queue.deleted().len()
    }

    pub fn remaining_count(&self) -> usize {
        self.queue.item_count() - self.queue.cursor()
    }

    pub fn kept_ids(&self) -> &[String] {
        self.queue.kept()
    }

    pub fn deleted_ids(&self) -> &[String] {
        self.queue.deleted()
    }

    pub fn stats(&self) -> SessionStats {
        self.queue.stats()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            current: self.queue.current().cloned(),
            next: self.queue.peek_next().cloned(),
            cursor: self.queue.cursor(),
            stats: self.queue.stats(),
            deletions: self.deletions.counts(),
        }
    }

    pub fn deletions(&self) -> &DeletionCoordinator {
        &self.deletions
    }

    /// Collects finished deletions. Outcomes are only logged; the queue is
    /// never changed by them.
    ///
    /// Outcomes wait in a bounded backlog until collected, so a long-running
    /// caller should poll regularly (the TUI does so on every tick); reports
    /// past the backlog are dropped, but `deletions().counts()` stays exact.
    pub fn poll_deletions(&mut self) -> Vec<DeletionOutcome> {
        let outcomes = self.deletions.drain_outcomes();
        for outcome in &outcomes {
            if outcome.session != self.generation {
                debug!(
                    id = %outcome.item_id,
                    session = outcome.session,
                    "deletion from an earlier session resolved"
                );
            }
        }
        outcomes
    }

    /// Waits for outstanding deletions to resolve
    pub async fn wait_for_deletions(&self) {
        self.deletions.wait_idle().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deletion::{DeletionStatus, DryRunStore, MediaStore};
    use crate::error::{CatalogError, StoreError, SwipeError};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::runtime::Handle;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct RecordingStore {
        fail: bool,
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MediaStore for RecordingStore {
        async fn delete_by_id(&self, id: &str) -> std::result::Result<(), StoreError> {
            self.deleted.lock().unwrap().push(id.to_string());
            if self.fail {
                Err(StoreError::Failed("storage offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    struct GatedStore {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl MediaStore for GatedStore {
        async fn delete_by_id(&self, _id: &str) -> std::result::Result<(), StoreError> {
            self.gate.notified().await;
            Ok(())
        }
    }

    struct FixedCatalog(std::result::Result<Vec<ReviewItem>, ()>);

    #[async_trait]
    impl MediaCatalog for FixedCatalog {
        async fn list_items(&self) -> std::result::Result<Vec<ReviewItem>, CatalogError> {
            match &self.0 {
                Ok(items) => Ok(items.clone()),
                Err(()) => Err(CatalogError::PermissionDenied(PathBuf::from("/photos"))),
            }
        }
    }

    fn items(ids: &[&str]) -> Vec<ReviewItem> {
        ids.iter()
            .map(|id| ReviewItem::new(*id, format!("file:///photos/{}.jpg", id)))
            .collect()
    }

    fn session_with(store: Arc<dyn MediaStore>) -> ReviewSession {
        let config = SessionConfig {
            threshold: SwipeThreshold::Pixels(120.0),
            polarity: Polarity::RightIsDelete,
        };
        ReviewSession::new(config, DeletionCoordinator::new(store, Handle::current()))
    }

    fn assert_invariants(session: &ReviewSession) {
        assert_eq!(
            session.kept_count() + session.deleted_count(),
            session.cursor()
        );
        assert!(session.cursor() <= session.item_count());
        for id in session.kept_ids() {
            assert!(!session.deleted_ids().contains(id));
        }
    }

    async fn settle(session: &ReviewSession) {
        tokio::time::timeout(Duration::from_secs(5), session.wait_for_deletions())
            .await
            .expect("deletions should settle");
    }

    mod lifecycle_tests {
        use super::*;

        #[tokio::test]
        async fn test_new_session_is_loading() {
            let session = session_with(Arc::new(DryRunStore));
            assert_eq!(session.phase(), SessionPhase::Loading);
            assert!(session.current().is_none());
            assert_eq!(session.item_count(), 0);
        }

        #[tokio::test]
        async fn test_empty_load_is_distinct_from_loading() {
            let mut session = session_with(Arc::new(DryRunStore));
            session.load_session(vec![]).unwrap();
            assert_eq!(session.phase(), SessionPhase::Empty);
        }

        #[tokio::test]
        async fn test_three_item_scenario() {
            let store = Arc::new(RecordingStore::default());
            let mut session = session_with(store.clone());
            session.load_session(items(&["A", "B", "C"])).unwrap();
            assert_eq!(session.phase(), SessionPhase::Reviewing { cursor: 0 });

            session.handle_decision(Decision::Keep).unwrap();
            assert_eq!(session.cursor(), 1);
            assert_eq!(session.kept_ids(), &["A".to_string()]);

            let advance = session.handle_decision(Decision::Delete).unwrap();
            assert_eq!(advance.decided.id, "B");
            assert_eq!(session.cursor(), 2);
            assert_eq!(session.deleted_ids(), &["B".to_string()]);
            let in_flight = session.deletions().in_flight();
            assert_eq!(in_flight.len(), 1);
            assert_eq!(in_flight[0].item.id, "B");

            session.handle_decision(Decision::Keep).unwrap();
            assert_eq!(session.cursor(), 3);
            assert_eq!(session.kept_ids(), &["A".to_string(), "C".to_string()]);
            assert!(session.current().is_none());
            assert_eq!(session.phase(), SessionPhase::Complete);
            assert_invariants(&session);

            settle(&session).await;
            assert_eq!(*store.deleted.lock().unwrap(), vec!["B".to_string()]);
        }

        #[tokio::test]
        async fn test_decision_after_complete_is_out_of_range() {
            let mut session = session_with(Arc::new(DryRunStore));
            session.load_session(items(&["A"])).unwrap();
            session.handle_decision(Decision::Keep).unwrap();

            let result = session.handle_decision(Decision::Delete);

            assert!(matches!(result, Err(SwipeError::OutOfRange { .. })));
            assert_eq!(session.cursor(), 1);
            assert_eq!(session.kept_count(), 1);
            assert_eq!(session.deleted_count(), 0);
            assert_eq!(session.deletions().counts().pending, 0);
        }

        #[tokio::test]
        async fn test_duplicate_ids_rejected_and_session_stays_loading() {
            let mut session = session_with(Arc::new(DryRunStore));
            let result = session.load_session(items(&["A", "A"]));
            assert!(matches!(result, Err(SwipeError::DuplicateId(_))));
            assert_eq!(session.phase(), SessionPhase::Loading);
        }

        #[tokio::test]
        async fn test_load_from_catalog() {
            let mut session = session_with(Arc::new(DryRunStore));
            let catalog = FixedCatalog(Ok(items(&["A", "B"])));

            let count = session.load_from(&catalog).await.unwrap();

            assert_eq!(count, 2);
            assert_eq!(session.current().unwrap().id, "A");
        }

        #[tokio::test]
        async fn test_catalog_failure_surfaces_and_stays_loading() {
            let mut session = session_with(Arc::new(DryRunStore));
            session.load_session(items(&["A"])).unwrap();
            let catalog = FixedCatalog(Err(()));

            let result = session.load_from(&catalog).await;

            assert!(matches!(result, Err(SwipeError::PermissionDenied(_))));
            assert_eq!(session.phase(), SessionPhase::Loading);
            assert_eq!(session.item_count(), 0);
        }

        #[tokio::test]
        async fn test_reset_bumps_generation() {
            let mut session = session_with(Arc::new(DryRunStore));
            let before = session.generation();
            session.reset_session();
            assert_eq!(session.generation(), before + 1);
        }
    }

    mod projection_tests {
        use super::*;

        #[tokio::test]
        async fn test_counts_are_stable_without_mutation() {
            let mut session = session_with(Arc::new(DryRunStore));
            session.load_session(items(&["A", "B", "C"])).unwrap();
            session.handle_decision(Decision::Keep).unwrap();

            assert_eq!(session.remaining_count(), session.remaining_count());
            assert_eq!(session.remaining_count(), 2);
            assert_eq!(session.snapshot(), session.snapshot());
        }

        #[tokio::test]
        async fn test_snapshot_reflects_queue() {
            let mut session = session_with(Arc::new(DryRunStore));
            session.load_session(items(&["A", "B", "C"])).unwrap();
            session.handle_decision(Decision::Keep).unwrap();

            let snapshot = session.snapshot();
            assert_eq!(snapshot.phase, SessionPhase::Reviewing { cursor: 1 });
            assert_eq!(snapshot.current.unwrap().id, "B");
            assert_eq!(snapshot.next.unwrap().id, "C");
            assert_eq!(
                snapshot.stats,
                SessionStats {
                    total: 3,
                    kept: 1,
                    deleted: 0,
                    remaining: 2
                }
            );
        }
    }

    mod deletion_tests {
        use super::*;

        #[tokio::test]
        async fn test_failed_delete_stays_recorded() {
            let store = Arc::new(RecordingStore {
                fail: true,
                ..Default::default()
            });
            let mut session = session_with(store);
            session.load_session(items(&["A", "B", "C"])).unwrap();
            session.handle_decision(Decision::Keep).unwrap();
            session.handle_decision(Decision::Delete).unwrap();
            let remaining = session.remaining_count();

            settle(&session).await;
            let outcomes = session.poll_deletions();

            assert_eq!(outcomes.len(), 1);
            assert_eq!(outcomes[0].status, DeletionStatus::FailedNonfatal);
            assert_eq!(session.deleted_ids(), &["B".to_string()]);
            assert_eq!(session.remaining_count(), remaining);
            assert_invariants(&session);
        }

        #[tokio::test]
        async fn test_cursor_advances_before_deletion_resolves() {
            let gate = Arc::new(Notify::new());
            let mut session = session_with(Arc::new(GatedStore { gate: gate.clone() }));
            session.load_session(items(&["A", "B", "C"])).unwrap();

            session.handle_decision(Decision::Delete).unwrap();
            session.handle_decision(Decision::Delete).unwrap();

            assert_eq!(session.cursor(), 2);
            assert_eq!(session.current().unwrap().id, "C");
            assert_eq!(session.deletions().pending_count(), 2);

            while session.deletions().pending_count() > 0 {
                gate.notify_waiters();
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            assert_eq!(session.deletions().counts().succeeded, 2);
        }

        #[tokio::test]
        async fn test_reset_does_not_wait_for_pending_deletion() {
            let gate = Arc::new(Notify::new());
            let mut session = session_with(Arc::new(GatedStore { gate: gate.clone() }));
            session.load_session(items(&["A", "B"])).unwrap();
            session.handle_decision(Decision::Delete).unwrap();
            let old_generation = session.generation();

            session.reset_session();

            assert_eq!(session.phase(), SessionPhase::Loading);
            assert_eq!(session.item_count(), 0);
            assert_eq!(session.deletions().pending_count(), 1);

            while session.deletions().pending_count() > 0 {
                gate.notify_waiters();
                tokio::time::sleep(Duration::from_millis(5)).await;
            }

            let outcomes = session.poll_deletions();
            assert_eq!(outcomes.len(), 1);
            assert_eq!(outcomes[0].session, old_generation);
            assert_eq!(session.phase(), SessionPhase::Loading);
            assert_eq!(session.cursor(), 0);
            assert!(session.deleted_ids().is_empty());
        }
    }

    mod gesture_tests {
        use super::*;

        #[tokio::test]
        async fn test_default_config_ignores_gestures_until_viewport_known() {
            let coordinator = DeletionCoordinator::new(Arc::new(DryRunStore), Handle::current());
            let mut session = ReviewSession::new(SessionConfig::default(), coordinator);
            session.load_session(items(&["A"])).unwrap();

            session.feed_gesture(GestureSample::begin());
            let signal = session.feed_gesture(GestureSample::end(0.5, 0.0));

            assert_eq!(signal, GestureSignal::Ignored);
            assert!(!session.decision_pending());
            assert_eq!(session.cursor(), 0);

            session.set_viewport_width(400.0);
            session.feed_gesture(GestureSample::begin());
            assert_eq!(
                session.feed_gesture(GestureSample::end(0.5, 0.0)),
                GestureSignal::Cancelled
            );
        }

        #[tokio::test]
        async fn test_gesture_decision_locks_until_applied() {
            let mut session = session_with(Arc::new(DryRunStore));
            session.load_session(items(&["A", "B"])).unwrap();

            session.feed_gesture(GestureSample::begin());
            session.feed_gesture(GestureSample::update(-150.0, 0.0));
            let signal = session.feed_gesture(GestureSample::end(-150.0, 0.0));
            assert_eq!(signal, GestureSignal::Decided(Decision::Keep));
            assert!(session.decision_pending());

            assert_eq!(
                session.feed_gesture(GestureSample::begin()),
                GestureSignal::Ignored
            );

            session.handle_decision(Decision::Keep).unwrap();
            assert!(!session.decision_pending());
            assert!(matches!(
                session.feed_gesture(GestureSample::begin()),
                GestureSignal::Progress(_)
            ));
        }

        #[tokio::test]
        async fn test_dismissed_decision_does_not_advance() {
            let mut session = session_with(Arc::new(DryRunStore));
            session.load_session(items(&["A"])).unwrap();

            session.feed_gesture(GestureSample::begin());
            session.feed_gesture(GestureSample::end(200.0, 0.0));
            assert!(session.decision_pending());

            session.dismiss_decision();

            assert!(!session.decision_pending());
            assert_eq!(session.cursor(), 0);
            assert_eq!(session.current().unwrap().id, "A");
        }

        #[tokio::test]
        async fn test_cancelled_gesture_leaves_queue() {
            let mut session = session_with(Arc::new(DryRunStore));
            session.load_session(items(&["A"])).unwrap();

            session.feed_gesture(GestureSample::begin());
            let signal = session.feed_gesture(GestureSample::end(40.0, 0.0));

            assert_eq!(signal, GestureSignal::Cancelled);
            assert_eq!(session.cursor(), 0);
        }

        #[tokio::test]
        async fn test_gestures_ignored_when_complete() {
            let mut session = session_with(Arc::new(DryRunStore));
            session.load_session(items(&["A"])).unwrap();
            session.handle_decision(Decision::Keep).unwrap();

            assert_eq!(
                session.feed_gesture(GestureSample::begin()),
                GestureSignal::Ignored
            );
        }
    }
}
