//! Gallery Swipe - a swipe-to-review session engine for photo libraries
//!
//! This crate provides the core of the `gswp` application: a review queue over
//! media items, a swipe gesture classifier, a fire-and-forget deletion
//! coordinator and the session controller tying them together. The terminal
//! front end in [`tui`] is one presentation layer built on top of it.

pub mod cli;
pub mod config;
pub mod deletion;
pub mod domain;
pub mod error;
pub mod logging;
pub mod session;
pub mod tui;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use deletion::{
    DeletionCoordinator, DeletionCounts, DeletionOutcome, DeletionStatus, DryRunStore,
    MediaStore, PendingDeletion, TrashStore,
};
pub use domain::{
    discover_media, AdvanceResult, CatalogOptions, Decision, DirectoryCatalog, GestureClassifier,
    GesturePhase, GestureSample, GestureSignal, MediaCatalog, MediaKind, Polarity, ReviewItem,
    ReviewQueue, SessionPhase, SessionStats, SwipeDirection, SwipeFeedback, SwipeThreshold,
};
pub use error::{CatalogError, Result, StoreError, SwipeError};
pub use session::{ReviewSession, SessionConfig, SessionSnapshot};
