//! View state machine for the review screen.
//!
//! [`App`] sits between crossterm events and the [`ReviewSession`]: keys and
//! mouse drags become decisions or gesture samples, and overlays (welcome,
//! help, confirmations, results) decide which input is accepted. The async
//! parts (reloading from the catalog) are left to the caller via [`AppFlow`].

use super::input::{handle_confirm_input, handle_key_event, DragTracker, KeyAction};
use super::{
    render, render_confirm_delete_overlay, render_confirm_reload_overlay, render_help_overlay,
    render_summary, render_welcome_overlay, ViewContext, ViewState,
};
use crate::deletion::DeletionStatus;
use crate::domain::{Decision, GestureSignal, SessionPhase, SwipeFeedback};
use crate::session::ReviewSession;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use tracing::{debug, warn};

/// What the event loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppFlow {
    Continue,
    Quit,
    /// Reset the session and load it again from the catalog
    Reload,
    /// The welcome screen was closed; persist that it was seen
    WelcomeDismissed,
}

#[derive(Debug)]
pub struct App {
    view: ViewState,
    /// Where a declined reload returns to
    reload_return: ViewState,
    confirm_delete: bool,
    dry_run: bool,
    drag: DragTracker,
    feedback: Option<SwipeFeedback>,
    status: Option<String>,
}

impl App {
    pub fn new(show_welcome: bool, confirm_delete: bool, dry_run: bool) -> Self {
        Self {
            view: if show_welcome {
                ViewState::Welcome
            } else {
                ViewState::Reviewing
            },
            reload_return: ViewState::Reviewing,
            confirm_delete,
            dry_run,
            drag: DragTracker::new(),
            feedback: None,
            status: None,
        }
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn feedback(&self) -> Option<SwipeFeedback> {
        self.feedback
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Message shown in place of the card, e.g. after a failed load
    pub fn set_status(&mut self, status: Option<String>) {
        self.status = status;
    }

    /// Called after a reload attempt; clears the drag and returns to the card
    pub fn reloaded(&mut self, result: Result<usize, String>) {
        self.drag.cancel();
        self.feedback = None;
        self.view = ViewState::Reviewing;
        self.status = result.err();
    }

    pub fn handle_key(&mut self, session: &mut ReviewSession, key: KeyEvent) -> AppFlow {
        match self.view {
            ViewState::Welcome => {
                self.view = ViewState::Reviewing;
                AppFlow::WelcomeDismissed
            }
            ViewState::Help | ViewState::Results => {
                self.view = ViewState::Reviewing;
                AppFlow::Continue
            }
            ViewState::Summary => match handle_key_event(key) {
                KeyAction::Reload => self.ask_reload(ViewState::Summary),
                _ => AppFlow::Quit,
            },
            ViewState::ConfirmDelete => {
                match handle_confirm_input(key) {
                    KeyAction::Confirm => {
                        self.view = ViewState::Reviewing;
                        self.commit(session, Decision::Delete);
                    }
                    KeyAction::Cancel => {
                        session.dismiss_decision();
                        self.view = ViewState::Reviewing;
                    }
                    _ => {}
                }
                AppFlow::Continue
            }
            ViewState::ConfirmReload => match handle_confirm_input(key) {
                KeyAction::Confirm => AppFlow::Reload,
                KeyAction::Cancel => {
                    self.view = self.reload_return;
                    AppFlow::Continue
                }
                _ => AppFlow::Continue,
            },
            ViewState::Reviewing => self.handle_review_key(session, key),
        }
    }

    fn handle_review_key(&mut self, session: &mut ReviewSession, key: KeyEvent) -> AppFlow {
        match handle_key_event(key) {
            KeyAction::Quit => {
                let stats = session.stats();
                if stats.kept > 0 || stats.deleted > 0 {
                    self.view = ViewState::Summary;
                    AppFlow::Continue
                } else {
                    AppFlow::Quit
                }
            }
            KeyAction::Swipe(direction) => {
                let decision = session.polarity().decision_for(direction);
                self.decide(session, decision);
                AppFlow::Continue
            }
            KeyAction::Keep => {
                self.decide(session, Decision::Keep);
                AppFlow::Continue
            }
            KeyAction::Delete => {
                self.decide(session, Decision::Delete);
                AppFlow::Continue
            }
            KeyAction::Help => {
                self.view = ViewState::Help;
                AppFlow::Continue
            }
            KeyAction::Results => {
                self.view = ViewState::Results;
                AppFlow::Continue
            }
            KeyAction::Reload => self.ask_reload(ViewState::Reviewing),
            KeyAction::Confirm | KeyAction::Cancel | KeyAction::None => AppFlow::Continue,
        }
    }

    /// Feeds mouse drags to the classifier while the card is showing
    pub fn handle_mouse(&mut self, session: &mut ReviewSession, event: MouseEvent) {
        if self.view != ViewState::Reviewing {
            self.drag.cancel();
            return;
        }

        let Some(sample) = self.drag.handle_mouse(event) else {
            return;
        };

        match session.feed_gesture(sample) {
            GestureSignal::Progress(feedback) => {
                if feedback.threshold_crossed {
                    debug!(dx = feedback.dx, "swipe threshold crossed");
                }
                self.feedback = Some(feedback);
            }
            GestureSignal::Decided(decision) => {
                self.feedback = None;
                self.apply(session, decision);
            }
            GestureSignal::Cancelled => self.feedback = None,
            GestureSignal::Ignored => {}
        }
    }

    /// Collects finished deletions for the log
    pub fn tick(&mut self, session: &mut ReviewSession) {
        for outcome in session.poll_deletions() {
            match outcome.status {
                DeletionStatus::FailedNonfatal => {
                    warn!(id = %outcome.item_id, "item could not be deleted")
                }
                _ => debug!(id = %outcome.item_id, attempts = outcome.attempts, "item deleted"),
            }
        }
    }

    /// Draws the card plus whichever overlay the view calls for
    pub fn draw(&self, frame: &mut Frame, session: &ReviewSession) {
        let snapshot = session.snapshot();
        let ctx = ViewContext {
            snapshot: &snapshot,
            feedback: self.feedback,
            polarity: session.polarity(),
            dry_run: self.dry_run,
            status: self.status(),
        };
        render(frame, &ctx);

        match self.view {
            ViewState::Welcome => render_welcome_overlay(frame, ctx.polarity, self.dry_run),
            ViewState::Help => render_help_overlay(frame, ctx.polarity),
            ViewState::Results => {
                render_summary(frame, &snapshot.stats, &snapshot.deletions, false)
            }
            ViewState::Summary => render_summary(
                frame,
                &snapshot.stats,
                &snapshot.deletions,
                snapshot.phase == SessionPhase::Complete,
            ),
            ViewState::ConfirmDelete => {
                if let Some(item) = &snapshot.current {
                    render_confirm_delete_overlay(frame, item);
                }
            }
            ViewState::ConfirmReload => render_confirm_reload_overlay(frame, &snapshot.stats),
            ViewState::Reviewing => {}
        }
    }

    fn decide(&mut self, session: &mut ReviewSession, decision: Decision) {
        if session.current().is_none() || session.decision_pending() {
            return;
        }
        self.drag.cancel();
        self.feedback = None;
        self.apply(session, decision);
    }

    fn apply(&mut self, session: &mut ReviewSession, decision: Decision) {
        if decision == Decision::Delete && self.confirm_delete {
            self.view = ViewState::ConfirmDelete;
            return;
        }
        self.commit(session, decision);
    }

    fn commit(&mut self, session: &mut ReviewSession, decision: Decision) {
        match session.handle_decision(decision) {
            Ok(advance) => {
                if advance.next.is_none() {
                    self.view = ViewState::Summary;
                }
            }
            Err(e) => warn!(error = %e, "decision not applied"),
        }
    }

    fn ask_reload(&mut self, return_to: ViewState) -> AppFlow {
        self.reload_return = return_to;
        self.view = ViewState::ConfirmReload;
        AppFlow::Continue
    }
}
