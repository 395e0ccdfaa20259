use crate::domain::{GestureSample, SwipeDirection};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Represents the result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Arrow-key swipe; what it means depends on the polarity
    Swipe(SwipeDirection),
    /// Keep the current item regardless of polarity
    Keep,
    /// Delete the current item regardless of polarity
    Delete,
    /// Toggle help overlay
    Help,
    /// Show kept/deleted counts
    Results,
    /// Start over from the catalog
    Reload,
    /// Accept a confirmation prompt
    Confirm,
    /// Decline a confirmation prompt
    Cancel,
    /// No action
    None,
}

/// Maps keyboard events to actions
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q, Esc or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        (KeyCode::Right, KeyModifiers::NONE) => KeyAction::Swipe(SwipeDirection::Right),
        (KeyCode::Char('l'), KeyModifiers::NONE) => KeyAction::Swipe(SwipeDirection::Right),
        (KeyCode::Left, KeyModifiers::NONE) => KeyAction::Swipe(SwipeDirection::Left),
        (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::Swipe(SwipeDirection::Left),

        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Keep,
        (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::Delete,

        (KeyCode::Char('?'), KeyModifiers::NONE) => KeyAction::Help,
        (KeyCode::Char('?'), KeyModifiers::SHIFT) => KeyAction::Help,
        (KeyCode::Char('s'), KeyModifiers::NONE) => KeyAction::Results,
        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Reload,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events to confirmation actions
/// Used while a confirmation overlay is shown
pub fn handle_confirm_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Confirm: y or Enter
        (KeyCode::Char('y'), KeyModifiers::NONE) => KeyAction::Confirm,
        (KeyCode::Char('Y'), KeyModifiers::NONE | KeyModifiers::SHIFT) => KeyAction::Confirm,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Confirm,

        // Cancel: n or Esc
        (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Char('N'), KeyModifiers::NONE | KeyModifiers::SHIFT) => KeyAction::Cancel,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Cancel,

        _ => KeyAction::None,
    }
}

/// Turns left-button mouse drags into gesture samples.
///
/// Displacement is measured in terminal cells from the press position, so the
/// viewport width handed to the classifier is the terminal width in columns.
#[derive(Debug, Default, Clone)]
pub struct DragTracker {
    origin: Option<(u16, u16)>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) -> Option<GestureSample> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some((event.column, event.row));
                Some(GestureSample::begin())
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (dx, dy) = self.offset(&event)?;
                Some(GestureSample::update(dx, dy))
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (dx, dy) = self.offset(&event)?;
                self.origin = None;
                Some(GestureSample::end(dx, dy))
            }
            _ => None,
        }
    }

    /// Forgets a drag in progress without producing an `End` sample
    pub fn cancel(&mut self) {
        self.origin = None;
    }

    fn offset(&self, event: &MouseEvent) -> Option<(f64, f64)> {
        let (x, y) = self.origin?;
        Some((
            f64::from(event.column) - f64::from(x),
            f64::from(event.row) - f64::from(y),
        ))
    }
}
