//! Swipe gesture classification.
//!
//! A drag is fed in as a stream of [`GestureSample`]s (`Begin`, `Update`*, `End`).
//! While the drag is live the classifier reports continuous [`SwipeFeedback`] for
//! presentation; at `End` it emits exactly one terminal signal: a decision or a
//! cancellation. After a decision the classifier stays locked until the session
//! has applied it, so a second drag can't race the first.

use super::Decision;
use serde::{Deserialize, Serialize};

/// Lifecycle position of a sample within one interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Begin,
    Update,
    End,
}

/// One frame of drag input.
///
/// `dx`/`dy` are the translation since `Begin`, not per-frame deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub dx: f64,
    pub dy: f64,
    pub velocity: f64,
    pub phase: GesturePhase,
}

impl GestureSample {
    pub fn begin() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            velocity: 0.0,
            phase: GesturePhase::Begin,
        }
    }

    pub fn update(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            velocity: 0.0,
            phase: GesturePhase::Update,
        }
    }

    pub fn end(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            velocity: 0.0,
            phase: GesturePhase::End,
        }
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Horizontal direction of a swipe or arrow key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Which horizontal direction means delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Polarity {
    #[default]
    RightIsDelete,
    RightIsKeep,
}

impl Polarity {
    pub fn decision_for(self, direction: SwipeDirection) -> Decision {
        match (self, direction) {
            (Polarity::RightIsDelete, SwipeDirection::Right) => Decision::Delete,
            (Polarity::RightIsDelete, SwipeDirection::Left) => Decision::Keep,
            (Polarity::RightIsKeep, SwipeDirection::Right) => Decision::Keep,
            (Polarity::RightIsKeep, SwipeDirection::Left) => Decision::Delete,
        }
    }

    /// Direction a swipe must go to produce `decision`
    pub fn direction_for(self, decision: Decision) -> SwipeDirection {
        if self.decision_for(SwipeDirection::Right) == decision {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    }

    /// Decision implied by a signed horizontal displacement, `None` at zero
    pub fn decision_for_dx(self, dx: f64) -> Option<Decision> {
        if dx > 0.0 {
            Some(self.decision_for(SwipeDirection::Right))
        } else if dx < 0.0 {
            Some(self.decision_for(SwipeDirection::Left))
        } else {
            None
        }
    }
}

/// Displacement a drag must exceed to count as a decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeThreshold {
    /// Fraction of the viewport width, resolution-independent
    Fraction(f64),
    /// Absolute displacement in input units
    Pixels(f64),
}

impl Default for SwipeThreshold {
    fn default() -> Self {
        SwipeThreshold::Fraction(0.3)
    }
}

impl SwipeThreshold {
    pub fn resolve(&self, viewport_width: f64) -> f64 {
        match *self {
            SwipeThreshold::Fraction(f) => f * viewport_width,
            SwipeThreshold::Pixels(px) => px,
        }
    }
}

/// Presentational feedback for an in-progress drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeFeedback {
    pub dx: f64,
    /// `min(|dx|, T) / T`, in `[0, 1]`
    pub progress: f64,
    /// Decision that releasing past the threshold would produce
    pub leaning: Option<Decision>,
    /// True only on the sample where `|dx|` first exceeds the threshold
    pub threshold_crossed: bool,
}

/// What the classifier made of one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureSignal {
    /// Input was not accepted (no drag in progress, or a decision is pending)
    Ignored,
    Progress(SwipeFeedback),
    Decided(Decision),
    /// Released under the threshold; the item should snap back
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ClassifierState {
    Idle,
    Tracking { dx: f64, dy: f64, past_threshold: bool },
    Locked,
}

#[derive(Debug, Clone)]
pub struct GestureClassifier {
    threshold: SwipeThreshold,
    polarity: Polarity,
    viewport_width: f64,
    state: ClassifierState,
}

impl GestureClassifier {
    pub fn new(threshold: SwipeThreshold, polarity: Polarity) -> Self {
        Self {
            threshold,
            polarity,
            viewport_width: 0.0,
            state: ClassifierState::Idle,
        }
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Threshold resolved against the current viewport
    pub fn threshold(&self) -> f64 {
        self.threshold.resolve(self.viewport_width)
    }

    /// Resolved threshold, or `None` while it is zero, negative or not finite.
    ///
    /// A fractional threshold stays unusable until a viewport width is set.
    pub fn usable_threshold(&self) -> Option<f64> {
        let t = self.threshold();
        (t.is_finite() && t > 0.0).then_some(t)
    }

    /// Presentational progress for a displacement. Depends on `dx` only.
    pub fn progress(&self, dx: f64) -> f64 {
        match self.usable_threshold() {
            Some(t) => dx.abs().min(t) / t,
            None => 0.0,
        }
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, ClassifierState::Tracking { .. })
    }

    /// True between a decision and the matching [`release`](Self::release)
    pub fn is_locked(&self) -> bool {
        self.state == ClassifierState::Locked
    }

    /// Current cumulative displacement, if a drag is in progress
    pub fn displacement(&self) -> Option<(f64, f64)> {
        match self.state {
            ClassifierState::Tracking { dx, dy, .. } => Some((dx, dy)),
            _ => None,
        }
    }

    pub fn handle(&mut self, sample: GestureSample) -> GestureSignal {
        match (sample.phase, self.state) {
            (_, ClassifierState::Locked) => GestureSignal::Ignored,

            (GesturePhase::Begin, _) if self.usable_threshold().is_none() => {
                self.state = ClassifierState::Idle;
                GestureSignal::Ignored
            }

            (GesturePhase::Begin, _) => {
                self.state = ClassifierState::Tracking {
                    dx: 0.0,
                    dy: 0.0,
                    past_threshold: false,
                };
                self.track(sample.dx, sample.dy)
            }

            (GesturePhase::Update, ClassifierState::Tracking { .. }) => {
                self.track(sample.dx, sample.dy)
            }

            (GesturePhase::End, ClassifierState::Tracking { .. }) => {
                let past = self
                    .usable_threshold()
                    .is_some_and(|t| sample.dx.abs() > t);
                if past {
                    if let Some(decision) = self.polarity.decision_for_dx(sample.dx) {
                        self.state = ClassifierState::Locked;
                        return GestureSignal::Decided(decision);
                    }
                }
                self.state = ClassifierState::Idle;
                GestureSignal::Cancelled
            }

            (GesturePhase::Update | GesturePhase::End, ClassifierState::Idle) => {
                GestureSignal::Ignored
            }
        }
    }

    /// Unlocks after the session has applied (or dismissed) a decision
    pub fn release(&mut self) {
        if self.state == ClassifierState::Locked {
            self.state = ClassifierState::Idle;
        }
    }

    /// Drops any drag in progress and any pending lock
    pub fn reset(&mut self) {
        self.state = ClassifierState::Idle;
    }

    fn track(&mut self, dx: f64, dy: f64) -> GestureSignal {
        let was_past = matches!(
            self.state,
            ClassifierState::Tracking {
                past_threshold: true,
                ..
            }
        );
        let is_past = self.usable_threshold().is_some_and(|t| dx.abs() > t);

        self.state = ClassifierState::Tracking {
            dx,
            dy,
            past_threshold: is_past,
        };

        GestureSignal::Progress(SwipeFeedback {
            dx,
            progress: self.progress(dx),
            leaning: self.polarity.decision_for_dx(dx),
            threshold_crossed: is_past && !was_past,
        })
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(SwipeThreshold::default(), Polarity::default())
    }
}
