//! Pan gesture recognizer
//!
//! Touches start unclaimed so taps reach the lesson nodes. The gesture only
//! takes over once the pointer travels past the drag threshold on either
//! axis; from then on every move sets `pan_start + delta`, clamped to the
//! bounds current at that moment.

use super::layout::PanBounds;
use crate::geometry::Point;

/// Recognizer phase
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GesturePhase {
    /// No claimed pan in progress
    #[default]
    Idle,
    /// Pan claimed; `pan_start` is the translation when it was claimed
    Dragging {
        /// Translation at claim time
        pan_start: Point,
    },
}

/// Result of feeding a move event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Below threshold; let the touch through to whatever is under it
    PassThrough,
    /// Translation to apply
    Pan(Point),
}

/// Threshold-gated drag-to-pan
#[derive(Debug, Clone)]
pub struct PanGesture {
    threshold: f64,
    phase: GesturePhase,
}

impl PanGesture {
    /// Create a recognizer with the given activation distance
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            phase: GesturePhase::Idle,
        }
    }

    /// Current phase
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Whether a pan is in progress
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, GesturePhase::Dragging { .. })
    }

    /// Never claim on press; taps belong to the nodes
    pub fn should_claim_on_press(&self) -> bool {
        false
    }

    /// Claim once movement exceeds the threshold on either axis
    pub fn should_claim_on_move(&self, delta: Point) -> bool {
        delta.x.abs() > self.threshold || delta.y.abs() > self.threshold
    }

    /// Feed the accumulated delta since press. `current` is the live
    /// translation, captured as the pan start when the gesture claims.
    pub fn on_move(&mut self, delta: Point, current: Point, bounds: &PanBounds) -> GestureOutcome {
        let pan_start = match self.phase {
            GesturePhase::Dragging { pan_start } => pan_start,
            GesturePhase::Idle => {
                if !self.should_claim_on_move(delta) {
                    return GestureOutcome::PassThrough;
                }
                tracing::trace!(?current, "pan claimed");
                self.phase = GesturePhase::Dragging { pan_start: current };
                current
            }
        };
        GestureOutcome::Pan(bounds.clamp(pan_start + delta))
    }

    /// Finish the touch. Returns true when it was a pan rather than a tap.
    pub fn on_release(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.phase = GesturePhase::Idle;
        was_dragging
    }

    /// Abort the touch (system took it, component went away)
    pub fn on_cancel(&mut self) {
        self.phase = GesturePhase::Idle;
    }
}

impl Default for PanGesture {
    fn default() -> Self {
        Self::new(crate::tokens::gesture::DRAG_THRESHOLD)
    }
}
