//! Camera controller
//!
//! Owns the single translation applied to the map content layer. Animated
//! focus transitions and direct drags both write through the same cell, so a
//! synchronous read always sees what is on screen.

use app_platform::ReduceMotion;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::layout::PanBounds;
use crate::animation::Tween;
use crate::geometry::{Point, Viewport};

/// What a focus request did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusOutcome {
    /// Unknown node or no viewport yet
    Ignored,
    /// Translation set immediately
    Jumped(Point),
    /// A transition towards the target started
    Animating {
        /// Clamped end translation
        target: Point,
    },
}

/// Translation state for the lesson map
pub struct CameraController {
    translation: Point,
    viewport: Viewport,
    bounds: PanBounds,
    animation: Option<Tween>,
    focus_duration: Duration,
    reduce_motion: Arc<dyn ReduceMotion>,
}

impl std::fmt::Debug for CameraController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraController")
            .field("translation", &self.translation)
            .field("viewport", &self.viewport)
            .field("bounds", &self.bounds)
            .field("animation", &self.animation)
            .field("focus_duration", &self.focus_duration)
            .field("reduce_motion", &self.reduce_motion.is_enabled())
            .finish()
    }
}

impl CameraController {
    /// Create a camera at the origin with no viewport
    pub fn new(reduce_motion: Arc<dyn ReduceMotion>, focus_duration: Duration) -> Self {
        Self {
            translation: Point::ZERO,
            viewport: Viewport::default(),
            bounds: PanBounds::default(),
            animation: None,
            focus_duration,
            reduce_motion,
        }
    }

    /// Current translation
    pub fn translation(&self) -> Point {
        self.translation
    }

    /// Current pan bounds
    pub fn bounds(&self) -> PanBounds {
        self.bounds
    }

    /// Current viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether a focus transition is in flight
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Target of the in-flight transition
    pub fn animation_target(&self) -> Option<Point> {
        self.animation.map(|tween| tween.target())
    }

    /// Apply new viewport and bounds. Re-clamps the stored translation and
    /// any in-flight target so neither can sit outside the new range.
    pub fn set_layout(&mut self, viewport: Viewport, bounds: PanBounds) {
        self.viewport = viewport;
        self.bounds = bounds;

        let clamped = bounds.clamp(self.translation);
        if clamped != self.translation {
            tracing::debug!(?clamped, "translation re-clamped to new bounds");
            self.translation = clamped;
        }

        if let Some(tween) = self.animation.as_mut() {
            let target = bounds.clamp(tween.target());
            tween.retarget(target);
        }
    }

    /// Set the translation directly, clamped to the current bounds. Cancels
    /// any running transition.
    pub fn set_translation(&mut self, translation: Point) -> Point {
        self.cancel_animation();
        self.translation = self.bounds.clamp(translation);
        self.translation
    }

    /// Move the camera so `center` (content coordinates) lands in the middle
    /// of the viewport, as far as the bounds allow.
    pub fn focus_on(&mut self, center: Point, animated: bool) -> FocusOutcome {
        if self.viewport.is_empty() {
            return FocusOutcome::Ignored;
        }

        let target = self.bounds.clamp(self.viewport.center() - center);

        // a new request always supersedes the old one
        self.cancel_animation();

        if animated && !self.reduce_motion.is_enabled() && target != self.translation {
            tracing::debug!(?target, from = ?self.translation, "focus transition started");
            self.animation = Some(Tween::new(self.translation, target, self.focus_duration));
            FocusOutcome::Animating { target }
        } else {
            self.translation = target;
            FocusOutcome::Jumped(target)
        }
    }

    /// Focus a node by id using precomputed centers. Unknown ids are ignored.
    pub fn focus_on_node(
        &mut self,
        node_id: &str,
        centers: &HashMap<String, Point>,
        animated: bool,
    ) -> FocusOutcome {
        match centers.get(node_id) {
            Some(center) => self.focus_on(*center, animated),
            None => FocusOutcome::Ignored,
        }
    }

    /// Advance the transition by one frame and return the translation
    pub fn tick(&mut self, dt: Duration) -> Point {
        if let Some(tween) = self.animation.as_mut() {
            tween.tick(dt);
            self.translation = self.bounds.clamp(tween.value());
            if tween.is_complete() {
                self.animation = None;
            }
        }
        self.translation
    }

    /// Jump straight to the end of the running transition
    pub fn finish_animation(&mut self) {
        if let Some(tween) = self.animation.take() {
            self.translation = self.bounds.clamp(tween.target());
        }
    }

    /// Stop the running transition where it is
    pub fn cancel_animation(&mut self) {
        if self.animation.take().is_some() {
            tracing::debug!(at = ?self.translation, "focus transition cancelled");
        }
    }
}
