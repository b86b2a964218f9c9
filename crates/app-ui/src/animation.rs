//! Time-based animation primitives
//!
//! Animations are driven by the caller's frame clock: each frame calls
//! [`Tween::tick`] with the elapsed time and reads back the current value.
//! Nothing here owns a timer, so cancelling is just dropping the tween.

use std::time::Duration;

use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Maps progress `t` in [0, 1] to eased progress in [0, 1]
pub type EasingFn = fn(f64) -> f64;

/// Constant velocity
#[inline]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out
#[inline]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Cubic ease-out (fast start, gentle landing)
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Interpolates a [`Point`] from `from` to `to` over a duration.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: Point,
    to: Point,
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Tween {
    /// Create a tween with cubic ease-out
    pub fn new(from: Point, to: Point, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: ease_out_cubic,
        }
    }

    /// Set the easing function
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Advance by `dt`
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Whether the end value has been reached
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self) -> f64 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Current interpolated value
    pub fn value(&self) -> Point {
        if self.is_complete() {
            return self.to;
        }
        self.from.lerp(self.to, (self.easing)(self.progress()))
    }

    /// Start value
    pub fn from(&self) -> Point {
        self.from
    }

    /// End value
    pub fn target(&self) -> Point {
        self.to
    }

    /// Restart towards a new target from the current value, keeping the
    /// remaining time.
    pub fn retarget(&mut self, to: Point) {
        if to == self.to {
            return;
        }
        let current = self.value();
        let remaining = self.duration.saturating_sub(self.elapsed);
        *self = Tween::new(current, to, remaining).easing(self.easing);
    }
}
