#![forbid(unsafe_code)]

//! Timed interpolation between two scalars.

use std::time::Duration;

use super::{Animation, Easing};

/// Interpolates `from` → `to` over a fixed duration with an easing curve.
///
/// `value()` reports eased progress in [0.0, 1.0]; [`Tween::current`]
/// reports the interpolated scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    /// Create a tween. A zero duration completes on the first tick.
    #[must_use]
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing: Easing::default(),
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Start value.
    pub fn from(&self) -> f32 {
        self.from
    }

    /// Target value.
    pub fn to(&self) -> f32 {
        self.to
    }

    /// Total duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Raw (un-eased) progress in [0.0, 1.0].
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return if self.elapsed.is_zero() { 0.0 } else { 1.0 };
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }

    /// Interpolated scalar at the current time.
    pub fn current(&self) -> f32 {
        if self.is_complete() {
            return self.to;
        }
        self.from + (self.to - self.from) * self.value()
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        // A zero-duration tween still needs one tick to register completion.
        let dt = if self.duration.is_zero() && dt.is_zero() {
            Duration::from_nanos(1)
        } else {
            dt
        };
        let next = self.elapsed.saturating_add(dt);
        self.elapsed = if self.duration.is_zero() {
            next
        } else {
            next.min(self.duration)
        };
    }

    fn is_complete(&self) -> bool {
        !self.elapsed.is_zero() && self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
