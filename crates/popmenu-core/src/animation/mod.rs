#![forbid(unsafe_code)]

//! Tick-driven animation primitives.
//!
//! Animations advance only when the host calls [`Animation::tick`] with the
//! elapsed frame time; nothing here reads a wall clock. This keeps every
//! transition deterministic under test.
//!
//! # Building blocks
//!
//! | Type | Role |
//! |------|------|
//! | [`Easing`] / [`CubicBezier`] | progress curves |
//! | [`Tween`] | one timed interpolation between two scalars |
//! | [`AnimatedValue`] / [`AnimatedVec2`] | value channels a widget renders from |
//!
//! # Invariants
//!
//! 1. `Animation::value()` is always in [0.0, 1.0].
//! 2. Easing curves map 0.0 → 0.0 and 1.0 → 1.0.
//! 3. A zero-duration animation completes on its first tick.

mod bezier;
mod tween;
mod value;

use std::time::Duration;

pub use bezier::CubicBezier;
pub use tween::Tween;
pub use value::{AnimatedValue, AnimatedVec2};

/// Something that progresses over time.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation reached its end.
    fn is_complete(&self) -> bool;

    /// Normalized progress in [0.0, 1.0] after easing.
    fn value(&self) -> f32;

    /// Return to the initial state.
    fn reset(&mut self);
}

/// Linear easing.
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in.
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out.
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out.
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv / 2.0
    }
}

/// Cubic ease-out.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Easing curve selection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Accelerating.
    EaseIn,
    /// Decelerating.
    EaseOut,
    /// Smooth S-curve.
    EaseInOut,
    /// CSS-style cubic Bézier through (0,0), p1, p2, (1,1).
    Bezier(CubicBezier),
}

impl Default for Easing {
    /// Standard platform motion curve.
    fn default() -> Self {
        Self::Bezier(CubicBezier::STANDARD)
    }
}

impl Easing {
    /// Apply the easing to a progress value (clamped to 0.0-1.0).
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => linear(t),
            Self::EaseIn => ease_in(t),
            Self::EaseOut => ease_out(t),
            Self::EaseInOut => ease_in_out(t),
            Self::Bezier(curve) => curve.apply(t),
        }
    }
}
