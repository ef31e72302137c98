#![forbid(unsafe_code)]

//! Animatable value channels.
//!
//! A channel holds the value a widget renders from this frame plus, at most,
//! one in-flight [`Tween`] driving it. Starting a new animation on a channel
//! supersedes the previous one from wherever it currently is, so there is no
//! separate cancellation step.
//!
//! Channels are plain values: resetting one means replacing it with
//! [`AnimatedValue::rest`], which carries no residual tween.

use std::time::Duration;

use super::{Animation, Easing, Tween};
use crate::geometry::{Point, Size};

/// A scalar animation channel.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedValue {
    value: f32,
    tween: Option<Tween>,
}

impl Default for AnimatedValue {
    fn default() -> Self {
        Self::rest(0.0)
    }
}

impl AnimatedValue {
    /// A channel at rest at `value`.
    #[must_use]
    pub const fn rest(value: f32) -> Self {
        Self { value, tween: None }
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.value
    }

    /// Whether a tween is in flight.
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Target of the in-flight tween, if any.
    pub fn target(&self) -> Option<f32> {
        self.tween.as_ref().map(Tween::to)
    }

    /// Jump to `value`, dropping any in-flight tween.
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.tween = None;
    }

    /// Animate from the current value to `target`.
    pub fn animate_to(&mut self, target: f32, duration: Duration, easing: Easing) {
        self.tween = Some(Tween::new(self.value, target, duration).easing(easing));
    }

    /// Advance the in-flight tween.
    ///
    /// Returns `true` when the tween finished during this tick.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(tween) = self.tween.as_mut() else {
            return false;
        };
        tween.tick(dt);
        self.value = tween.current();
        if tween.is_complete() {
            self.tween = None;
            return true;
        }
        false
    }
}

/// A two-component animation channel (e.g. width/height).
///
/// Both axes always share the same duration and easing so they settle on
/// the same tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimatedVec2 {
    x: AnimatedValue,
    y: AnimatedValue,
}

impl AnimatedVec2 {
    /// A channel at rest at `(x, y)`.
    #[must_use]
    pub const fn rest(x: f32, y: f32) -> Self {
        Self {
            x: AnimatedValue::rest(x),
            y: AnimatedValue::rest(y),
        }
    }

    /// Current value as a point.
    #[inline]
    pub fn get(&self) -> Point {
        Point::new(self.x.get(), self.y.get())
    }

    /// Current value as a size.
    #[inline]
    pub fn as_size(&self) -> Size {
        Size::new(self.x.get(), self.y.get())
    }

    /// Whether either axis is in flight.
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.x.is_animating() || self.y.is_animating()
    }

    /// Jump to `(x, y)`, dropping any in-flight tween.
    pub fn set(&mut self, x: f32, y: f32) {
        self.x.set(x);
        self.y.set(y);
    }

    /// Animate both axes to the target.
    pub fn animate_to(&mut self, x: f32, y: f32, duration: Duration, easing: Easing) {
        self.x.animate_to(x, duration, easing);
        self.y.animate_to(y, duration, easing);
    }

    /// Advance both axes.
    ///
    /// Returns `true` when the last in-flight axis finished during this tick.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let was_animating = self.is_animating();
        self.x.tick(dt);
        self.y.tick(dt);
        was_animating && !self.is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_300: Duration = Duration::from_millis(300);

    #[test]
    fn rest_channel_does_not_move() {
        let mut v = AnimatedValue::rest(0.5);
        assert!(!v.tick(Duration::from_millis(16)));
        assert_eq!(v.get(), 0.5);
        assert!(!v.is_animating());
    }

    #[test]
    fn animate_to_reports_completion_once() {
        let mut v = AnimatedValue::default();
        v.animate_to(1.0, MS_300, Easing::default());
        assert_eq!(v.target(), Some(1.0));
        assert!(!v.tick(Duration::from_millis(100)));
        assert!(v.get() > 0.0 && v.get() < 1.0);
        assert!(v.tick(Duration::from_millis(200)));
        assert_eq!(v.get(), 1.0);
        assert!(!v.tick(Duration::from_millis(16)));
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let mut v = AnimatedValue::default();
        v.animate_to(1.0, MS_300, Easing::Linear);
        v.tick(Duration::from_millis(150));
        let mid = v.get();
        v.animate_to(0.0, MS_300, Easing::Linear);
        // No jump on retarget.
        assert_eq!(v.get(), mid);
        v.tick(MS_300);
        assert_eq!(v.get(), 0.0);
    }

    #[test]
    fn set_drops_tween() {
        let mut v = AnimatedValue::default();
        v.animate_to(1.0, MS_300, Easing::Linear);
        v.set(0.25);
        assert!(!v.is_animating());
        assert_eq!(v.get(), 0.25);
    }

    #[test]
    fn vec2_settles_both_axes_together() {
        let mut v = AnimatedVec2::default();
        v.animate_to(200.0, 150.0, MS_300, Easing::default());
        assert!(!v.tick(Duration::from_millis(299)));
        assert!(v.tick(Duration::from_millis(1)));
        assert_eq!(v.as_size(), Size::new(200.0, 150.0));
        assert_eq!(v.get(), Point::new(200.0, 150.0));
    }

    #[test]
    fn replacement_is_a_clean_slate() {
        let mut v = AnimatedVec2::default();
        v.animate_to(10.0, 10.0, MS_300, Easing::Linear);
        v.tick(Duration::from_millis(100));
        v = AnimatedVec2::rest(0.0, 0.0);
        assert!(!v.is_animating());
        assert_eq!(v.as_size(), Size::ZERO);
    }
}
