#![forbid(unsafe_code)]

//! Menu show/hide animation driver.
//!
//! Two channels drive the overlay: a 2D size channel that grows from zero to
//! the measured overlay size, and an opacity channel. Showing runs both in
//! parallel; hiding fades opacity only and leaves the size where it is.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use popmenu_core::geometry::Size;
//! use popmenu_widgets::menu::animation::{AnimationDriver, DriverEvent, MenuAnimationConfig};
//!
//! let config = MenuAnimationConfig::default();
//! let mut driver = AnimationDriver::new();
//! driver.start_show(Size::new(200.0, 150.0), &config);
//!
//! let mut settled = None;
//! for _ in 0..30 {
//!     if let Some(event) = driver.tick(Duration::from_millis(16)) {
//!         settled = Some(event);
//!         break;
//!     }
//! }
//! assert_eq!(settled, Some(DriverEvent::Shown));
//! assert_eq!(driver.size(), Size::new(200.0, 150.0));
//! ```
//!
//! # Invariants
//!
//! - Opacity stays in [0.0, 1.0].
//! - At most one direction is in flight; starting the other direction
//!   supersedes it from the current values.
//! - `DriverEvent::Hidden` is reported only once opacity has reached 0.
//!
//! # Failure Modes
//!
//! - Zero-duration configs complete on the next tick.
//! - Ticking an idle driver is a no-op.

use std::time::Duration;

use popmenu_core::animation::{AnimatedValue, AnimatedVec2, Easing};
use popmenu_core::geometry::Size;

/// Default duration of every menu transition.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);

/// Timing for menu transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuAnimationConfig {
    /// Duration shared by the grow, fade-in and fade-out.
    pub duration: Duration,
    /// Easing shared by all channels.
    pub easing: Easing,
}

impl Default for MenuAnimationConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            easing: Easing::default(),
        }
    }
}

impl MenuAnimationConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitions that complete on the next tick.
    pub fn none() -> Self {
        Self {
            duration: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Set the transition duration.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the easing curve.
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Check if transitions are effectively instant.
    pub fn is_disabled(&self) -> bool {
        self.duration.is_zero()
    }
}

/// Direction of the in-flight transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Showing,
    Hiding,
}

/// Settlement reported by [`AnimationDriver::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    /// Size and opacity both reached their show targets.
    Shown,
    /// Opacity reached 0 after a hide.
    Hidden,
}

/// Drives the size and opacity channels of one menu.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationDriver {
    size: AnimatedVec2,
    opacity: AnimatedValue,
    direction: Option<Direction>,
}

impl AnimationDriver {
    /// A driver with both channels at rest at zero.
    pub fn new() -> Self {
        Self {
            size: AnimatedVec2::rest(0.0, 0.0),
            opacity: AnimatedValue::rest(0.0),
            direction: None,
        }
    }

    /// Current animated overlay size.
    #[inline]
    pub fn size(&self) -> Size {
        self.size.as_size()
    }

    /// Current opacity.
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity.get().clamp(0.0, 1.0)
    }

    /// Whether a show transition is in flight.
    #[inline]
    pub fn is_showing(&self) -> bool {
        self.direction == Some(Direction::Showing)
    }

    /// Whether a hide transition is in flight.
    #[inline]
    pub fn is_hiding(&self) -> bool {
        self.direction == Some(Direction::Hiding)
    }

    /// Whether any channel is moving.
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.size.is_animating() || self.opacity.is_animating()
    }

    /// Whether both channels rest at zero with nothing in flight.
    pub fn is_at_rest(&self) -> bool {
        self.direction.is_none()
            && !self.is_animating()
            && self.size() == Size::ZERO
            && self.opacity.get() == 0.0
    }

    /// Grow to `target` and fade in, in parallel.
    pub fn start_show(&mut self, target: Size, config: &MenuAnimationConfig) {
        self.size.animate_to(target.width, target.height, config.duration, config.easing);
        self.opacity.animate_to(1.0, config.duration, config.easing);
        self.direction = Some(Direction::Showing);
    }

    /// Fade back in without touching the size channel.
    ///
    /// Used when a show supersedes a hide that is still fading.
    pub fn start_fade_in(&mut self, config: &MenuAnimationConfig) {
        self.opacity.animate_to(1.0, config.duration, config.easing);
        self.direction = Some(Direction::Showing);
    }

    /// Fade out. Size is left as is.
    pub fn start_hide(&mut self, config: &MenuAnimationConfig) {
        self.opacity.animate_to(0.0, config.duration, config.easing);
        self.direction = Some(Direction::Hiding);
    }

    /// Jump the size channel to `size` (content reflow after settling).
    pub fn snap_size(&mut self, size: Size) {
        self.size.set(size.width, size.height);
    }

    /// Replace both channels with fresh zero-state values.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance both channels by `dt`.
    ///
    /// Returns the settlement reached during this tick, if any.
    pub fn tick(&mut self, dt: Duration) -> Option<DriverEvent> {
        let direction = self.direction?;
        self.size.tick(dt);
        self.opacity.tick(dt);

        let settled = match direction {
            Direction::Showing => !self.is_animating(),
            Direction::Hiding => !self.opacity.is_animating(),
        };
        if !settled {
            return None;
        }
        self.direction = None;
        Some(match direction {
            Direction::Showing => DriverEvent::Shown,
            Direction::Hiding => DriverEvent::Hidden,
        })
    }
}
