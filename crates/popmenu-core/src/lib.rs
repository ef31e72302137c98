#![forbid(unsafe_code)]

//! Core: geometry, animation primitives, and host events.
//!
//! # Role in popmenu
//! `popmenu-core` is the host-independent layer. It owns the logical-unit
//! geometry used by placement math, the tick-driven animation primitives the
//! menu drives, and the normalized events a host feeds into the widget.
//!
//! # Primary responsibilities
//! - **Geometry**: `Point`, `Size`, `Rect`, `Sides` in logical (float) units.
//! - **Animation**: the [`animation::Animation`] trait, easing curves
//!   (including cubic Bézier), tweens, and animatable value channels.
//! - **Event**: taps, back requests, host dismissal and viewport resizes.
//! - **Platform**: host platform identity for platform-specific constants.
//!
//! # How it fits in the system
//! `popmenu-render` builds its `Frame` on this geometry, and
//! `popmenu-widgets` drives the animation channels from `MenuState`.

pub mod animation;
pub mod clock;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod platform;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
