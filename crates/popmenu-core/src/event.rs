#![forbid(unsafe_code)]

//! Canonical host event types.
//!
//! Hosts translate their native input and window signals into [`Event`]
//! values before handing them to widgets.
//!
//! # Design Notes
//!
//! - Pointer coordinates are viewport-space logical units.
//! - `BackRequested` covers every "request to close" gesture a host has
//!   (hardware back, system dismiss gestures, Escape on desktop).
//! - `HostDismissed` is emitted by hosts whose overlay surface reports its
//!   own dismissal after it has been torn down.

use crate::geometry::{Point, Size};

/// Canonical host event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A completed press (down + up) at a viewport position.
    Tap(TapEvent),

    /// The host asked the topmost surface to close.
    BackRequested,

    /// The host's overlay surface reported that it was dismissed.
    HostDismissed,

    /// The viewport changed size (rotation, window resize).
    Resize(Size),
}

impl Event {
    /// Convenience constructor for a tap.
    #[must_use]
    pub const fn tap(x: f32, y: f32) -> Self {
        Self::Tap(TapEvent::new(Point::new(x, y)))
    }

    /// Position of pointer events.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::Tap(tap) => Some(tap.position),
            Self::BackRequested | Self::HostDismissed | Self::Resize(_) => None,
        }
    }
}

/// A tap gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapEvent {
    /// Where the press was released.
    pub position: Point,
}

impl TapEvent {
    /// Create a new tap event.
    #[must_use]
    pub const fn new(position: Point) -> Self {
        Self { position }
    }
}
