#![forbid(unsafe_code)]

//! Overlay placement relative to the trigger.
//!
//! Placement is a pure function of the anchor fixed at show time, the
//! trigger and overlay sizes, and the current viewport. It is recomputed on
//! every render because the viewport and overlay size may change while the
//! anchor stays put for the whole show cycle.
//!
//! # Invariants
//!
//! - A clamped anchor is never closer than [`SCREEN_INDENT`] to the top or
//!   left viewport edge.
//! - When an axis flips, the flipped coordinate is never further than
//!   `viewport - SCREEN_INDENT` along that axis.
//! - The two axes are decided independently; both may flip at once.
//!
//! # Failure Modes
//!
//! - Non-finite trigger coordinates clamp to the indent (`f32::max` drops NaN).
//! - An overlay larger than the viewport always flips; the flipped
//!   coordinate is still bounded by the far edge.

use popmenu_core::geometry::{Point, Rect, Size};

/// Minimum distance, in logical units, between the overlay and a viewport
/// edge.
pub const SCREEN_INDENT: f32 = 8.0;

/// Clamp a measured trigger origin into an anchor.
#[inline]
#[must_use]
pub fn clamp_anchor(origin: Point) -> Point {
    origin.max_each(SCREEN_INDENT)
}

/// Which axes were flipped to keep the overlay on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisFlips {
    /// The overlay grows leftward from the trigger's right edge.
    pub x: bool,
    /// The overlay grows upward from the trigger's bottom edge.
    pub y: bool,
}

impl AxisFlips {
    /// Whether any axis flipped.
    #[inline]
    pub const fn any(self) -> bool {
        self.x || self.y
    }

    /// Whether both axes flipped.
    #[inline]
    pub const fn both(self) -> bool {
        self.x && self.y
    }
}

/// Resolved overlay placement for one render.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    /// Effective left coordinate of the overlay's reference corner.
    pub left: f32,
    /// Effective top coordinate of the overlay's reference corner.
    pub top: f32,
    pub flips: AxisFlips,
}

impl Placement {
    /// Reference corner as a point.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Translation applied to the growing overlay.
    ///
    /// A flipped axis shifts the overlay back by its *animated* extent so it
    /// grows away from the reference corner.
    #[must_use]
    pub fn translation(&self, animated: Size) -> Point {
        Point::new(
            if self.flips.x { -animated.width } else { 0.0 },
            if self.flips.y { -animated.height } else { 0.0 },
        )
    }

    /// Overlay bounds for the given animated size, before variant offsets.
    #[must_use]
    pub fn overlay_rect(&self, animated: Size) -> Rect {
        let shift = self.translation(animated);
        Rect::from_origin_size(self.origin().offset(shift.x, shift.y), animated)
    }
}

/// Resolve placement for one axis.
///
/// Returns the effective coordinate and whether the axis flipped.
#[inline]
fn resolve_axis(anchor: f32, trigger: f32, overlay: f32, viewport: f32) -> (f32, bool) {
    if anchor > viewport - overlay - SCREEN_INDENT {
        ((viewport - SCREEN_INDENT).min(anchor + trigger), true)
    } else {
        (anchor, false)
    }
}

/// Compute overlay placement.
///
/// An axis flips when the overlay, placed at the anchor, would come closer
/// than [`SCREEN_INDENT`] to the far edge. The flipped coordinate moves to
/// the trigger's far edge, capped at `viewport - SCREEN_INDENT`.
#[must_use]
pub fn resolve(anchor: Point, trigger: Size, overlay: Size, viewport: Size) -> Placement {
    let (left, flip_x) = resolve_axis(anchor.x, trigger.width, overlay.width, viewport.width);
    let (top, flip_y) = resolve_axis(anchor.y, trigger.height, overlay.height, viewport.height);

    #[cfg(feature = "tracing")]
    if flip_x || flip_y {
        tracing::trace!(
            message = "menu.placement.flip",
            flip_x,
            flip_y,
            left,
            top,
            viewport_width = viewport.width,
            viewport_height = viewport.height,
        );
    }

    Placement {
        left,
        top,
        flips: AxisFlips {
            x: flip_x,
            y: flip_y,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(400.0, 800.0);

    #[test]
    fn anchor_clamps_to_indent() {
        assert_eq!(clamp_anchor(Point::ZERO), Point::new(8.0, 8.0));
        assert_eq!(clamp_anchor(Point::new(3.0, 50.0)), Point::new(8.0, 50.0));
        assert_eq!(
            clamp_anchor(Point::new(120.0, 64.0)),
            Point::new(120.0, 64.0)
        );
    }

    #[test]
    fn anchor_clamp_drops_nan() {
        let anchor = clamp_anchor(Point::new(f32::NAN, f32::NAN));
        assert_eq!(anchor, Point::new(SCREEN_INDENT, SCREEN_INDENT));
    }

    #[test]
    fn no_flip_when_overlay_fits() {
        let p = resolve(
            Point::new(20.0, 30.0),
            Size::new(40.0, 20.0),
            Size::new(200.0, 150.0),
            VIEWPORT,
        );
        assert_eq!(p.flips, AxisFlips::default());
        assert_eq!(p.origin(), Point::new(20.0, 30.0));
        assert_eq!(p.translation(Size::new(200.0, 150.0)), Point::ZERO);
    }

    #[test]
    fn right_edge_flips_x_only() {
        let p = resolve(
            Point::new(350.0, 10.0),
            Size::new(40.0, 20.0),
            Size::new(200.0, 150.0),
            VIEWPORT,
        );
        assert!(p.flips.x);
        assert!(!p.flips.y);
        // min(400 - 8, 350 + 40)
        assert_eq!(p.left, 390.0);
        assert_eq!(p.top, 10.0);
    }

    #[test]
    fn flipped_coordinate_is_capped_by_indent() {
        // Trigger edge at 410 lies past the cap.
        let p = resolve(
            Point::new(350.0, 10.0),
            Size::new(60.0, 20.0),
            Size::new(200.0, 150.0),
            VIEWPORT,
        );
        assert!(p.flips.x);
        assert_eq!(p.left, 392.0);
    }

    #[test]
    fn flipped_coordinate_prefers_trigger_edge() {
        // 250 + 200 + 8 > 400, trigger edge 290 is inside the cap.
        let p = resolve(
            Point::new(250.0, 10.0),
            Size::new(40.0, 20.0),
            Size::new(200.0, 150.0),
            VIEWPORT,
        );
        assert!(p.flips.x);
        assert_eq!(p.left, 290.0);
    }

    #[test]
    fn exact_fit_does_not_flip() {
        // anchor == viewport - overlay - indent sits on the boundary.
        let p = resolve(
            Point::new(192.0, 10.0),
            Size::new(40.0, 20.0),
            Size::new(200.0, 150.0),
            VIEWPORT,
        );
        assert!(!p.flips.x);
        assert_eq!(p.left, 192.0);
    }

    #[test]
    fn bottom_edge_flips_y_only() {
        let p = resolve(
            Point::new(20.0, 700.0),
            Size::new(40.0, 20.0),
            Size::new(200.0, 150.0),
            VIEWPORT,
        );
        assert!(!p.flips.x);
        assert!(p.flips.y);
        assert_eq!(p.top, 720.0);
    }

    #[test]
    fn bottom_right_corner_flips_both_independently() {
        let anchor = Point::new(350.0, 770.0);
        let trigger = Size::new(40.0, 20.0);
        let overlay = Size::new(200.0, 150.0);
        let p = resolve(anchor, trigger, overlay, VIEWPORT);
        assert!(p.flips.both());
        assert_eq!(p.left, 390.0);
        assert_eq!(p.top, 790.0);

        // Composite equals each axis resolved on its own.
        let x_only = resolve(Point::new(anchor.x, 10.0), trigger, overlay, VIEWPORT);
        let y_only = resolve(Point::new(20.0, anchor.y), trigger, overlay, VIEWPORT);
        assert_eq!(p.left, x_only.left);
        assert_eq!(p.top, y_only.top);

        // Fully grown overlay ends up above and left of the corner.
        let rect = p.overlay_rect(overlay);
        assert_eq!(rect, Rect::new(192.0, 640.0, 200.0, 150.0));
        assert!(rect.right() <= VIEWPORT.width - SCREEN_INDENT);
        assert!(rect.bottom() <= VIEWPORT.height - SCREEN_INDENT);
    }

    #[test]
    fn translation_tracks_animated_size() {
        let p = Placement {
            left: 392.0,
            top: 10.0,
            flips: AxisFlips { x: true, y: false },
        };
        assert_eq!(p.translation(Size::ZERO), Point::ZERO);
        assert_eq!(
            p.translation(Size::new(100.0, 75.0)),
            Point::new(-100.0, 0.0)
        );
        assert_eq!(
            p.overlay_rect(Size::new(100.0, 75.0)),
            Rect::new(292.0, 10.0, 100.0, 75.0)
        );
    }

    #[test]
    fn oversized_overlay_flips_and_stays_capped() {
        let p = resolve(
            Point::new(8.0, 8.0),
            Size::new(40.0, 20.0),
            Size::new(600.0, 900.0),
            VIEWPORT,
        );
        assert!(p.flips.both());
        assert_eq!(p.left, 48.0);
        assert_eq!(p.top, 28.0);
    }
}
