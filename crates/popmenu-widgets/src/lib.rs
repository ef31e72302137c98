#![forbid(unsafe_code)]

//! Widgets for popmenu.
//!
//! The crate's one real widget is [`menu::Menu`]: a trigger that reveals an
//! anchored, animated overlay panel. Leaf content (rows, dividers) is any
//! type implementing [`Widget`].

pub mod menu;

use popmenu_core::geometry::{Rect, Size};
use popmenu_render::Frame;

/// A `Widget` is a renderable component.
///
/// Widgets render themselves into a `Frame` within a given `Rect`.
pub trait Widget {
    /// Render the widget into the frame at the given area.
    fn render(&self, area: Rect, frame: &mut Frame);

    /// Natural size of the widget when offered `available` space.
    ///
    /// The default fills whatever is offered.
    fn measure(&self, available: Size) -> Size {
        available
    }
}

/// A `StatefulWidget` is a widget that renders based on mutable state.
pub trait StatefulWidget {
    type State;
    /// Render the widget into the frame with mutable state.
    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State);
}

impl<W: Widget + ?Sized> Widget for &W {
    fn render(&self, area: Rect, frame: &mut Frame) {
        (**self).render(area, frame);
    }

    fn measure(&self, available: Size) -> Size {
        (**self).measure(available)
    }
}
