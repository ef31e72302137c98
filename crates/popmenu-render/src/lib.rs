#![forbid(unsafe_code)]

//! Render surface: display list, colors, and hit regions.
//!
//! # Role in popmenu
//! Widgets render into a [`frame::Frame`]: an ordered list of draw commands
//! (filled rects, triangles, shadows) with opacity and clip scopes, plus the
//! hit regions and instance-id annotations hosts use to route taps and
//! address widgets in tests. A host backend replays the command list with its
//! native drawing API.

pub mod color;
pub mod frame;

pub use color::Rgba;
pub use frame::{DrawCommand, Frame, HitData, HitId, HitRegion};
