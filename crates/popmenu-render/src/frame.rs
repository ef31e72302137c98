#![forbid(unsafe_code)]

//! Frame = display list + metadata for a render pass.
//!
//! The `Frame` is the render target widgets write to. It records draw
//! commands in paint order, tracks nested opacity and clip scopes, and
//! collects hit regions so the host can route taps back to widgets.
//!
//! # Usage
//!
//! ```
//! use popmenu_core::geometry::{Rect, Size};
//! use popmenu_render::{Frame, HitId, HitRegion, Rgba};
//!
//! let mut frame = Frame::with_hit_testing(Size::new(400.0, 800.0));
//! frame.push_opacity(0.5);
//! frame.fill_rect(Rect::new(10.0, 10.0, 100.0, 40.0), Rgba::WHITE, 4.0);
//! frame.pop_opacity();
//! frame.register_hit(Rect::new(10.0, 10.0, 100.0, 40.0), HitId::new(1), HitRegion::Content, 0);
//! assert!(frame.hit_test(popmenu_core::geometry::Point::new(20.0, 20.0)).is_some());
//! ```

use popmenu_core::geometry::{Point, Rect, Size};

use crate::color::Rgba;

/// Identifier for a clickable region.
///
/// Widgets register hit regions with unique IDs to receive taps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitId(pub u32);

impl HitId {
    /// Create a new hit ID from a raw value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Opaque user data for hit callbacks.
pub type HitData = u64;

/// Regions within a widget for pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HitRegion {
    /// No interactive region.
    #[default]
    None,
    /// Main content area.
    Content,
    /// Clickable button.
    Button,
    /// Custom region tag.
    Custom(u8),
}

/// One recorded drawing operation, in paint order.
///
/// Colors already carry the effective opacity of the scope they were drawn
/// in; the explicit opacity markers let backends that composite layers do
/// so instead.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Start an opacity group (the value is the effective, multiplied opacity).
    PushOpacity(f32),
    /// End the innermost opacity group.
    PopOpacity,
    /// Start clipping to a rect (already intersected with outer clips).
    PushClip(Rect),
    /// End the innermost clip.
    PopClip,
    /// Filled, optionally rounded rectangle.
    FillRect { rect: Rect, color: Rgba, radius: f32 },
    /// Drop shadow behind a rectangle.
    Shadow {
        rect: Rect,
        radius: f32,
        color: Rgba,
        offset: Point,
        blur: f32,
    },
    /// Filled triangle.
    Triangle { points: [Point; 3], color: Rgba },
}

#[derive(Debug, Clone, PartialEq)]
struct HitEntry {
    rect: Rect,
    id: HitId,
    region: HitRegion,
    data: HitData,
}

#[derive(Debug, Clone, PartialEq)]
struct Annotation {
    id: String,
    rect: Rect,
}

/// Frame = display list + metadata for a render pass.
#[derive(Debug, Clone)]
pub struct Frame {
    viewport: Size,
    commands: Vec<DrawCommand>,
    /// `Some` when hit testing is enabled.
    hits: Option<Vec<HitEntry>>,
    annotations: Vec<Annotation>,
    opacity_stack: Vec<f32>,
    clip_stack: Vec<Rect>,
}

impl Frame {
    /// Create a new frame covering `viewport`, without hit testing.
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
            hits: None,
            annotations: Vec::new(),
            opacity_stack: Vec::new(),
            clip_stack: Vec::new(),
        }
    }

    /// Create a frame with hit testing enabled.
    pub fn with_hit_testing(viewport: Size) -> Self {
        let mut frame = Self::new(viewport);
        frame.enable_hit_testing();
        frame
    }

    /// Enable hit testing on an existing frame.
    pub fn enable_hit_testing(&mut self) {
        if self.hits.is_none() {
            self.hits = Some(Vec::new());
        }
    }

    /// Viewport size.
    #[inline]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Get the bounding rectangle of the frame.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.viewport)
    }

    /// Resize the viewport and clear the frame.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.clear();
    }

    /// Clear frame for next render.
    ///
    /// Resets commands, hit regions (if enabled), annotations and scopes.
    pub fn clear(&mut self) {
        self.commands.clear();
        if let Some(ref mut hits) = self.hits {
            hits.clear();
        }
        self.annotations.clear();
        self.opacity_stack.clear();
        self.clip_stack.clear();
    }

    /// Recorded commands in paint order.
    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Effective opacity of the current scope.
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity_stack.last().copied().unwrap_or(1.0)
    }

    /// Current clip rect (the viewport when no clip is active).
    #[inline]
    pub fn clip(&self) -> Rect {
        self.clip_stack.last().copied().unwrap_or_else(|| self.bounds())
    }

    /// Enter an opacity scope; nested scopes multiply.
    pub fn push_opacity(&mut self, opacity: f32) {
        let opacity = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        let effective = self.opacity() * opacity;
        self.opacity_stack.push(effective);
        self.commands.push(DrawCommand::PushOpacity(effective));
    }

    /// Leave the innermost opacity scope. Unbalanced pops are ignored.
    pub fn pop_opacity(&mut self) {
        if self.opacity_stack.pop().is_some() {
            self.commands.push(DrawCommand::PopOpacity);
        }
    }

    /// Enter a clip scope; nested clips intersect.
    pub fn push_clip(&mut self, rect: Rect) {
        let clipped = self.clip().intersection(&rect);
        self.clip_stack.push(clipped);
        self.commands.push(DrawCommand::PushClip(clipped));
    }

    /// Leave the innermost clip scope. Unbalanced pops are ignored.
    pub fn pop_clip(&mut self) {
        if self.clip_stack.pop().is_some() {
            self.commands.push(DrawCommand::PopClip);
        }
    }

    /// Fill a rounded rectangle.
    ///
    /// Fully transparent or fully clipped fills are dropped.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba, radius: f32) {
        let color = color.with_opacity(self.opacity());
        if color.is_transparent() || self.clip().intersection_opt(&rect).is_none() {
            return;
        }
        self.commands.push(DrawCommand::FillRect {
            rect,
            color,
            radius: radius.max(0.0),
        });
    }

    /// Draw a drop shadow behind `rect`.
    pub fn shadow(&mut self, rect: Rect, radius: f32, color: Rgba, offset: Point, blur: f32) {
        let color = color.with_opacity(self.opacity());
        if color.is_transparent() || rect.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Shadow {
            rect,
            radius: radius.max(0.0),
            color,
            offset,
            blur: blur.max(0.0),
        });
    }

    /// Fill a triangle.
    pub fn fill_triangle(&mut self, points: [Point; 3], color: Rgba) {
        let color = color.with_opacity(self.opacity());
        if color.is_transparent() {
            return;
        }
        self.commands.push(DrawCommand::Triangle { points, color });
    }

    /// Register a hit region (if hit testing is enabled).
    ///
    /// The region is clipped to the current clip. Later registrations sit on
    /// top of earlier ones. Returns `true` if the region was registered.
    pub fn register_hit(&mut self, rect: Rect, id: HitId, region: HitRegion, data: HitData) -> bool {
        let Some(clipped) = self.clip().intersection_opt(&rect) else {
            return false;
        };
        if let Some(ref mut hits) = self.hits {
            hits.push(HitEntry {
                rect: clipped,
                id,
                region,
                data,
            });
            true
        } else {
            false
        }
    }

    /// Register a hit region with default metadata (Content, data=0).
    pub fn register_hit_region(&mut self, rect: Rect, id: HitId) -> bool {
        self.register_hit(rect, id, HitRegion::Content, 0)
    }

    /// Hit test at the given position (if hit testing is enabled).
    ///
    /// Returns the topmost region containing the point.
    pub fn hit_test(&self, point: Point) -> Option<(HitId, HitRegion, HitData)> {
        self.hits.as_ref().and_then(|hits| {
            hits.iter()
                .rev()
                .find(|hit| hit.rect.contains(point))
                .map(|hit| (hit.id, hit.region, hit.data))
        })
    }

    /// Attach an addressable identifier to a rect (for hosts and tests).
    pub fn annotate(&mut self, id: impl Into<String>, rect: Rect) {
        self.annotations.push(Annotation {
            id: id.into(),
            rect,
        });
    }

    /// Look up the most recent rect annotated with `id`.
    pub fn find_annotation(&self, id: &str) -> Option<Rect> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.id == id)
            .map(|a| a.rect)
    }
}

impl Default for Frame {
    /// Create a 1x1 frame (minimum size).
    fn default() -> Self {
        Self::new(Size::new(1.0, 1.0))
    }
}
