#![forbid(unsafe_code)]

//! Overlay surface for a mounted menu.
//!
//! The overlay covers the whole viewport. It draws, back to front:
//! 1) an invisible capture hit layer (taps outside the panel close the menu),
//! 2) the pointer triangle at the trigger,
//! 3) the panel shadow and background, then the content clipped to the
//!    panel's animated bounds.
//!
//! Everything above the capture layer is drawn inside one opacity scope
//! driven by the menu's opacity channel.
//!
//! # Invariants
//!
//! - Nothing is drawn or registered unless the menu is mounted.
//! - Placement is resolved against the frame viewport on every render.
//! - The content's natural size is reported to the state before placement
//!   is resolved, so the first mounted render already starts the grow.

use popmenu_core::geometry::{Point, Rect, Size};
use popmenu_render::Frame;

use super::position::{self, Placement, SCREEN_INDENT};
use super::state::MenuState;
use super::style::{PanelStyle, PointerGeometry};
use super::{MENU_HIT_CAPTURE, MENU_HIT_PANEL, MenuConfig};
use crate::Widget;

/// Geometry of one overlay render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    pub placement: Placement,
    /// Panel bounds (animated size once the grow has started).
    pub panel: Rect,
    /// Content bounds at natural size; clipped to `panel` when drawn.
    pub content: Rect,
    /// Pointer triangle vertices.
    pub pointer: [Point; 3],
    pub opacity: f32,
}

/// Renders the overlay of a mounted menu.
#[derive(Debug)]
pub struct OverlayHost<'a, C> {
    content: &'a C,
    config: &'a MenuConfig,
}

impl<'a, C: Widget> OverlayHost<'a, C> {
    /// Create a host for `content` under `config`.
    pub fn new(content: &'a C, config: &'a MenuConfig) -> Self {
        Self { content, config }
    }

    /// Space offered to the content when measuring its natural size.
    pub fn available(&self, viewport: Size) -> Size {
        let inset = self.config.variant.trailing_inset();
        Size::new(
            (viewport.width - 2.0 * SCREEN_INDENT - inset.horizontal_sum()).max(0.0),
            (viewport.height - 2.0 * SCREEN_INDENT - inset.vertical_sum()).max(0.0),
        )
    }

    /// Natural content size for `viewport`.
    pub fn natural_size(&self, viewport: Size) -> Size {
        let available = self.available(viewport);
        self.content.measure(available).min(available)
    }

    /// Resolve the overlay geometry from the current state.
    pub fn layout(&self, viewport: Size, natural: Size, state: &MenuState) -> OverlayLayout {
        let variant = self.config.variant;
        let placement = position::resolve(
            state.anchor(),
            state.trigger_size(),
            state.overlay_size(),
            viewport,
        );

        let animated = state.animated_size();
        let shift = placement.translation(animated);
        let offset = variant.panel_offset();
        let panel_origin = placement
            .origin()
            .offset(offset.x + shift.x, offset.y + shift.y);
        let panel_size = if state.content_measured() {
            animated
        } else {
            natural
        };

        let pointer_corner = if variant.pointer_follows_panel() {
            placement.origin().offset(shift.x, shift.y)
        } else {
            placement.origin()
        };
        let pointer = PointerGeometry::for_variant(variant, self.config.platform)
            .triangle(pointer_corner);

        OverlayLayout {
            placement,
            panel: Rect::from_origin_size(panel_origin, panel_size),
            content: Rect::from_origin_size(panel_origin, natural),
            pointer,
            opacity: state.opacity(),
        }
    }

    /// Render the overlay and report the content's natural size to `state`.
    pub fn render(&self, frame: &mut Frame, state: &mut MenuState) {
        if !state.is_mounted() {
            return;
        }

        let viewport = frame.viewport();
        let natural = self.natural_size(viewport);
        state.on_overlay_layout(natural);
        let layout = self.layout(viewport, natural, state);

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "MenuOverlay",
            x = layout.panel.x,
            y = layout.panel.y,
            w = layout.panel.width,
            h = layout.panel.height,
            opacity = layout.opacity
        )
        .entered();

        if let Some(hit_id) = self.config.hit_id {
            frame.register_hit(frame.bounds(), hit_id, MENU_HIT_CAPTURE, 0);
        }

        let style =
            PanelStyle::platform_default(self.config.platform).merged(&self.config.panel_style);

        frame.push_opacity(layout.opacity);
        frame.fill_triangle(layout.pointer, style.background);
        if !layout.panel.is_empty() {
            if let Some((color, offset, blur)) = style.shadow.resolve() {
                frame.shadow(layout.panel, style.corner_radius, color, offset, blur);
            }
            frame.fill_rect(layout.panel, style.background, style.corner_radius);
        }
        if let Some(hit_id) = self.config.hit_id {
            frame.register_hit(layout.panel, hit_id, MENU_HIT_PANEL, 0);
        }
        frame.push_clip(layout.panel);
        self.content.render(layout.content, frame);
        frame.pop_clip();
        frame.pop_opacity();
    }
}
