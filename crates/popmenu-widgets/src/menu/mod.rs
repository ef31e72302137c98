#![forbid(unsafe_code)]

//! Anchored popup menu.
//!
//! A [`Menu`] renders a trigger and, while its [`MenuState`] is mounted, an
//! overlay panel anchored at the trigger. The panel grows and fades in when
//! shown, fades out when hidden, and flips to the other side of the trigger
//! when it would overflow the viewport.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use popmenu_core::geometry::{Rect, Size};
//! use popmenu_render::{Frame, HitId};
//! use popmenu_widgets::menu::{Lifecycle, Menu, MenuState};
//! use popmenu_widgets::{StatefulWidget, Widget};
//!
//! struct Fixed(Size);
//! impl Widget for Fixed {
//!     fn render(&self, _area: Rect, _frame: &mut Frame) {}
//!     fn measure(&self, _available: Size) -> Size { self.0 }
//! }
//!
//! let menu = Menu::new(Fixed(Size::new(40.0, 20.0)), Fixed(Size::new(200.0, 150.0)))
//!     .hit_id(HitId::new(1));
//! let mut state = MenuState::new();
//! let viewport = Size::new(400.0, 800.0);
//! let area = Rect::new(350.0, 10.0, 40.0, 20.0);
//!
//! let mut frame = Frame::with_hit_testing(viewport);
//! menu.render(area, &mut frame, &mut state);
//!
//! let request = state.show();
//! state.measure_from_last_layout(request);
//! assert_eq!(state.lifecycle(), Lifecycle::Shown);
//!
//! // The first mounted render measures the content and starts the grow.
//! frame.clear();
//! menu.render(area, &mut frame, &mut state);
//! assert_eq!(state.lifecycle(), Lifecycle::Animating);
//!
//! while state.lifecycle() == Lifecycle::Animating {
//!     state.tick(Duration::from_millis(16));
//! }
//! assert_eq!(state.lifecycle(), Lifecycle::Shown);
//! ```

pub mod animation;
pub mod overlay;
pub mod position;
pub mod state;
pub mod style;

pub use animation::{AnimationDriver, DriverEvent, MenuAnimationConfig};
pub use overlay::{OverlayHost, OverlayLayout};
pub use position::{AxisFlips, Placement, SCREEN_INDENT};
pub use state::{DismissGuard, Lifecycle, MeasureRequest, MenuAction, MenuState};
pub use style::{
    MenuVariant, PanelShadow, PanelStyle, PanelStyleOverrides, ParseVariantError,
    PointerGeometry, StyleError,
};

use popmenu_core::geometry::Rect;
use popmenu_core::platform::Platform;
use popmenu_render::{Frame, HitId, HitRegion};

use crate::{StatefulWidget, Widget};

/// Hit region tag for the trigger.
pub const MENU_HIT_TRIGGER: HitRegion = HitRegion::Custom(1);
/// Hit region tag for the full-viewport capture layer behind the panel.
pub const MENU_HIT_CAPTURE: HitRegion = HitRegion::Custom(2);
/// Hit region tag for the panel.
pub const MENU_HIT_PANEL: HitRegion = HitRegion::Custom(3);

/// Menu configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MenuConfig {
    pub variant: MenuVariant,
    pub panel_style: PanelStyleOverrides,
    /// Opaque identifier annotated onto the trigger box for host addressing.
    pub instance_id: Option<String>,
    pub platform: Platform,
    /// Required for tap routing through [`MenuState::handle_event`].
    pub hit_id: Option<HitId>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            variant: MenuVariant::default(),
            panel_style: PanelStyleOverrides::default(),
            instance_id: None,
            platform: Platform::current(),
            hit_id: None,
        }
    }
}

impl MenuConfig {
    #[must_use]
    pub fn variant(mut self, variant: MenuVariant) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn panel_style(mut self, style: PanelStyleOverrides) -> Self {
        self.panel_style = style;
        self
    }

    #[must_use]
    pub fn instance_id(mut self, id: impl Into<String>) -> Self {
        self.instance_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn hit_id(mut self, id: HitId) -> Self {
        self.hit_id = Some(id);
        self
    }

    /// Validate the style overrides.
    pub fn validate(&self) -> Result<(), StyleError> {
        self.panel_style.validate()
    }
}

/// Popup menu widget.
///
/// Invariants:
/// - The trigger is always rendered at the area origin at its measured size.
/// - The overlay is rendered only while the state is mounted.
///
/// Failure modes:
/// - Without a `hit_id`, taps cannot be routed; drive the state with
///   `show()`/`hide()` directly.
#[derive(Debug, Clone)]
pub struct Menu<T, C> {
    trigger: T,
    content: C,
    config: MenuConfig,
}

impl<T, C> Menu<T, C> {
    /// Create a menu from a trigger and its overlay content.
    pub fn new(trigger: T, content: C) -> Self {
        Self {
            trigger,
            content,
            config: MenuConfig::default(),
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: MenuConfig) -> Self {
        self.config = config;
        self
    }

    /// Select the visual variant.
    #[must_use]
    pub fn variant(mut self, variant: MenuVariant) -> Self {
        self.config.variant = variant;
        self
    }

    /// Merge style overrides into the panel.
    #[must_use]
    pub fn panel_style(mut self, style: PanelStyleOverrides) -> Self {
        self.config.panel_style = style;
        self
    }

    /// Set the host-addressable identifier.
    #[must_use]
    pub fn instance_id(mut self, id: impl Into<String>) -> Self {
        self.config.instance_id = Some(id.into());
        self
    }

    /// Override the platform used for style tables.
    #[must_use]
    pub fn platform(mut self, platform: Platform) -> Self {
        self.config.platform = platform;
        self
    }

    /// Set the hit id used for trigger, capture and panel regions.
    #[must_use]
    pub fn hit_id(mut self, id: HitId) -> Self {
        self.config.hit_id = Some(id);
        self
    }

    /// Current configuration.
    pub fn menu_config(&self) -> &MenuConfig {
        &self.config
    }
}

impl<T: Widget, C: Widget> StatefulWidget for Menu<T, C> {
    type State = MenuState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut MenuState) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Menu",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height,
            lifecycle = ?state.lifecycle()
        )
        .entered();

        let trigger_size = self.trigger.measure(area.size()).min(area.size());
        let trigger_area = Rect::from_origin_size(area.origin(), trigger_size);
        state.on_trigger_layout(trigger_size);
        state.set_trigger_bounds(trigger_area);

        if !trigger_area.is_empty() {
            self.trigger.render(trigger_area, frame);
        }
        if let Some(hit_id) = self.config.hit_id {
            frame.register_hit(trigger_area, hit_id, MENU_HIT_TRIGGER, 0);
        }
        if let Some(id) = &self.config.instance_id {
            frame.annotate(id.as_str(), trigger_area);
        }

        OverlayHost::new(&self.content, &self.config).render(frame, state);
    }
}
