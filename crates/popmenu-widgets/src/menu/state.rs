#![forbid(unsafe_code)]

//! Menu lifecycle state machine.
//!
//! `MenuState` is the single mutable record behind one [`Menu`](super::Menu).
//! Showing is a two-phase protocol:
//!
//! 1. [`MenuState::show`] issues a [`MeasureRequest`]. The host measures the
//!    trigger and answers with [`MenuState::on_trigger_measured`], which fixes
//!    the anchor and mounts the overlay (`Shown`).
//! 2. The first overlay render reports the content's natural size through
//!    [`MenuState::on_overlay_layout`], which starts the grow and fade-in
//!    (`Animating`). [`MenuState::tick`] settles it back to `Shown`.
//!
//! Hiding fades opacity to zero; once it lands, the state returns to `Hidden`
//! with fresh zero channels and the dismissal notification fires.
//!
//! # Invariants
//!
//! - `Hidden` implies the overlay is unmounted and both channels rest at 0.
//! - Only the most recent outstanding measurement is applied.
//! - An overlay layout while `Animating` is ignored.
//! - The dismissal notification fires at most once per show cycle, whichever
//!   signal (hide completion or host dismissal) arrives first.
//!
//! # Failure Modes
//!
//! - Stale measurements (after `hide()` or a newer `show()`) are dropped.
//! - `hide()` while `Hidden` does nothing beyond cancelling a pending
//!   measurement.
//! - A host dismissal that trails a completed fade-out belongs to that
//!   finished cycle; it is absorbed even if a new cycle has since mounted.
//!   A host that never reports its own dismissal leaves that slot owed, so
//!   the first host dismissal after a fade-out is always absorbed.

use std::fmt;
use std::time::Duration;

use popmenu_core::event::Event;
use popmenu_core::geometry::{Point, Rect, Size};
use popmenu_render::{HitData, HitId, HitRegion};

use super::animation::{AnimationDriver, DriverEvent, MenuAnimationConfig};
use super::position::clamp_anchor;
use super::{MENU_HIT_CAPTURE, MENU_HIT_TRIGGER, MenuConfig};

/// Visibility lifecycle of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Lifecycle {
    /// Overlay unmounted.
    #[default]
    Hidden,
    /// A show or hide transition is in flight.
    Animating,
    /// Overlay mounted and stable.
    Shown,
}

impl Lifecycle {
    /// Whether the overlay surface is mounted.
    #[inline]
    pub const fn is_mounted(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Token for one asynchronous trigger measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasureRequest {
    generation: u64,
}

impl MeasureRequest {
    /// Monotonic generation of this request within its menu.
    #[inline]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// Action emitted by [`MenuState::handle_event`] and [`MenuState::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// The host should measure the trigger and resolve the request.
    MeasureTrigger(MeasureRequest),
    /// A fade-out started.
    Hiding,
    /// The dismissal notification fired.
    Dismissed,
}

/// Per-cycle exactly-once latch for the dismissal notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DismissGuard {
    armed: bool,
}

impl DismissGuard {
    /// Arm for a new show cycle.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Whether a notification is still owed.
    #[inline]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Consume the latch. Returns `true` only for the first call per cycle.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }
}

/// Mutable state of one menu instance.
pub struct MenuState {
    lifecycle: Lifecycle,
    anchor: Point,
    overlay_size: Size,
    trigger_size: Size,
    trigger_bounds: Option<Rect>,
    content_measured: bool,
    driver: AnimationDriver,
    animation: MenuAnimationConfig,
    next_generation: u64,
    pending: Option<MeasureRequest>,
    guard: DismissGuard,
    awaiting_host_dismiss: bool,
    on_dismissed: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for MenuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuState")
            .field("lifecycle", &self.lifecycle)
            .field("anchor", &self.anchor)
            .field("overlay_size", &self.overlay_size)
            .field("trigger_size", &self.trigger_size)
            .field("trigger_bounds", &self.trigger_bounds)
            .field("content_measured", &self.content_measured)
            .field("driver", &self.driver)
            .field("animation", &self.animation)
            .field("pending", &self.pending)
            .field("guard", &self.guard)
            .field("awaiting_host_dismiss", &self.awaiting_host_dismiss)
            .field("on_dismissed", &self.on_dismissed.is_some())
            .finish()
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuState {
    /// Fresh state: hidden, zero sizes, default animation.
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Hidden,
            anchor: Point::ZERO,
            overlay_size: Size::ZERO,
            trigger_size: Size::ZERO,
            trigger_bounds: None,
            content_measured: false,
            driver: AnimationDriver::new(),
            animation: MenuAnimationConfig::default(),
            next_generation: 0,
            pending: None,
            guard: DismissGuard::default(),
            awaiting_host_dismiss: false,
            on_dismissed: None,
        }
    }

    /// Set the transition timing.
    #[must_use]
    pub fn animation(mut self, config: MenuAnimationConfig) -> Self {
        self.animation = config;
        self
    }

    /// Set the callback invoked once per completed dismissal.
    #[must_use]
    pub fn on_dismissed(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_dismissed = Some(Box::new(callback));
        self
    }

    // --- accessors ---------------------------------------------------------

    /// Current lifecycle.
    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Whether the overlay is mounted.
    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.lifecycle.is_mounted()
    }

    /// Whether a fade-out is in flight.
    #[inline]
    pub fn is_hiding(&self) -> bool {
        self.driver.is_hiding()
    }

    /// Anchor fixed for the current show cycle.
    #[inline]
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Last measured natural overlay size.
    #[inline]
    pub fn overlay_size(&self) -> Size {
        self.overlay_size
    }

    /// Last recorded trigger size.
    #[inline]
    pub fn trigger_size(&self) -> Size {
        self.trigger_size
    }

    /// Trigger box from the last render, in viewport space.
    #[inline]
    pub fn trigger_bounds(&self) -> Option<Rect> {
        self.trigger_bounds
    }

    /// Whether the overlay content has been measured this cycle (the grow has
    /// started).
    #[inline]
    pub fn content_measured(&self) -> bool {
        self.content_measured
    }

    /// Current animated overlay size.
    #[inline]
    pub fn animated_size(&self) -> Size {
        self.driver.size()
    }

    /// Current overlay opacity.
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.driver.opacity()
    }

    /// Whether both animation channels rest at zero.
    #[inline]
    pub fn channels_at_rest(&self) -> bool {
        self.driver.is_at_rest()
    }

    /// Outstanding measurement, if any.
    #[inline]
    pub fn pending_measurement(&self) -> Option<MeasureRequest> {
        self.pending
    }

    /// Transition timing in use.
    #[inline]
    pub fn animation_config(&self) -> &MenuAnimationConfig {
        &self.animation
    }

    // --- operations --------------------------------------------------------

    /// Request the overlay.
    ///
    /// Legal from any state. Supersedes any outstanding measurement.
    pub fn show(&mut self) -> MeasureRequest {
        self.next_generation += 1;
        let request = MeasureRequest {
            generation: self.next_generation,
        };
        self.pending = Some(request);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "menu.show",
            generation = request.generation,
            lifecycle = ?self.lifecycle,
        );

        request
    }

    /// Resolve a measurement with the trigger's viewport-space origin.
    ///
    /// Returns `false` when the request is stale.
    pub fn on_trigger_measured(&mut self, request: MeasureRequest, origin: Point) -> bool {
        if self.pending != Some(request) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "menu.measure.stale",
                generation = request.generation,
            );
            return false;
        }
        self.pending = None;
        self.anchor = clamp_anchor(origin);

        match self.lifecycle {
            Lifecycle::Hidden => {
                self.guard.arm();
                self.lifecycle = Lifecycle::Shown;
            }
            Lifecycle::Animating | Lifecycle::Shown if self.driver.is_hiding() => {
                if self.content_measured {
                    self.driver.start_fade_in(&self.animation);
                    self.lifecycle = Lifecycle::Animating;
                } else {
                    self.driver.reset();
                    self.lifecycle = Lifecycle::Shown;
                }
            }
            Lifecycle::Animating | Lifecycle::Shown => {}
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "menu.measure.applied",
            generation = request.generation,
            anchor_x = self.anchor.x,
            anchor_y = self.anchor.y,
            lifecycle = ?self.lifecycle,
        );
        true
    }

    /// Resolve a measurement from the trigger box recorded by the last
    /// render, falling back to the origin when nothing was rendered yet.
    pub fn measure_from_last_layout(&mut self, request: MeasureRequest) -> bool {
        let origin = self.trigger_bounds.map_or(Point::ZERO, |r| r.origin());
        self.on_trigger_measured(request, origin)
    }

    /// Record the trigger's rendered size.
    pub fn on_trigger_layout(&mut self, size: Size) {
        self.trigger_size = size;
    }

    pub(crate) fn set_trigger_bounds(&mut self, bounds: Rect) {
        self.trigger_bounds = Some(bounds);
    }

    /// Report the overlay content's natural size.
    ///
    /// The first report of a cycle starts the grow + fade-in. Reports while
    /// animating are ignored; later reports with a new size resize the panel
    /// without replaying the grow. Returns `true` if the report was applied.
    pub fn on_overlay_layout(&mut self, size: Size) -> bool {
        if self.lifecycle != Lifecycle::Shown || !size.is_finite() {
            return false;
        }
        if !self.content_measured {
            self.overlay_size = size;
            self.content_measured = true;
            self.lifecycle = Lifecycle::Animating;
            self.driver.start_show(size, &self.animation);

            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "menu.grow.start",
                width = size.width,
                height = size.height,
            );
            return true;
        }
        if size != self.overlay_size {
            self.overlay_size = size;
            self.driver.snap_size(size);
            return true;
        }
        false
    }

    /// Start the fade-out.
    ///
    /// Returns `true` if a fade started. A no-op while `Hidden` or while a
    /// fade-out is already running.
    pub fn hide(&mut self) -> bool {
        self.pending = None;
        if self.lifecycle == Lifecycle::Hidden || self.driver.is_hiding() {
            return false;
        }
        self.lifecycle = Lifecycle::Animating;
        self.driver.start_hide(&self.animation);

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "menu.hide", opacity = self.driver.opacity());
        true
    }

    /// Advance the animations by `dt`.
    ///
    /// Returns [`MenuAction::Dismissed`] on the tick a fade-out completes.
    pub fn tick(&mut self, dt: Duration) -> Option<MenuAction> {
        match self.driver.tick(dt)? {
            DriverEvent::Shown => {
                if self.lifecycle == Lifecycle::Animating {
                    self.lifecycle = Lifecycle::Shown;
                }
                None
            }
            DriverEvent::Hidden => {
                self.finish_hide();
                self.awaiting_host_dismiss = true;
                self.notify_dismissed().then_some(MenuAction::Dismissed)
            }
        }
    }

    /// The host's overlay surface reported its own dismissal.
    ///
    /// A dismissal trailing a completed fade-out is absorbed without touching
    /// the current cycle. Otherwise tears the overlay down if it is still
    /// mounted, then notifies unless this cycle was already notified.
    pub fn on_host_dismissed(&mut self) -> bool {
        if std::mem::take(&mut self.awaiting_host_dismiss) {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "menu.host_dismiss.late", lifecycle = ?self.lifecycle);
            return false;
        }
        if self.lifecycle != Lifecycle::Hidden {
            self.finish_hide();
        }
        self.notify_dismissed()
    }

    /// Route a host event.
    ///
    /// `hit` is the hit-test result for pointer events, usually from the last
    /// rendered frame.
    pub fn handle_event(
        &mut self,
        event: &Event,
        hit: Option<(HitId, HitRegion, HitData)>,
        config: &MenuConfig,
    ) -> Option<MenuAction> {
        match event {
            Event::Tap(_) => {
                let (id, region, _) = hit?;
                if config.hit_id != Some(id) {
                    return None;
                }
                if region == MENU_HIT_CAPTURE && self.hide() {
                    return Some(MenuAction::Hiding);
                }
                if region == MENU_HIT_TRIGGER && !self.is_mounted() {
                    return Some(MenuAction::MeasureTrigger(self.show()));
                }
                None
            }
            Event::BackRequested => self.hide().then_some(MenuAction::Hiding),
            Event::HostDismissed => self.on_host_dismissed().then_some(MenuAction::Dismissed),
            Event::Resize(_) => None,
        }
    }

    fn finish_hide(&mut self) {
        self.lifecycle = Lifecycle::Hidden;
        self.driver.reset();
        self.content_measured = false;
        self.pending = None;

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "menu.hidden");
    }

    fn notify_dismissed(&mut self) -> bool {
        if !self.guard.take() {
            return false;
        }
        if let Some(callback) = self.on_dismissed.as_mut() {
            callback();
        }
        true
    }
}
