#![forbid(unsafe_code)]

//! Headless host loop for a single menu.
//!
//! `HeadlessHost` plays the role a real UI host plays around a [`Menu`]:
//! it renders into a [`Frame`], routes taps through hit testing, answers
//! trigger measurements one frame after they are requested, advances time
//! in fixed steps and, on platforms whose overlay surface reports its own
//! teardown, emits [`Event::HostDismissed`] after the overlay unmounts.
//!
//! # Invariants
//!
//! - Every [`HeadlessHost::step`] ticks, renders and then checks for a
//!   native dismissal, in that order.
//! - Measurements are answered in request order at the start of the next
//!   step, so a superseded request is always answered (and dropped) first.
//!
//! # Failure Modes
//!
//! - A menu config without a `hit_id` gets [`HOST_HIT_ID`] so taps route.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use popmenu_core::event::Event;
use popmenu_core::geometry::{Point, Rect, Size};
use popmenu_render::{Frame, HitId, Rgba};
use popmenu_widgets::menu::{
    Lifecycle, MeasureRequest, Menu, MenuAction, MenuAnimationConfig, MenuConfig, MenuState,
    OverlayHost, OverlayLayout,
};
use popmenu_widgets::{StatefulWidget, Widget};

use crate::golden::frame_checksum;

/// Hit id assigned when the menu config carries none.
pub const HOST_HIT_ID: HitId = HitId::new(1);

/// Default fixed frame step.
pub const DEFAULT_FRAME_STEP: Duration = Duration::from_millis(16);

const TRIGGER_COLOR: Rgba = Rgba::rgb(0x3b, 0x82, 0xf6);
const CONTENT_COLOR: Rgba = Rgba::rgb(0xf1, 0xf5, 0xf9);

/// Solid placeholder with a fixed natural size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub size: Size,
    pub color: Rgba,
}

impl Block {
    pub const fn new(size: Size, color: Rgba) -> Self {
        Self { size, color }
    }
}

impl Widget for Block {
    fn render(&self, area: Rect, frame: &mut Frame) {
        frame.fill_rect(area, self.color, 0.0);
    }

    fn measure(&self, _available: Size) -> Size {
        self.size
    }
}

/// Host setup.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub viewport: Size,
    /// Layout box of the trigger.
    pub trigger: Rect,
    /// Natural size of the overlay content.
    pub content: Size,
    pub menu: MenuConfig,
    pub animation: MenuAnimationConfig,
    pub frame_step: Duration,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            viewport: Size::new(400.0, 800.0),
            trigger: Rect::new(20.0, 20.0, 40.0, 20.0),
            content: Size::new(200.0, 150.0),
            menu: MenuConfig::default(),
            animation: MenuAnimationConfig::default(),
            frame_step: DEFAULT_FRAME_STEP,
        }
    }
}

/// Observable result of one host frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_id: u64,
    pub lifecycle: Lifecycle,
    pub opacity: f32,
    pub animated_size: Size,
    /// Overlay geometry while mounted.
    pub layout: Option<OverlayLayout>,
    /// Actions produced during the frame (ticks and native dismissals).
    pub actions: Vec<MenuAction>,
    pub checksum: String,
}

/// Deterministic single-menu host.
pub struct HeadlessHost {
    menu: Menu<Block, Block>,
    content: Block,
    state: MenuState,
    area: Rect,
    frame: Frame,
    frame_step: Duration,
    frame_id: u64,
    measurements: VecDeque<MeasureRequest>,
    dismissals: Rc<Cell<u32>>,
    was_mounted: bool,
}

impl HeadlessHost {
    pub fn new(config: HostConfig) -> Self {
        let mut menu_config = config.menu;
        if menu_config.hit_id.is_none() {
            menu_config.hit_id = Some(HOST_HIT_ID);
        }
        let content = Block::new(config.content, CONTENT_COLOR);
        let menu = Menu::new(Block::new(config.trigger.size(), TRIGGER_COLOR), content)
            .config(menu_config);

        let dismissals = Rc::new(Cell::new(0));
        let counter = Rc::clone(&dismissals);
        let state = MenuState::new()
            .animation(config.animation)
            .on_dismissed(move || counter.set(counter.get() + 1));

        let mut host = Self {
            menu,
            content,
            state,
            area: config.trigger,
            frame: Frame::with_hit_testing(config.viewport),
            frame_step: config.frame_step,
            frame_id: 0,
            measurements: VecDeque::new(),
            dismissals,
            was_mounted: false,
        };
        host.render();
        host
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn menu_config(&self) -> &MenuConfig {
        self.menu.menu_config()
    }

    pub fn viewport(&self) -> Size {
        self.frame.viewport()
    }

    pub fn trigger_area(&self) -> Rect {
        self.area
    }

    /// Number of completed frames.
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// Number of dismissal notifications delivered so far.
    pub fn dismissals(&self) -> u32 {
        self.dismissals.get()
    }

    /// Measurements requested but not yet answered.
    pub fn pending_measurements(&self) -> usize {
        self.measurements.len()
    }

    /// Checksum of the current display list.
    pub fn checksum(&self) -> String {
        frame_checksum(&self.frame)
    }

    /// Overlay geometry for the current state, if mounted.
    pub fn layout(&self) -> Option<OverlayLayout> {
        if !self.state.is_mounted() {
            return None;
        }
        let overlay = OverlayHost::new(&self.content, self.menu.menu_config());
        let viewport = self.viewport();
        Some(overlay.layout(viewport, overlay.natural_size(viewport), &self.state))
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Route an event through the last rendered frame.
    pub fn dispatch(&mut self, event: Event) -> Option<MenuAction> {
        let hit = event.position().and_then(|p| self.frame.hit_test(p));
        let action = self.state.handle_event(&event, hit, self.menu.menu_config());
        if let Some(MenuAction::MeasureTrigger(request)) = action {
            self.measurements.push_back(request);
        }
        action
    }

    pub fn tap(&mut self, point: Point) -> Option<MenuAction> {
        self.dispatch(Event::tap(point.x, point.y))
    }

    /// Tap the center of the trigger.
    pub fn tap_trigger(&mut self) -> Option<MenuAction> {
        let area = self.area;
        self.tap(Point::new(
            area.x + area.width / 2.0,
            area.y + area.height / 2.0,
        ))
    }

    pub fn back(&mut self) -> Option<MenuAction> {
        self.dispatch(Event::BackRequested)
    }

    pub fn host_dismissed(&mut self) -> Option<MenuAction> {
        self.dispatch(Event::HostDismissed)
    }

    /// Request a show directly, bypassing hit testing.
    pub fn show(&mut self) -> MeasureRequest {
        let request = self.state.show();
        self.measurements.push_back(request);
        request
    }

    pub fn hide(&mut self) -> bool {
        self.state.hide()
    }

    /// Resize the viewport and re-render.
    pub fn resize(&mut self, viewport: Size) -> Option<MenuAction> {
        self.frame.resize(viewport);
        let action = self.dispatch(Event::Resize(viewport));
        self.render();
        action
    }

    /// Move the trigger's layout box and re-render.
    pub fn move_trigger(&mut self, area: Rect) {
        self.area = area;
        self.render();
    }

    // ------------------------------------------------------------------
    // Frames
    // ------------------------------------------------------------------

    /// Advance one fixed frame step.
    pub fn step(&mut self) -> FrameReport {
        self.step_with(self.frame_step)
    }

    /// Advance one frame by `dt`.
    pub fn step_with(&mut self, dt: Duration) -> FrameReport {
        while let Some(request) = self.measurements.pop_front() {
            self.state.measure_from_last_layout(request);
        }

        let mut actions = Vec::new();
        actions.extend(self.state.tick(dt));
        self.render();

        let mounted = self.state.is_mounted();
        if self.was_mounted && !mounted && self.menu.menu_config().platform.emits_native_dismiss()
        {
            actions.extend(self.dispatch(Event::HostDismissed));
        }
        self.was_mounted = mounted;
        self.frame_id += 1;

        tracing::trace!(
            message = "host.frame",
            frame_id = self.frame_id,
            lifecycle = ?self.state.lifecycle(),
            opacity = self.state.opacity()
        );

        FrameReport {
            frame_id: self.frame_id,
            lifecycle: self.state.lifecycle(),
            opacity: self.state.opacity(),
            animated_size: self.state.animated_size(),
            layout: self.layout(),
            actions,
            checksum: self.checksum(),
        }
    }

    /// Advance `frames` fixed steps.
    pub fn run(&mut self, frames: usize) -> Vec<FrameReport> {
        (0..frames).map(|_| self.step()).collect()
    }

    fn render(&mut self) {
        self.frame.clear();
        self.menu.render(self.area, &mut self.frame, &mut self.state);
    }
}

impl std::fmt::Debug for HeadlessHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessHost")
            .field("area", &self.area)
            .field("viewport", &self.frame.viewport())
            .field("frame_id", &self.frame_id)
            .field("lifecycle", &self.state.lifecycle())
            .field("pending_measurements", &self.measurements.len())
            .field("dismissals", &self.dismissals.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popmenu_core::platform::Platform;

    fn host(platform: Platform) -> HeadlessHost {
        HeadlessHost::new(HostConfig {
            trigger: Rect::new(350.0, 10.0, 40.0, 20.0),
            menu: MenuConfig::default().platform(platform),
            ..HostConfig::default()
        })
    }

    #[test]
    fn measurement_is_answered_on_next_frame() {
        let mut host = host(Platform::Android);
        assert!(matches!(
            host.tap_trigger(),
            Some(MenuAction::MeasureTrigger(_))
        ));
        assert_eq!(host.state().lifecycle(), Lifecycle::Hidden);
        assert_eq!(host.pending_measurements(), 1);

        let report = host.step();
        assert_eq!(host.pending_measurements(), 0);
        assert_eq!(report.lifecycle, Lifecycle::Animating);
        assert_eq!(host.state().anchor(), Point::new(350.0, 10.0));
        assert!(report.layout.is_some());
    }

    #[test]
    fn fills_in_hit_id() {
        let host = host(Platform::Other);
        assert_eq!(host.menu_config().hit_id, Some(HOST_HIT_ID));
    }

    #[test]
    fn superseded_request_is_dropped() {
        let mut host = host(Platform::Android);
        host.show();
        host.show();
        assert_eq!(host.pending_measurements(), 2);
        host.step();
        assert!(host.state().is_mounted());
        assert_eq!(host.state().pending_measurement(), None);
    }

    #[test]
    fn ios_emits_host_dismissal_after_unmount() {
        let mut host = host(Platform::Ios);
        host.tap_trigger();
        host.run(30);
        assert_eq!(host.back(), Some(MenuAction::Hiding));
        let dismissed: usize = host
            .run(30)
            .iter()
            .map(|r| {
                r.actions
                    .iter()
                    .filter(|a| **a == MenuAction::Dismissed)
                    .count()
            })
            .sum();
        assert_eq!(dismissed, 1);
        assert_eq!(host.dismissals(), 1);
    }

    #[test]
    fn checksums_track_the_display_list() {
        let mut host = host(Platform::Android);
        let idle = host.step().checksum;
        assert_eq!(host.step().checksum, idle);
        host.tap_trigger();
        let shown = host.step().checksum;
        assert_ne!(shown, idle);
    }

    #[test]
    fn resize_keeps_state() {
        let mut host = host(Platform::Android);
        host.tap_trigger();
        host.run(30);
        assert_eq!(host.resize(Size::new(800.0, 400.0)), None);
        assert_eq!(host.viewport(), Size::new(800.0, 400.0));
        assert_eq!(host.state().lifecycle(), Lifecycle::Shown);
    }
}
