//! End-to-end menu lifecycle through render, hit testing and ticks.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use popmenu_core::event::Event;
use popmenu_core::geometry::{Point, Rect, Size};
use popmenu_core::platform::Platform;
use popmenu_render::{DrawCommand, Frame, HitId, Rgba};
use popmenu_widgets::menu::{
    Lifecycle, MENU_HIT_PANEL, Menu, MenuAction, MenuState, MenuVariant, SCREEN_INDENT,
};
use popmenu_widgets::{StatefulWidget, Widget};

const VIEWPORT: Size = Size::new(400.0, 800.0);
const FRAME: Duration = Duration::from_millis(16);
const HIT: HitId = HitId::new(11);
const CONTENT_COLOR: Rgba = Rgba::rgb(1, 2, 3);

struct Fixed(Size);

impl Widget for Fixed {
    fn render(&self, area: Rect, frame: &mut Frame) {
        frame.fill_rect(area, CONTENT_COLOR, 0.0);
    }

    fn measure(&self, _available: Size) -> Size {
        self.0
    }
}

/// Minimal host loop: renders, routes events, resolves measurements.
struct Host {
    menu: Menu<Fixed, Fixed>,
    state: MenuState,
    area: Rect,
    frame: Frame,
    dismissals: Rc<Cell<u32>>,
    was_mounted: bool,
}

impl Host {
    fn new(platform: Platform, trigger: Rect, overlay: Size) -> Self {
        let dismissals = Rc::new(Cell::new(0));
        let counter = Rc::clone(&dismissals);
        let menu = Menu::new(Fixed(trigger.size()), Fixed(overlay))
            .hit_id(HIT)
            .platform(platform)
            .instance_id("menu");
        let state = MenuState::new().on_dismissed(move || counter.set(counter.get() + 1));
        let mut host = Self {
            menu,
            state,
            area: trigger,
            frame: Frame::with_hit_testing(VIEWPORT),
            dismissals,
            was_mounted: false,
        };
        host.render();
        host
    }

    fn render(&mut self) {
        self.frame.clear();
        self.menu.render(self.area, &mut self.frame, &mut self.state);
    }

    fn dispatch(&mut self, event: Event) -> Option<MenuAction> {
        let hit = event.position().and_then(|p| self.frame.hit_test(p));
        let action = self.state.handle_event(&event, hit, self.menu.menu_config());
        if let Some(MenuAction::MeasureTrigger(request)) = action {
            self.state.measure_from_last_layout(request);
        }
        action
    }

    /// One host frame: tick, render, emulate native dismissal.
    fn step(&mut self) -> Vec<MenuAction> {
        let mut actions = Vec::new();
        actions.extend(self.state.tick(FRAME));
        self.render();
        let mounted = self.state.is_mounted();
        if self.was_mounted && !mounted && self.menu.menu_config().platform.emits_native_dismiss()
        {
            actions.extend(self.dispatch(Event::HostDismissed));
        }
        self.was_mounted = mounted;
        actions
    }

    fn run(&mut self, frames: usize) -> Vec<MenuAction> {
        (0..frames).flat_map(|_| self.step()).collect()
    }

    fn panel_fills(&self) -> Vec<Rect> {
        self.frame
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, color, .. } if *color != CONTENT_COLOR => {
                    Some(*rect)
                }
                _ => None,
            })
            .collect()
    }

    fn panel_hit_at(&self, point: Point) -> bool {
        matches!(self.frame.hit_test(point), Some((id, region, _)) if id == HIT && region == MENU_HIT_PANEL)
    }
}

fn scenario_host(platform: Platform) -> Host {
    Host::new(
        platform,
        Rect::new(350.0, 10.0, 40.0, 20.0),
        Size::new(200.0, 150.0),
    )
}

// ============================================================================
// Placement
// ============================================================================

#[test]
fn right_edge_scenario_flips_x_against_trigger_edge() {
    let mut host = scenario_host(Platform::Ios);
    let action = host.dispatch(Event::tap(360.0, 15.0));
    assert!(matches!(action, Some(MenuAction::MeasureTrigger(_))));
    assert_eq!(host.state.anchor(), Point::new(350.0, 10.0));

    host.run(30);
    assert_eq!(host.state.lifecycle(), Lifecycle::Shown);

    let panels = host.panel_fills();
    assert_eq!(panels.len(), 1);
    let panel = panels[0];
    // Flipped left = min(400 - 8, 350 + 40) = 390, notice offset +1.
    assert_eq!(panel.right(), 391.0);
    assert_eq!(panel.size(), Size::new(200.0, 150.0));
    // No vertical flip: panel hangs below the anchor.
    assert_eq!(panel.y, 50.0);
}

#[test]
fn anchor_never_closer_than_indent() {
    let mut host = Host::new(
        Platform::Android,
        Rect::new(0.0, 0.0, 40.0, 20.0),
        Size::new(100.0, 100.0),
    );
    host.dispatch(Event::tap(5.0, 5.0));
    assert_eq!(host.state.anchor(), Point::new(SCREEN_INDENT, SCREEN_INDENT));
}

#[test]
fn intermediate_frames_are_visible() {
    let mut host = scenario_host(Platform::Android);
    host.dispatch(Event::tap(360.0, 15.0));
    host.render();

    let mut widths = Vec::new();
    for _ in 0..25 {
        host.step();
        if let Some(panel) = host.panel_fills().first() {
            widths.push(panel.width);
        }
    }
    assert!(widths.windows(2).all(|w| w[0] <= w[1]));
    assert!(widths.iter().any(|w| *w > 0.0 && *w < 200.0));
    assert_eq!(widths.last().copied(), Some(200.0));
}

// ============================================================================
// Show / hide
// ============================================================================

#[test]
fn rapid_double_show_uses_second_measurement() {
    let mut host = scenario_host(Platform::Ios);
    let first = host.state.show();
    host.area = Rect::new(100.0, 300.0, 40.0, 20.0);
    host.render();
    let second = host.state.show();

    assert!(host.state.measure_from_last_layout(second));
    assert!(!host.state.on_trigger_measured(first, Point::new(350.0, 10.0)));
    assert_eq!(host.state.anchor(), Point::new(100.0, 300.0));

    host.run(30);
    assert_eq!(host.panel_fills().len(), 1);
    assert_eq!(host.state.lifecycle(), Lifecycle::Shown);
}

#[test]
fn hide_while_hidden_is_noop() {
    let mut host = scenario_host(Platform::Android);
    assert_eq!(host.dispatch(Event::BackRequested), None);
    assert!(!host.state.hide());
    assert!(host.run(30).is_empty());
    assert_eq!(host.dismissals.get(), 0);
    assert!(host.state.channels_at_rest());
}

#[test]
fn show_then_hide_before_overlay_layout_ends_hidden() {
    // Hide before the measurement resolves.
    let mut host = scenario_host(Platform::Android);
    host.state.show();
    assert!(!host.state.hide());
    host.run(30);
    assert_eq!(host.state.lifecycle(), Lifecycle::Hidden);
    assert!(host.state.channels_at_rest());

    // Hide after mounting but before the first overlay render.
    let request = host.state.show();
    host.state.measure_from_last_layout(request);
    assert!(host.state.hide());
    host.run(30);
    assert_eq!(host.state.lifecycle(), Lifecycle::Hidden);
    assert!(host.state.channels_at_rest());
    assert!(host.panel_fills().is_empty());
}

#[test]
fn completed_hide_resets_and_next_show_replays_from_zero() {
    let mut host = scenario_host(Platform::Android);
    host.dispatch(Event::tap(360.0, 15.0));
    host.run(30);
    host.dispatch(Event::tap(20.0, 700.0));
    host.run(30);
    assert_eq!(host.state.animated_size(), Size::ZERO);
    assert_eq!(host.state.opacity(), 0.0);

    host.dispatch(Event::tap(360.0, 15.0));
    host.render();
    host.step();
    let first = host.panel_fills()[0];
    assert!(first.width > 0.0 && first.width < 20.0);
}

#[test]
fn tapping_the_panel_keeps_menu_open() {
    let mut host = scenario_host(Platform::Ios);
    host.dispatch(Event::tap(360.0, 15.0));
    host.run(30);

    let panel = host.panel_fills()[0];
    let inside = Point::new(panel.x + 10.0, panel.y + 10.0);
    assert!(host.panel_hit_at(inside));
    assert_eq!(host.dispatch(Event::tap(inside.x, inside.y)), None);
    assert_eq!(host.state.lifecycle(), Lifecycle::Shown);
}

#[test]
fn fade_out_keeps_size_until_opacity_reaches_zero() {
    let mut host = scenario_host(Platform::Android);
    host.dispatch(Event::tap(360.0, 15.0));
    host.run(30);
    assert_eq!(host.dispatch(Event::BackRequested), Some(MenuAction::Hiding));

    let mut saw_dismissal = false;
    for _ in 0..30 {
        let actions = host.step();
        if actions.contains(&MenuAction::Dismissed) {
            saw_dismissal = true;
            break;
        }
        assert!(host.state.is_mounted());
        assert_eq!(host.state.animated_size(), Size::new(200.0, 150.0));
    }
    assert!(saw_dismissal);
    assert!(host.state.channels_at_rest());
}

// ============================================================================
// Dismissal notification
// ============================================================================

fn full_cycle(host: &mut Host) -> Vec<MenuAction> {
    host.dispatch(Event::tap(360.0, 15.0));
    host.run(30);
    host.dispatch(Event::tap(20.0, 700.0));
    host.run(30)
}

#[test]
fn dismissal_fires_once_on_platform_with_native_dismiss() {
    let mut host = scenario_host(Platform::Ios);
    let actions = full_cycle(&mut host);
    assert_eq!(
        actions
            .iter()
            .filter(|a| **a == MenuAction::Dismissed)
            .count(),
        1
    );
    assert_eq!(host.dismissals.get(), 1);
}

#[test]
fn dismissal_fires_once_without_native_dismiss() {
    let mut host = scenario_host(Platform::Android);
    full_cycle(&mut host);
    assert_eq!(host.dismissals.get(), 1);
}

#[test]
fn native_dismiss_while_mounted_tears_down_once() {
    let mut host = scenario_host(Platform::Ios);
    host.dispatch(Event::tap(360.0, 15.0));
    host.run(30);

    assert_eq!(
        host.dispatch(Event::HostDismissed),
        Some(MenuAction::Dismissed)
    );
    assert_eq!(host.state.lifecycle(), Lifecycle::Hidden);
    assert!(host.run(30).is_empty());
    assert_eq!(host.dismissals.get(), 1);
}

#[test]
fn dismissal_counts_match_cycles() {
    for platform in [Platform::Ios, Platform::Android, Platform::Other] {
        let mut host = scenario_host(platform);
        for _ in 0..3 {
            full_cycle(&mut host);
        }
        assert_eq!(host.dismissals.get(), 3, "platform {platform}");
    }
}

// ============================================================================
// Variants
// ============================================================================

#[test]
fn setting_variant_differs_only_in_offsets() {
    let mut notice = scenario_host(Platform::Ios);
    let mut setting = scenario_host(Platform::Ios);
    setting.menu = Menu::new(Fixed(Size::new(40.0, 20.0)), Fixed(Size::new(200.0, 150.0)))
        .hit_id(HIT)
        .platform(Platform::Ios)
        .variant(MenuVariant::Setting);

    for host in [&mut notice, &mut setting] {
        host.render();
        host.dispatch(Event::tap(360.0, 15.0));
        host.run(30);
        assert_eq!(host.state.lifecycle(), Lifecycle::Shown);
    }

    let n = notice.panel_fills()[0];
    let s = setting.panel_fills()[0];
    assert_eq!(n.size(), s.size());
    assert_eq!(n.x - s.x, 6.0);
    assert_eq!(n.y, s.y);
}
