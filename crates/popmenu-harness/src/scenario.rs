#![forbid(unsafe_code)]

//! Declarative menu scenarios.
//!
//! A scenario is a JSON document describing a host (viewport, trigger box,
//! content size, menu configuration) and a list of steps: inputs, frame
//! advances and expectations. [`run_scenario`] drives a [`HeadlessHost`]
//! through the steps and logs every action and frame to a [`GoldenLogger`].
//!
//! ```json
//! {
//!   "name": "right_edge_flip",
//!   "platform": "ios",
//!   "viewport": { "width": 400, "height": 800 },
//!   "trigger": { "x": 350, "y": 10, "width": 40, "height": 20 },
//!   "content": { "width": 200, "height": 150 },
//!   "steps": [
//!     { "op": "tap_trigger" },
//!     { "op": "frames", "count": 30 },
//!     { "op": "expect", "lifecycle": "shown", "flip_x": true, "placement_left": 390 }
//!   ]
//! }
//! ```
//!
//! # Failure Modes
//!
//! - Malformed documents fail with [`HarnessError::Json`].
//! - Unusable geometry or style fails validation before any step runs.
//! - The first unmet expectation stops the run with
//!   [`HarnessError::ExpectationFailed`].

use std::path::Path;
use std::time::Duration;

use popmenu_core::clock::FrameClock;
use popmenu_core::geometry::{Point, Rect, Size};
use popmenu_core::platform::Platform;
use popmenu_widgets::menu::{
    Lifecycle, MenuAnimationConfig, MenuConfig, MenuVariant, PanelStyleOverrides,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::error::{HarnessError, Result};
use crate::golden::{GoldenLogger, GoldenOutcome, action_name};
use crate::host::{HeadlessHost, HostConfig};

const TOLERANCE: f32 = 1e-3;
const MAX_FRAME_MS: u64 = 1_000;

fn default_frame_ms() -> u64 {
    16
}

fn default_content() -> Size {
    Size::new(200.0, 150.0)
}

/// A scripted run of one menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub platform: Platform,
    pub viewport: Size,
    pub trigger: Rect,
    #[serde(default = "default_content")]
    pub content: Size,
    #[serde(default)]
    pub variant: MenuVariant,
    #[serde(default)]
    pub panel_style: PanelStyleOverrides,
    #[serde(default)]
    pub instance_id: Option<String>,
    /// Fixed frame step in milliseconds.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    /// Transition duration override in milliseconds; `0` disables animation.
    #[serde(default)]
    pub duration_ms: Option<u64>,
    pub steps: Vec<Step>,
}

/// One scenario step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Advance `count` frames.
    Frames { count: u32 },
    TapTrigger,
    Tap { x: f32, y: f32 },
    Back,
    HostDismissed,
    /// Call `show()` directly.
    Show,
    /// Call `hide()` directly.
    Hide,
    Resize { width: f32, height: f32 },
    /// Move the trigger's layout box.
    MoveTrigger { x: f32, y: f32, width: f32, height: f32 },
    Expect(Expectation),
}

impl Step {
    pub const fn op(&self) -> &'static str {
        match self {
            Self::Frames { .. } => "frames",
            Self::TapTrigger => "tap_trigger",
            Self::Tap { .. } => "tap",
            Self::Back => "back",
            Self::HostDismissed => "host_dismissed",
            Self::Show => "show",
            Self::Hide => "hide",
            Self::Resize { .. } => "resize",
            Self::MoveTrigger { .. } => "move_trigger",
            Self::Expect(_) => "expect",
        }
    }
}

/// Assertions against the host after the preceding steps.
///
/// Unset fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expectation {
    pub lifecycle: Option<Lifecycle>,
    pub dismissals: Option<u32>,
    pub anchor: Option<Point>,
    pub flip_x: Option<bool>,
    pub flip_y: Option<bool>,
    pub placement_left: Option<f32>,
    pub placement_top: Option<f32>,
    pub panel: Option<Rect>,
    pub opacity: Option<f32>,
    pub channels_at_rest: Option<bool>,
}

/// Outcome of a completed scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub name: String,
    pub frames: u64,
    pub checksums: Vec<String>,
    pub dismissals: u32,
}

/// How frames are timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    /// Fixed `frame_ms` steps, no sleeping.
    #[default]
    Fixed,
    /// Sleep `frame_ms` per frame and tick by measured wall time.
    Realtime,
}

impl Scenario {
    /// Parse a scenario document.
    pub fn from_json(text: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| HarnessError::ScenarioRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Check geometry, timing and style.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(HarnessError::invalid("name must not be empty"));
        }
        if !self.viewport.is_finite() || self.viewport.is_empty() {
            return Err(HarnessError::invalid("viewport must be finite and non-empty"));
        }
        let trigger = self.trigger;
        if !(trigger.x.is_finite() && trigger.y.is_finite() && trigger.size().is_finite()) {
            return Err(HarnessError::invalid("trigger must be finite"));
        }
        if !self.content.is_finite() || self.content.width < 0.0 || self.content.height < 0.0 {
            return Err(HarnessError::invalid("content size must be finite and non-negative"));
        }
        if self.frame_ms == 0 || self.frame_ms > MAX_FRAME_MS {
            return Err(HarnessError::invalid(format!(
                "frame_ms must be in 1..={MAX_FRAME_MS}"
            )));
        }
        if self.steps.is_empty() {
            return Err(HarnessError::invalid("scenario has no steps"));
        }
        self.panel_style.validate()?;
        Ok(())
    }

    /// Host setup for this scenario.
    pub fn host_config(&self) -> HostConfig {
        let mut menu = MenuConfig::default()
            .platform(self.platform)
            .variant(self.variant)
            .panel_style(self.panel_style);
        if let Some(id) = &self.instance_id {
            menu = menu.instance_id(id.clone());
        }
        let animation = match self.duration_ms {
            Some(0) => MenuAnimationConfig::none(),
            Some(ms) => MenuAnimationConfig::new().duration(Duration::from_millis(ms)),
            None => MenuAnimationConfig::default(),
        };
        HostConfig {
            viewport: self.viewport,
            trigger: self.trigger,
            content: self.content,
            menu,
            animation,
            frame_step: Duration::from_millis(self.frame_ms),
        }
    }
}

/// Run a scenario with fixed frame steps.
pub fn run_scenario(scenario: &Scenario, logger: &mut GoldenLogger) -> Result<ScenarioReport> {
    run_scenario_with(scenario, logger, Pacing::Fixed)
}

/// Run a scenario with the given pacing.
pub fn run_scenario_with(
    scenario: &Scenario,
    logger: &mut GoldenLogger,
    pacing: Pacing,
) -> Result<ScenarioReport> {
    scenario.validate()?;
    let _span = info_span!("scenario", name = %scenario.name, platform = %scenario.platform).entered();

    let mut host = HeadlessHost::new(scenario.host_config());
    let mut clock = FrameClock::new();
    let frame_step = Duration::from_millis(scenario.frame_ms);
    logger.log_start(&scenario.name, scenario.platform, scenario.viewport);

    for (index, step) in scenario.steps.iter().enumerate() {
        debug!(message = "scenario.step", step = index, op = step.op());
        let action = match step {
            Step::Frames { count } => {
                for _ in 0..*count {
                    let report = match pacing {
                        Pacing::Fixed => host.step(),
                        Pacing::Realtime => {
                            std::thread::sleep(frame_step);
                            host.step_with(clock.delta())
                        }
                    };
                    logger.log_frame(&report);
                }
                continue;
            }
            Step::TapTrigger => host.tap_trigger(),
            Step::Tap { x, y } => host.tap(Point::new(*x, *y)),
            Step::Back => host.back(),
            Step::HostDismissed => host.host_dismissed(),
            Step::Show => {
                host.show();
                None
            }
            Step::Hide => {
                host.hide();
                None
            }
            Step::Resize { width, height } => {
                let from = host.viewport();
                let to = Size::new(*width, *height);
                logger.log_resize(from, to);
                host.resize(to)
            }
            Step::MoveTrigger {
                x,
                y,
                width,
                height,
            } => {
                host.move_trigger(Rect::new(*x, *y, *width, *height));
                None
            }
            Step::Expect(expectation) => {
                if let Err(message) = check(&host, expectation) {
                    logger.log_error(&message);
                    logger.log_complete(GoldenOutcome::Fail, host.dismissals());
                    return Err(HarnessError::ExpectationFailed {
                        scenario: scenario.name.clone(),
                        step: index,
                        message,
                    });
                }
                continue;
            }
        };
        logger.log_action(index, step.op(), action.as_ref().map(action_name));
    }

    logger.log_complete(GoldenOutcome::Pass, host.dismissals());
    info!(
        message = "scenario.complete",
        frames = host.frame_id(),
        dismissals = host.dismissals()
    );
    Ok(ScenarioReport {
        name: scenario.name.clone(),
        frames: host.frame_id(),
        checksums: logger.checksums().to_vec(),
        dismissals: host.dismissals(),
    })
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() <= TOLERANCE
}

fn check(host: &HeadlessHost, expect: &Expectation) -> std::result::Result<(), String> {
    let state = host.state();
    if let Some(lifecycle) = expect.lifecycle
        && state.lifecycle() != lifecycle
    {
        return Err(format!(
            "lifecycle: expected {lifecycle:?}, got {:?}",
            state.lifecycle()
        ));
    }
    if let Some(count) = expect.dismissals
        && host.dismissals() != count
    {
        return Err(format!(
            "dismissals: expected {count}, got {}",
            host.dismissals()
        ));
    }
    if let Some(anchor) = expect.anchor {
        let actual = state.anchor();
        if !close(actual.x, anchor.x) || !close(actual.y, anchor.y) {
            return Err(format!("anchor: expected {anchor:?}, got {actual:?}"));
        }
    }
    if let Some(rest) = expect.channels_at_rest
        && state.channels_at_rest() != rest
    {
        return Err(format!("channels_at_rest: expected {rest}"));
    }
    if let Some(opacity) = expect.opacity
        && !close(state.opacity(), opacity)
    {
        return Err(format!(
            "opacity: expected {opacity}, got {}",
            state.opacity()
        ));
    }

    let wants_layout = expect.flip_x.is_some()
        || expect.flip_y.is_some()
        || expect.placement_left.is_some()
        || expect.placement_top.is_some()
        || expect.panel.is_some();
    if !wants_layout {
        return Ok(());
    }
    let Some(layout) = host.layout() else {
        return Err("overlay geometry requested while unmounted".to_string());
    };
    let placement = layout.placement;
    if let Some(x) = expect.flip_x
        && placement.flips.x != x
    {
        return Err(format!("flip_x: expected {x}"));
    }
    if let Some(y) = expect.flip_y
        && placement.flips.y != y
    {
        return Err(format!("flip_y: expected {y}"));
    }
    if let Some(left) = expect.placement_left
        && !close(placement.left, left)
    {
        return Err(format!(
            "placement_left: expected {left}, got {}",
            placement.left
        ));
    }
    if let Some(top) = expect.placement_top
        && !close(placement.top, top)
    {
        return Err(format!(
            "placement_top: expected {top}, got {}",
            placement.top
        ));
    }
    if let Some(panel) = expect.panel {
        let actual = layout.panel;
        let matches = close(actual.x, panel.x)
            && close(actual.y, panel.y)
            && close(actual.width, panel.width)
            && close(actual.height, panel.height);
        if !matches {
            return Err(format!("panel: expected {panel:?}, got {actual:?}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIGHT_EDGE: &str = r#"{
        "name": "right_edge",
        "platform": "ios",
        "viewport": { "width": 400, "height": 800 },
        "trigger": { "x": 350, "y": 10, "width": 40, "height": 20 },
        "steps": [
            { "op": "tap_trigger" },
            { "op": "frames", "count": 30 },
            { "op": "expect", "lifecycle": "shown", "flip_x": true, "flip_y": false,
              "placement_left": 390, "placement_top": 10 }
        ]
    }"#;

    #[test]
    fn parses_defaults() {
        let scenario = Scenario::from_json(RIGHT_EDGE).unwrap();
        assert_eq!(scenario.platform, Platform::Ios);
        assert_eq!(scenario.variant, MenuVariant::Notice);
        assert_eq!(scenario.content, Size::new(200.0, 150.0));
        assert_eq!(scenario.frame_ms, 16);
        assert_eq!(scenario.steps.len(), 3);
        assert_eq!(scenario.steps[0], Step::TapTrigger);
    }

    #[test]
    fn right_edge_passes() {
        let scenario = Scenario::from_json(RIGHT_EDGE).unwrap();
        let mut logger = GoldenLogger::in_memory();
        let report = run_scenario(&scenario, &mut logger).unwrap();
        assert_eq!(report.frames, 30);
        assert_eq!(report.checksums.len(), 30);
        assert_eq!(report.dismissals, 0);
    }

    #[test]
    fn failed_expectation_names_step() {
        let text = RIGHT_EDGE.replace("\"flip_x\": true", "\"flip_x\": false");
        let scenario = Scenario::from_json(&text).unwrap();
        let mut logger = GoldenLogger::in_memory();
        let err = run_scenario(&scenario, &mut logger).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::ExpectationFailed { step: 2, .. }
        ));
        assert!(logger.lines().iter().any(|l| l.contains("\"event\":\"error\"")));
    }

    #[test]
    fn rejects_unknown_fields_and_ops() {
        let extra = RIGHT_EDGE.replace("\"name\"", "\"colour\": 1, \"name\"");
        assert!(matches!(
            Scenario::from_json(&extra),
            Err(HarnessError::Json(_))
        ));
        let bad_op = RIGHT_EDGE.replace("tap_trigger", "double_tap");
        assert!(Scenario::from_json(&bad_op).is_err());
    }

    #[test]
    fn rejects_bad_geometry_and_timing() {
        let empty = RIGHT_EDGE.replace("\"width\": 400", "\"width\": 0");
        assert!(matches!(
            Scenario::from_json(&empty),
            Err(HarnessError::InvalidScenario { .. })
        ));
        let slow = RIGHT_EDGE.replace("\"steps\"", "\"frame_ms\": 0, \"steps\"");
        assert!(matches!(
            Scenario::from_json(&slow),
            Err(HarnessError::InvalidScenario { .. })
        ));
    }

    #[test]
    fn rejects_invalid_style() {
        let styled = RIGHT_EDGE.replace(
            "\"steps\"",
            "\"panel_style\": { \"corner_radius\": -1 }, \"steps\"",
        );
        assert!(matches!(
            Scenario::from_json(&styled),
            Err(HarnessError::Style(_))
        ));
    }

    #[test]
    fn zero_duration_disables_animation() {
        let scenario = Scenario::from_json(
            &RIGHT_EDGE.replace("\"steps\"", "\"duration_ms\": 0, \"steps\""),
        )
        .unwrap();
        assert!(scenario.host_config().animation.is_disabled());
    }
}
