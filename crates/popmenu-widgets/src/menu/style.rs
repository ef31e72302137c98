#![forbid(unsafe_code)]

//! Visual variants and panel chrome.
//!
//! The two variants differ only in static geometry: where the pointer
//! triangle sits, how far the panel is offset from the placement corner, and
//! an extra trailing inset around the notice panel. Constants come in
//! per-platform tables; [`Platform::Other`] uses the iOS table.

use std::fmt;
use std::str::FromStr;

use popmenu_core::geometry::{Point, Sides};
use popmenu_core::platform::Platform;
use popmenu_render::Rgba;

/// Visual flavor of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MenuVariant {
    /// Settings menu: pointer pinned at the trigger, tight panel.
    Setting,
    /// Notice menu: pointer follows the panel, extra trailing inset.
    #[default]
    Notice,
}

/// Error returned when parsing a [`MenuVariant`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown menu variant `{input}` (expected `setting` or `notice`)")]
pub struct ParseVariantError {
    input: String,
}

impl ParseVariantError {
    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl MenuVariant {
    /// Lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Setting => "setting",
            Self::Notice => "notice",
        }
    }

    /// Panel offset from the placement corner.
    pub const fn panel_offset(self) -> Point {
        match self {
            Self::Setting => Point::new(-5.0, 40.0),
            Self::Notice => Point::new(1.0, 40.0),
        }
    }

    /// Extra space kept free after the panel (right and bottom).
    pub const fn trailing_inset(self) -> Sides {
        match self {
            Self::Setting => Sides::all(0.0),
            Self::Notice => Sides::new(0.0, 20.0, 20.0, 0.0),
        }
    }

    /// Whether the pointer moves with the flipped, growing panel.
    ///
    /// Otherwise it stays at the placement corner.
    pub const fn pointer_follows_panel(self) -> bool {
        matches!(self, Self::Notice)
    }
}

impl fmt::Display for MenuVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuVariant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "setting" => Ok(Self::Setting),
            "notice" => Ok(Self::Notice),
            _ => Err(ParseVariantError {
                input: s.to_owned(),
            }),
        }
    }
}

/// Upward-pointing triangle drawn at the trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerGeometry {
    /// Half of the triangle base.
    pub half_base: f32,
    /// Distance from base to apex.
    pub height: f32,
    /// Offset of the triangle's bounding box from its reference corner.
    pub offset: Point,
}

impl PointerGeometry {
    /// Constants for a variant on a platform.
    pub const fn for_variant(variant: MenuVariant, platform: Platform) -> Self {
        match (platform, variant) {
            (Platform::Android, MenuVariant::Setting) => Self {
                half_base: 7.0,
                height: 10.0,
                offset: Point::new(-22.0, 33.0),
            },
            (Platform::Android, MenuVariant::Notice) => Self {
                half_base: 7.0,
                height: 10.0,
                offset: Point::new(3.0, 33.0),
            },
            (_, MenuVariant::Setting) => Self {
                half_base: 5.0,
                height: 20.0,
                offset: Point::new(-20.0, 22.0),
            },
            (_, MenuVariant::Notice) => Self {
                half_base: 5.0,
                height: 20.0,
                offset: Point::new(5.0, 22.0),
            },
        }
    }

    /// Triangle vertices for a reference corner: apex first, then base right
    /// and base left.
    pub fn triangle(&self, corner: Point) -> [Point; 3] {
        let origin = corner.offset(self.offset.x, self.offset.y);
        [
            origin.offset(self.half_base, 0.0),
            origin.offset(self.half_base * 2.0, self.height),
            origin.offset(0.0, self.height),
        ]
    }
}

/// Shadow drawn under the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelShadow {
    /// No shadow.
    None,
    /// Explicit drop shadow.
    Drop {
        color: Rgba,
        opacity: f32,
        offset: Point,
        radius: f32,
    },
    /// Material-style elevation.
    Elevation(f32),
}

impl PanelShadow {
    /// Ambient shadow alpha used for elevation shadows.
    pub const ELEVATION_OPACITY: f32 = 0.24;

    /// Shadow color, offset and blur, if any.
    pub fn resolve(self) -> Option<(Rgba, Point, f32)> {
        match self {
            Self::None => None,
            Self::Drop {
                color,
                opacity,
                offset,
                radius,
            } => Some((color.with_opacity(opacity), offset, radius)),
            Self::Elevation(elevation) if elevation > 0.0 => Some((
                Rgba::BLACK.with_opacity(Self::ELEVATION_OPACITY),
                Point::new(0.0, elevation / 2.0),
                elevation,
            )),
            Self::Elevation(_) => None,
        }
    }

    fn validate(self) -> Result<(), StyleError> {
        match self {
            Self::None => Ok(()),
            Self::Drop {
                opacity,
                offset,
                radius,
                ..
            } => {
                check_finite("shadow.offset.x", offset.x)?;
                check_finite("shadow.offset.y", offset.y)?;
                check_non_negative("shadow.radius", radius)?;
                if !(0.0..=1.0).contains(&opacity) {
                    return Err(StyleError::OpacityOutOfRange(opacity));
                }
                Ok(())
            }
            Self::Elevation(elevation) => check_non_negative("shadow.elevation", elevation),
        }
    }
}

/// Fully resolved panel chrome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelStyle {
    pub background: Rgba,
    pub corner_radius: f32,
    pub shadow: PanelShadow,
}

impl PanelStyle {
    /// Platform default chrome: white, radius 4, platform shadow.
    pub const fn platform_default(platform: Platform) -> Self {
        let shadow = match platform {
            Platform::Android => PanelShadow::Elevation(8.0),
            Platform::Ios | Platform::Other => PanelShadow::Drop {
                color: Rgba::BLACK,
                opacity: 0.14,
                offset: Point::new(0.0, 2.0),
                radius: 2.0,
            },
        };
        Self {
            background: Rgba::WHITE,
            corner_radius: 4.0,
            shadow,
        }
    }

    /// Apply caller overrides on top of this style.
    #[must_use]
    pub fn merged(self, overrides: &PanelStyleOverrides) -> Self {
        Self {
            background: overrides.background.unwrap_or(self.background),
            corner_radius: overrides.corner_radius.unwrap_or(self.corner_radius),
            shadow: overrides.shadow.unwrap_or(self.shadow),
        }
    }
}

/// Caller-supplied panel style overrides. Unset fields keep the platform
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelStyleOverrides {
    pub background: Option<Rgba>,
    pub corner_radius: Option<f32>,
    pub shadow: Option<PanelShadow>,
}

impl PanelStyleOverrides {
    /// No overrides.
    pub const fn new() -> Self {
        Self {
            background: None,
            corner_radius: None,
            shadow: None,
        }
    }

    /// Override the panel background.
    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.background = Some(color);
        self
    }

    /// Override the corner radius.
    #[must_use]
    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    /// Override the shadow.
    #[must_use]
    pub fn shadow(mut self, shadow: PanelShadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    /// Reject non-finite or negative geometry and out-of-range opacity.
    pub fn validate(&self) -> Result<(), StyleError> {
        if let Some(radius) = self.corner_radius {
            check_non_negative("corner_radius", radius)?;
        }
        if let Some(shadow) = self.shadow {
            shadow.validate()?;
        }
        Ok(())
    }
}

/// Invalid panel style override.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StyleError {
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("shadow opacity {0} is outside [0, 1]")]
    OpacityOutOfRange(f32),
}

fn check_finite(field: &'static str, value: f32) -> Result<(), StyleError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(StyleError::NonFinite { field })
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), StyleError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(StyleError::Negative { field, value });
    }
    Ok(())
}
