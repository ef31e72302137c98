#![forbid(unsafe_code)]

//! Cubic Bézier timing curves.
//!
//! The curve runs from (0, 0) to (1, 1) with two control points, the same
//! parameterization CSS `cubic-bezier()` and native motion APIs use. Solving
//! for a given x uses Newton-Raphson first and falls back to bisection when
//! the slope is too flat for Newton to converge.

/// Newton iterations before falling back to bisection.
const NEWTON_ITERATIONS: usize = 8;
/// Slope below which Newton is unreliable.
const NEWTON_MIN_SLOPE: f32 = 1e-3;
/// Acceptable error in x.
const PRECISION: f32 = 1e-6;
/// Upper bound on bisection steps.
const BISECTION_ITERATIONS: usize = 32;

/// A cubic Bézier easing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    /// Standard ease-in-out motion curve: (0.4, 0) (0.2, 1).
    pub const STANDARD: Self = Self::new(0.4, 0.0, 0.2, 1.0);

    /// Create a curve from its two control points.
    ///
    /// x coordinates outside [0, 1] make the curve non-monotonic in time and
    /// are clamped.
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1: clamp_unit(x1),
            y1,
            x2: clamp_unit(x2),
            y2,
        }
    }

    /// Eased output for progress `t` in [0, 1].
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        if self.x1 == self.y1 && self.x2 == self.y2 {
            return t;
        }
        let param = self.solve_param(t);
        sample(param, self.y1, self.y2)
    }

    /// Find the curve parameter whose x equals `x`.
    fn solve_param(&self, x: f32) -> f32 {
        let mut guess = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = sample(guess, self.x1, self.x2) - x;
            if err.abs() < PRECISION {
                return guess;
            }
            let slope = slope(guess, self.x1, self.x2);
            if slope.abs() < NEWTON_MIN_SLOPE {
                break;
            }
            guess -= err / slope;
            if !(0.0..=1.0).contains(&guess) {
                break;
            }
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        guess = x;
        for _ in 0..BISECTION_ITERATIONS {
            let value = sample(guess, self.x1, self.x2);
            if (value - x).abs() < PRECISION {
                break;
            }
            if value < x {
                lo = guess;
            } else {
                hi = guess;
            }
            guess = (lo + hi) * 0.5;
        }
        guess
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::STANDARD
    }
}

const fn clamp_unit(v: f32) -> f32 {
    if v < 0.0 {
        0.0
    } else if v > 1.0 {
        1.0
    } else {
        v
    }
}

/// One coordinate of the curve at parameter `t` (endpoints 0 and 1).
#[inline]
fn sample(t: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - t;
    3.0 * inv * inv * t * p1 + 3.0 * inv * t * t * p2 + t * t * t
}

/// Derivative of [`sample`] with respect to `t`.
#[inline]
fn slope(t: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - t;
    3.0 * inv * inv * p1 + 6.0 * inv * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}
