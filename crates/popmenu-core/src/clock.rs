#![forbid(unsafe_code)]

//! Frame clock producing per-frame deltas for animation ticks.
//!
//! Widgets never read time themselves; hosts call [`FrameClock::delta`] once
//! per frame and pass the result to `tick`. Long stalls (a backgrounded app,
//! a debugger pause) are capped so a resumed animation doesn't jump straight
//! to its end state mid-frame.

use std::time::Duration;

use web_time::Instant;

/// Default cap on a single frame delta.
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(100);

/// Monotonic frame clock.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_delta: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock with the default delta cap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: None,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }

    /// Set the delta cap (builder pattern).
    #[must_use]
    pub fn max_delta(mut self, max_delta: Duration) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Time since the previous call, capped. The first call returns zero.
    pub fn delta(&mut self) -> Duration {
        self.delta_at(Instant::now())
    }

    /// Like [`FrameClock::delta`] with an explicit timestamp.
    pub fn delta_at(&mut self, now: Instant) -> Duration {
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        dt.min(self.max_delta)
    }
}
