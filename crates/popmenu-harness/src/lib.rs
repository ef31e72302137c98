#![forbid(unsafe_code)]

//! Headless host and scenario harness for the popmenu widget.
//!
//! - [`host`]: a deterministic host loop around one menu.
//! - [`scenario`]: JSON scenario documents and their runner.
//! - [`golden`]: frame checksums, JSONL run logs and golden files.

pub mod cli;
pub mod error;
pub mod golden;
pub mod host;
pub mod scenario;

pub use error::{HarnessError, Result};
pub use golden::{GoldenLogger, GoldenOutcome, frame_checksum};
pub use host::{FrameReport, HeadlessHost, HostConfig};
pub use scenario::{Scenario, ScenarioReport, Step, run_scenario};
