#![forbid(unsafe_code)]

//! Golden frame checksums and JSONL run logs.
//!
//! Each rendered frame is reduced to a BLAKE3 checksum of its display list.
//! A run logs one JSON object per line:
//!
//! ```text
//! {"event":"start","run_id":"right_edge_flip","case":"right_edge_flip","platform":"ios",...}
//! {"event":"action","run_id":"right_edge_flip","step":0,"op":"tap_trigger","action":"measure_trigger"}
//! {"event":"frame","run_id":"right_edge_flip","frame_id":1,"lifecycle":"animating",...}
//! {"event":"complete","run_id":"right_edge_flip","outcome":"pass","checksums":[...]}
//! ```
//!
//! Run ids and timestamps derive from the case name and frame counter so
//! two runs of the same scenario produce identical logs.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use popmenu_core::geometry::Size;
use popmenu_core::platform::Platform;
use popmenu_render::Frame;
use serde_json::{Value, json};

use crate::host::FrameReport;

/// Checksum prefix naming the hash.
pub const CHECKSUM_PREFIX: &str = "blake3:";

/// Environment variable that switches golden runs to re-recording.
pub const BLESS_ENV: &str = "POPMENU_BLESS";

// ============================================================================
// Checksum Computation
// ============================================================================

/// Checksum of a frame's viewport and display list.
pub fn frame_checksum(frame: &Frame) -> String {
    let mut hasher = blake3::Hasher::new();
    let viewport = frame.viewport();
    hasher.update(&viewport.width.to_le_bytes());
    hasher.update(&viewport.height.to_le_bytes());
    for command in frame.commands() {
        hasher.update(format!("{command:?}").as_bytes());
        hasher.update(b"\n");
    }
    format!("{CHECKSUM_PREFIX}{}", hasher.finalize().to_hex())
}

// ============================================================================
// JSONL Logger
// ============================================================================

/// Run outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldenOutcome {
    Pass,
    Fail,
    Skip,
}

impl GoldenOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
        }
    }
}

enum Sink {
    Noop,
    File(BufWriter<File>),
    Memory(Vec<String>),
}

/// JSONL event logger for scenario runs.
pub struct GoldenLogger {
    sink: Sink,
    run_id: String,
    checksums: Vec<String>,
}

impl GoldenLogger {
    /// Append to the log at `path`, creating parent directories.
    pub fn new(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::with_sink(Sink::File(BufWriter::new(file))))
    }

    /// Logger that records checksums but writes nothing.
    pub fn noop() -> Self {
        Self::with_sink(Sink::Noop)
    }

    /// Logger that keeps lines in memory (see [`GoldenLogger::lines`]).
    pub fn in_memory() -> Self {
        Self::with_sink(Sink::Memory(Vec::new()))
    }

    fn with_sink(sink: Sink) -> Self {
        Self {
            sink,
            run_id: String::new(),
            checksums: Vec::new(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Checksums logged since the last `log_start`.
    pub fn checksums(&self) -> &[String] {
        &self.checksums
    }

    /// Lines recorded by an in-memory logger.
    pub fn lines(&self) -> &[String] {
        match &self.sink {
            Sink::Memory(lines) => lines.as_slice(),
            Sink::Noop | Sink::File(_) => &[],
        }
    }

    /// Begin a case. Resets collected checksums.
    pub fn log_start(&mut self, case: &str, platform: Platform, viewport: Size) {
        self.run_id = case.to_string();
        self.checksums.clear();
        self.write(json!({
            "event": "start",
            "run_id": self.run_id,
            "case": case,
            "platform": platform.as_str(),
            "viewport": format!("{}x{}", viewport.width, viewport.height),
            "timestamp": timestamp(0),
        }));
    }

    /// Log a host input and the action it produced.
    pub fn log_action(&mut self, step: usize, op: &str, action: Option<&str>) {
        self.write(json!({
            "event": "action",
            "run_id": self.run_id,
            "step": step,
            "op": op,
            "action": action,
        }));
    }

    /// Log a completed frame.
    pub fn log_frame(&mut self, report: &FrameReport) {
        self.checksums.push(report.checksum.clone());
        let panel = report.layout.map(|layout| {
            let p = layout.panel;
            json!([p.x, p.y, p.width, p.height])
        });
        let flips = report
            .layout
            .map(|layout| json!({ "x": layout.placement.flips.x, "y": layout.placement.flips.y }));
        self.write(json!({
            "event": "frame",
            "run_id": self.run_id,
            "frame_id": report.frame_id,
            "lifecycle": report.lifecycle,
            "opacity": report.opacity,
            "panel": panel,
            "flips": flips,
            "actions": report.actions.iter().map(action_name).collect::<Vec<_>>(),
            "checksum": report.checksum,
            "timestamp": timestamp(report.frame_id),
        }));
    }

    /// Log a viewport change.
    pub fn log_resize(&mut self, from: Size, to: Size) {
        self.write(json!({
            "event": "resize",
            "run_id": self.run_id,
            "from": format!("{}x{}", from.width, from.height),
            "to": format!("{}x{}", to.width, to.height),
        }));
    }

    /// Log case completion.
    pub fn log_complete(&mut self, outcome: GoldenOutcome, dismissals: u32) {
        self.write(json!({
            "event": "complete",
            "run_id": self.run_id,
            "outcome": outcome.as_str(),
            "dismissals": dismissals,
            "checksums": self.checksums,
        }));
    }

    /// Log an error event.
    pub fn log_error(&mut self, message: &str) {
        self.write(json!({
            "event": "error",
            "run_id": self.run_id,
            "message": message,
        }));
    }

    fn write(&mut self, line: Value) {
        let line = line.to_string();
        match &mut self.sink {
            Sink::Noop => {}
            Sink::File(writer) => {
                let _ = writeln!(writer, "{line}");
                let _ = writer.flush();
            }
            Sink::Memory(lines) => lines.push(line),
        }
    }
}

impl std::fmt::Debug for GoldenLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoldenLogger")
            .field("run_id", &self.run_id)
            .field("checksums", &self.checksums.len())
            .finish()
    }
}

/// Snake-case name of a menu action for logs.
pub fn action_name(action: &popmenu_widgets::menu::MenuAction) -> &'static str {
    use popmenu_widgets::menu::MenuAction;
    match action {
        MenuAction::MeasureTrigger(_) => "measure_trigger",
        MenuAction::Hiding => "hiding",
        MenuAction::Dismissed => "dismissed",
    }
}

fn timestamp(frame_id: u64) -> String {
    format!("T{frame_id:06}")
}

// ============================================================================
// Golden Files
// ============================================================================

/// Path of the checksum file for a scenario.
pub fn golden_checksum_path(base_dir: &Path, scenario_name: &str) -> PathBuf {
    base_dir.join(format!("{scenario_name}.checksums"))
}

/// Load expected checksums, one per line. A missing file yields none.
pub fn load_golden_checksums(path: &Path) -> std::io::Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

/// Write checksums, one per line.
pub fn save_golden_checksums(path: &Path, checksums: &[String]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut content = String::from("# popmenu golden checksums\n");
    for checksum in checksums {
        content.push_str(checksum);
        content.push('\n');
    }
    fs::write(path, content)
}

/// Whether golden runs should re-record instead of compare.
pub fn is_bless_mode() -> bool {
    std::env::var(BLESS_ENV).is_ok_and(|v| v == "1")
}

/// Compare checksums; returns the first mismatching frame on failure.
///
/// An empty expectation passes.
pub fn verify_checksums(actual: &[String], expected: &[String]) -> (GoldenOutcome, Option<usize>) {
    if expected.is_empty() {
        return (GoldenOutcome::Pass, None);
    }
    if let Some(index) = actual
        .iter()
        .zip(expected)
        .position(|(a, e)| a != e)
    {
        return (GoldenOutcome::Fail, Some(index));
    }
    if actual.len() != expected.len() {
        return (GoldenOutcome::Fail, Some(actual.len().min(expected.len())));
    }
    (GoldenOutcome::Pass, None)
}
