//! Bundled scenario files: expectations, determinism and golden logs.

use std::path::{Path, PathBuf};

use popmenu_harness::golden::{GoldenOutcome, verify_checksums};
use popmenu_harness::{GoldenLogger, Scenario, run_scenario};
use serde_json::Value;

fn scenario_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios")
}

fn bundled() -> Vec<Scenario> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(scenario_dir())
        .expect("scenario dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    paths
        .iter()
        .map(|path| {
            Scenario::load(path).unwrap_or_else(|err| panic!("{}: {err}", path.display()))
        })
        .collect()
}

#[test]
fn every_bundled_scenario_passes() {
    let scenarios = bundled();
    assert!(scenarios.len() >= 6);
    for scenario in &scenarios {
        let mut logger = GoldenLogger::noop();
        if let Err(err) = run_scenario(scenario, &mut logger) {
            panic!("{err}");
        }
    }
}

#[test]
fn runs_are_deterministic() {
    for scenario in bundled() {
        let mut first = GoldenLogger::in_memory();
        let mut second = GoldenLogger::in_memory();
        let a = run_scenario(&scenario, &mut first).expect("first run");
        let b = run_scenario(&scenario, &mut second).expect("second run");
        assert_eq!(a.checksums, b.checksums, "{}", scenario.name);
        assert_eq!(
            verify_checksums(&a.checksums, &b.checksums),
            (GoldenOutcome::Pass, None)
        );
        assert_eq!(first.lines(), second.lines(), "{}", scenario.name);
    }
}

#[test]
fn log_lines_describe_the_run() {
    let scenario = Scenario::load(&scenario_dir().join("right_edge_flip.json")).expect("load");
    let mut logger = GoldenLogger::in_memory();
    let report = run_scenario(&scenario, &mut logger).expect("run");

    let events: Vec<Value> = logger
        .lines()
        .iter()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(events.first().map(|e| e["event"].clone()), Some("start".into()));
    assert_eq!(events.last().map(|e| e["event"].clone()), Some("complete".into()));
    assert!(events.iter().all(|e| e["run_id"] == "right_edge_flip"));

    let tap = events
        .iter()
        .find(|e| e["event"] == "action" && e["op"] == "tap_trigger")
        .expect("tap action");
    assert_eq!(tap["action"], "measure_trigger");

    let frames: Vec<&Value> = events.iter().filter(|e| e["event"] == "frame").collect();
    assert_eq!(frames.len() as u64, report.frames);
    assert_eq!(frames[0]["lifecycle"], "animating");
    assert_eq!(frames[0]["flips"]["x"], true);
    assert!(
        frames[0]["checksum"]
            .as_str()
            .is_some_and(|c| c.starts_with("blake3:"))
    );

    let dismissed = frames
        .iter()
        .filter(|f| {
            f["actions"]
                .as_array()
                .is_some_and(|a| a.iter().any(|x| x == "dismissed"))
        })
        .count();
    assert_eq!(dismissed, 1);

    let complete = events.last().expect("complete");
    assert_eq!(complete["outcome"], "pass");
    assert_eq!(complete["dismissals"], 1);
}

#[test]
fn platform_changes_pointer_geometry_and_checksums() {
    let mut ios = Scenario::load(&scenario_dir().join("right_edge_flip.json")).expect("load");
    ios.platform = popmenu_core::platform::Platform::Ios;
    let mut android = ios.clone();
    android.platform = popmenu_core::platform::Platform::Android;

    let a = run_scenario(&ios, &mut GoldenLogger::noop()).expect("ios");
    let b = run_scenario(&android, &mut GoldenLogger::noop()).expect("android");
    // Idle frames match; mounted frames differ in pointer and shadow.
    assert_ne!(a.checksums, b.checksums);
    assert_eq!(a.frames, b.frames);
}
