#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use popmenu_core::logging::DEFAULT_FILTER;
use popmenu_core::platform::Platform;
use tracing_subscriber::EnvFilter;

use crate::error::{HarnessError, Result};
use crate::golden::{
    GoldenLogger, GoldenOutcome, golden_checksum_path, is_bless_mode, load_golden_checksums,
    save_golden_checksums, verify_checksums,
};
use crate::scenario::{Pacing, Scenario, run_scenario_with};

#[derive(Debug, Parser)]
#[command(
    name = "popmenu-harness",
    about = "Headless scenario runner for the popmenu widget",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run scenarios and check their expectations.
    Run(RunArgs),

    /// Parse and validate scenarios without running them.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Scenario files.
    #[arg(required = true)]
    pub scenarios: Vec<PathBuf>,

    /// Append a JSONL run log here.
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Compare frame checksums against `<dir>/<name>.checksums`.
    #[arg(long)]
    pub golden_dir: Option<PathBuf>,

    /// Record checksums instead of comparing (also `POPMENU_BLESS=1`).
    #[arg(long)]
    pub bless: bool,

    /// Override every scenario's platform.
    #[arg(long, value_enum)]
    pub platform: Option<PlatformArg>,

    /// Sleep between frames and tick by wall-clock time.
    #[arg(long)]
    pub realtime: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(required = true)]
    pub scenarios: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Ios,
    Android,
    Other,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Ios => Self::Ios,
            PlatformArg::Android => Self::Android,
            PlatformArg::Other => Self::Other,
        }
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs)?;
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run_scenarios(&args),
        Commands::Check(args) => check_scenarios(&args),
    }
}

/// Install a stderr subscriber filtered by `RUST_LOG`.
pub fn init_logging(json: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| HarnessError::Logging(err.to_string()))
}

fn run_scenarios(args: &RunArgs) -> Result<()> {
    let mut logger = match &args.log {
        Some(path) => GoldenLogger::new(path)?,
        None => GoldenLogger::noop(),
    };
    let pacing = if args.realtime {
        Pacing::Realtime
    } else {
        Pacing::Fixed
    };
    let bless = args.bless || is_bless_mode();

    for path in &args.scenarios {
        let mut scenario = Scenario::load(path)?;
        if let Some(platform) = args.platform {
            scenario.platform = platform.into();
        }
        let report = run_scenario_with(&scenario, &mut logger, pacing)?;

        if let Some(dir) = &args.golden_dir {
            let golden = golden_checksum_path(dir, &report.name);
            if bless {
                save_golden_checksums(&golden, &report.checksums)?;
                println!("BLESS: {} ({} frames)", report.name, report.frames);
                continue;
            }
            let expected = load_golden_checksums(&golden)?;
            if let (GoldenOutcome::Fail, frame) = verify_checksums(&report.checksums, &expected) {
                return Err(HarnessError::GoldenMismatch {
                    scenario: report.name,
                    frame: frame.unwrap_or_default(),
                });
            }
        }
        println!(
            "PASS: {} ({} frames, {} dismissals)",
            report.name, report.frames, report.dismissals
        );
    }
    Ok(())
}

fn check_scenarios(args: &CheckArgs) -> Result<()> {
    for path in &args.scenarios {
        let scenario = Scenario::load(path)?;
        println!("OK: {} ({} steps)", scenario.name, scenario.steps.len());
    }
    Ok(())
}
