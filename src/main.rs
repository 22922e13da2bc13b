//! EcoLlajta - Command Line Interface
//!
//! This is the main entry point for the production allocation tool.
//! Run with `--help` to see all available options.

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ecollajta::{
    data::load_timing_config,
    display::display_plan,
    models::{OptimizationReport, StageKind, TimingConfig, DEFAULT_MAX_MOLDS},
    optimizer::allocate,
};

/// Command-line arguments for EcoLlajta.
#[derive(Parser, Debug)]
#[command(name = "ecollajta")]
#[command(author, version, about = "Allocate workers and equipment across the EcoLlajta pot production line", long_about = None)]
struct Args {
    /// Number of pots to produce
    #[arg(short, long, default_value = "20")]
    units: u32,

    /// Number of workers available
    #[arg(short, long, default_value = "11")]
    workers: u32,

    /// Maximum number of molds that may be provisioned
    #[arg(long, default_value_t = DEFAULT_MAX_MOLDS)]
    max_molds: u32,

    /// Timing file (.csv or .json) with per-stage minutes
    #[arg(short, long)]
    timings: Option<PathBuf>,

    // ========== Per-stage overrides (minutes) ==========
    /// Grinding minutes per pot
    #[arg(long)]
    grinding: Option<f64>,

    /// Measuring minutes per pot
    #[arg(long)]
    measuring: Option<f64>,

    /// Greasing minutes per pot
    #[arg(long)]
    greasing: Option<f64>,

    /// Mixing-pouring minutes per pot
    #[arg(long)]
    mixing: Option<f64>,

    /// Minutes per drying cycle
    #[arg(long)]
    drying: Option<f64>,

    /// Unmolding minutes per pot
    #[arg(long)]
    unmolding: Option<f64>,

    /// Print the result as JSON instead of a table
    #[arg(long, default_value = "false")]
    json: bool,

    /// Log every optimization step to stderr
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> TimingConfig {
        let mut config = TimingConfig::default();
        let flags = [
            (StageKind::Grinding, self.grinding),
            (StageKind::Measuring, self.measuring),
            (StageKind::Greasing, self.greasing),
            (StageKind::MixingPouring, self.mixing),
            (StageKind::Drying, self.drying),
            (StageKind::Unmolding, self.unmolding),
        ];
        for (stage, minutes) in flags {
            if let Some(minutes) = minutes {
                config.set(stage, minutes);
            }
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // File first, then command-line flags on top
    let mut config = match &args.timings {
        Some(path) => load_timing_config(path)?,
        None => TimingConfig::default(),
    };
    config.merge(&args.overrides());
    let timings = config.resolve();

    let result = allocate(args.units, args.workers, &timings, args.max_molds);

    if args.json {
        let report = OptimizationReport::from(result);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("EcoLlajta - Production Line Allocator");
    println!("================================================================");
    println!();
    println!("Configuration:");
    println!("  Pots:            {}", args.units);
    println!("  Workers:         {}", args.workers);
    println!("  Max Molds:       {}", args.max_molds);
    println!();
    println!("Standard times (min):");
    for stage in StageKind::ALL {
        let unit = if stage == StageKind::Drying { "per cycle" } else { "per pot" };
        println!("  {:<16} {:>6.2} {}", stage.name(), timings.minutes(stage), unit);
    }

    match result {
        Ok(plan) => display_plan(&plan),
        Err(err) => {
            println!();
            println!("[ERROR] {}", err);
            std::process::exit(1);
        }
    }

    Ok(())
}
