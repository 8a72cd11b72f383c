//! Prestimax - Command Line Interface
//!
//! This is the main entry point for the prestige time estimator.
//! Run with `--help` to see all available options.

use anyhow::Context;
use clap::{ArgAction, Parser};
use log::debug;
use std::path::PathBuf;

use prestimax::{
    config::{CalculatorConfig, SearchStrategy},
    data::load_snapshot,
    display::display_results,
    optimizer::calculate_prestige,
};

/// Command-line arguments for Prestimax.
#[derive(Parser, Debug)]
#[command(name = "prestimax")]
#[command(author, version, about = "Estimate the time until an idle game's prestige unlocks", long_about = None)]
struct Args {
    /// Snapshot to analyse: a JSON file or a directory of CSV tables
    snapshot: PathBuf,

    /// TOML file with calculator settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Significant digits used by the root solver
    #[arg(short, long)]
    precision: Option<u64>,

    /// How to search the twin count for each goal
    #[arg(short, long, value_enum)]
    strategy: Option<SearchStrategy>,

    /// Cap on the total number of twins per unit
    #[arg(long)]
    max_twins: Option<u64>,

    /// Print the result as JSON instead of a text report
    #[arg(long, default_value = "false")]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => CalculatorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CalculatorConfig::default(),
    };
    if let Some(precision) = args.precision {
        config.precision = precision;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(max_twins) = args.max_twins {
        config.max_twins = max_twins;
    }
    config.validate()?;
    debug!("Using {:?}", config);

    let snapshot = load_snapshot(&args.snapshot)
        .with_context(|| format!("failed to load snapshot {}", args.snapshot.display()))?;

    let result = calculate_prestige(&snapshot, &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Prestimax - Prestige Time Estimator");
        println!("================================================================");
        println!();
        println!("Configuration:");
        println!("  Snapshot:        {}", args.snapshot.display());
        println!("  Precision:       {} digits", config.precision);
        println!("  Strategy:        {:?}", config.strategy);
        println!("  Max Twins:       {}", config.max_twins);
        println!();
        println!(
            "Loaded {} units, {} actions and {} unlock thresholds.",
            snapshot.units.len(),
            snapshot.actions.len(),
            snapshot.unlock_thresholds.len()
        );

        display_results(&result);
    }

    Ok(())
}
