//! Command-line interface for the headless scenario runner

use clap::Parser;
use std::path::PathBuf;

/// Time-pause and roster skirmish simulator
#[derive(Parser, Debug)]
#[command(name = "dreamward")]
#[command(about = "Runs a scripted time-pause skirmish without graphics")]
#[command(version)]
pub struct Args {
    /// Scenario JSON file (uses the built-in skirmish when omitted)
    #[arg(long, value_name = "SCENARIO_FILE")]
    pub scenario: Option<PathBuf>,

    /// Override the scenario duration in seconds
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Override the scenario random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
