//! Dreamward - Time-Pause and Unit Roster Core
//!
//! Headless driver that plays a scripted skirmish scenario through the
//! gameplay plugins and prints the resulting report.

use std::process::ExitCode;

use dreamward::cli;
use dreamward::headless::{run_scenario, ScenarioConfig};

fn main() -> ExitCode {
    let args = cli::parse_args();

    let mut config = match &args.scenario {
        Some(path) => match ScenarioConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => ScenarioConfig::default(),
    };

    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }
    if args.seed.is_some() {
        config.random_seed = args.seed;
    }

    match run_scenario(config) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Scenario failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
