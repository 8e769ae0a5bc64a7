//! hordesim - Server-Authoritative Bot Combat Simulation
//!
//! Headless entry point: load (or default) a scenario configuration, apply
//! command-line overrides, and run it to completion.

use hordesim::cli;
use hordesim::headless::{run_headless_scenario, ScenarioConfig};

fn main() {
    let args = cli::parse_args();

    let mut config = match &args.scenario {
        Some(path) => match ScenarioConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => ScenarioConfig::default(),
    };

    if let Some(output) = args.output {
        config.output_path = Some(output.to_string_lossy().into_owned());
    }
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }

    if let Err(e) = run_headless_scenario(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
