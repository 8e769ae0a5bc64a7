//! Command-line interface for hordesim
//!
//! The binary always runs headless; these arguments select and override the
//! scenario configuration.

use clap::Parser;
use std::path::PathBuf;

/// Server-authoritative bot combat simulator
#[derive(Parser, Debug)]
#[command(name = "hordesim")]
#[command(about = "Server-authoritative bot combat simulator")]
#[command(version)]
pub struct Args {
    /// Run the scenario described by a JSON config file (built-in defaults
    /// apply when omitted)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub scenario: Option<PathBuf>,

    /// Output path for the scenario log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum scenario duration in seconds
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Random seed for a deterministic run
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
