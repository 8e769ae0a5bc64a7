//! Headless mode
//!
//! This module provides functionality to run scenarios without any graphical
//! output, suitable for automated testing and dedicated servers.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless scenario
//! cargo run --release -- --scenario scenario_config.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "standard_bots": 4,
//!   "alert_bots": 10,
//!   "max_alert_bots": 20,
//!   "max_duration_secs": 120,
//!   "random_seed": 42
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::ScenarioConfig;
pub use runner::{run_headless_scenario, BotResult, ScenarioResult};
