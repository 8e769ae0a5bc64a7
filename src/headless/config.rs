//! JSON configuration parsing for headless scenarios
//!
//! Parses JSON scenario configurations and converts them to the director's
//! population settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::director::DirectorConfig;

/// Headless scenario configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Standard bots spawned at startup (default: 4)
    #[serde(default = "default_standard_bots")]
    pub standard_bots: u32,
    /// How many of the standard bots accept external move orders (default: 0)
    #[serde(default)]
    pub player_ordered_bots: u32,
    /// Alert bots spawned at startup (default: 10)
    #[serde(default = "default_alert_bots")]
    pub alert_bots: u32,
    /// Cap on live alert bots (default: 20)
    #[serde(default = "default_max_alert_bots")]
    pub max_alert_bots: u32,
    /// Seconds between replacement spawn attempts (default: 5)
    #[serde(default = "default_spawn_interval")]
    pub spawn_interval_secs: f32,
    /// Seconds before the first replacement spawn attempt (default: 15)
    #[serde(default = "default_first_wave_delay")]
    pub first_wave_delay_secs: f32,
    /// Maximum scenario duration in seconds (default: 300)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for deterministic scenario reproduction
    /// If provided, the run will use a seeded RNG for reproducible results
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for the scenario log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
}

fn default_standard_bots() -> u32 {
    4
}

fn default_alert_bots() -> u32 {
    10
}

fn default_max_alert_bots() -> u32 {
    20
}

fn default_spawn_interval() -> f32 {
    5.0
}

fn default_first_wave_delay() -> f32 {
    15.0
}

fn default_max_duration() -> f32 {
    300.0
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            standard_bots: default_standard_bots(),
            player_ordered_bots: 0,
            alert_bots: default_alert_bots(),
            max_alert_bots: default_max_alert_bots(),
            spawn_interval_secs: default_spawn_interval(),
            first_wave_delay_secs: default_first_wave_delay(),
            max_duration_secs: default_max_duration(),
            random_seed: None,
            output_path: None,
        }
    }
}

impl ScenarioConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: ScenarioConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.standard_bots == 0 {
            return Err("standard_bots must be at least 1".to_string());
        }
        if self.player_ordered_bots > self.standard_bots {
            return Err("player_ordered_bots cannot exceed standard_bots".to_string());
        }
        if self.max_alert_bots < self.alert_bots {
            return Err("max_alert_bots cannot be below the initial alert_bots".to_string());
        }
        if self.spawn_interval_secs <= 0.0 {
            return Err("spawn_interval_secs must be positive".to_string());
        }
        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }

        Ok(())
    }

    /// Convert to the director's population settings
    pub fn to_director_config(&self) -> DirectorConfig {
        DirectorConfig {
            standard_bots: self.standard_bots,
            player_ordered_bots: self.player_ordered_bots,
            initial_alert_bots: self.alert_bots,
            max_alert_bots: self.max_alert_bots,
            spawn_interval: self.spawn_interval_secs,
            first_wave_delay: self.first_wave_delay_secs,
            ..DirectorConfig::default()
        }
    }
}
