//! Combat logging
//!
//! Records simulation events for diagnostics and post-run analysis. The
//! headless runner saves the log as JSON together with scenario metadata.

use bevy::prelude::*;
use serde::Serialize;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize)]
pub struct CombatLogEntry {
    /// Timestamp in sim time (seconds since scenario start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatLogEventType {
    /// Damage dealt
    Damage,
    /// A bot died
    Death,
    /// A bot came back from the dead
    Respawn,
    /// The core healed itself out of an inconsistent state
    Anomaly,
    /// Scenario event (start, end, spawn wave)
    Scenario,
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current sim time
    pub sim_time: f32,
}

impl CombatLog {
    /// Clear the log for a new scenario
    pub fn clear(&mut self) {
        self.entries.clear();
        self.sim_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.sim_time,
            event_type,
            message,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Number of entries of the given type
    pub fn count_of(&self, event_type: CombatLogEventType) -> usize {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Save the log and scenario metadata to a JSON file.
    /// Returns the path written to.
    pub fn save_to_file(
        &self,
        metadata: &ScenarioMetadata,
        output_path: Option<&str>,
    ) -> Result<String, String> {
        let path = output_path.unwrap_or("hordesim_scenario.json").to_string();

        let report = ScenarioReport {
            metadata,
            entries: &self.entries,
        };
        let contents = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize scenario log: {}", e))?;

        std::fs::write(&path, contents)
            .map_err(|e| format!("Failed to write {}: {}", path, e))?;

        Ok(path)
    }
}

/// Summary of a finished scenario, saved alongside the log entries.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioMetadata {
    /// Total scenario duration in seconds
    pub duration: f32,
    /// Alert bots destroyed over the run
    pub kills: u32,
    /// Display names of standard bots still alive at the end
    pub survivors: Vec<String>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

#[derive(Serialize)]
struct ScenarioReport<'a> {
    metadata: &'a ScenarioMetadata,
    entries: &'a [CombatLogEntry],
}
