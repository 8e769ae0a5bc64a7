//! hordesim - Server-Authoritative Bot Combat Simulation
//!
//! The decision-and-combat core of autonomous agents in a multiplayer
//! survival simulation: standard bots fight waves of faster, more alert
//! "zombie" bots. All decisions run on the authoritative side; observers
//! only see the replication stream.
//!
//! This library exposes the core simulation modules for testing and reuse.

use bevy::prelude::*;

pub mod bots;
pub mod cli;
pub mod combat;
pub mod director;
pub mod headless;
pub mod replication;

// Re-export commonly used types
pub use bots::components::{Bot, BotRole, BotState, GameRng};
pub use combat::log::{CombatLog, CombatLogEventType};
pub use headless::ScenarioConfig;

/// The authoritative simulation: bot decision core, damage pipeline, and
/// replication boundary. The simulation driver (`DirectorPlugin`) and role
/// tuning loader are added separately so tests can drive populations by
/// hand.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            bots::BotsPlugin,
            combat::CombatPlugin,
            replication::ReplicationPlugin,
        ));
    }
}
