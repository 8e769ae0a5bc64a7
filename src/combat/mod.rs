//! Combat module
//!
//! The damage pipeline downstream of the bot core:
//! - Integer hit points and damage application
//! - Death detection and per-role death handling (resurrection vs. removal)
//! - The shared kill counter
//! - Combat logging

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod log;
pub mod systems;

use crate::bots::SimPhase;
use events::*;
use systems::*;

/// Plugin for the damage and health pipeline
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Combat events
            .add_event::<DamageEvent>()
            .add_event::<BotDeathEvent>()
            .add_event::<TauntEvent>()
            .add_event::<AnimationCueEvent>()
            // Resources
            .init_resource::<log::CombatLog>()
            .init_resource::<components::KillCounter>()
            // Systems
            .add_systems(
                Update,
                (
                    process_damage_events,
                    check_bot_deaths,
                    handle_bot_deaths,
                    process_resurrections,
                    process_removals,
                    record_combat_log,
                )
                    .chain()
                    .in_set(SimPhase::Resolve),
            );
    }
}
