//! Bot Core
//!
//! The decision-and-combat core of the simulation's autonomous agents. Each
//! bot carries a brain (finite-state machine ticked on the fixed step), a
//! combat controller (cooldown-gated attacks with deferred strike
//! resolution and an embedded target tracker), and a movement controller
//! wrapping the nav agent.
//!
//! ## Tick Flow
//! 1. `rebuild_spatial_index`: snapshot every damageable entity
//! 2. `bot_brain_tick`: timers, facing, one decision cycle per reaction
//!    interval
//! 3. `resolve_pending_strikes`: deferred melee hit checks
//! 4. Combat pipeline (damage, deaths, resurrection/removal) and taunts
//! 5. Movement: external orders, nav steering, locomotion blend
//! 6. Replication broadcast

pub mod attack;
pub mod brain;
pub mod components;
pub mod constants;
pub mod movement;
pub mod roles;
pub mod spatial;
pub mod targeting;

use bevy::prelude::*;

use components::GameRng;
use spatial::SpatialIndex;

/// Phases of one authoritative tick. All simulation systems are ordered
/// through these sets.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimPhase {
    /// Snapshot the world (spatial index, roster upkeep)
    Sense,
    /// Brain ticks and decision cycles
    Decide,
    /// Strike resolution, damage, deaths, taunts
    Resolve,
    /// Movement execution
    Move,
    /// Replication to observers
    Broadcast,
}

/// Plugin for the bot decision core
pub struct BotsPlugin;

impl Plugin for BotsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpatialIndex>()
            .init_resource::<GameRng>()
            .configure_sets(
                Update,
                (
                    SimPhase::Sense,
                    SimPhase::Decide,
                    SimPhase::Resolve,
                    SimPhase::Move,
                    SimPhase::Broadcast,
                )
                    .chain(),
            )
            .add_systems(Update, spatial::rebuild_spatial_index.in_set(SimPhase::Sense))
            .add_systems(Update, brain::bot_brain_tick.in_set(SimPhase::Decide))
            .add_systems(
                Update,
                (
                    attack::resolve_pending_strikes
                        .before(crate::combat::systems::process_damage_events),
                    // After the whole death pipeline, so corpses stay
                    // unresponsive and the cue stream stays deterministic.
                    brain::apply_taunts.after(crate::combat::systems::record_combat_log),
                )
                    .in_set(SimPhase::Resolve),
            )
            .add_systems(
                Update,
                (
                    movement::apply_external_move_orders,
                    movement::advance_nav_agents,
                    movement::update_locomotion_blend,
                )
                    .chain()
                    .in_set(SimPhase::Move),
            );
    }
}
