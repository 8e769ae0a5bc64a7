//! Combat systems
//!
//! ECS systems that apply damage, detect deaths, and run each role's
//! death handling: standard bots resurrect after a delay, alert bots are
//! counted and removed from the simulation.

use bevy::prelude::*;

use super::components::*;
use super::events::*;
use super::log::{CombatLog, CombatLogEventType};
use crate::bots::components::{Bot, BotBrain, BotLocomotion, BotRole, NavAgent};
use crate::bots::roles::{DeathPolicy, RoleTunings};

/// Process damage events and apply damage to targets
pub fn process_damage_events(
    mut damage_events: EventReader<DamageEvent>,
    mut health_query: Query<&mut Health>,
    mut stats_query: Query<&mut CombatStats>,
) {
    for event in damage_events.read() {
        // Apply damage to target
        if let Ok(mut health) = health_query.get_mut(event.target) {
            health.apply_damage(event.amount);
        }

        // Update source stats
        if let Ok(mut stats) = stats_query.get_mut(event.source) {
            stats.damage_dealt += event.amount;
        }

        // Update target stats
        if let Ok(mut stats) = stats_query.get_mut(event.target) {
            stats.damage_taken += event.amount;
        }
    }
}

/// Check for bots whose hit points just reached zero and send death events
pub fn check_bot_deaths(
    bots: Query<(Entity, &Health, &BotBrain), Changed<Health>>,
    mut death_events: EventWriter<BotDeathEvent>,
) {
    for (entity, health, brain) in bots.iter() {
        // `active` is cleared by death handling, so a corpse taking further
        // hits does not die twice.
        if !health.is_alive() && brain.active {
            death_events.send(BotDeathEvent { victim: entity });
        }
    }
}

/// Freeze dead bots and schedule what happens next for their role:
/// resurrection for standard bots, counted removal for alert bots.
pub fn handle_bot_deaths(
    time: Res<Time>,
    tunings: Res<RoleTunings>,
    mut commands: Commands,
    mut kill_counter: ResMut<KillCounter>,
    mut cues: EventWriter<AnimationCueEvent>,
    mut death_events: EventReader<BotDeathEvent>,
    mut bots: Query<(&Bot, &mut BotBrain, &mut NavAgent, &mut BotLocomotion)>,
) {
    let now = time.elapsed_secs();

    for event in death_events.read() {
        let Ok((bot, mut brain, mut nav, mut locomotion)) = bots.get_mut(event.victim) else {
            continue;
        };

        brain.active = false;
        nav.set_enabled(false);
        locomotion.enabled = false;

        cues.send(AnimationCueEvent {
            entity: event.victim,
            cue: AnimationCue::Death,
        });

        if bot.role == BotRole::Alert {
            kill_counter.increment();
        }

        match tunings.get(bot.role).death_policy {
            DeathPolicy::Resurrect { delay, .. } => {
                commands.entity(event.victim).insert(Resurrecting { at: now + delay });
            }
            DeathPolicy::Remove { delay } => {
                commands.entity(event.victim).insert(DespawnAt { at: now + delay });
            }
        }
    }
}

/// Bring scheduled standard bots back: restore hit points, reset the brain to
/// its spawn state, and re-enable movement.
pub fn process_resurrections(
    time: Res<Time>,
    tunings: Res<RoleTunings>,
    mut commands: Commands,
    mut cues: EventWriter<AnimationCueEvent>,
    mut bots: Query<(
        Entity,
        &Bot,
        &Resurrecting,
        &mut Health,
        &mut BotBrain,
        &mut NavAgent,
        &mut BotLocomotion,
    )>,
) {
    let now = time.elapsed_secs();

    for (entity, bot, resurrecting, mut health, mut brain, mut nav, mut locomotion) in
        bots.iter_mut()
    {
        if now < resurrecting.at {
            continue;
        }

        let DeathPolicy::Resurrect { hit_points, .. } = tunings.get(bot.role).death_policy else {
            continue;
        };

        health.restore(hit_points);
        brain.reset();
        nav.set_enabled(true);
        locomotion.enabled = true;

        commands.entity(entity).remove::<Resurrecting>();
        cues.send(AnimationCueEvent {
            entity,
            cue: AnimationCue::Respawn,
        });
    }
}

/// Despawn dead alert bots whose removal time has passed
pub fn process_removals(
    time: Res<Time>,
    mut commands: Commands,
    scheduled: Query<(Entity, &DespawnAt)>,
) {
    let now = time.elapsed_secs();
    for (entity, despawn) in scheduled.iter() {
        if now >= despawn.at {
            commands.entity(entity).despawn();
        }
    }
}

/// Record damage, death, and respawn events to the combat log
pub fn record_combat_log(
    time: Res<Time>,
    mut combat_log: ResMut<CombatLog>,
    mut damage_events: EventReader<DamageEvent>,
    mut death_events: EventReader<BotDeathEvent>,
    mut cue_events: EventReader<AnimationCueEvent>,
    bots: Query<&Bot>,
) {
    combat_log.sim_time += time.delta_secs();

    let name_of = |entity: Entity| -> String {
        bots.get(entity)
            .map(|b| b.display_name.clone())
            .unwrap_or_else(|_| "Unknown".to_string())
    };

    for event in damage_events.read() {
        let message = format!(
            "{} hits {} for {} damage",
            name_of(event.source),
            name_of(event.target),
            event.amount
        );
        combat_log.log(CombatLogEventType::Damage, message);
    }

    for event in death_events.read() {
        let message = format!("{} has died", name_of(event.victim));
        combat_log.log(CombatLogEventType::Death, message);
    }

    for event in cue_events.read() {
        if event.cue == AnimationCue::Respawn {
            let message = format!("{} is back on its feet", name_of(event.entity));
            combat_log.log(CombatLogEventType::Respawn, message);
        }
    }
}
