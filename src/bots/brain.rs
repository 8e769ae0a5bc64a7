//! Bot Brain
//!
//! The state machine and decision loop. Each bot ticks every frame: timers
//! advance, the smoothed facing runs, and once the reaction interval elapses
//! one decision cycle fires. The decision cycle is where targets are
//! validated, attacks are attempted, and movement commands are issued.
//!
//! State transitions are ordered exit(old) -> assign -> enter(new). The
//! enter and exit callbacks mutate only the brain itself and describe their
//! external side effects (facing control, immediate attack attempts) as a
//! `StateChangeEffects` value applied by the caller, which keeps the
//! transition table testable in isolation.

use bevy::prelude::*;

use super::attack::start_attack;
use super::components::{Bot, BotAttack, BotBrain, BotLocomotion, BotState, GameRng, NavAgent};
use super::constants::{
    COMBAT_DISABLE_REACTION, COMBAT_ENABLE_REACTION, FACING_SLERP_RATE, RALLY_RADIUS,
    WANDER_RADIUS,
};
use super::roles::{ReactionProfile, RoleTunings};
use super::spatial::SpatialIndex;
use crate::combat::events::{AnimationCueEvent, TauntEvent};
use crate::combat::log::{CombatLog, CombatLogEventType};

/// External side effects requested by a state transition, applied by the
/// caller after the transition completes.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StateChangeEffects {
    /// Hand facing control back to (or take it from) the nav agent.
    pub set_auto_face: Option<bool>,
    /// Attempt an attack immediately, cooldown permitting.
    pub attempt_attack: bool,
}

impl BotBrain {
    /// Transition to `new_state`: exit callback, state assignment, enter
    /// callback, in that order.
    pub fn change_state(
        &mut self,
        new_state: BotState,
        profile: &ReactionProfile,
        rng: &mut GameRng,
    ) -> StateChangeEffects {
        let old_state = self.state;
        debug!("state change {:?} -> {:?}", old_state, new_state);

        let mut effects = StateChangeEffects::default();
        self.exit_state(old_state, &mut effects);
        self.state = new_state;
        self.enter_state(new_state, profile, rng, &mut effects);
        effects
    }

    fn exit_state(&mut self, old_state: BotState, effects: &mut StateChangeEffects) {
        match old_state {
            BotState::Attack => {
                // Melee is over; the nav agent may steer the facing again.
                effects.set_auto_face = Some(true);
                self.is_close_to_target = false;
                self.out_of_combat_timer = 0.0;
            }
            BotState::Follow => {
                self.out_of_combat_timer = 0.0;
            }
            _ => {}
        }

        // Every state's custom interval is transient: restore the spawn-time
        // baseline before the enter callback applies its own.
        self.reaction_interval = self.baseline_reaction;
    }

    fn enter_state(
        &mut self,
        new_state: BotState,
        profile: &ReactionProfile,
        rng: &mut GameRng,
        effects: &mut StateChangeEffects,
    ) {
        if let Some(interval) = profile.sample(new_state, rng) {
            self.reaction_interval = interval;
        }

        if new_state == BotState::Attack {
            // Close enough to swing: take facing away from the nav agent so
            // the smoothed target facing keeps the bot lined up, and swing
            // right away if the cooldown allows.
            self.is_close_to_target = true;
            effects.set_auto_face = Some(false);
            effects.attempt_attack = true;
        }
    }

    /// Enter or leave combat outside the normal transition flow.
    pub fn toggle_combat(&mut self, enable: bool) {
        if enable {
            self.in_combat = true;
            self.reaction_interval = COMBAT_ENABLE_REACTION;
        } else {
            self.current_target = None;
            self.is_close_to_target = false;
            self.in_combat = false;
            self.reaction_interval = COMBAT_DISABLE_REACTION;
        }
    }

    /// Answer an attacker: a bot with no target adopts the aggressor and goes
    /// straight to `Attack`. Returns the transition effects if it did.
    pub fn taunt(
        &mut self,
        aggressor: Entity,
        profile: &ReactionProfile,
        rng: &mut GameRng,
    ) -> Option<StateChangeEffects> {
        if self.current_target.is_some() {
            return None;
        }
        self.current_target = Some(aggressor);
        self.in_combat = true;
        Some(self.change_state(BotState::Attack, profile, rng))
    }

    /// Reset to the spawn state (used on resurrection).
    pub fn reset(&mut self) {
        self.state = BotState::Start;
        self.reaction_interval = self.baseline_reaction;
        self.brain_timer = 0.0;
        self.current_target = None;
        self.in_combat = false;
        self.is_close_to_target = false;
        self.out_of_combat_timer = 0.0;
        self.active = true;
    }
}

/// Apply the side effects a state transition asked for.
pub fn apply_state_effects(
    entity: Entity,
    effects: StateChangeEffects,
    attack: &mut BotAttack,
    nav: &mut NavAgent,
    now: f32,
    cues: &mut EventWriter<AnimationCueEvent>,
) {
    if let Some(auto_face) = effects.set_auto_face {
        nav.set_auto_face(auto_face);
    }
    if effects.attempt_attack && attack.can_attack(now) {
        start_attack(entity, attack, now, cues);
    }
}

/// The per-frame brain tick: facing, the one-shot `Start` transition, the
/// out-of-combat recall, and the reaction-gated decision cycle.
pub fn bot_brain_tick(
    time: Res<Time>,
    index: Res<SpatialIndex>,
    tunings: Res<RoleTunings>,
    mut rng: ResMut<GameRng>,
    mut combat_log: ResMut<CombatLog>,
    mut cues: EventWriter<AnimationCueEvent>,
    mut bots: Query<(
        Entity,
        &Bot,
        &mut Transform,
        &mut BotBrain,
        &mut BotAttack,
        &mut BotLocomotion,
        &mut NavAgent,
    )>,
) {
    let dt = time.delta_secs();
    let now = time.elapsed_secs();

    for (entity, bot, mut transform, mut brain, mut attack, mut locomotion, mut nav) in
        bots.iter_mut()
    {
        if !brain.active {
            continue;
        }
        let profile = &tunings.get(bot.role).reaction;

        // Smoothed rotation toward the current target while in melee contact.
        if brain.is_close_to_target {
            if let Some(entry) = brain.current_target.and_then(|t| index.get(t)) {
                face_target(&mut transform, entry.position, dt);
            }
        }

        // Bots start in the Start state.
        if brain.state == BotState::Start {
            let effects = brain.change_state(BotState::Wander, profile, &mut rng);
            apply_state_effects(entity, effects, &mut attack, &mut nav, now, &mut cues);
            continue;
        }

        // Bots that stay out of combat too long are recalled toward the
        // rally point. Decision cycles stay suppressed until they get there.
        if brain.state != BotState::Follow && brain.state != BotState::Attack {
            brain.out_of_combat_timer += dt;
            if brain.out_of_combat_timer > brain.out_of_combat_limit {
                brain.brain_timer = 0.0;
                locomotion.move_to(&mut nav, transform.translation, Vec3::ZERO, false);
                if transform.translation.distance(Vec3::ZERO) < RALLY_RADIUS {
                    brain.out_of_combat_timer = 0.0;
                }
            }
        }

        brain.brain_timer += dt;
        if brain.brain_timer >= brain.reaction_interval {
            decide(
                entity,
                bot,
                transform.translation,
                &mut brain,
                &mut attack,
                &mut locomotion,
                &mut nav,
                &index,
                profile,
                &mut rng,
                &mut combat_log,
                &mut cues,
                now,
            );
        }
    }
}

/// One decision cycle.
#[allow(clippy::too_many_arguments)]
fn decide(
    entity: Entity,
    bot: &Bot,
    position: Vec3,
    brain: &mut BotBrain,
    attack: &mut BotAttack,
    locomotion: &mut BotLocomotion,
    nav: &mut NavAgent,
    index: &SpatialIndex,
    profile: &ReactionProfile,
    rng: &mut GameRng,
    combat_log: &mut CombatLog,
    cues: &mut EventWriter<AnimationCueEvent>,
    now: f32,
) {
    brain.brain_timer = 0.0;

    // In combat: close the distance and attack, or fall back to tracking.
    if brain.in_combat {
        let target = brain
            .current_target
            .and_then(|t| index.get(t).map(|entry| (t, *entry)));

        match target {
            None => {
                // Target unset or despawned between ticks: stand down.
                let effects = brain.change_state(BotState::Idle, profile, rng);
                apply_state_effects(entity, effects, attack, nav, now, cues);
                brain.current_target = None;
                brain.in_combat = false;
            }

            Some((target, entry)) if position.distance(entry.position) < attack.melee_range => {
                brain.is_close_to_target = true;

                if brain.state != BotState::Attack {
                    // Transition to attack state to set proper values.
                    let effects = brain.change_state(BotState::Attack, profile, rng);
                    apply_state_effects(entity, effects, attack, nav, now, cues);
                } else if !attack.target_alive(target, index) {
                    // The target died since the last cycle: find someone else.
                    attack.purge_stale(position, index);
                    match attack.best_candidate(position, index) {
                        Some(next) => {
                            brain.current_target = Some(next);
                            let effects = brain.change_state(BotState::Follow, profile, rng);
                            apply_state_effects(entity, effects, attack, nav, now, cues);
                        }
                        None => {
                            let effects = brain.change_state(BotState::Idle, profile, rng);
                            apply_state_effects(entity, effects, attack, nav, now, cues);
                            brain.current_target = None;
                            brain.in_combat = false;
                        }
                    }
                } else if attack.can_attack(now) {
                    start_attack(entity, attack, now, cues);
                }
            }

            Some((target, _)) => {
                brain.is_close_to_target = false;

                // First clean up the candidate set, then take stock.
                attack.purge_stale(position, index);

                if attack.targets.is_empty() {
                    let message = format!(
                        "{} had no targets of interest left, resetting combat",
                        bot.display_name
                    );
                    warn!("{}", message);
                    combat_log.log(CombatLogEventType::Anomaly, message);
                    brain.toggle_combat(false);
                    return;
                }

                if !attack.targets.contains(&target) {
                    let message = format!(
                        "{} lost {:?} from its targets of interest, resetting combat",
                        bot.display_name, target
                    );
                    warn!("{}", message);
                    combat_log.log(CombatLogEventType::Anomaly, message);
                    brain.toggle_combat(false);
                    return;
                }

                // Still in combat, but a closer threat may have appeared.
                brain.current_target = attack.detect_candidates(entity, bot.faction, position, index);

                if brain.state != BotState::Follow {
                    let effects = brain.change_state(BotState::Follow, profile, rng);
                    apply_state_effects(entity, effects, attack, nav, now, cues);
                }
                if let Some(chase) = brain.current_target.and_then(|t| index.get(t)) {
                    locomotion.move_to(nav, position, chase.position, false);
                }
            }
        }
    }

    // Out of combat: look for trouble each cycle, otherwise wander or idle.
    if !brain.in_combat {
        brain.current_target = attack.detect_candidates(entity, bot.faction, position, index);

        if brain.current_target.is_some() {
            brain.toggle_combat(true);
        } else if rng.random_f32() < 0.5 {
            if brain.state != BotState::Wander {
                let effects = brain.change_state(BotState::Wander, profile, rng);
                apply_state_effects(entity, effects, attack, nav, now, cues);
            }
            let destination = random_position_near(position, WANDER_RADIUS, rng);
            locomotion.move_to(nav, position, destination, false);
        } else {
            let effects = brain.change_state(BotState::Idle, profile, rng);
            apply_state_effects(entity, effects, attack, nav, now, cues);
        }
    }
}

/// Apply taunts from resolved strikes: idle victims answer their attacker.
pub fn apply_taunts(
    time: Res<Time>,
    tunings: Res<RoleTunings>,
    mut rng: ResMut<GameRng>,
    mut cues: EventWriter<AnimationCueEvent>,
    mut taunts: EventReader<TauntEvent>,
    mut bots: Query<(&Bot, &mut BotBrain, &mut BotAttack, &mut NavAgent)>,
) {
    let now = time.elapsed_secs();

    for event in taunts.read() {
        let Ok((bot, mut brain, mut attack, mut nav)) = bots.get_mut(event.victim) else {
            continue;
        };
        if !brain.active {
            continue;
        }

        let profile = &tunings.get(bot.role).reaction;
        if let Some(effects) = brain.taunt(event.aggressor, profile, &mut rng) {
            apply_state_effects(event.victim, effects, &mut attack, &mut nav, now, &mut cues);
        }
    }
}

/// Smoothly rotate toward the target's horizontal bearing.
fn face_target(transform: &mut Transform, target_position: Vec3, dt: f32) {
    let flat_target = Vec3::new(target_position.x, transform.translation.y, target_position.z);
    let to_target = flat_target - transform.translation;
    if to_target.length_squared() <= f32::EPSILON {
        return;
    }

    let desired = Transform::from_translation(transform.translation)
        .looking_at(flat_target, Vec3::Y)
        .rotation;
    transform.rotation = transform
        .rotation
        .slerp(desired, (FACING_SLERP_RATE * dt).min(1.0));
}

/// A random position on the ground plane within `distance` of `origin` on
/// each axis.
pub fn random_position_near(origin: Vec3, distance: f32, rng: &mut GameRng) -> Vec3 {
    let offset_x = rng.random_range(-distance, distance);
    let offset_z = rng.random_range(-distance, distance);
    Vec3::new(origin.x + offset_x, 0.0, origin.z + offset_z)
}
