//! Melee Attack Pipeline
//!
//! The cooldown-and-strike half of the combat controller. An attack is a two
//! step affair: `can_attack` consumes the cooldown and `start_attack` fires
//! the animation cue and schedules a `PendingStrike`; the strike resolves
//! into an actual hit check only after the configured delay, so damage lands
//! in sync with the swing animation. Starting a new attack replaces any
//! strike still in flight.

use bevy::prelude::*;

use super::components::{Bot, BotAttack, PendingStrike, TargetsOfInterest};
use super::roles::RoleTuning;
use super::spatial::SpatialIndex;
use crate::combat::events::{AnimationCue, AnimationCueEvent, DamageEvent, TauntEvent};

impl BotAttack {
    pub fn from_tuning(tuning: &RoleTuning) -> Self {
        // The strike must land before the next attack may start; a manually
        // constructed controller gets the same clamp as the config loader.
        let strike_delay = tuning.strike_delay.min(tuning.attack_interval);
        Self {
            melee_range: tuning.melee_range,
            damage: tuning.damage,
            detect_radius: tuning.detect_radius,
            detect_height_offset: tuning.detect_height_offset,
            strike_reach: tuning.strike_reach,
            strike_radius: tuning.strike_radius,
            attack_interval: tuning.attack_interval,
            strike_delay,
            next_attack_at: 0.0,
            pending: None,
            targets: TargetsOfInterest::new(),
            target_out_of_range: tuning.target_out_of_range,
        }
    }

    /// Cooldown gate. Granting permission consumes the cooldown: the deadline
    /// advances immediately, not when the strike resolves.
    pub fn can_attack(&mut self, now: f32) -> bool {
        if now > self.next_attack_at {
            self.next_attack_at = now + self.attack_interval;
            return true;
        }
        false
    }

    /// Schedule the deferred hit check, replacing any unresolved strike.
    pub fn schedule_strike(&mut self, now: f32) {
        self.pending = Some(PendingStrike {
            resolve_at: now + self.strike_delay,
        });
    }

    /// Take the pending strike if its time has come.
    pub fn take_due_strike(&mut self, now: f32) -> Option<PendingStrike> {
        match self.pending {
            Some(strike) if now >= strike.resolve_at => self.pending.take(),
            _ => None,
        }
    }
}

/// Begin an attack: fire the animation cue and schedule the strike.
/// Callers gate this behind `can_attack`.
pub fn start_attack(
    entity: Entity,
    attack: &mut BotAttack,
    now: f32,
    cues: &mut EventWriter<AnimationCueEvent>,
) {
    cues.send(AnimationCueEvent {
        entity,
        cue: AnimationCue::Attack,
    });
    attack.schedule_strike(now);
}

/// Resolve strikes whose delay has elapsed: a small sphere query ahead of the
/// attacker, then the first hit that is a living, damageable enemy within
/// melee range takes the damage and is taunted. At most one victim per
/// strike.
///
/// A strike stays valid even if its attacker died mid-swing; only a newer
/// attack cancels it.
pub fn resolve_pending_strikes(
    time: Res<Time>,
    index: Res<SpatialIndex>,
    mut damage_events: EventWriter<DamageEvent>,
    mut taunt_events: EventWriter<TauntEvent>,
    mut attackers: Query<(Entity, &Transform, &Bot, &mut BotAttack)>,
) {
    let now = time.elapsed_secs();

    for (entity, transform, bot, mut attack) in attackers.iter_mut() {
        if attack.take_due_strike(now).is_none() {
            continue;
        }

        let center = transform.translation + transform.forward() * attack.strike_reach;
        let mut hits = index.overlap_sphere(center, attack.strike_radius);
        hits.sort();

        for victim in hits {
            if victim == entity {
                continue;
            }
            let Some(entry) = index.get(victim) else {
                continue;
            };
            if entry.faction == bot.faction {
                continue;
            }
            if !entry.damageable {
                continue;
            }
            if !entry.is_alive() {
                continue;
            }
            // The victim may have stepped out of reach during the swing.
            if entry.position.distance(transform.translation) > attack.melee_range {
                continue;
            }

            damage_events.send(DamageEvent {
                source: entity,
                target: victim,
                amount: attack.damage,
            });
            taunt_events.send(TauntEvent {
                victim,
                aggressor: entity,
            });
            debug!("{} hit {:?}", bot.display_name, victim);

            // No splash: one victim per resolved strike.
            break;
        }
    }
}
