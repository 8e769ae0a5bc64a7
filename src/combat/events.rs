//! Combat events
//!
//! Defines the events that flow between the bot core, the health model, and
//! the presentation boundary.

use bevy::prelude::*;

/// Event fired when a melee strike lands
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    /// Entity dealing the damage
    pub source: Entity,
    /// Entity receiving the damage
    pub target: Entity,
    /// Amount of damage
    pub amount: i32,
}

/// Event fired when a bot's hit points reach zero
#[derive(Event, Debug, Clone, Copy)]
pub struct BotDeathEvent {
    /// Entity that died
    pub victim: Entity,
}

/// Event fired toward the victim of a strike so an idle bot answers its
/// attacker. Only adopted if the victim currently has no target.
#[derive(Event, Debug, Clone, Copy)]
pub struct TauntEvent {
    /// Entity that was struck
    pub victim: Entity,
    /// Entity that dealt the strike
    pub aggressor: Entity,
}

/// One-shot animation triggers consumed by the presentation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCue {
    Attack,
    Death,
    Respawn,
}

/// Event fired when the simulation wants the presentation layer to play a cue
#[derive(Event, Debug, Clone, Copy)]
pub struct AnimationCueEvent {
    pub entity: Entity,
    pub cue: AnimationCue,
}
