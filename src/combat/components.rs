//! Health Model Components
//!
//! Integer hit points plus the timers that drive resurrection (standard bots)
//! and removal from the simulation (alert bots).

use bevy::prelude::*;

/// Hit points of a bot. Authoritative; observers only see replicated values.
#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn hit_points(&self) -> i32 {
        self.current
    }

    pub fn max_hit_points(&self) -> i32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Apply damage. Hit points never go below zero.
    pub fn apply_damage(&mut self, amount: i32) {
        self.current = (self.current - amount).max(0);
    }

    /// Restore hit points to `amount` (resurrection).
    pub fn restore(&mut self, amount: i32) {
        self.current = amount.min(self.max);
    }
}

/// Running damage totals per bot, reported in scenario results.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct CombatStats {
    pub damage_dealt: i32,
    pub damage_taken: i32,
}

/// Shared count of alert bots destroyed. Replicated to observers on change.
#[derive(Resource, Debug, Default)]
pub struct KillCounter {
    pub kills: u32,
}

impl KillCounter {
    pub fn increment(&mut self) {
        self.kills += 1;
    }
}

/// Scheduled resurrection for a dead standard bot.
#[derive(Component, Debug, Clone, Copy)]
pub struct Resurrecting {
    /// Sim time at which the bot comes back.
    pub at: f32,
}

/// Scheduled removal for a dead alert bot.
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAt {
    /// Sim time at which the entity is despawned.
    pub at: f32,
}
