//! Role Tuning
//!
//! Per-role behavioral tuning for the two bot roles, loaded from
//! `assets/config/bots.ron` and validated before the simulation starts. The
//! standard role is the baseline; the alert role reacts faster, sees farther,
//! has far fewer hit points, and is removed from the simulation on death
//! instead of resurrecting.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::components::{BotRole, BotState, GameRng};

/// Path to the role tuning config, relative to the crate root.
pub const ROLE_CONFIG_PATH: &str = "assets/config/bots.ron";

/// Reaction intervals per destination state. Ranged entries are rolled on
/// every state entry; fixed entries always apply as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionProfile {
    /// Interval range for the one-shot `Start` state
    pub start: (f32, f32),
    /// Interval range for `Idle`
    pub idle: (f32, f32),
    /// Interval range for `Wander`
    pub wander: (f32, f32),
    /// Fixed interval for `Follow`
    pub follow: f32,
    /// Fixed interval for `Attack`
    pub attack: f32,
}

impl ReactionProfile {
    /// Roll the reaction interval for entering `state`. Returns `None` for
    /// states with no override (the restored baseline stays in effect).
    pub fn sample(&self, state: BotState, rng: &mut GameRng) -> Option<f32> {
        match state {
            BotState::Start => Some(rng.random_range(self.start.0, self.start.1)),
            BotState::Idle => Some(rng.random_range(self.idle.0, self.idle.1)),
            BotState::Wander => Some(rng.random_range(self.wander.0, self.wander.1)),
            BotState::Follow => Some(self.follow),
            BotState::Attack => Some(self.attack),
            BotState::Flee => None,
        }
    }
}

/// What happens when a bot of this role runs out of hit points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum DeathPolicy {
    /// Come back after `delay` seconds with `hit_points` restored.
    Resurrect { delay: f32, hit_points: i32 },
    /// Stay dead and leave the simulation after `delay` seconds.
    Remove { delay: f32 },
}

/// Full behavioral tuning for one role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleTuning {
    pub reaction: ReactionProfile,
    pub move_speed: f32,

    /// Radius of the detection sphere
    pub detect_radius: f32,
    /// Height offset of the detection sphere center
    pub detect_height_offset: f32,
    /// Candidates farther than this are out of sight
    pub target_out_of_range: f32,

    pub melee_range: f32,
    pub damage: i32,
    /// Cooldown between attacks
    pub attack_interval: f32,
    /// Delay before a started attack resolves its damage
    pub strike_delay: f32,
    pub strike_reach: f32,
    pub strike_radius: f32,

    pub max_hit_points: i32,
    pub death_policy: DeathPolicy,

    /// Number of cosmetic skins to choose from at spawn
    pub skin_count: u32,
    /// Display name pool. May be empty for roles that are named by the
    /// simulation driver instead.
    #[serde(default)]
    pub names: Vec<String>,
}

/// The loaded tuning for both roles.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct RoleTunings {
    pub standard: RoleTuning,
    pub alert: RoleTuning,
}

impl RoleTunings {
    pub fn get(&self, role: BotRole) -> &RoleTuning {
        match role {
            BotRole::Standard => &self.standard,
            BotRole::Alert => &self.alert,
        }
    }

    /// Load and validate tuning from a RON file.
    pub fn load_from_file(path: &str) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path, e))?;

        let mut tunings: RoleTunings = ron::from_str(&contents)
            .map_err(|e| format!("Failed to parse {}: {}", path, e))?;

        tunings.validate()?;
        Ok(tunings)
    }

    /// Validate both roles, clamping what can be corrected and rejecting what
    /// cannot.
    pub fn validate(&mut self) -> Result<(), String> {
        self.standard.validate("standard")?;
        self.alert.validate("alert")?;

        if self.alert.names.is_empty() {
            return Err("alert role needs a non-empty name pool".to_string());
        }

        Ok(())
    }
}

impl RoleTuning {
    fn validate(&mut self, role: &str) -> Result<(), String> {
        for (label, range) in [
            ("start", self.reaction.start),
            ("idle", self.reaction.idle),
            ("wander", self.reaction.wander),
        ] {
            if range.0 <= 0.0 || range.1 < range.0 {
                return Err(format!(
                    "{} role: reaction range '{}' must be positive and ordered",
                    role, label
                ));
            }
        }

        if self.move_speed <= 0.0 {
            return Err(format!("{} role: move_speed must be positive", role));
        }
        if self.melee_range <= 0.0 || self.detect_radius <= 0.0 {
            return Err(format!("{} role: combat ranges must be positive", role));
        }
        if self.target_out_of_range < self.detect_radius {
            return Err(format!(
                "{} role: target_out_of_range must cover the detection radius",
                role
            ));
        }
        if self.max_hit_points <= 0 {
            return Err(format!("{} role: max_hit_points must be positive", role));
        }
        if self.skin_count == 0 {
            return Err(format!("{} role: skin_count must be at least 1", role));
        }

        // The strike must land before the next attack may start. A config
        // that says otherwise is clamped rather than rejected.
        if self.attack_interval < self.strike_delay {
            warn!(
                "{} role: attack_interval {} is shorter than strike_delay {}, clamping",
                role, self.attack_interval, self.strike_delay
            );
            self.attack_interval = self.strike_delay;
        }

        Ok(())
    }
}

/// Bevy plugin that loads role tuning at startup
pub struct RoleConfigPlugin;

impl Plugin for RoleConfigPlugin {
    fn build(&self, app: &mut App) {
        match RoleTunings::load_from_file(ROLE_CONFIG_PATH) {
            Ok(tunings) => {
                info!("Loaded role tuning from {}", ROLE_CONFIG_PATH);
                app.insert_resource(tunings);
            }
            Err(e) => {
                // The simulation cannot run with unknown tuning.
                panic!("Failed to load role tuning: {}", e);
            }
        }
    }
}
