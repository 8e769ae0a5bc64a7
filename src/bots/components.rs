//! Component Definitions for the Bot Core
//!
//! This module contains the ECS components and resources that make up a bot:
//! the brain state, the combat controller, the movement controller, and the
//! nav agent stand-in. Behavior lives in the sibling modules (`brain`,
//! `targeting`, `attack`, `movement`); this file defines the data.

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use smallvec::SmallVec;

// ============================================================================
// Resources
// ============================================================================

/// Seeded random number generator for deterministic simulation.
///
/// When a seed is provided (e.g., via the scenario config), the same seed will
/// always produce the same run. Without a seed, uses system entropy.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
    /// When set, every roll returns this value instead of sampling the RNG.
    /// Used by scenario tests that need to pin a branch of the decision cycle.
    forced_roll: Option<f32>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
            forced_roll: None,
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
            forced_roll: None,
        }
    }

    /// Create a GameRng whose every roll yields `roll` (clamped to [0, 1)).
    /// Only meaningful for tests that must force a decision branch.
    pub fn with_fixed_roll(roll: f32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(0),
            seed: Some(0),
            forced_roll: Some(roll.clamp(0.0, 0.999_999)),
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        match self.forced_roll {
            Some(roll) => roll,
            None => self.rng.gen(),
        }
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }

    /// Pick a random index in `0..len`. `len` must be non-zero.
    pub fn random_index(&mut self, len: usize) -> usize {
        ((self.random_f32() * len as f32) as usize).min(len - 1)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

// ============================================================================
// Identity Components
// ============================================================================

/// The two bot roles sharing the brain contract but with different tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotRole {
    /// Baseline timing profile, respawns after death.
    Standard,
    /// Faster, more alert variant ("zombie"): wider detection, fewer hit
    /// points, removed from the simulation after death.
    Alert,
}

/// Identity of a bot: role, faction, and replicated cosmetics.
#[derive(Component)]
pub struct Bot {
    pub role: BotRole,
    /// Affiliation used for friend-or-foe checks. Bots never target their
    /// own faction.
    pub faction: u8,
    /// Display name, replicated to observers at spawn.
    pub display_name: String,
    /// Server-chosen cosmetic skin index, replicated to observers at spawn.
    pub skin: u32,
}

/// Marker for entities that can receive melee damage. Detection and hit
/// resolution skip anything without it.
#[derive(Component)]
pub struct Damageable;

/// Marker for bots that accept externally ordered move requests.
#[derive(Component)]
pub struct PlayerOrdered;

// ============================================================================
// Brain
// ============================================================================

/// Behavioral states of the bot brain.
///
/// `Start` is entered once at spawn and transitions unconditionally to
/// `Wander` on the first tick. There is no terminal state; the bot cycles
/// among `Idle`/`Wander`/`Follow`/`Attack` for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    Start,

    Idle,
    Wander,

    Follow,

    Attack,
    /// Reserved; no transition currently enters it.
    Flee,
}

/// The decision core of a bot. Ticked on the fixed step; runs one decision
/// cycle each time `brain_timer` reaches `reaction_interval`.
#[derive(Component)]
pub struct BotBrain {
    pub state: BotState,
    /// Time between decision cycles; overwritten per state on entry and
    /// restored to `baseline_reaction` on every state exit.
    pub reaction_interval: f32,
    /// The reaction interval captured once at spawn time.
    pub baseline_reaction: f32,
    /// Accumulated time since the last decision cycle.
    pub brain_timer: f32,
    /// Weak handle to the current target. The referent may be despawned at
    /// any time; every use re-validates against the spatial snapshot.
    pub current_target: Option<Entity>,
    pub in_combat: bool,
    /// True only while `state == Attack`; cleared on every exit from it.
    pub is_close_to_target: bool,
    /// Accumulated time outside `Follow`/`Attack`.
    pub out_of_combat_timer: f32,
    /// Randomized threshold (rolled at spawn) beyond which the bot is
    /// recalled toward the rally point.
    pub out_of_combat_limit: f32,
    /// False while dead; freezes the tick loop entirely.
    pub active: bool,
}

impl BotBrain {
    pub fn new(baseline_reaction: f32, out_of_combat_limit: f32) -> Self {
        Self {
            state: BotState::Start,
            reaction_interval: baseline_reaction,
            baseline_reaction,
            brain_timer: 0.0,
            current_target: None,
            in_combat: false,
            is_close_to_target: false,
            out_of_combat_timer: 0.0,
            out_of_combat_limit,
            active: true,
        }
    }
}

// ============================================================================
// Combat Controller
// ============================================================================

/// Per-bot ordered candidate set. Duplicate-free; typically a handful of
/// entries, so it stays inline.
pub type TargetsOfInterest = SmallVec<[Entity; 8]>;

/// An attack in flight: created when an attack starts, resolved into a melee
/// hit check once `resolve_at` passes. Starting a new attack replaces any
/// unresolved one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingStrike {
    pub resolve_at: f32,
}

/// Melee combat controller: cooldown gate, deferred strike, and the embedded
/// target tracker.
#[derive(Component)]
pub struct BotAttack {
    /// Maximum distance at which an attack may land.
    pub melee_range: f32,
    pub damage: i32,

    /// Radius of the detection sphere.
    pub detect_radius: f32,
    /// Height offset of the detection sphere center above the bot.
    pub detect_height_offset: f32,

    /// Forward offset of the strike sphere.
    pub strike_reach: f32,
    /// Radius of the strike sphere.
    pub strike_radius: f32,

    /// Minimum time between attacks.
    pub attack_interval: f32,
    /// Delay between starting an attack and resolving its damage, so the hit
    /// lands in sync with the animation. Never exceeds `attack_interval`.
    pub strike_delay: f32,
    /// Earliest sim time at which the next attack may start. Monotonic;
    /// advanced only when `can_attack` grants permission.
    pub next_attack_at: f32,
    /// At most one strike is in flight per bot.
    pub pending: Option<PendingStrike>,

    /// Candidates this bot is currently interested in.
    pub targets: TargetsOfInterest,
    /// Candidates farther than this are considered out of sight and purged.
    pub target_out_of_range: f32,
}

// ============================================================================
// Movement Controller & Nav Agent
// ============================================================================

/// Movement controller: gates destinations and records external orders.
/// Wraps the nav agent; never moves the bot itself.
#[derive(Component)]
pub struct BotLocomotion {
    pub enabled: bool,
    /// Destinations closer than this are dropped.
    pub stop_distance: f32,
    /// Last externally ordered destination that was accepted.
    pub ordered_position: Option<Vec3>,
    /// Normalized travel speed (velocity magnitude over max speed), published
    /// each tick for animation blending. Read-only for everyone else.
    pub blend: f32,
}

impl BotLocomotion {
    pub fn new(stop_distance: f32) -> Self {
        Self {
            enabled: true,
            stop_distance,
            ordered_position: None,
            blend: 0.0,
        }
    }
}

/// In-process stand-in for the pathfinding collaborator. Accepts a
/// destination and steers straight toward it; reports current velocity and
/// whether it may rotate the bot itself.
#[derive(Component)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    pub max_speed: f32,
    pub velocity: Vec3,
    /// While true the agent faces its direction of travel. The brain turns
    /// this off in melee so the smoothed target facing wins.
    pub auto_face: bool,
    pub enabled: bool,
}

impl NavAgent {
    pub fn new(max_speed: f32) -> Self {
        Self {
            destination: None,
            max_speed,
            velocity: Vec3::ZERO,
            auto_face: true,
            enabled: true,
        }
    }

    /// Accept a destination. Returns whether a route was accepted.
    pub fn set_destination(&mut self, position: Vec3) -> bool {
        if !self.enabled {
            return false;
        }
        self.destination = Some(position);
        true
    }

    pub fn current_velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_auto_face(&mut self, value: bool) {
        self.auto_face = value;
    }

    /// Disable the agent and drop any route in progress.
    pub fn set_enabled(&mut self, value: bool) {
        self.enabled = value;
        if !value {
            self.destination = None;
            self.velocity = Vec3::ZERO;
        }
    }
}
