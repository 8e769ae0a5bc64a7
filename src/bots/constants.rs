//! Bot Behavior Constants
//!
//! Centralized location for magic numbers used by the bot brain and its
//! supporting systems. Per-role tuning (detection radii, damage, reaction
//! profiles) lives in `assets/config/bots.ron` instead.

// ============================================================================
// Brain Timing
// ============================================================================

/// Lower bound for the randomized out-of-combat limit rolled at spawn (in seconds).
/// Once a bot has been out of combat longer than its limit, it is recalled
/// toward the rally point.
pub const OUT_OF_COMBAT_MIN: f32 = 15.0;

/// Upper bound for the randomized out-of-combat limit rolled at spawn (in seconds).
pub const OUT_OF_COMBAT_MAX: f32 = 40.0;

/// Reaction interval applied when a bot is forced out of combat.
pub const COMBAT_DISABLE_REACTION: f32 = 2.0;

/// Reaction interval applied when a bot enters combat.
pub const COMBAT_ENABLE_REACTION: f32 = 1.0;

// ============================================================================
// Rally & Wander
// ============================================================================

/// Distance from the rally point (world origin) at which the out-of-combat
/// timer resets and the recall ends.
pub const RALLY_RADIUS: f32 = 10.0;

/// Maximum horizontal offset for a random wander destination.
pub const WANDER_RADIUS: f32 = 10.0;

// ============================================================================
// Movement & Facing
// ============================================================================

/// Slerp rate for the smoothed rotation toward the current target while in
/// melee contact (multiplied by the frame delta).
pub const FACING_SLERP_RATE: f32 = 8.0;

/// Destinations closer than this to the bot are dropped by the movement
/// controller (the bot is already there).
pub const STOP_DISTANCE: f32 = 1.5;

/// Distance at which the nav agent considers its destination reached.
pub const NAV_ARRIVAL_DISTANCE: f32 = 0.5;
