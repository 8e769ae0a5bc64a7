//! Movement Controller & Nav Agent Integration
//!
//! The movement controller gates destinations (disabled bots and
//! already-there destinations are dropped) and forwards the rest to the nav
//! agent. The nav agent itself is the pathfinding collaborator's stand-in: it
//! steers straight toward its destination on the horizontal plane and reports
//! its velocity, from which the animation blend value is derived.

use bevy::prelude::*;

use super::components::{BotBrain, BotLocomotion, NavAgent, PlayerOrdered};
use super::constants::NAV_ARRIVAL_DISTANCE;
use crate::replication::ExternalMoveRequest;

impl BotLocomotion {
    /// Ask the nav agent to travel to `destination`. Returns whether a route
    /// was accepted. Externally ordered destinations are recorded for later
    /// reference; the caller is responsible for resetting combat on them.
    pub fn move_to(
        &mut self,
        nav: &mut NavAgent,
        current: Vec3,
        destination: Vec3,
        ordered: bool,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        // Already there; stop and attack or idle instead.
        if destination.distance(current) < self.stop_distance {
            return false;
        }
        if !nav.set_destination(destination) {
            return false;
        }

        if ordered {
            self.ordered_position = Some(destination);
        }
        debug!(
            "moving (distance to destination: {:.1})",
            destination.distance(current)
        );
        true
    }
}

/// Apply externally ordered move requests to bots that accept them. The
/// zero position is the "nothing was hit" sentinel from the remote picker and
/// is rejected outright. An accepted order resets the bot out of combat.
pub fn apply_external_move_orders(
    mut requests: EventReader<ExternalMoveRequest>,
    mut bots: Query<
        (&Transform, &mut BotBrain, &mut BotLocomotion, &mut NavAgent),
        With<PlayerOrdered>,
    >,
) {
    for request in requests.read() {
        if request.position == Vec3::ZERO {
            warn!(
                "rejected external move request with sentinel position for {:?}",
                request.bot
            );
            continue;
        }

        let Ok((transform, mut brain, mut locomotion, mut nav)) = bots.get_mut(request.bot)
        else {
            warn!(
                "external move request for unknown or non-orderable bot {:?}",
                request.bot
            );
            continue;
        };

        if locomotion.move_to(&mut nav, transform.translation, request.position, true) {
            brain.toggle_combat(false);
        }
    }
}

/// Steer every nav agent toward its destination and keep its reported
/// velocity current. Agents face their direction of travel unless the brain
/// has taken over facing for melee.
pub fn advance_nav_agents(time: Res<Time>, mut agents: Query<(&mut Transform, &mut NavAgent)>) {
    let dt = time.delta_secs();

    for (mut transform, mut nav) in agents.iter_mut() {
        let Some(destination) = nav.destination else {
            nav.velocity = Vec3::ZERO;
            continue;
        };

        let to = Vec3::new(
            destination.x - transform.translation.x,
            0.0,
            destination.z - transform.translation.z,
        );
        let remaining = to.length();

        if remaining <= NAV_ARRIVAL_DISTANCE {
            nav.destination = None;
            nav.velocity = Vec3::ZERO;
            continue;
        }

        let direction = to / remaining;
        let step = (nav.max_speed * dt).min(remaining);
        transform.translation += direction * step;
        nav.velocity = direction * nav.max_speed;

        if nav.auto_face {
            transform.look_to(direction, Vec3::Y);
        }
    }
}

/// Publish the normalized travel speed for animation blending.
pub fn update_locomotion_blend(mut bots: Query<(&NavAgent, &mut BotLocomotion)>) {
    for (nav, mut locomotion) in bots.iter_mut() {
        locomotion.blend = if nav.max_speed > 0.0 {
            nav.current_velocity().length() / nav.max_speed
        } else {
            0.0
        };
    }
}
