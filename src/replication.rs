//! Replication Boundary
//!
//! The one-way bridge between the authoritative simulation and its
//! observers. Authoritative state (cosmetic skin, display name, hit points,
//! the kill counter) is pushed as `ReplicationEvent`s whenever it changes;
//! observers only ever read this stream. The single inbound message is the
//! externally ordered move request, which is validated before the movement
//! controller sees it.

use bevy::prelude::*;

use crate::bots::components::Bot;
use crate::bots::SimPhase;
use crate::combat::components::{Health, KillCounter};

/// An externally ordered move request for a player-controlled bot.
/// The zero position is the sentinel for "nothing was picked" and is
/// rejected during validation.
#[derive(Event, Debug, Clone, Copy)]
pub struct ExternalMoveRequest {
    pub bot: Entity,
    pub position: Vec3,
}

/// A single replicated value.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplicatedValue {
    Skin(u32),
    DisplayName(String),
    HitPoints(i32),
    KillCount(u32),
}

/// One push of authoritative state toward observers. `entity` is `None` for
/// simulation-wide values such as the kill counter.
#[derive(Event, Debug, Clone)]
pub struct ReplicationEvent {
    pub entity: Option<Entity>,
    pub value: ReplicatedValue,
}

/// Push spawn-time cosmetics (skin, display name) for every new bot
pub fn replicate_spawn_cosmetics(
    new_bots: Query<(Entity, &Bot), Added<Bot>>,
    mut events: EventWriter<ReplicationEvent>,
) {
    for (entity, bot) in new_bots.iter() {
        events.send(ReplicationEvent {
            entity: Some(entity),
            value: ReplicatedValue::Skin(bot.skin),
        });
        events.send(ReplicationEvent {
            entity: Some(entity),
            value: ReplicatedValue::DisplayName(bot.display_name.clone()),
        });
    }
}

/// Push hit points whenever they change
pub fn replicate_hit_points(
    changed: Query<(Entity, &Health), Changed<Health>>,
    mut events: EventWriter<ReplicationEvent>,
) {
    for (entity, health) in changed.iter() {
        events.send(ReplicationEvent {
            entity: Some(entity),
            value: ReplicatedValue::HitPoints(health.hit_points()),
        });
    }
}

/// Push the shared kill counter whenever it changes
pub fn replicate_kill_count(
    counter: Res<KillCounter>,
    mut events: EventWriter<ReplicationEvent>,
) {
    if counter.is_changed() && !counter.is_added() {
        events.send(ReplicationEvent {
            entity: None,
            value: ReplicatedValue::KillCount(counter.kills),
        });
    }
}

/// Plugin for the replication boundary
pub struct ReplicationPlugin;

impl Plugin for ReplicationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ExternalMoveRequest>()
            .add_event::<ReplicationEvent>()
            .add_systems(
                Update,
                (
                    replicate_spawn_cosmetics,
                    replicate_hit_points,
                    replicate_kill_count,
                )
                    .in_set(SimPhase::Broadcast),
            );
    }
}
