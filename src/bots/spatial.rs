//! Spatial Snapshot
//!
//! The overlap-query collaborator. Each tick a snapshot of every damageable
//! entity's position, faction, and health is rebuilt into the `SpatialIndex`
//! resource; the brain and the combat controller query it instead of touching
//! other entities' components directly. Entries are copies, so a despawned
//! entity simply stops appearing in the next snapshot.

use bevy::prelude::*;
use std::collections::HashMap;

use super::components::{Bot, Damageable};
use crate::combat::components::Health;

/// Snapshot entry for one entity.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub position: Vec3,
    pub faction: u8,
    pub hit_points: i32,
    pub damageable: bool,
}

impl SpatialEntry {
    pub fn is_alive(&self) -> bool {
        self.hit_points > 0
    }
}

/// Per-tick spatial snapshot with sphere-overlap queries.
///
/// Query results carry no ordering guarantee; callers that need determinism
/// sort by entity id themselves.
#[derive(Resource, Default)]
pub struct SpatialIndex {
    entries: HashMap<Entity, SpatialEntry>,
}

impl SpatialIndex {
    /// All entities whose position lies within `radius` of `center`.
    pub fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<Entity> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.position.distance(center) <= radius)
            .map(|(entity, _)| *entity)
            .collect()
    }

    pub fn get(&self, entity: Entity) -> Option<&SpatialEntry> {
        self.entries.get(&entity)
    }

    /// Whether the referent still exists and has hit points left.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entries.get(&entity).is_some_and(|e| e.is_alive())
    }

    pub fn insert(&mut self, entity: Entity, entry: SpatialEntry) {
        self.entries.insert(entity, entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rebuild the spatial snapshot from current entity state. Runs before the
/// brain tick every frame.
pub fn rebuild_spatial_index(
    mut index: ResMut<SpatialIndex>,
    entities: Query<(Entity, &Transform, &Bot, &Health, Option<&Damageable>)>,
) {
    index.clear();
    for (entity, transform, bot, health, damageable) in entities.iter() {
        index.insert(
            entity,
            SpatialEntry {
                position: transform.translation,
                faction: bot.faction,
                hit_points: health.hit_points(),
                damageable: damageable.is_some(),
            },
        );
    }
}
