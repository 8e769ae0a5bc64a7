//! Target Tracking
//!
//! The candidate-set half of the combat controller: detection of nearby
//! enemies, nearest-target selection, and lazy cleanup of stale entries.
//! Everything works against the per-tick spatial snapshot, so a despawned
//! referent is just a missing entry, never a dangling reference.

use bevy::prelude::*;

use super::components::BotAttack;
use super::spatial::SpatialIndex;

impl BotAttack {
    /// Run a detection sphere query and admit every hit that is a living,
    /// damageable enemy within sight range and not already tracked. Returns
    /// the best candidate afterwards.
    pub fn detect_candidates(
        &mut self,
        me: Entity,
        faction: u8,
        position: Vec3,
        index: &SpatialIndex,
    ) -> Option<Entity> {
        let center = position + Vec3::Y * self.detect_height_offset;
        let mut hits = index.overlap_sphere(center, self.detect_radius);
        // The query carries no ordering guarantee; admit in entity order so
        // seeded runs stay reproducible.
        hits.sort();

        for candidate in hits {
            if candidate == me {
                continue;
            }
            let Some(entry) = index.get(candidate) else {
                continue;
            };
            if entry.faction == faction {
                continue;
            }
            if !entry.damageable {
                continue;
            }
            if !entry.is_alive() {
                continue;
            }
            if self.targets.contains(&candidate) {
                continue;
            }
            if position.distance(entry.position) > self.target_out_of_range {
                continue;
            }

            self.targets.push(candidate);
            debug!(
                "detected {:?} at distance {:.1}",
                candidate,
                position.distance(entry.position)
            );
        }

        self.best_candidate(position, index)
    }

    /// Nearest tracked candidate by straight-line distance. Entries whose
    /// referent no longer exists are dropped during the scan. Ties keep the
    /// first-encountered entry (insertion order).
    pub fn best_candidate(&mut self, position: Vec3, index: &SpatialIndex) -> Option<Entity> {
        self.targets.retain(|candidate| index.get(*candidate).is_some());

        let mut best: Option<(Entity, f32)> = None;
        for &candidate in self.targets.iter() {
            let Some(entry) = index.get(candidate) else {
                continue;
            };
            let distance = position.distance(entry.position);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((candidate, distance)),
            }
        }

        best.map(|(candidate, _)| candidate)
    }

    /// Drop candidates that are destroyed, dead, or out of sight range.
    /// Idempotent: a second pass with an unchanged world removes nothing.
    pub fn purge_stale(&mut self, position: Vec3, index: &SpatialIndex) {
        let out_of_range = self.target_out_of_range;
        self.targets.retain(|candidate| {
            index.get(*candidate).is_some_and(|entry| {
                entry.is_alive() && position.distance(entry.position) <= out_of_range
            })
        });
    }

    /// Whether the target still exists and has hit points left.
    pub fn target_alive(&self, target: Entity, index: &SpatialIndex) -> bool {
        index.is_alive(target)
    }
}
