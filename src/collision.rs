//! Registry of static boxes the actor can stand on or run into.
//!
//! The registry is owned by the world and mutated only between ticks (block
//! placement, removal, world population). During a tick the integrator
//! borrows it immutably, so it can never observe a half-updated registry.

use glam::DVec3;
use log::debug;

use crate::geometry::Aabb;
use crate::BLOCK_HALF_EXTENT;

/// Stable handle for a registry entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollidableId(pub u64);

/// A static box registered for ground and wall detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collidable {
    /// Handle returned on registration.
    pub id: CollidableId,
    /// World-space centre of the box.
    pub center: DVec3,
    /// Half extents of the box; immutable once registered.
    pub half_extents: DVec3,
}

impl Collidable {
    /// World-space bounds of this collidable.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, self.half_extents)
    }

    /// Height of the upper face.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.center.y + self.half_extents.y.abs()
    }

    /// Height of the lower face.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.center.y - self.half_extents.y.abs()
    }
}

/// Ordered collection of collidables.
#[derive(Clone, Debug, Default)]
pub struct CollidableRegistry {
    entries: Vec<Collidable>,
    next_id: u64,
}

impl CollidableRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a box and returns its handle.
    pub fn insert(&mut self, center: DVec3, half_extents: DVec3) -> CollidableId {
        let id = CollidableId(self.next_id);
        self.next_id += 1;
        self.entries.push(Collidable {
            id,
            center,
            half_extents,
        });
        debug!("registered collidable {id:?} at {center}");
        id
    }

    /// Registers a unit block centred on `center`.
    pub fn insert_block(&mut self, center: DVec3) -> CollidableId {
        self.insert(center, DVec3::splat(BLOCK_HALF_EXTENT))
    }

    /// Removes an entry, preserving the order of the remaining ones.
    pub fn remove(&mut self, id: CollidableId) -> Option<Collidable> {
        let index = self.entries.iter().position(|c| c.id == id)?;
        debug!("removed collidable {id:?}");
        Some(self.entries.remove(index))
    }

    /// Looks up an entry by handle.
    #[must_use]
    pub fn get(&self, id: CollidableId) -> Option<&Collidable> {
        self.entries.iter().find(|c| c.id == id)
    }

    /// Returns `true` when `id` is registered.
    #[must_use]
    pub fn contains(&self, id: CollidableId) -> bool {
        self.get(id).is_some()
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only view of the registry for one tick.
    #[must_use]
    pub fn snapshot(&self) -> &[Collidable] {
        &self.entries
    }
}

/// Returns every collidable whose box intersects `actor_box`.
///
/// Results follow registry order; callers impose their own ordering. An
/// empty registry or an empty actor box yields an empty result.
#[must_use]
pub fn query_candidates<'a>(
    actor_box: &Aabb,
    collidables: &'a [Collidable],
) -> Vec<&'a Collidable> {
    if actor_box.is_empty() {
        return Vec::new();
    }
    collidables
        .iter()
        .filter(|c| c.bounds().intersects(actor_box))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_returns_only_overlapping_entries() {
        let mut registry = CollidableRegistry::new();
        let near = registry.insert_block(DVec3::new(0.0, 0.0, 0.0));
        registry.insert_block(DVec3::new(5.0, 0.0, 0.0));
        let probe = Aabb::from_feet(DVec3::new(0.2, 0.0, 0.0), 0.3, 1.7);

        let hits = query_candidates(&probe, registry.snapshot());
        let ids: Vec<_> = hits.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![near]);
    }

    #[test]
    fn empty_inputs_yield_nothing() {
        let registry = CollidableRegistry::new();
        let probe = Aabb::from_feet(DVec3::ZERO, 0.3, 1.7);
        assert!(query_candidates(&probe, registry.snapshot()).is_empty());

        let mut populated = CollidableRegistry::new();
        populated.insert_block(DVec3::ZERO);
        let flat = Aabb::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0));
        assert!(query_candidates(&flat, populated.snapshot()).is_empty());
    }

    #[test]
    fn removal_keeps_order_and_ids_stable() {
        let mut registry = CollidableRegistry::new();
        let a = registry.insert_block(DVec3::ZERO);
        let b = registry.insert_block(DVec3::X);
        let c = registry.insert_block(DVec3::Z);

        assert!(registry.remove(b).is_some());
        assert!(registry.remove(b).is_none());
        let ids: Vec<_> = registry.snapshot().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, c]);
        assert!(!registry.contains(b));
    }

    #[test]
    fn block_faces_follow_half_extent() {
        let mut registry = CollidableRegistry::new();
        let id = registry.insert_block(DVec3::new(0.0, 1.0, 0.0));
        let block = registry.get(id).copied().expect("block registered");
        assert!((block.top() - 1.5).abs() < f64::EPSILON);
        assert!((block.bottom() - 0.5).abs() < f64::EPSILON);
    }
}
