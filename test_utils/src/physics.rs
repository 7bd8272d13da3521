//! Convenience constructors for physics scenarios used in tests.

use feltcraft::config::PhysicsTuning;
use feltcraft::{
    Actor, BlockKind, CollidableRegistry, GameWorld, InputSnapshot, MotionIntegrator, Tuning,
};
use glam::{DVec3, IVec3};

/// Frame time used by most scenarios.
pub const DT: f64 = 1.0 / 60.0;

/// Create an actor with default dimensions at `(x, y, z)` facing `-Z`.
///
/// # Examples
/// ```
/// use test_utils::physics::actor_at;
/// let actor = actor_at(1.0, 2.0, 3.0);
/// assert_eq!(actor.position.y, 2.0);
/// ```
#[must_use]
pub fn actor_at(x: f64, y: f64, z: f64) -> Actor {
    Actor::new(DVec3::new(x, y, z), 0.0, &PhysicsTuning::default())
}

/// Create a registry holding one unit block centred on each of `centres`.
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use test_utils::physics::block_registry;
/// let registry = block_registry(&[DVec3::ZERO, DVec3::Y]);
/// assert_eq!(registry.len(), 2);
/// ```
#[must_use]
pub fn block_registry(centres: &[DVec3]) -> CollidableRegistry {
    let mut registry = CollidableRegistry::new();
    for centre in centres {
        registry.insert_block(*centre);
    }
    registry
}

/// Create an integrator with default tuning and the given velocity.
#[must_use]
pub fn integrator_with_velocity(velocity: DVec3) -> MotionIntegrator {
    let mut integrator = MotionIntegrator::new(&Tuning::default());
    integrator.set_velocity(velocity);
    integrator
}

/// Create an empty world with dirt blocks in `cells`.
///
/// # Panics
/// Panics if two cells coincide.
#[must_use]
pub fn world_with_blocks(cells: &[IVec3]) -> GameWorld {
    let mut world = GameWorld::default();
    for cell in cells {
        assert!(
            world.place_block(*cell, BlockKind::Dirt).is_some(),
            "cell {cell} listed twice"
        );
    }
    world
}

/// Run `ticks` world ticks with the same input.
pub fn run_ticks(world: &mut GameWorld, ticks: usize, input: &InputSnapshot) {
    for _ in 0..ticks {
        world.tick(DT, input);
    }
}
