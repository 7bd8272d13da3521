//! Save/load round trips through the in-memory and file-backed stores.

use feltcraft::{load_world, save_world, BlockKind, FileStore, GameWorld, InputSnapshot, MemoryStore, SaveStore};
use glam::{DVec3, IVec3};
use rstest::{fixture, rstest};
use test_utils::physics::{run_ticks, world_with_blocks};

#[fixture]
fn saved_world() -> GameWorld {
    let mut world = world_with_blocks(&[IVec3::new(0, 1, 0), IVec3::new(4, 2, -3)]);
    world.place_block(IVec3::new(-2, 1, 7), BlockKind::Stone);
    world.actor_mut().position = DVec3::new(0.1 + 0.2, 1.0 / 3.0, -7.123_456_789_012_345);
    world.actor_mut().yaw = 2.0_f64.sqrt();
    world
}

fn round_trip(mut world: GameWorld, store: &mut dyn SaveStore) {
    let position = world.actor().position;
    let yaw = world.actor().yaw;
    let mut cells: Vec<(IVec3, BlockKind)> = world.blocks().map(|b| (b.cell, b.kind)).collect();
    save_world(&world, store).expect("save succeeds");

    run_ticks(&mut world, 30, &InputSnapshot::movement(1.0, -1.0));
    world.remove_block(IVec3::new(0, 1, 0));
    world.place_block(IVec3::new(9, 1, 9), BlockKind::Wood);
    world.integrator_mut().apply_knockback(DVec3::Z, 15.0);

    load_world(&mut world, store).expect("load succeeds");

    let restored = world.actor().position;
    assert_eq!(restored.x.to_bits(), position.x.to_bits());
    assert_eq!(restored.y.to_bits(), position.y.to_bits());
    assert_eq!(restored.z.to_bits(), position.z.to_bits());
    assert_eq!(world.actor().yaw.to_bits(), yaw.to_bits());
    assert_eq!(world.integrator().velocity(), DVec3::ZERO);
    assert_eq!(world.integrator().knockback_velocity(), DVec3::ZERO);
    assert!(!world.integrator().on_ground());

    let mut restored_cells: Vec<(IVec3, BlockKind)> =
        world.blocks().map(|b| (b.cell, b.kind)).collect();
    cells.sort_by_key(|(cell, _)| cell.to_array());
    restored_cells.sort_by_key(|(cell, _)| cell.to_array());
    assert_eq!(restored_cells, cells);
    assert!(world.registry_in_sync());
}

#[rstest]
fn round_trip_through_memory(saved_world: GameWorld) {
    round_trip(saved_world, &mut MemoryStore::new());
}

#[rstest]
fn round_trip_through_files(saved_world: GameWorld) {
    let dir = tempfile::tempdir().expect("temp dir");
    round_trip(saved_world, &mut FileStore::new(dir.path()));
}

#[rstest]
fn ground_is_reacquired_on_the_next_tick(saved_world: GameWorld) {
    let mut world = saved_world;
    let mut store = MemoryStore::new();
    world.actor_mut().position = DVec3::new(0.0, 1.5, 0.0);
    save_world(&world, &mut store).expect("save succeeds");
    load_world(&mut world, &store).expect("load succeeds");
    assert!(!world.integrator().on_ground());
    world.tick(1.0 / 60.0, &InputSnapshot::default());
    assert!(world.integrator().on_ground());
    assert_eq!(world.actor().position.y, 1.5);
}

#[test]
fn loading_without_a_save_changes_nothing() {
    let mut world = world_with_blocks(&[IVec3::new(1, 1, 1)]);
    let before = world.frame();
    let store = MemoryStore::new();
    assert!(load_world(&mut world, &store).is_err());
    assert_eq!(world.frame(), before);
}
