//! Movement and collision properties of the motion integrator.
//!
//! Each test drives [`MotionIntegrator`] directly against a small block
//! registry built with `test_utils`.

use approx::assert_relative_eq;
use feltcraft::{InputSnapshot, MotionIntegrator, Tuning, VerticalState};
use glam::DVec3;
use rstest::rstest;
use test_utils::assert_finite;
use test_utils::physics::{actor_at, block_registry, integrator_with_velocity, DT};

#[rstest]
#[case(1.0 / 30.0)]
#[case(1.0 / 60.0)]
#[case(1.0 / 144.0)]
fn gravity_decreases_vertical_velocity_every_tick(#[case] dt: f64) {
    let mut integrator = MotionIntegrator::default();
    let mut actor = actor_at(0.0, 100.0, 0.0);
    let idle = InputSnapshot::default();
    let mut previous = integrator.velocity().y;
    for _ in 0..20 {
        integrator.update(dt, &idle, &mut actor, &[]);
        let vy = integrator.velocity().y;
        assert!(vy < previous);
        assert_relative_eq!(vy - previous, -30.0 * dt, epsilon = 1e-9);
        previous = vy;
    }
    assert_eq!(integrator.vertical_state(), VerticalState::Airborne);
}

#[rstest]
#[case::ground_level_block(0.0)]
#[case::raised_block(1.0)]
#[case::high_block(7.0)]
fn actor_resting_on_block_top_stays_put(#[case] block_y: f64) {
    let registry = block_registry(&[DVec3::new(0.0, block_y, 0.0)]);
    let top = block_y + 0.5;
    let mut actor = actor_at(0.0, top, 0.0);
    let mut integrator = MotionIntegrator::default();
    integrator.update(DT, &InputSnapshot::default(), &mut actor, registry.snapshot());
    assert_eq!(actor.position.y, top);
    assert_eq!(integrator.velocity().y, 0.0);
    assert!(integrator.on_ground());
}

#[rstest]
#[case::slow_towards_plus_x(-1.5, 1.0, 1.0 / 144.0)]
#[case::fast_towards_plus_x(-1.5, 1.0, 1.0 / 30.0)]
#[case::slow_towards_minus_x(1.5, -1.0, 1.0 / 144.0)]
#[case::fast_towards_minus_x(1.5, -1.0, 1.0 / 30.0)]
fn walls_are_never_penetrated(#[case] start_x: f64, #[case] strafe: f64, #[case] dt: f64) {
    let registry = block_registry(&[DVec3::new(0.0, 1.0, 0.0)]);
    let mut actor = actor_at(start_x, 0.0, 0.0);
    let mut integrator = MotionIntegrator::default();
    let input = InputSnapshot::movement(strafe, 0.0);
    for _ in 0..120 {
        integrator.update(dt, &input, &mut actor, registry.snapshot());
        let gap = actor.position.x.abs() - 0.5;
        assert!(gap >= 0.3 - 0.001, "actor centre {gap} from the face");
    }
    assert_relative_eq!(actor.position.x.abs(), 0.801, epsilon = 1e-9);
    assert_eq!(integrator.velocity().x, 0.0);
}

#[rstest]
#[case::top_within_step(0.45, false)]
#[case::top_above_step(0.35, true)]
fn block_tops_near_the_feet_count_as_floor(#[case] feet: f64, #[case] blocked: bool) {
    let registry = block_registry(&[DVec3::ZERO]);
    let mut actor = actor_at(-0.9, feet, 0.0);
    let mut integrator = integrator_with_velocity(DVec3::new(10.0, 0.0, 0.0));
    integrator.move_and_collide(DT, &mut actor, registry.snapshot());
    if blocked {
        assert_relative_eq!(actor.position.x, -0.801, epsilon = 1e-12);
        assert_eq!(integrator.velocity().x, 0.0);
    } else {
        assert_relative_eq!(actor.position.x, -0.9 + 10.0 * DT, epsilon = 1e-12);
        assert_eq!(integrator.velocity().x, 10.0);
    }
}

#[test]
fn falling_actor_lands_on_top_of_a_stack() {
    let registry = block_registry(&[DVec3::ZERO, DVec3::new(0.0, 1.0, 0.0)]);
    let mut actor = actor_at(0.0, 2.0, 0.0);
    let mut integrator = integrator_with_velocity(DVec3::new(0.0, -20.0, 0.0));
    integrator.update(0.1, &InputSnapshot::default(), &mut actor, registry.snapshot());
    assert_eq!(actor.position.y, 1.5);
    assert!(integrator.on_ground());
}

#[test]
fn jump_needs_ground_contact() {
    let mut actor = actor_at(0.0, 10.0, 0.0);
    let mut integrator = MotionIntegrator::default();
    integrator.update(DT, &InputSnapshot::default(), &mut actor, &[]);
    assert!(!integrator.on_ground());
    let before = integrator.velocity().y;
    assert!(!integrator.jump());
    assert_eq!(integrator.velocity().y, before);
}

#[test]
fn jump_from_the_floor_leaves_the_ground() {
    let mut actor = actor_at(0.0, 0.0, 0.0);
    let mut integrator = MotionIntegrator::default();
    let jump = InputSnapshot {
        jump: true,
        ..InputSnapshot::default()
    };
    integrator.update(DT, &jump, &mut actor, &[]);
    assert_eq!(integrator.velocity().y, 15.0);
    assert!(!integrator.on_ground());
    integrator.update(DT, &InputSnapshot::default(), &mut actor, &[]);
    assert!(actor.position.y > 0.0);
}

#[test]
fn knockback_launches_a_grounded_actor() {
    let mut integrator = MotionIntegrator::default();
    assert!(integrator.on_ground());
    integrator.apply_knockback(DVec3::new(0.0, 0.0, -2.0), 15.0);
    assert!(!integrator.on_ground());
    assert_eq!(integrator.velocity().y, 5.0);
    assert_relative_eq!(integrator.knockback_velocity().z, -15.0);
}

#[test]
fn knockback_is_added_to_horizontal_velocity() {
    let mut actor = actor_at(0.0, 0.0, 0.0);
    let mut integrator = MotionIntegrator::default();
    integrator.apply_knockback(DVec3::X, 15.0);
    integrator.update(DT, &InputSnapshot::default(), &mut actor, &[]);
    assert_relative_eq!(integrator.velocity().x, 15.0);
    assert_relative_eq!(actor.position.x, 15.0 * DT, epsilon = 1e-12);
    assert_relative_eq!(integrator.knockback_velocity().x, 13.5, epsilon = 1e-12);
}

#[rstest]
#[case(1.0)]
#[case(15.0)]
#[case(250.0)]
fn knockback_converges_geometrically(#[case] strength: f64) {
    let mut actor = actor_at(0.0, 0.0, 0.0);
    let mut integrator = MotionIntegrator::new(&Tuning::default());
    integrator.apply_knockback(DVec3::new(1.0, 0.0, 1.0), strength);
    let bound = ((0.1 / strength).ln() / 0.9_f64.ln()).ceil() as usize + 1;
    let mut previous = integrator.knockback_velocity().length();
    let mut ticks = 0;
    while integrator.knockback_velocity() != DVec3::ZERO {
        integrator.update(DT, &InputSnapshot::default(), &mut actor, &[]);
        let current = integrator.knockback_velocity().length();
        if current > 0.0 {
            assert_relative_eq!(current / previous, 0.9, epsilon = 1e-9);
        }
        previous = current;
        ticks += 1;
        assert!(ticks <= bound, "knockback still active after {ticks} ticks");
    }
    assert_finite(actor.position);
}

#[test]
fn zero_knockback_direction_stays_finite() {
    let mut actor = actor_at(0.0, 0.0, 0.0);
    let mut integrator = MotionIntegrator::default();
    integrator.apply_knockback(DVec3::ZERO, 15.0);
    integrator.update(DT, &InputSnapshot::default(), &mut actor, &[]);
    assert_finite(actor.position);
    assert_finite(integrator.velocity());
}

#[test]
fn head_bump_snaps_below_the_ceiling() {
    let registry = block_registry(&[DVec3::new(0.0, 2.5, 0.0)]);
    let mut actor = actor_at(0.0, 0.2, 0.0);
    let mut integrator = integrator_with_velocity(DVec3::new(0.0, 15.0, 0.0));
    integrator.move_and_collide(DT, &mut actor, registry.snapshot());
    assert_relative_eq!(actor.position.y, 2.0 - 1.7 - 0.001, epsilon = 1e-12);
    assert_eq!(integrator.velocity().y, 0.0);
}

#[rstest]
#[case::lower_ceiling_listed_first(&[2.5, 3.5])]
#[case::higher_ceiling_listed_first(&[3.5, 2.5])]
fn head_bump_picks_the_lowest_ceiling(#[case] ceilings: &[f64]) {
    let centres: Vec<DVec3> = ceilings.iter().map(|y| DVec3::new(0.0, *y, 0.0)).collect();
    let registry = block_registry(&centres);
    let mut actor = actor_at(0.0, 0.2, 0.0);
    // Head sweeps into both boxes within a single tick.
    let mut integrator = integrator_with_velocity(DVec3::new(0.0, 120.0, 0.0));
    integrator.move_and_collide(DT, &mut actor, registry.snapshot());
    assert_relative_eq!(actor.position.y, 2.0 - 1.7 - 0.001, epsilon = 1e-12);
    assert_eq!(integrator.velocity().y, 0.0);
    assert!(!integrator.on_ground());
}

#[rstest]
#[case::halfway_down_the_side(1.0)]
#[case::just_below_the_top(1.45)]
fn falling_beside_a_block_does_not_land_on_it(#[case] feet: f64) {
    let registry = block_registry(&[DVec3::new(0.0, 1.0, 0.0)]);
    let mut actor = actor_at(0.7, feet, 0.0);
    let mut integrator = integrator_with_velocity(DVec3::new(0.0, -5.0, 0.0));
    integrator.move_and_collide(DT, &mut actor, registry.snapshot());
    assert_relative_eq!(actor.position.y, feet - 5.0 * DT, epsilon = 1e-12);
    assert_eq!(integrator.velocity().y, -5.0);
    assert_eq!(integrator.vertical_state(), VerticalState::Airborne);
}
