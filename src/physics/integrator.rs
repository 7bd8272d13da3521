//! Per-tick velocity and position integration.
//!
//! A tick runs, in order: horizontal intent, knockback, gravity, then a
//! sweep-and-resolve along X, Z and finally Y, followed by the jump check.
//! Horizontal axes are resolved before the vertical one so that an actor
//! sliding down a wall is never mistaken for one landing on it. The
//! horizontal pass treats any box whose top is within the step tolerance of
//! the feet as floor.

use glam::DVec3;
use log::{debug, warn};
use ordered_float::OrderedFloat;

use crate::actor::Actor;
use crate::collision::{query_candidates, Collidable};
use crate::config::{KnockbackTuning, PhysicsTuning, Tuning};
use crate::input::InputSnapshot;
use crate::vector_math::{normalize_or, yaw_basis};

use super::grounded::{GroundedStateMachine, VerticalState};
use super::knockback::KnockbackModel;

/// Horizontal axis being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Z,
}

impl Axis {
    const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Z => 2,
        }
    }
}

/// Velocity integrator and collision resolver for the actor.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionIntegrator {
    velocity: DVec3,
    knockback: KnockbackModel,
    ground: GroundedStateMachine,
    physics: PhysicsTuning,
    knockback_tuning: KnockbackTuning,
}

impl Default for MotionIntegrator {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

impl MotionIntegrator {
    /// Creates a grounded integrator at rest.
    #[must_use]
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            velocity: DVec3::ZERO,
            knockback: KnockbackModel::default(),
            ground: GroundedStateMachine::default(),
            physics: tuning.physics.clone(),
            knockback_tuning: tuning.knockback.clone(),
        }
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> DVec3 {
        self.velocity
    }

    /// Overrides the current velocity.
    pub fn set_velocity(&mut self, velocity: DVec3) {
        self.velocity = velocity;
    }

    /// Current knockback impulse.
    #[must_use]
    pub const fn knockback_velocity(&self) -> DVec3 {
        self.knockback.velocity()
    }

    /// Returns `true` while grounded.
    #[must_use]
    pub const fn on_ground(&self) -> bool {
        self.ground.is_grounded()
    }

    /// Current vertical state.
    #[must_use]
    pub const fn vertical_state(&self) -> VerticalState {
        self.ground.state()
    }

    /// Physics parameters in use.
    #[must_use]
    pub const fn tuning(&self) -> &PhysicsTuning {
        &self.physics
    }

    /// Advances the actor by one tick.
    ///
    /// Non-positive or non-finite `dt` leaves everything untouched. If
    /// integration produces a non-finite position the actor is restored to
    /// its position at the start of the tick and all motion is cleared.
    pub fn update(
        &mut self,
        dt: f64,
        input: &InputSnapshot,
        actor: &mut Actor,
        collidables: &[Collidable],
    ) {
        if !dt.is_finite() || dt <= 0.0 {
            if !dt.is_finite() {
                warn!("skipping physics tick with non-finite dt {dt}");
            }
            return;
        }
        let last_good = actor.position;

        self.handle_movement(dt, input, actor);
        self.velocity.x += self.knockback.velocity().x;
        self.velocity.z += self.knockback.velocity().z;
        self.knockback.decay(dt, &self.knockback_tuning);
        self.apply_gravity(dt);
        self.move_and_collide(dt, actor, collidables);
        if input.jump {
            self.jump();
        }

        if !actor.position.is_finite() || !self.velocity.is_finite() {
            warn!(
                "non-finite actor state (position {}, velocity {}); restoring {last_good}",
                actor.position, self.velocity
            );
            actor.position = last_good;
            self.velocity = DVec3::ZERO;
            self.knockback.clear();
        }
    }

    /// Applies rotate intents and replaces horizontal velocity with the
    /// movement intent.
    ///
    /// There is no horizontal inertia: releasing input stops the actor on
    /// the next tick.
    pub fn handle_movement(&mut self, dt: f64, input: &InputSnapshot, actor: &mut Actor) {
        let turn = input.turn_direction();
        if turn != 0.0 {
            actor.rotate(turn * self.physics.rotation_speed * dt);
        }

        let (forward, right) = yaw_basis(actor.yaw);
        let intent = forward * -input.z + right * input.x;
        let horizontal = normalize_or(intent, DVec3::ZERO) * self.physics.move_speed;
        self.velocity.x = horizontal.x;
        self.velocity.z = horizontal.z;
    }

    /// Accumulates gravity into the vertical velocity.
    pub fn apply_gravity(&mut self, dt: f64) {
        self.velocity.y += self.physics.gravity * dt;
    }

    /// Moves the actor along X, Z then Y, resolving collisions on each axis.
    pub fn move_and_collide(&mut self, dt: f64, actor: &mut Actor, collidables: &[Collidable]) {
        self.resolve_horizontal(Axis::X, dt, actor, collidables);
        self.resolve_horizontal(Axis::Z, dt, actor, collidables);
        self.resolve_vertical(dt, actor, collidables);
    }

    /// Starts a jump if grounded. Returns whether the jump happened.
    pub fn jump(&mut self) -> bool {
        if !self.ground.is_grounded() {
            return false;
        }
        self.velocity.y = self.physics.jump_strength;
        self.ground.leave_ground();
        true
    }

    /// Replaces the knockback impulse and launches the actor.
    ///
    /// `direction` need not be unit length; a degenerate direction falls
    /// back to `+X`.
    pub fn apply_knockback(&mut self, direction: DVec3, strength: f64) {
        self.knockback.set_impulse(direction, strength);
        self.velocity.y = self.knockback_tuning.hop;
        self.ground.leave_ground();
        debug!("knockback {} applied", self.knockback.velocity());
    }

    /// Clears all motion, grounds the actor and moves it to `position`.
    pub fn reset(&mut self, actor: &mut Actor, position: DVec3) {
        self.velocity = DVec3::ZERO;
        self.knockback.clear();
        self.ground.land();
        actor.position = position;
        debug!("actor reset to {position}");
    }

    /// Clears all motion and marks the actor airborne so the next tick
    /// re-acquires ground. Used after restoring a saved position.
    pub fn clear_for_restore(&mut self) {
        self.velocity = DVec3::ZERO;
        self.knockback.clear();
        self.ground.leave_ground();
    }

    fn resolve_horizontal(
        &mut self,
        axis: Axis,
        dt: f64,
        actor: &mut Actor,
        collidables: &[Collidable],
    ) {
        let i = axis.index();
        let delta = self.velocity[i] * dt;
        if delta == 0.0 {
            return;
        }
        let before = actor.bounds();
        actor.position[i] += delta;

        let bounds = actor.bounds();
        let feet = actor.feet();
        let reach = actor.radius + self.physics.resolution_epsilon;
        let mut blocked = false;
        for candidate in query_candidates(&bounds, collidables) {
            // Tops within the step tolerance of the feet are floor.
            if feet >= candidate.top() - self.physics.step_tolerance {
                continue;
            }
            let wall = candidate.bounds();
            // Only boxes entered by this move count as walls.
            if delta > 0.0 && before.max[i] <= wall.min[i] {
                actor.position[i] = actor.position[i].min(wall.min[i] - reach);
            } else if delta < 0.0 && before.min[i] >= wall.max[i] {
                actor.position[i] = actor.position[i].max(wall.max[i] + reach);
            } else {
                continue;
            }
            blocked = true;
        }
        if blocked {
            self.velocity[i] = 0.0;
        }
    }

    fn resolve_vertical(&mut self, dt: f64, actor: &mut Actor, collidables: &[Collidable]) {
        let previous = actor.feet();
        let vy = self.velocity.y;
        actor.position.y += vy * dt;

        let bounds = actor.bounds();
        let candidates = query_candidates(&bounds, collidables);
        let eps = self.physics.resolution_epsilon;

        if vy < 0.0 {
            let support = candidates
                .iter()
                .filter(|c| previous >= c.top() - eps)
                .max_by_key(|c| OrderedFloat(c.top()));
            if let Some(block) = support {
                actor.position.y = block.top();
                self.velocity.y = 0.0;
                self.ground.land();
                return;
            }
        } else if vy > 0.0 {
            let ceiling = candidates
                .iter()
                .filter(|c| previous <= c.bottom())
                .min_by_key(|c| OrderedFloat(c.bottom()));
            if let Some(block) = ceiling {
                actor.position.y = block.bottom() - actor.height - eps;
                self.velocity.y = 0.0;
                self.ground.leave_ground();
                return;
            }
        }

        let floor = self.physics.floor_height;
        if actor.position.y <= floor && self.velocity.y <= 0.0 {
            actor.position.y = floor;
            self.velocity.y = 0.0;
            self.ground.land();
        } else {
            actor.position.y = actor.position.y.max(floor);
            self.ground.leave_ground();
        }
    }
}
