//! The player-controlled actor.
//!
//! `Actor` is a plain value: its position is the feet reference point and is
//! only written by the motion integrator, the entity reaction pass and
//! explicit resets. Nothing here touches presentation state; see
//! [`crate::presentation`] for the publish step.
use glam::DVec3;
use log::debug;

use crate::config::PhysicsTuning;
use crate::geometry::Aabb;
use crate::vector_math::yaw_basis;

/// Physical body of the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    /// World-space feet position.
    pub position: DVec3,
    /// Facing angle about +Y in radians.
    pub yaw: f64,
    /// Horizontal collision radius.
    pub radius: f64,
    /// Collision height above the feet.
    pub height: f64,
}

impl Actor {
    /// Creates an actor sized from the physics tuning.
    #[must_use]
    pub fn new(position: DVec3, yaw: f64, tuning: &PhysicsTuning) -> Self {
        debug!("creating actor at {position} facing {yaw:.3}");
        Self {
            position,
            yaw,
            radius: tuning.actor_radius,
            height: tuning.actor_height(),
        }
    }

    /// Collision box at the current position.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_feet(self.position, self.radius, self.height)
    }

    /// Height of the feet.
    #[must_use]
    pub const fn feet(&self) -> f64 {
        self.position.y
    }

    /// Height of the top of the collision box.
    #[must_use]
    pub fn head(&self) -> f64 {
        self.position.y + self.height
    }

    /// Unit vector the actor is facing, in the XZ plane.
    #[must_use]
    pub fn forward(&self) -> DVec3 {
        yaw_basis(self.yaw).0
    }

    /// Turns the actor by `delta` radians.
    pub fn rotate(&mut self, delta: f64) {
        self.yaw += delta;
    }
}
