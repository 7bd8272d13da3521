//! Actor movement and collision resolution.
//!
//! [`MotionIntegrator`] advances the actor once per tick. It owns the
//! [`KnockbackModel`] and the [`GroundedStateMachine`]; the reaction pass in
//! [`crate::reactor`] feeds impulses back in through
//! [`MotionIntegrator::apply_knockback`].

pub mod grounded;
pub mod integrator;
pub mod knockback;

pub use grounded::{GroundedStateMachine, VerticalState};
pub use integrator::MotionIntegrator;
pub use knockback::KnockbackModel;
