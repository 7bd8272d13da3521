//! Player movement and collision core for a felt-styled voxel game.
//!
//! The crate is headless: the host feeds one [`InputSnapshot`] per frame into
//! [`GameWorld::tick`] and renders the [`Frame`] handed to its
//! [`PresentationSink`]. Movement is resolved by [`MotionIntegrator`] one
//! axis at a time (X, Z, then Y) against the [`CollidableRegistry`], followed
//! by a reaction pass over the live entities.
pub mod actor;
pub mod collision;
pub mod combat;
pub mod config;
pub mod constants;
pub mod construction;
pub mod entity;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod numeric;
pub mod physics;
pub mod presentation;
pub mod reactor;
pub mod save;
pub mod vector_math;
pub mod world;
pub use constants::*;

// Re-export commonly used items
pub use actor::Actor;
pub use collision::{query_candidates, Collidable, CollidableId, CollidableRegistry};
pub use combat::{CombatState, PlayerCombat};
pub use config::{ConfigError, Tuning};
pub use construction::{BuildAction, BuildSystem};
pub use entity::{BlockKind, EntityId, EntityKind, WorldEntity};
pub use geometry::Aabb;
pub use input::{AimRay, InputSnapshot};
pub use logging::init as init_logging;
pub use physics::{GroundedStateMachine, KnockbackModel, MotionIntegrator, VerticalState};
pub use presentation::{Frame, PresentationSink};
pub use reactor::ActorCollisionReactor;
pub use save::{load_world, save_world, FileStore, MemoryStore, SaveData, SaveError, SaveStore};
pub use world::{GameWorld, TickReport};
