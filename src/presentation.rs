//! Explicit publish step from simulation to renderer.
//!
//! The simulation never writes render state as a side effect. Once per tick,
//! after physics and reactions have settled, the world builds a [`Frame`] and
//! hands it to the host's [`PresentationSink`].

use glam::{DVec3, IVec3};
use log::trace;

use crate::entity::{EntityId, EntityKind};
use crate::physics::VerticalState;

/// Position and facing of the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Feet position.
    pub position: DVec3,
    /// Facing angle about +Y.
    pub yaw: f64,
}

/// Render state of one entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityPose {
    /// Entity handle.
    pub id: EntityId,
    /// What to draw.
    pub kind: EntityKind,
    /// World-space position.
    pub position: DVec3,
    /// Uniform scale.
    pub scale: f64,
    /// `false` while a defeated entity fades out.
    pub alive: bool,
}

/// Everything the renderer needs for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Number of ticks simulated so far.
    pub tick: u64,
    /// Simulation time in seconds.
    pub time: f64,
    /// Player pose.
    pub player: Pose,
    /// Player vertical state.
    pub vertical: VerticalState,
    /// Live entities in list order.
    pub entities: Vec<EntityPose>,
    /// Sword swing angle in radians.
    pub sword_angle: f64,
    /// Whether build mode is on.
    pub build_mode: bool,
    /// Highlighted build cell.
    pub ghost_block: Option<IVec3>,
}

/// Receives one [`Frame`] per tick.
#[cfg_attr(test, mockall::automock)]
pub trait PresentationSink {
    /// Presents a settled frame.
    fn present(&mut self, frame: &Frame);
}

/// Sink that traces frames through the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl PresentationSink for LogSink {
    fn present(&mut self, frame: &Frame) {
        trace!(
            "tick {} player {} yaw {:.3} {:?} entities {} ghost {:?}",
            frame.tick,
            frame.player.position,
            frame.player.yaw,
            frame.vertical,
            frame.entities.len(),
            frame.ghost_block
        );
    }
}
