//! Per-tick input snapshot supplied by the host.
//!
//! Device polling happens outside the crate; the host reduces keyboard,
//! pointer and controller state into one [`InputSnapshot`] per tick.
use glam::DVec3;

/// World-space ray derived from the pointer by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimRay {
    /// Ray origin.
    pub origin: DVec3,
    /// Ray direction; normalised by consumers.
    pub direction: DVec3,
}

/// Intent for a single simulation tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "Each flag mirrors one independently held button."
)]
pub struct InputSnapshot {
    /// Strafe axis in `[-1, 1]`; positive is right.
    pub x: f64,
    /// Forward/back axis in `[-1, 1]`; negative is forward.
    pub z: f64,
    /// Jump button.
    pub jump: bool,
    /// Turn left while held.
    pub rotate_left: bool,
    /// Turn right while held.
    pub rotate_right: bool,
    /// Return the actor to spawn.
    pub reset: bool,
    /// Swing the sword.
    pub attack: bool,
    /// Toggle build mode.
    pub toggle_build_mode: bool,
    /// Place a block at the aimed cell.
    pub place_block: bool,
    /// Remove the aimed block.
    pub remove_block: bool,
    /// Pointer ray, when the pointer is over the scene.
    pub aim: Option<AimRay>,
}

impl InputSnapshot {
    /// Snapshot with only movement axes set.
    #[must_use]
    pub fn movement(x: f64, z: f64) -> Self {
        Self {
            x,
            z,
            ..Self::default()
        }
    }

    /// Yaw direction requested by the rotate flags: `+1`, `-1` or `0`.
    #[must_use]
    pub const fn turn_direction(&self) -> f64 {
        match (self.rotate_left, self.rotate_right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}
