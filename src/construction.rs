//! Build mode: aiming, block placement and removal on the unit grid.
//!
//! [`BuildSystem`] only decides *what* should happen; the world applies the
//! returned [`BuildAction`] so that block entities and their registry
//! entries always change together.

use glam::{DVec3, IVec3};
use log::{debug, info};
use ordered_float::OrderedFloat;

use crate::collision::{Collidable, CollidableId};
use crate::config::BuildTuning;
use crate::input::{AimRay, InputSnapshot};
use crate::numeric::round_to_grid;
use crate::FLOOR_HEIGHT;

/// What the aim ray struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitSurface {
    /// The floor plane.
    Ground,
    /// A registry box.
    Collidable(CollidableId),
}

/// Nearest surface under the aim ray and the cell a block would fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildTarget {
    /// Surface struck.
    pub surface: HitSurface,
    /// World-space hit point.
    pub point: DVec3,
    /// Outward normal of the struck face.
    pub normal: DVec3,
    /// Grid cell adjacent to the struck face.
    pub cell: IVec3,
}

/// Mutation requested by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildAction {
    /// Place a block in the cell.
    Place(IVec3),
    /// Remove the block owning this collidable.
    Remove(CollidableId),
}

/// Build mode state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildSystem {
    enabled: bool,
    cooldown: f64,
    ghost: Option<IVec3>,
    tuning: BuildTuning,
}

impl BuildSystem {
    /// Creates a build system with build mode off.
    #[must_use]
    pub const fn new(tuning: BuildTuning) -> Self {
        Self {
            enabled: false,
            cooldown: 0.0,
            ghost: None,
            tuning,
        }
    }

    /// Returns `true` while build mode is on.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cell highlighted for placement, if any.
    #[must_use]
    pub const fn ghost(&self) -> Option<IVec3> {
        self.ghost
    }

    /// Processes one frame of build input.
    ///
    /// `is_block` tells whether a collidable belongs to a removable block.
    /// Returns the action the world should apply, if any.
    pub fn update(
        &mut self,
        dt: f64,
        input: &InputSnapshot,
        collidables: &[Collidable],
        is_block: impl Fn(CollidableId) -> bool,
    ) -> Option<BuildAction> {
        if input.toggle_build_mode && self.cooldown <= 0.0 {
            self.enabled = !self.enabled;
            self.cooldown = self.tuning.toggle_cooldown;
            info!("build mode {}", if self.enabled { "on" } else { "off" });
        }
        if self.cooldown > 0.0 {
            self.cooldown -= dt;
        }
        if !self.enabled {
            self.ghost = None;
            return None;
        }

        let target = input.aim.and_then(|aim| raycast_target(&aim, collidables));
        self.ghost = target.map(|t| t.cell);
        let hit = target?;

        if self.cooldown > 0.0 {
            return None;
        }
        if input.place_block {
            self.cooldown = self.tuning.action_cooldown;
            return Some(BuildAction::Place(hit.cell));
        }
        if input.remove_block {
            if let HitSurface::Collidable(id) = hit.surface {
                if is_block(id) {
                    self.cooldown = self.tuning.action_cooldown;
                    return Some(BuildAction::Remove(id));
                }
            }
            debug!("nothing removable under the cursor");
        }
        None
    }
}

/// Casts `aim` against every collidable and the floor plane.
///
/// The floor wins only when strictly closer than the nearest box. The target
/// cell is the hit point moved half a block along the face normal, rounded
/// per component.
#[must_use]
pub fn raycast_target(aim: &AimRay, collidables: &[Collidable]) -> Option<BuildTarget> {
    let direction = aim.direction.try_normalize()?;

    let nearest_box = collidables
        .iter()
        .filter_map(|c| {
            c.bounds()
                .raycast(aim.origin, direction)
                .map(|hit| (c.id, hit))
        })
        .min_by_key(|(_, hit)| OrderedFloat(hit.distance));

    let ground = (direction.y < 0.0)
        .then(|| (FLOOR_HEIGHT - aim.origin.y) / direction.y)
        .filter(|t| *t >= 0.0);

    let (surface, point, normal) = match (nearest_box, ground) {
        (Some((_, hit)), Some(t)) if t < hit.distance => {
            (HitSurface::Ground, aim.origin + direction * t, DVec3::Y)
        }
        (Some((id, hit)), _) => (HitSurface::Collidable(id), hit.point, hit.normal),
        (None, Some(t)) => (HitSurface::Ground, aim.origin + direction * t, DVec3::Y),
        (None, None) => return None,
    };

    let centre = point + normal * 0.5;
    let cell = IVec3::new(
        round_to_grid(centre.x)?,
        round_to_grid(centre.y)?,
        round_to_grid(centre.z)?,
    );
    Some(BuildTarget {
        surface,
        point,
        normal,
        cell,
    })
}
