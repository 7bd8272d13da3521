//! Live world entities and their reactions to the actor.
//!
//! Entities are a closed set, so they are modelled as the tagged enum
//! [`WorldEntity`]. Each kind supplies a reaction invoked once per tick by
//! [`crate::reactor::ActorCollisionReactor`] and a per-frame update.
//! Scenery and blocks correct the actor's position directly; slimes feed a
//! knockback impulse into the [`MotionIntegrator`].

use glam::{DVec2, DVec3, IVec3};
use log::{debug, info};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::collision::CollidableId;
use crate::config::{PhysicsTuning, Tuning};
use crate::physics::MotionIntegrator;
use crate::vector_math::planar;
use crate::{
    BLOCK_HALF_EXTENT, DEGENERATE_PUSH_OFFSET, ROCK_HEIGHT_PER_SCALE, ROCK_RADIUS_PER_SCALE,
    SLIME_BOUNCE_HEIGHT, SLIME_BOUNCE_SPEED, SLIME_REMOVAL_SCALE, SLIME_REST_HEIGHT,
    SLIME_SHRINK_SPEED, TREE_HEIGHT, TREE_RADIUS,
};

/// Stable handle for a live entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Material of a placed block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Default building material.
    #[default]
    Dirt,
    /// Grey stone.
    Stone,
    /// Wooden planks.
    Wood,
}

/// Discriminant of a [`WorldEntity`] for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// Tall tree.
    Tree,
    /// Climbable rock.
    Rock,
    /// Placed block of the given material.
    Block(BlockKind),
    /// Hostile slime.
    Slime,
}

/// Tree with a cylindrical trunk too tall to climb.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    /// Base of the trunk.
    pub position: DVec3,
}

/// Rock with a cylindrical footprint and a standable top.
#[derive(Clone, Debug, PartialEq)]
pub struct Rock {
    /// Base of the rock.
    pub position: DVec3,
    /// Size multiplier.
    pub scale: f64,
    /// Registry entry supporting the rock's top.
    pub collidable: Option<CollidableId>,
}

impl Rock {
    /// Footprint radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        ROCK_RADIUS_PER_SCALE * self.scale
    }

    /// Height of the climbable top.
    #[must_use]
    pub fn height(&self) -> f64 {
        ROCK_HEIGHT_PER_SCALE * self.scale
    }

    /// Centre of the registry box for this rock.
    #[must_use]
    pub fn box_center(&self) -> DVec3 {
        self.position + DVec3::Y * (self.height() * 0.5)
    }

    /// Half extents of the registry box for this rock.
    #[must_use]
    pub fn box_half_extents(&self) -> DVec3 {
        DVec3::new(self.radius(), self.height() * 0.5, self.radius())
    }
}

/// Unit block snapped to the build grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// Grid cell; the block is centred on it.
    pub cell: IVec3,
    /// Material.
    pub kind: BlockKind,
    /// Registry entry used for ground and wall detection.
    pub collidable: Option<CollidableId>,
}

impl Block {
    /// World-space centre.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        self.cell.as_dvec3()
    }
}

/// Life cycle of a slime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlimeState {
    /// Bouncing and dangerous.
    #[default]
    Alive,
    /// Shrinking away.
    Dead,
}

/// Hostile bouncing slime.
#[derive(Clone, Debug, PartialEq)]
pub struct Slime {
    /// Current centre.
    pub position: DVec3,
    /// Life cycle state.
    pub state: SlimeState,
    /// Visual scale; shrinks after death.
    pub scale: f64,
    /// Phase offset of the bounce.
    pub time_offset: f64,
    /// Seconds before contact may knock the actor back again.
    pub contact_cooldown: f64,
    removed: bool,
}

impl Slime {
    /// Creates a live slime resting at `(x, z)`.
    #[must_use]
    pub const fn new(x: f64, z: f64, time_offset: f64) -> Self {
        Self {
            position: DVec3::new(x, SLIME_REST_HEIGHT, z),
            state: SlimeState::Alive,
            scale: 1.0,
            time_offset,
            contact_cooldown: 0.0,
            removed: false,
        }
    }

    /// Bounce height at simulation time `time`.
    #[must_use]
    pub fn bounce_height(&self, time: f64) -> f64 {
        let phase = ((time + self.time_offset) * SLIME_BOUNCE_SPEED).sin();
        SLIME_REST_HEIGHT + (phase + 1.0) * 0.5 * SLIME_BOUNCE_HEIGHT
    }
}

/// A live entity in the world.
#[derive(Clone, Debug, PartialEq)]
pub enum WorldEntity {
    /// See [`Tree`].
    Tree(Tree),
    /// See [`Rock`].
    Rock(Rock),
    /// See [`Block`].
    Block(Block),
    /// See [`Slime`].
    Slime(Slime),
}

impl WorldEntity {
    /// Tree rooted at `position`.
    #[must_use]
    pub const fn tree(position: DVec3) -> Self {
        Self::Tree(Tree { position })
    }

    /// Rock at `position` with size multiplier `scale`, not yet registered.
    #[must_use]
    pub const fn rock(position: DVec3, scale: f64) -> Self {
        Self::Rock(Rock {
            position,
            scale,
            collidable: None,
        })
    }

    /// Block in `cell`, not yet registered.
    #[must_use]
    pub const fn block(cell: IVec3, kind: BlockKind) -> Self {
        Self::Block(Block {
            cell,
            kind,
            collidable: None,
        })
    }

    /// Live slime at `(x, z)`.
    #[must_use]
    pub const fn slime(x: f64, z: f64, time_offset: f64) -> Self {
        Self::Slime(Slime::new(x, z, time_offset))
    }

    /// Kind of entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Tree(_) => EntityKind::Tree,
            Self::Rock(_) => EntityKind::Rock,
            Self::Block(block) => EntityKind::Block(block.kind),
            Self::Slime(_) => EntityKind::Slime,
        }
    }

    /// World-space position.
    #[must_use]
    pub fn position(&self) -> DVec3 {
        match self {
            Self::Tree(tree) => tree.position,
            Self::Rock(rock) => rock.position,
            Self::Block(block) => block.center(),
            Self::Slime(slime) => slime.position,
        }
    }

    /// Visual scale.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        match self {
            Self::Tree(_) | Self::Block(_) => 1.0,
            Self::Rock(rock) => rock.scale,
            Self::Slime(slime) => slime.scale,
        }
    }

    /// Returns `false` once the entity is marked for removal.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        match self {
            Self::Slime(slime) => !slime.removed,
            _ => true,
        }
    }

    /// Registry entry owned by this entity, if any.
    #[must_use]
    pub const fn collidable(&self) -> Option<CollidableId> {
        match self {
            Self::Rock(rock) => rock.collidable,
            Self::Block(block) => block.collidable,
            Self::Tree(_) | Self::Slime(_) => None,
        }
    }

    /// Records the registry entry owned by this entity.
    ///
    /// Ignored for kinds that never enter the registry.
    pub fn attach_collidable(&mut self, id: CollidableId) {
        match self {
            Self::Rock(rock) => rock.collidable = Some(id),
            Self::Block(block) => block.collidable = Some(id),
            Self::Tree(_) | Self::Slime(_) => {}
        }
    }

    /// Returns `true` for entities a sword swing can hurt.
    #[must_use]
    pub const fn is_damageable(&self) -> bool {
        matches!(
            self,
            Self::Slime(Slime {
                state: SlimeState::Alive,
                ..
            })
        )
    }

    /// Applies a hit. Returns `true` if the entity was affected.
    pub fn take_damage(&mut self) -> bool {
        match self {
            Self::Slime(slime) if slime.state == SlimeState::Alive => {
                slime.state = SlimeState::Dead;
                info!("slime at {} defeated", slime.position);
                true
            }
            _ => false,
        }
    }

    /// Advances per-frame animation and life cycle.
    pub fn update(&mut self, dt: f64, time: f64) {
        let Self::Slime(slime) = self else {
            return;
        };
        match slime.state {
            SlimeState::Alive => {
                slime.position.y = slime.bounce_height(time);
                slime.contact_cooldown = (slime.contact_cooldown - dt).max(0.0);
            }
            SlimeState::Dead => {
                slime.scale -= SLIME_SHRINK_SPEED * dt;
                if slime.scale <= SLIME_REMOVAL_SCALE && !slime.removed {
                    slime.removed = true;
                    debug!("slime at {} marked for removal", slime.position);
                }
            }
        }
    }

    /// Reacts to the actor's post-integration position.
    ///
    /// Returns `true` if the actor or its motion was changed.
    pub fn react(
        &mut self,
        actor: &mut Actor,
        integrator: &mut MotionIntegrator,
        tuning: &Tuning,
    ) -> bool {
        match self {
            Self::Tree(tree) => push_out_of_cylinder(
                actor,
                tree.position,
                TREE_RADIUS,
                tree.position.y + TREE_HEIGHT,
            ),
            Self::Rock(rock) => push_out_of_cylinder(
                actor,
                rock.position,
                rock.radius(),
                rock.position.y + rock.height(),
            ),
            Self::Block(block) => push_out_of_block(actor, block.center(), &tuning.physics),
            Self::Slime(slime) => slime_contact(slime, actor, integrator, tuning),
        }
    }
}

/// Pushes the actor radially out of a vertical cylinder while its feet are
/// below `top`.
fn push_out_of_cylinder(actor: &mut Actor, center: DVec3, radius: f64, top: f64) -> bool {
    if actor.feet() >= top {
        return false;
    }
    let offset = planar(actor.position) - planar(center);
    let min_distance = actor.radius + radius;
    if offset.length_squared() >= min_distance * min_distance {
        return false;
    }
    let direction = offset.try_normalize().unwrap_or(DVec2::X);
    let resolved = planar(center) + direction * min_distance;
    actor.position.x = resolved.x;
    actor.position.z = resolved.y;
    true
}

/// Pushes the actor out of a unit block's square footprint using the
/// closest point on the footprint, leaving `resolution_epsilon` of clearance.
fn push_out_of_block(actor: &mut Actor, center: DVec3, physics: &PhysicsTuning) -> bool {
    let top = center.y + BLOCK_HALF_EXTENT;
    let bottom = center.y - BLOCK_HALF_EXTENT;
    if actor.feet() >= top - physics.step_tolerance || actor.head() <= bottom {
        return false;
    }

    let min = planar(center) - DVec2::splat(BLOCK_HALF_EXTENT);
    let max = planar(center) + DVec2::splat(BLOCK_HALF_EXTENT);
    let here = planar(actor.position);
    let closest = here.clamp(min, max);
    let offset = here - closest;
    let distance = offset.length();
    if distance >= actor.radius {
        return false;
    }

    if distance > 0.0 {
        let clearance = actor.radius + physics.resolution_epsilon - distance;
        let resolved = here + offset / distance * clearance;
        actor.position.x = resolved.x;
        actor.position.z = resolved.y;
        return true;
    }

    // Centre inside or on the edge of the footprint: leave by the nearest face.
    let clearance = actor.radius + DEGENERATE_PUSH_OFFSET;
    let faces = [
        (here.x - min.x, 0, min.x - clearance),
        (max.x - here.x, 0, max.x + clearance),
        (here.y - min.y, 2, min.y - clearance),
        (max.y - here.y, 2, max.y + clearance),
    ];
    let nearest = faces
        .into_iter()
        .min_by_key(|(gap, _, _)| OrderedFloat(*gap));
    if let Some((_, axis, value)) = nearest {
        actor.position[axis] = value;
    }
    true
}

fn slime_contact(
    slime: &mut Slime,
    actor: &Actor,
    integrator: &mut MotionIntegrator,
    tuning: &Tuning,
) -> bool {
    if slime.state != SlimeState::Alive || slime.contact_cooldown > 0.0 {
        return false;
    }
    let away = actor.position - slime.position;
    if away.length() >= tuning.contact.slime_range {
        return false;
    }
    integrator.apply_knockback(away, tuning.contact.slime_strength);
    slime.contact_cooldown = tuning.contact.cooldown;
    true
}
