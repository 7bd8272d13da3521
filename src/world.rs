//! The game world and its fixed per-tick ordering.
//!
//! [`GameWorld`] owns the actor, its integrator, the collidable registry and
//! the live-entity list. All registry mutation (population, block placement
//! and removal, despawning) happens here and outside the physics step, so the
//! integrator always reads a settled registry.
//!
//! A tick runs:
//!
//! 1. reset on request,
//! 2. [`MotionIntegrator::update`],
//! 3. the entity reaction pass,
//! 4. out-of-bounds recovery,
//! 5. combat,
//! 6. entity updates and despawning,
//! 7. build mode.

use glam::{DVec3, IVec3};
use hashbrown::HashMap;
use log::{debug, info, warn};

use crate::actor::Actor;
use crate::collision::{CollidableId, CollidableRegistry};
use crate::combat::PlayerCombat;
use crate::config::Tuning;
use crate::construction::{BuildAction, BuildSystem};
use crate::entity::{Block, BlockKind, EntityId, WorldEntity};
use crate::input::InputSnapshot;
use crate::physics::MotionIntegrator;
use crate::presentation::{EntityPose, Frame, Pose, PresentationSink};
use crate::reactor::ActorCollisionReactor;
use crate::{
    ROCK_AREA, ROCK_ATTEMPTS, ROCK_CLEARING, ROCK_MIN_SCALE, ROCK_SCALE_SPREAD, SLIME_AREA,
    SLIME_ATTEMPTS, SLIME_CLEARING, SLIME_PHASE_RANGE, TREE_AREA, TREE_ATTEMPTS, TREE_CLEARING,
};

/// An entity together with its handle.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveEntity {
    /// Handle assigned on spawn.
    pub id: EntityId,
    /// The entity itself.
    pub entity: WorldEntity,
}

/// What happened during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Entities whose reaction changed the actor.
    pub reactions: usize,
    /// Entities hit by the sword.
    pub hits: usize,
    /// Entities despawned.
    pub despawned: usize,
    /// Build action applied.
    pub build: Option<BuildAction>,
    /// Whether the actor was returned to spawn.
    pub reset: bool,
}

/// Simulation state for one player.
#[derive(Clone, Debug)]
pub struct GameWorld {
    actor: Actor,
    integrator: MotionIntegrator,
    registry: CollidableRegistry,
    entities: Vec<LiveEntity>,
    blocks: HashMap<IVec3, EntityId>,
    next_entity: u64,
    ticks: u64,
    time: f64,
    combat: PlayerCombat,
    build: BuildSystem,
    tuning: Tuning,
}

impl Default for GameWorld {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl GameWorld {
    /// Creates an empty world with the actor at the spawn point.
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        let actor = Actor::new(tuning.world.spawn_point(), 0.0, &tuning.physics);
        Self {
            actor,
            integrator: MotionIntegrator::new(&tuning),
            registry: CollidableRegistry::new(),
            entities: Vec::new(),
            blocks: HashMap::new(),
            next_entity: 0,
            ticks: 0,
            time: 0.0,
            combat: PlayerCombat::new(tuning.combat.clone()),
            build: BuildSystem::new(tuning.build.clone()),
            tuning,
        }
    }

    /// The player actor.
    #[must_use]
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Mutable access to the actor, for hosts that drive facing directly.
    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    /// The actor's integrator.
    #[must_use]
    pub const fn integrator(&self) -> &MotionIntegrator {
        &self.integrator
    }

    /// Mutable access to the integrator.
    pub fn integrator_mut(&mut self) -> &mut MotionIntegrator {
        &mut self.integrator
    }

    /// Static boxes used by the integrator.
    #[must_use]
    pub const fn registry(&self) -> &CollidableRegistry {
        &self.registry
    }

    /// Live entities in list order.
    #[must_use]
    pub fn entities(&self) -> &[LiveEntity] {
        &self.entities
    }

    /// Looks up a live entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&WorldEntity> {
        self.entities
            .iter()
            .find(|live| live.id == id)
            .map(|live| &live.entity)
    }

    /// Placed blocks in placement order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.entities.iter().filter_map(|live| match &live.entity {
            WorldEntity::Block(block) => Some(block),
            _ => None,
        })
    }

    /// Block occupying `cell`, if any.
    #[must_use]
    pub fn block_at(&self, cell: IVec3) -> Option<EntityId> {
        self.blocks.get(&cell).copied()
    }

    /// Number of placed blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Simulation time in seconds.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Ticks simulated so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Sword state.
    #[must_use]
    pub const fn combat(&self) -> &PlayerCombat {
        &self.combat
    }

    /// Build mode state.
    #[must_use]
    pub const fn build(&self) -> &BuildSystem {
        &self.build
    }

    /// Tuning in use.
    #[must_use]
    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Adds an entity, registering its collidable where it has one.
    ///
    /// Returns `None` without changing anything when a block's cell is
    /// already occupied.
    pub fn spawn(&mut self, mut entity: WorldEntity) -> Option<EntityId> {
        let id = EntityId(self.next_entity);
        match &entity {
            WorldEntity::Block(block) => {
                if self.blocks.contains_key(&block.cell) {
                    debug!("cell {} already holds a block", block.cell);
                    return None;
                }
                let collidable = self.registry.insert_block(block.center());
                self.blocks.insert(block.cell, id);
                entity.attach_collidable(collidable);
            }
            WorldEntity::Rock(rock) => {
                let collidable = self
                    .registry
                    .insert(rock.box_center(), rock.box_half_extents());
                entity.attach_collidable(collidable);
            }
            WorldEntity::Tree(_) | WorldEntity::Slime(_) => {}
        }
        self.next_entity += 1;
        self.entities.push(LiveEntity { id, entity });
        Some(id)
    }

    /// Removes an entity together with its collidable.
    pub fn despawn(&mut self, id: EntityId) -> Option<WorldEntity> {
        let index = self.entities.iter().position(|live| live.id == id)?;
        let live = self.entities.remove(index);
        self.release(&live);
        Some(live.entity)
    }

    /// Places a block in `cell`. Returns `None` if the cell is occupied.
    pub fn place_block(&mut self, cell: IVec3, kind: BlockKind) -> Option<EntityId> {
        let id = self.spawn(WorldEntity::block(cell, kind))?;
        info!("placed {kind:?} block at {cell}");
        Some(id)
    }

    /// Removes the block in `cell`. Returns whether a block was removed.
    pub fn remove_block(&mut self, cell: IVec3) -> bool {
        let Some(id) = self.block_at(cell) else {
            return false;
        };
        let removed = self.despawn(id).is_some();
        if removed {
            info!("removed block at {cell}");
        }
        removed
    }

    /// Removes every placed block.
    pub fn clear_blocks(&mut self) {
        let ids: Vec<EntityId> = self.blocks.values().copied().collect();
        for id in ids {
            self.despawn(id);
        }
    }

    /// Scatters trees, rocks and slimes deterministically from `seed`.
    ///
    /// Returns the number of entities spawned.
    pub fn populate(&mut self, seed: u64) -> usize {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut spawned = 0;

        for _ in 0..TREE_ATTEMPTS {
            let (x, z) = scatter(&mut rng, TREE_AREA);
            if in_clearing(x, z, TREE_CLEARING) {
                continue;
            }
            spawned += usize::from(self.spawn(WorldEntity::tree(DVec3::new(x, 0.0, z))).is_some());
        }

        for _ in 0..ROCK_ATTEMPTS {
            let (x, z) = scatter(&mut rng, ROCK_AREA);
            if in_clearing(x, z, ROCK_CLEARING) {
                continue;
            }
            let scale = ROCK_MIN_SCALE + rng.f64() * ROCK_SCALE_SPREAD;
            spawned += usize::from(
                self.spawn(WorldEntity::rock(DVec3::new(x, 0.0, z), scale))
                    .is_some(),
            );
        }

        for _ in 0..SLIME_ATTEMPTS {
            let (x, z) = scatter(&mut rng, SLIME_AREA);
            if in_clearing(x, z, SLIME_CLEARING) {
                continue;
            }
            let phase = rng.f64() * SLIME_PHASE_RANGE;
            spawned += usize::from(self.spawn(WorldEntity::slime(x, z, phase)).is_some());
        }

        info!("populated world from seed {seed}: {spawned} entities");
        spawned
    }

    /// Returns the actor to the spawn point with all motion cleared.
    pub fn reset_actor(&mut self) {
        let spawn = self.tuning.world.spawn_point();
        self.integrator.reset(&mut self.actor, spawn);
    }

    /// Replaces the actor pose and every placed block.
    ///
    /// Motion is cleared and the actor is left airborne so the next tick
    /// re-acquires ground. Cells are expected to be unique; repeats after
    /// the first are skipped.
    pub fn restore(&mut self, position: DVec3, yaw: f64, blocks: &[(IVec3, BlockKind)]) {
        self.actor.position = position;
        self.actor.yaw = yaw;
        self.integrator.clear_for_restore();
        self.clear_blocks();
        for &(cell, kind) in blocks {
            if self.spawn(WorldEntity::block(cell, kind)).is_none() {
                warn!("skipping duplicate block at {cell}");
            }
        }
    }

    /// Advances the world by `dt` seconds.
    pub fn tick(&mut self, dt: f64, input: &InputSnapshot) -> TickReport {
        let mut report = TickReport::default();
        if !dt.is_finite() || dt <= 0.0 {
            debug!("ignoring tick with dt {dt}");
            return report;
        }

        if input.reset {
            info!("reset requested");
            self.reset_actor();
            report.reset = true;
        }

        self.integrator
            .update(dt, input, &mut self.actor, self.registry.snapshot());
        report.reactions = ActorCollisionReactor::react_all(
            self.entities.iter_mut().map(|live| &mut live.entity),
            &mut self.actor,
            &mut self.integrator,
            &self.tuning,
        );
        report.reset |= self.recover_if_lost();

        if input.attack {
            self.combat.start_attack();
        }
        report.hits = self.combat.update(
            dt,
            &self.actor,
            self.entities.iter_mut().map(|live| &mut live.entity),
        );

        self.time += dt;
        for live in &mut self.entities {
            live.entity.update(dt, self.time);
        }
        report.despawned = self.despawn_removed();

        let entities = &self.entities;
        let action = self.build.update(dt, input, self.registry.snapshot(), |id| {
            block_owner(entities, id).is_some()
        });
        report.build = action.filter(|a| self.apply_build_action(*a));

        self.ticks += 1;
        report
    }

    /// Snapshot of the settled state for presentation.
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame {
            tick: self.ticks,
            time: self.time,
            player: Pose {
                position: self.actor.position,
                yaw: self.actor.yaw,
            },
            vertical: self.integrator.vertical_state(),
            entities: self
                .entities
                .iter()
                .map(|live| EntityPose {
                    id: live.id,
                    kind: live.entity.kind(),
                    position: live.entity.position(),
                    scale: live.entity.scale(),
                    alive: live.entity.is_damageable()
                        || !matches!(live.entity, WorldEntity::Slime(_)),
                })
                .collect(),
            sword_angle: self.combat.sword_angle(),
            build_mode: self.build.is_enabled(),
            ghost_block: self.build.ghost(),
        }
    }

    /// Hands the settled state to `sink`.
    pub fn publish(&self, sink: &mut dyn PresentationSink) {
        sink.present(&self.frame());
    }

    /// Returns `true` when every registry entry is owned by exactly one live
    /// entity and every entity's collidable is registered.
    #[must_use]
    pub fn registry_in_sync(&self) -> bool {
        let owned: Vec<CollidableId> = self
            .entities
            .iter()
            .filter_map(|live| live.entity.collidable())
            .collect();
        owned.len() == self.registry.len()
            && owned.iter().all(|id| self.registry.contains(*id))
            && self.blocks.len() == self.blocks().count()
    }

    fn recover_if_lost(&mut self) -> bool {
        let position = self.actor.position;
        let bounds = self.tuning.world.bounds;
        if position.is_finite() && position.x.abs() <= bounds && position.z.abs() <= bounds {
            return false;
        }
        warn!("actor left the world at {position}; returning to spawn");
        self.reset_actor();
        true
    }

    fn despawn_removed(&mut self) -> usize {
        let (kept, removed): (Vec<LiveEntity>, Vec<LiveEntity>) = self
            .entities
            .drain(..)
            .partition(|live| live.entity.is_alive());
        self.entities = kept;
        for live in &removed {
            self.release(live);
        }
        removed.len()
    }

    fn release(&mut self, live: &LiveEntity) {
        if let Some(collidable) = live.entity.collidable() {
            self.registry.remove(collidable);
        }
        if let WorldEntity::Block(block) = &live.entity {
            self.blocks.remove(&block.cell);
        }
    }

    fn apply_build_action(&mut self, action: BuildAction) -> bool {
        match action {
            BuildAction::Place(cell) => self.place_block(cell, BlockKind::Dirt).is_some(),
            BuildAction::Remove(collidable) => block_owner(&self.entities, collidable)
                .is_some_and(|(id, cell)| {
                    self.despawn(id);
                    info!("removed block at {cell}");
                    true
                }),
        }
    }
}

fn block_owner(entities: &[LiveEntity], collidable: CollidableId) -> Option<(EntityId, IVec3)> {
    entities.iter().find_map(|live| match &live.entity {
        WorldEntity::Block(block) if block.collidable == Some(collidable) => {
            Some((live.id, block.cell))
        }
        _ => None,
    })
}

fn scatter(rng: &mut fastrand::Rng, area: f64) -> (f64, f64) {
    let x = (rng.f64() - 0.5) * area;
    let z = (rng.f64() - 0.5) * area;
    (x, z)
}

fn in_clearing(x: f64, z: f64, half_side: f64) -> bool {
    x.abs() < half_side && z.abs() < half_side
}
