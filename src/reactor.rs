//! Entity reaction pass run after the integrator settles.
use log::trace;

use crate::actor::Actor;
use crate::config::Tuning;
use crate::entity::WorldEntity;
use crate::physics::MotionIntegrator;

/// Invokes every live entity's reaction against the actor.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActorCollisionReactor;

impl ActorCollisionReactor {
    /// Runs one reaction per alive entity, in list order.
    ///
    /// Returns the number of entities that reacted.
    pub fn react_all<'a>(
        entities: impl IntoIterator<Item = &'a mut WorldEntity>,
        actor: &mut Actor,
        integrator: &mut MotionIntegrator,
        tuning: &Tuning,
    ) -> usize {
        let mut reacted = 0;
        for entity in entities {
            if !entity.is_alive() {
                continue;
            }
            if entity.react(actor, integrator, tuning) {
                trace!("{:?} reacted to actor at {}", entity.kind(), actor.position);
                reacted += 1;
            }
        }
        reacted
    }
}
