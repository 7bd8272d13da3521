//! Sword swing state machine.
//!
//! A swing lasts `combat.duration` seconds. While its progress lies inside
//! the hit window every damageable entity near the point in front of the
//! actor takes a hit.

use std::f64::consts::FRAC_PI_2;

use log::debug;

use crate::actor::Actor;
use crate::config::CombatTuning;
use crate::entity::WorldEntity;

/// Phase of the swing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CombatState {
    /// Ready to attack.
    #[default]
    Idle,
    /// Swinging; `elapsed` seconds since the swing started.
    Attacking {
        /// Seconds since the swing started.
        elapsed: f64,
    },
}

/// The actor's melee attack.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerCombat {
    state: CombatState,
    tuning: CombatTuning,
}

impl PlayerCombat {
    /// Creates an idle attacker.
    #[must_use]
    pub const fn new(tuning: CombatTuning) -> Self {
        Self {
            state: CombatState::Idle,
            tuning,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> CombatState {
        self.state
    }

    /// Starts a swing if idle. Returns whether a swing started.
    pub fn start_attack(&mut self) -> bool {
        if self.state != CombatState::Idle {
            return false;
        }
        debug!("attack started");
        self.state = CombatState::Attacking { elapsed: 0.0 };
        true
    }

    /// Fraction of the swing completed, or `None` when idle.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        match self.state {
            CombatState::Idle => None,
            CombatState::Attacking { elapsed } => Some(elapsed / self.tuning.duration),
        }
    }

    /// Returns `true` while hits register.
    #[must_use]
    pub fn hit_window_open(&self) -> bool {
        self.progress()
            .is_some_and(|p| p > self.tuning.window_start && p < self.tuning.window_end)
    }

    /// Sword swing angle in radians; peaks at the middle of the swing.
    #[must_use]
    pub fn sword_angle(&self) -> f64 {
        self.progress()
            .map_or(0.0, |p| (1.0 - (2.0 * p - 1.0).abs()) * FRAC_PI_2)
    }

    /// Advances the swing and applies hits. Returns the number of entities hit.
    pub fn update<'a>(
        &mut self,
        dt: f64,
        actor: &Actor,
        entities: impl IntoIterator<Item = &'a mut WorldEntity>,
    ) -> usize {
        let CombatState::Attacking { elapsed } = self.state else {
            return 0;
        };
        let now = elapsed + dt;
        if now >= self.tuning.duration {
            debug!("attack finished");
            self.state = CombatState::Idle;
            return 0;
        }
        self.state = CombatState::Attacking { elapsed: now };
        if !self.hit_window_open() {
            return 0;
        }

        let strike = actor.position + actor.forward() * self.tuning.reach;
        let mut hits = 0;
        for entity in entities {
            if entity.is_damageable()
                && entity.position().distance(strike) < self.tuning.range
                && entity.take_damage()
            {
                hits += 1;
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsTuning;
    use approx::assert_relative_eq;
    use glam::DVec3;

    fn swing_until_done(
        combat: &mut PlayerCombat,
        actor: &Actor,
        entities: &mut [WorldEntity],
    ) -> usize {
        let mut hits = 0;
        for _ in 0..60 {
            hits += combat.update(0.02, actor, entities.iter_mut());
        }
        hits
    }

    #[test]
    fn swing_hits_slime_in_front_once() {
        let actor = Actor::new(DVec3::ZERO, 0.0, &PhysicsTuning::default());
        let mut entities = vec![
            WorldEntity::slime(0.0, -1.5, 0.0),
            WorldEntity::slime(0.0, 5.0, 0.0),
        ];
        let mut combat = PlayerCombat::default();
        assert!(combat.start_attack());
        assert!(!combat.start_attack());
        assert_eq!(swing_until_done(&mut combat, &actor, &mut entities), 1);
        assert_eq!(combat.state(), CombatState::Idle);
        assert!(!entities[0].is_damageable());
        assert!(entities[1].is_damageable());
    }

    #[test]
    fn sword_angle_is_a_triangle_wave() {
        let mut combat = PlayerCombat::default();
        assert_relative_eq!(combat.sword_angle(), 0.0);
        combat.start_attack();
        let actor = Actor::new(DVec3::ZERO, 0.0, &PhysicsTuning::default());
        combat.update(0.2, &actor, std::iter::empty());
        assert_relative_eq!(combat.sword_angle(), FRAC_PI_2, epsilon = 1e-12);
        combat.update(0.1, &actor, std::iter::empty());
        assert_relative_eq!(combat.sword_angle(), FRAC_PI_2 * 0.5, epsilon = 1e-12);
    }
}
