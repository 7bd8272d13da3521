//! Decaying knockback impulse.
//!
//! The impulse is summed into the actor's horizontal velocity every tick and
//! shrinks geometrically until it falls below the rest speed.

use glam::DVec3;
use log::warn;

use crate::config::KnockbackTuning;

/// Accumulated knockback velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KnockbackModel {
    velocity: DVec3,
}

impl KnockbackModel {
    /// Current knockback velocity.
    #[must_use]
    pub const fn velocity(&self) -> DVec3 {
        self.velocity
    }

    /// Returns `true` while any impulse remains.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.velocity != DVec3::ZERO
    }

    /// Replaces the impulse with `normalize(direction) * strength`.
    ///
    /// A zero-length or non-finite direction falls back to `+X` so a NaN can
    /// never reach the velocity pipeline.
    pub fn set_impulse(&mut self, direction: DVec3, strength: f64) {
        let unit = direction.try_normalize().unwrap_or_else(|| {
            warn!("degenerate knockback direction {direction}; pushing along +X");
            DVec3::X
        });
        self.velocity = unit * strength;
    }

    /// Shrinks the impulse by one decay step.
    ///
    /// By default the factor is applied once per call regardless of `dt`;
    /// with `time_scaled` set it becomes `decay^(dt * reference_fps)`.
    pub fn decay(&mut self, dt: f64, tuning: &KnockbackTuning) {
        if !self.is_active() {
            return;
        }
        let factor = if tuning.time_scaled {
            tuning.decay.powf(dt.max(0.0) * tuning.reference_fps)
        } else {
            tuning.decay
        };
        self.velocity *= factor;
        if self.velocity.length() < tuning.rest_speed {
            self.velocity = DVec3::ZERO;
        }
    }

    /// Drops any remaining impulse.
    pub fn clear(&mut self) {
        self.velocity = DVec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn impulse_is_normalised_then_scaled() {
        let mut model = KnockbackModel::default();
        model.set_impulse(DVec3::new(3.0, 0.0, 4.0), 10.0);
        assert_relative_eq!(model.velocity().x, 6.0);
        assert_relative_eq!(model.velocity().z, 8.0);
    }

    #[test]
    fn zero_direction_falls_back_to_unit_x() {
        let mut model = KnockbackModel::default();
        model.set_impulse(DVec3::ZERO, 15.0);
        assert_eq!(model.velocity(), DVec3::new(15.0, 0.0, 0.0));
        assert!(model.velocity().is_finite());
    }

    #[test]
    fn per_tick_decay_ignores_dt() {
        let tuning = KnockbackTuning::default();
        let mut fast = KnockbackModel::default();
        let mut slow = KnockbackModel::default();
        fast.set_impulse(DVec3::X, 10.0);
        slow.set_impulse(DVec3::X, 10.0);
        fast.decay(1.0 / 120.0, &tuning);
        slow.decay(1.0 / 30.0, &tuning);
        assert_relative_eq!(fast.velocity().x, 9.0);
        assert_relative_eq!(slow.velocity().x, 9.0);
    }

    #[test]
    fn time_scaled_decay_matches_per_tick_at_reference_rate() {
        let tuning = KnockbackTuning {
            time_scaled: true,
            ..KnockbackTuning::default()
        };
        let mut model = KnockbackModel::default();
        model.set_impulse(DVec3::X, 10.0);
        model.decay(1.0 / 60.0, &tuning);
        assert_relative_eq!(model.velocity().x, 9.0, epsilon = 1e-9);
        model.decay(2.0 / 60.0, &tuning);
        assert_relative_eq!(model.velocity().x, 9.0 * 0.81, epsilon = 1e-9);
    }

    #[test]
    fn decay_converges_to_rest() {
        let tuning = KnockbackTuning::default();
        let mut model = KnockbackModel::default();
        model.set_impulse(DVec3::new(1.0, 0.0, -1.0), 15.0);
        let mut ticks = 0;
        while model.is_active() {
            model.decay(0.016, &tuning);
            ticks += 1;
            assert!(ticks < 100, "knockback failed to settle");
        }
        // 15 * 0.9^n < 0.1 first holds at n = 48.
        assert_eq!(ticks, 48);
    }
}
