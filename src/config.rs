//! Runtime tuning loaded from sectioned TOML files.
//!
//! Every field defaults to the matching value in [`crate::constants`], so an
//! empty file (or no file at all) reproduces the reference behaviour. Files
//! only need to list the values they override:
//!
//! ```toml
//! [physics]
//! gravity = -25.0
//!
//! [knockback]
//! time_scaled = true
//! ```

use std::fs;
use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

/// Errors raised while loading tuning.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for [`Tuning`].
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but is outside its allowed range.
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Movement integrator parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Vertical acceleration (negative is down).
    pub gravity: f64,
    /// Vertical velocity set by a jump.
    pub jump_strength: f64,
    /// Horizontal speed while input is held.
    pub move_speed: f64,
    /// Yaw rate while a rotate input is held, radians per second.
    pub rotation_speed: f64,
    /// Vertical slack distinguishing floors from walls.
    pub step_tolerance: f64,
    /// Horizontal collision radius of the actor.
    pub actor_radius: f64,
    /// Nominal actor height.
    pub actor_nominal_height: f64,
    /// Multiplier applied to the nominal height for collision.
    pub actor_height_multiplier: f64,
    /// Separation left after resolving a penetration.
    pub resolution_epsilon: f64,
    /// Height of the world floor plane.
    pub floor_height: f64,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            move_speed: MOVE_SPEED,
            rotation_speed: ROTATION_SPEED,
            step_tolerance: STEP_TOLERANCE,
            actor_radius: ACTOR_RADIUS,
            actor_nominal_height: ACTOR_NOMINAL_HEIGHT,
            actor_height_multiplier: ACTOR_HEIGHT_MULTIPLIER,
            resolution_epsilon: RESOLUTION_EPSILON,
            floor_height: FLOOR_HEIGHT,
        }
    }
}

impl PhysicsTuning {
    /// Effective collision height of the actor.
    #[must_use]
    pub fn actor_height(&self) -> f64 {
        self.actor_nominal_height * self.actor_height_multiplier
    }
}

/// Knockback impulse parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnockbackTuning {
    /// Multiplier applied per decay step.
    pub decay: f64,
    /// Speed below which the impulse is cleared.
    pub rest_speed: f64,
    /// Vertical hop applied with each knockback.
    pub hop: f64,
    /// Scale the decay by elapsed time instead of applying it once per tick.
    pub time_scaled: bool,
    /// Frame rate the per-tick decay corresponds to when time scaled.
    pub reference_fps: f64,
}

impl Default for KnockbackTuning {
    fn default() -> Self {
        Self {
            decay: KNOCKBACK_DECAY,
            rest_speed: KNOCKBACK_REST_SPEED,
            hop: KNOCKBACK_HOP,
            time_scaled: false,
            reference_fps: KNOCKBACK_REFERENCE_FPS,
        }
    }
}

/// Hostile contact parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactTuning {
    /// Distance at which a slime knocks the actor back.
    pub slime_range: f64,
    /// Knockback strength of slime contact.
    pub slime_strength: f64,
    /// Minimum seconds between two knockbacks from the same slime.
    /// Zero reapplies the knockback every tick while in range.
    pub cooldown: f64,
}

impl Default for ContactTuning {
    fn default() -> Self {
        Self {
            slime_range: SLIME_CONTACT_RANGE,
            slime_strength: SLIME_KNOCKBACK_STRENGTH,
            cooldown: 0.0,
        }
    }
}

/// Sword swing parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Seconds a swing lasts.
    pub duration: f64,
    /// Progress at which hits start registering.
    pub window_start: f64,
    /// Progress at which hits stop registering.
    pub window_end: f64,
    /// Reach around the attack point.
    pub range: f64,
    /// Distance of the attack point in front of the actor.
    pub reach: f64,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            duration: ATTACK_DURATION,
            window_start: ATTACK_WINDOW_START,
            window_end: ATTACK_WINDOW_END,
            range: ATTACK_RANGE,
            reach: ATTACK_REACH,
        }
    }
}

/// Build mode parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildTuning {
    /// Debounce after toggling build mode.
    pub toggle_cooldown: f64,
    /// Cooldown after placing or removing a block.
    pub action_cooldown: f64,
}

impl Default for BuildTuning {
    fn default() -> Self {
        Self {
            toggle_cooldown: BUILD_TOGGLE_COOLDOWN,
            action_cooldown: BUILD_ACTION_COOLDOWN,
        }
    }
}

/// World-level parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// Horizontal extent beyond which the actor is recovered.
    pub bounds: f64,
    /// Spawn point used by resets.
    pub spawn: [f64; 3],
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            bounds: WORLD_BOUNDS,
            spawn: [0.0, FLOOR_HEIGHT, 0.0],
        }
    }
}

impl WorldTuning {
    /// Spawn point as a vector.
    #[must_use]
    pub const fn spawn_point(&self) -> DVec3 {
        DVec3::from_array(self.spawn)
    }
}

/// Complete simulation tuning.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Movement integrator.
    pub physics: PhysicsTuning,
    /// Knockback impulse.
    pub knockback: KnockbackTuning,
    /// Hostile contact.
    pub contact: ContactTuning,
    /// Sword swing.
    pub combat: CombatTuning,
    /// Build mode.
    pub build: BuildTuning,
    /// World limits.
    pub world: WorldTuning,
}

impl Tuning {
    /// Parses and validates tuning from TOML text.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let tuning: Self = toml::from_str(text)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reads, parses and validates a tuning file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Tuning::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks that every value is usable by the simulation.
    ///
    /// # Errors
    /// Returns the first offending field as [`ConfigError::Invalid`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        let k = &self.knockback;
        let checks: [(bool, &'static str, &'static str); 9] = [
            (p.move_speed.is_finite() && p.move_speed >= 0.0, "physics.move_speed", "must be finite and non-negative"),
            (p.gravity.is_finite(), "physics.gravity", "must be finite"),
            (p.actor_radius > 0.0 && p.actor_radius.is_finite(), "physics.actor_radius", "must be positive"),
            (p.actor_height() > 0.0 && p.actor_height().is_finite(), "physics.actor_nominal_height", "collision height must be positive"),
            (p.step_tolerance >= 0.0, "physics.step_tolerance", "must be non-negative"),
            (p.resolution_epsilon >= 0.0, "physics.resolution_epsilon", "must be non-negative"),
            (k.decay > 0.0 && k.decay < 1.0, "knockback.decay", "must lie strictly between 0 and 1"),
            (k.reference_fps > 0.0, "knockback.reference_fps", "must be positive"),
            (self.contact.cooldown >= 0.0, "contact.cooldown", "must be non-negative"),
        ];
        for (ok, field, reason) in checks {
            if !ok {
                return Err(ConfigError::Invalid { field, reason });
            }
        }
        let c = &self.combat;
        if !(c.duration > 0.0 && c.window_start <= c.window_end) {
            return Err(ConfigError::Invalid {
                field: "combat.duration",
                reason: "duration must be positive and the hit window ordered",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_file_reproduces_constants() {
        let tuning = Tuning::from_toml_str("").expect("empty tuning parses");
        assert_eq!(tuning, Tuning::default());
        assert!((tuning.physics.actor_height() - 1.7).abs() < 1e-12);
    }

    #[test]
    fn sections_override_individual_fields() {
        let tuning = Tuning::from_toml_str(
            r"
            [physics]
            gravity = -25.0

            [knockback]
            time_scaled = true
            ",
        )
        .expect("tuning parses");
        assert!((tuning.physics.gravity + 25.0).abs() < f64::EPSILON);
        assert!((tuning.physics.jump_strength - JUMP_STRENGTH).abs() < f64::EPSILON);
        assert!(tuning.knockback.time_scaled);
    }

    #[rstest]
    #[case::decay_at_one("[knockback]\ndecay = 1.0", "knockback.decay")]
    #[case::negative_radius("[physics]\nactor_radius = -0.3", "physics.actor_radius")]
    #[case::negative_cooldown("[contact]\ncooldown = -1.0", "contact.cooldown")]
    fn rejects_out_of_range_values(#[case] text: &str, #[case] expected_field: &str) {
        match Tuning::from_toml_str(text) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected invalid `{expected_field}`, got {other:?}"),
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            Tuning::from_toml_str("[physics\ngravity = "),
            Err(ConfigError::Parse(_))
        ));
    }
}
