//! Simulation constants used across systems.
//!
//! These values are the defaults for [`crate::config::Tuning`]. They match
//! the reference behaviour of the game and should only change together with
//! the scenarios in `tests/`.

/// Downward acceleration applied to the actor, in units per second squared.
pub const GRAVITY: f64 = -30.0;
/// Vertical velocity imparted by a jump.
pub const JUMP_STRENGTH: f64 = 15.0;
/// Horizontal speed of the actor when input is held.
pub const MOVE_SPEED: f64 = 10.0;
/// Yaw rate applied while a rotate input is held, in radians per second.
pub const ROTATION_SPEED: f64 = 3.0;

/// Per-tick multiplier applied to knockback velocity.
pub const KNOCKBACK_DECAY: f64 = 0.9;
/// Knockback speed below which the impulse is cleared.
pub const KNOCKBACK_REST_SPEED: f64 = 0.1;
/// Vertical hop imparted whenever knockback is applied.
pub const KNOCKBACK_HOP: f64 = 5.0;
/// Frame rate the per-tick decay was tuned against.
pub const KNOCKBACK_REFERENCE_FPS: f64 = 60.0;

/// Vertical slack separating "standing on" from "running into" an obstacle.
pub const STEP_TOLERANCE: f64 = 0.1;
/// Horizontal collision radius of the actor.
pub const ACTOR_RADIUS: f64 = 0.3;
/// Nominal actor height before the collision multiplier.
pub const ACTOR_NOMINAL_HEIGHT: f64 = 1.0;
/// Multiplier turning the nominal height into the collision height.
pub const ACTOR_HEIGHT_MULTIPLIER: f64 = 1.7;
/// Half extent of a placed block along every axis.
pub const BLOCK_HALF_EXTENT: f64 = 0.5;
/// Separation left between the actor and a surface it was pushed out of.
pub const RESOLUTION_EPSILON: f64 = 0.001;
/// Offset used when pushing an actor out of a block it is centred inside.
pub const DEGENERATE_PUSH_OFFSET: f64 = 0.01;
/// Height of the world floor plane.
pub const FLOOR_HEIGHT: f64 = 0.0;

/// Radius of a tree trunk footprint.
pub const TREE_RADIUS: f64 = 0.3;
/// Effective height of a tree; high enough that it can never be vaulted.
pub const TREE_HEIGHT: f64 = 100.0;
/// Rock footprint radius per unit of scale.
pub const ROCK_RADIUS_PER_SCALE: f64 = 0.5;
/// Rock climbable height per unit of scale.
pub const ROCK_HEIGHT_PER_SCALE: f64 = 0.7;

/// Distance at which a live slime knocks the actor back.
pub const SLIME_CONTACT_RANGE: f64 = 0.8;
/// Knockback strength applied by slime contact.
pub const SLIME_KNOCKBACK_STRENGTH: f64 = 15.0;
/// Resting height of a slime's centre.
pub const SLIME_REST_HEIGHT: f64 = 0.5;
/// Angular frequency of the slime bounce.
pub const SLIME_BOUNCE_SPEED: f64 = 3.0;
/// Amplitude of the slime bounce.
pub const SLIME_BOUNCE_HEIGHT: f64 = 0.3;
/// Rate at which a dead slime shrinks, in scale units per second.
pub const SLIME_SHRINK_SPEED: f64 = 2.0;
/// Scale at which a dead slime is removed from the world.
pub const SLIME_REMOVAL_SCALE: f64 = 0.01;

/// Duration of a sword swing in seconds.
pub const ATTACK_DURATION: f64 = 0.4;
/// Normalised swing progress at which the hit window opens.
pub const ATTACK_WINDOW_START: f64 = 0.2;
/// Normalised swing progress at which the hit window closes.
pub const ATTACK_WINDOW_END: f64 = 0.6;
/// Reach of a sword swing measured from the attack point.
pub const ATTACK_RANGE: f64 = 2.0;
/// Distance in front of the actor where the attack point sits.
pub const ATTACK_REACH: f64 = 1.0;

/// Debounce applied after toggling build mode.
pub const BUILD_TOGGLE_COOLDOWN: f64 = 0.5;
/// Cooldown applied after placing or removing a block.
pub const BUILD_ACTION_COOLDOWN: f64 = 0.2;

/// Horizontal extent beyond which the actor is recovered to spawn.
pub const WORLD_BOUNDS: f64 = 200.0;

/// Number of tree placement attempts when populating.
pub const TREE_ATTEMPTS: usize = 20;
/// Side of the square area trees are scattered over.
pub const TREE_AREA: f64 = 40.0;
/// Half side of the central clearing kept free of trees.
pub const TREE_CLEARING: f64 = 3.0;
/// Number of rock placement attempts when populating.
pub const ROCK_ATTEMPTS: usize = 15;
/// Side of the square area rocks are scattered over.
pub const ROCK_AREA: f64 = 40.0;
/// Half side of the central clearing kept free of rocks.
pub const ROCK_CLEARING: f64 = 2.0;
/// Smallest rock scale.
pub const ROCK_MIN_SCALE: f64 = 0.5;
/// Spread of rock scales above the minimum.
pub const ROCK_SCALE_SPREAD: f64 = 1.0;
/// Number of slime placement attempts when populating.
pub const SLIME_ATTEMPTS: usize = 10;
/// Side of the square area slimes are scattered over.
pub const SLIME_AREA: f64 = 30.0;
/// Half side of the central clearing kept free of slimes.
pub const SLIME_CLEARING: f64 = 5.0;
/// Upper bound of the random bounce phase given to each slime.
pub const SLIME_PHASE_RANGE: f64 = 100.0;

/// Storage key used for the single save slot.
pub const SAVE_KEY: &str = "feltcraft_save_v1";
