//! Simulation constants and tuning defaults.

// --- Shots ---

/// Base shot speed (world units per second).
pub const SHOT_SPEED: f32 = 100.0;

/// Base shot range; base lifetime is `SHOT_RANGE / SHOT_SPEED`.
pub const SHOT_RANGE: f32 = 350.0;

/// Radius of a shot for tank hit tests.
pub const SHOT_RADIUS: f32 = 0.5;

/// Length of one radar tail unit.
pub const SHOT_TAIL_LENGTH: f32 = 4.0;

/// Distance from tank centre to muzzle.
pub const MUZZLE_FRONT: f32 = 4.42;

// --- Guided missile ---

/// Guided missile speed as a multiple of `SHOT_SPEED`.
pub const GM_SPEED_FACTOR: f32 = 1.2;

/// Guided missile lifetime as a multiple of the base shot lifetime.
pub const GM_LIFE_FACTOR: f32 = 0.95;

/// Maximum seeker turn rate (radians per second, ~36 deg/s).
pub const GM_TURN_RATE: f32 = 0.628_319;

/// Seconds of simulation time between smoke puffs.
pub const GM_PUFF_TIME: f32 = 0.1;

/// A missile cannot hit anything until it has flown this long.
pub const GM_ACTIVATION_TIME: f32 = 0.5;

/// Link denial notices are only shown this early in a missile's life.
pub const LINK_FAIL_NOTICE_WINDOW: f32 = 1.0;

// --- Geometry ---

/// Minimum ray parameter for obstacle hits.
pub const EPSILON: f32 = 1.0e-5;

/// Cross-product length below which two directions are treated as parallel.
pub const PARALLEL_EPSILON: f32 = 1.0e-6;

// --- Trajectory ---

/// Number of segments retained in a missile's flight history.
pub const HISTORY_LEN: usize = 4;

// --- Presentation ---

/// Texture animation grid for the missile bolt.
pub const MISSILE_TEXTURE_FRAMES: (u32, u32) = (4, 4);

/// Bolt colour (RGB).
pub const MISSILE_COLOR: [f32; 3] = [1.0, 0.2, 0.0];

/// Radar tip colour when a leading/trailing line is drawn.
pub const RADAR_TIP_COLOR: [f32; 3] = [1.0, 0.75, 0.75];
