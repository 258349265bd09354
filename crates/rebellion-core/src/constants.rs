//! Simulation constants and tuning parameters.

/// Nominal frame rate the presentation layer drives the simulation at (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per nominal frame.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Largest delta-time a single step will integrate. Longer frames are capped.
pub const MAX_FRAME_DT: f64 = 0.25;

// --- Playfield ---

/// Default playfield width in pixels.
pub const PLAYFIELD_WIDTH: f64 = 600.0;

/// Default playfield height in pixels.
pub const PLAYFIELD_HEIGHT: f64 = 800.0;

/// Margin outside the playfield that entities may occupy while entering.
pub const ENTER_CLAMP_MARGIN: f64 = 64.0;

/// Distance beyond the playfield at which exiting enemies are despawned.
pub const DESPAWN_MARGIN: f64 = 48.0;

/// Distance beyond the playfield at which projectiles and pickups expire.
pub const PROJECTILE_BOUNDS_MARGIN: f64 = 32.0;

/// Vertical distance above the top edge where scheduled enemies appear.
pub const SPAWN_ALTITUDE: f64 = 40.0;

/// Horizontal inset from the side edges used by spawn patterns.
pub const SPAWN_SIDE_INSET: f64 = 60.0;

// --- Player ---

/// Player ship hitbox (pixels).
pub const PLAYER_WIDTH: f64 = 32.0;
pub const PLAYER_HEIGHT: f64 = 40.0;

/// Base player speed (px/s).
pub const PLAYER_SPEED: f64 = 300.0;

/// Speed multiplier while an overdrive pickup is active.
pub const OVERDRIVE_SPEED_FACTOR: f64 = 1.5;

/// Default player health layers.
pub const PLAYER_MAX_SHIELD: f64 = 100.0;
pub const PLAYER_MAX_ARMOR: f64 = 100.0;
pub const PLAYER_MAX_HULL: f64 = 100.0;

/// Rockets carried at the start of a run and the default rack size.
pub const PLAYER_START_ROCKETS: u32 = 10;
pub const PLAYER_MAX_ROCKETS: u32 = 20;

/// Autocannon: seconds between volleys, damage per round, speed, lifetime.
pub const PRIMARY_FIRE_INTERVAL: f64 = 0.15;
pub const PRIMARY_DAMAGE: f64 = 10.0;
pub const PRIMARY_SPEED: f64 = 700.0;
pub const PRIMARY_LIFETIME: f64 = 1.5;
pub const PRIMARY_WIDTH: f64 = 4.0;
pub const PRIMARY_HEIGHT: f64 = 12.0;

/// Angular spread between guns when more than one is fitted (radians).
pub const GUN_SPREAD_ANGLE: f64 = 0.12;

/// Maximum number of guns the spread upgrade can reach.
pub const MAX_GUN_COUNT: u32 = 3;

/// Rocket launcher: seconds between launches, damage, speed, lifetime.
pub const ROCKET_FIRE_INTERVAL: f64 = 0.5;
pub const ROCKET_DAMAGE: f64 = 40.0;
pub const ROCKET_SPEED: f64 = 500.0;
pub const ROCKET_LIFETIME: f64 = 2.5;
pub const ROCKET_WIDTH: f64 = 8.0;
pub const ROCKET_HEIGHT: f64 = 16.0;

// --- Enemies ---

/// Enemy projectile hitbox and lifetime.
pub const ENEMY_SHOT_WIDTH: f64 = 6.0;
pub const ENEMY_SHOT_HEIGHT: f64 = 10.0;
pub const ENEMY_SHOT_LIFETIME: f64 = 4.0;

/// Default enemy projectile speed and damage when a definition omits them.
pub const DEFAULT_ENEMY_SHOT_SPEED: f64 = 260.0;
pub const DEFAULT_ENEMY_SHOT_DAMAGE: f64 = 8.0;

/// Fire-interval jitter fraction (±10%).
pub const FIRE_JITTER_FRACTION: f64 = 0.10;

/// Entering: distance to anchor that counts as arrived (px).
pub const ENTER_ARRIVAL_DISTANCE: f64 = 4.0;

/// Entering: give up on the anchor after this long (s).
pub const ENTER_TIMEOUT_SECS: f64 = 4.0;

/// Vertical band on screen where entering enemies take up their anchors.
pub const ANCHOR_MIN_Y: f64 = 80.0;
pub const ANCHOR_MAX_Y: f64 = 240.0;

/// Health fraction below which evasive enemy types switch to zigzag.
pub const EVADE_HEALTH_FRACTION: f64 = 0.3;

/// Boss phase thresholds on health fraction (phase 0 above the first,
/// phase 1 above the second, phase 2 below).
pub const BOSS_PHASE_THRESHOLDS: [f64; 2] = [2.0 / 3.0, 1.0 / 3.0];

/// Boss fire-interval multiplier for each phase.
pub const BOSS_PHASE_FIRE_FACTOR: [f64; 3] = [1.0, 0.8, 0.5];

// --- Patterns ---

pub const SINE_AMPLITUDE: f64 = 60.0;
pub const SINE_FREQUENCY: f64 = 2.0;

pub const ZIGZAG_INTERVAL_SECS: f64 = 0.8;
pub const ZIGZAG_LATERAL_FACTOR: f64 = 1.2;

pub const SWOOP_SPEED_FACTOR: f64 = 1.8;
pub const SWOOP_DIVE_TIMEOUT_SECS: f64 = 3.0;
/// Dive target is offset this far above the player so the swoop pulls up.
pub const SWOOP_TARGET_LEAD: f64 = 80.0;

pub const FLANK_OFFSET: f64 = 120.0;
pub const FLANK_SWITCH_SECS: f64 = 3.0;
pub const FLANK_LATERAL_FACTOR: f64 = 1.5;
pub const FLANK_FORWARD_FACTOR: f64 = 0.4;

pub const ORBIT_RADIUS: f64 = 220.0;
pub const ORBIT_ANGULAR_SPEED: f64 = 0.9;
/// Proportional gain pulling an orbiting enemy back onto its radius (1/s).
pub const ORBIT_RADIAL_GAIN: f64 = 2.0;

/// Default preferred firing range for omnidirectional patterns (px).
pub const DEFAULT_FIRING_RANGE: f64 = 700.0;

/// Flank pattern fires only inside this forward half-angle (radians).
pub const FLANK_FIRING_HALF_ANGLE: f64 = 0.6;

// --- Scheduler ---

/// Default wave duration when a definition omits it (s).
pub const DEFAULT_WAVE_DURATION_SECS: f64 = 10.0;

/// After the wave duration plus this grace, survivors are ordered to exit.
pub const WAVE_RETREAT_GRACE_SECS: f64 = 20.0;

/// Per-wave multiplicative step on top of the stage scaling factor.
pub const WAVE_SCALING_STEP: f64 = 0.1;

// --- Pickups ---

pub const POWERUP_WIDTH: f64 = 20.0;
pub const POWERUP_HEIGHT: f64 = 20.0;
pub const POWERUP_DRIFT_SPEED: f64 = 60.0;
pub const POWERUP_TTL_SECS: f64 = 8.0;
