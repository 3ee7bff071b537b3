//! Simulation constants and default tuning parameters.
//!
//! Every value here is a default for a `GameConfig` field; a loaded
//! configuration file can override any of them.

/// Default simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Spawn-rate knob denominator: per-tick spawn probability is `spawn_rate / SPAWN_RATE_SCALE`.
pub const SPAWN_RATE_SCALE: f64 = 10_000.0;

/// Default spawn-rate knob (10% per tick).
pub const DEFAULT_SPAWN_RATE: f64 = 1_000.0;

/// Default RNG seed. Same seed = same session.
pub const DEFAULT_SEED: u64 = 42;

// --- Field ---

pub const FIELD_WIDTH: f64 = 800.0;
pub const FIELD_HEIGHT: f64 = 600.0;

// --- Players ---

pub const PLAYER_WIDTH: f64 = 30.0;
pub const PLAYER_HEIGHT: f64 = 30.0;

/// Horizontal speed (units per tick).
pub const PLAYER_SPEED: f64 = 5.0;

pub const PLAYER_STARTING_LIVES: u32 = 3;

/// Distance from the bottom edge of the field to the top of the player box.
pub const PLAYER_BOTTOM_OFFSET: f64 = 50.0;

/// Number of player slots in two-player mode.
pub const MAX_PLAYERS: usize = 2;

// --- Projectiles ---

pub const PROJECTILE_WIDTH: f64 = 4.0;
pub const PROJECTILE_HEIGHT: f64 = 10.0;

/// Vertical speed (units per tick).
pub const PROJECTILE_SPEED: f64 = 8.0;

pub const PROJECTILE_COLOR: [u8; 3] = [0xFF, 0xFF, 0x00];

/// Ticks between shots from one player. Zero disables the limiter.
pub const FIRE_COOLDOWN_TICKS: u32 = 0;

// --- Enemies ---

/// Horizontal drift per tick. Zero keeps enemies on a straight descent.
pub const ENEMY_DRIFT_SPEED: f64 = 0.0;

pub const ENEMY_PROJECTILE_COLOR: [u8; 3] = [0xFF, 0x40, 0x40];
