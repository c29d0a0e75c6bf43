//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Player ---

/// Starting currency when a level config does not specify one.
pub const DEFAULT_INITIAL_CURRENCY: u32 = 100;

/// Starting health when a level config does not specify one.
pub const DEFAULT_INITIAL_HEALTH: i32 = 15;

/// Health lost each time an enemy reaches the end of its path.
pub const LEAK_DAMAGE: i32 = 1;

// --- Enemies ---

/// Distance at which an enemy counts as having reached a waypoint.
pub const WAYPOINT_ARRIVAL_EPSILON: f32 = 0.1;

/// Upper bound for physical and magic resistance.
pub const MAX_RESISTANCE: f32 = 0.9;

/// Minimum resistance granted by the Defence* enemy kinds.
pub const DEFENCE_KIND_MIN_RESISTANCE: f32 = 0.5;

/// Minimum move speed granted by the Fast enemy kind.
pub const FAST_KIND_MIN_SPEED: f32 = 3.0;

/// Fallback enemy profile used when a kind has no config.
pub const FALLBACK_ENEMY_HEALTH: i32 = 100;
pub const FALLBACK_ENEMY_REWARD: u32 = 10;
pub const FALLBACK_ENEMY_SPEED: f32 = 2.0;

/// Inactive instances pre-created per enemy kind.
pub const DEFAULT_POOL_SIZE: usize = 10;

// --- Damage ---

/// Every successful hit removes at least this much health.
pub const MIN_DAMAGE: i32 = 1;

// --- Towers ---

pub const ARROW_COST: u32 = 50;
pub const ARROW_RANGE: f32 = 3.0;
pub const ARROW_ATTACK_RATE: f32 = 1.0;
pub const ARROW_DAMAGE: i32 = 20;

pub const CANNON_COST: u32 = 80;
pub const CANNON_RANGE: f32 = 3.0;
pub const CANNON_ATTACK_RATE: f32 = 0.5;
pub const CANNON_DAMAGE: i32 = 30;

pub const MAGIC_COST: u32 = 70;
pub const MAGIC_RANGE: f32 = 3.5;
pub const MAGIC_ATTACK_RATE: f32 = 0.8;
pub const MAGIC_DAMAGE: i32 = 25;

pub const SNIPER_COST: u32 = 100;
pub const SNIPER_RANGE: f32 = 6.0;
pub const SNIPER_ATTACK_RATE: f32 = 0.4;
pub const SNIPER_DAMAGE: i32 = 60;

// --- Projectiles ---

/// Baseline projectile speed (units per second).
pub const PROJECTILE_SPEED: f32 = 10.0;

/// Sniper bullets travel twice as fast as everything else.
pub const SNIPER_PROJECTILE_SPEED: f32 = 20.0;

/// Safety lifetime of an arrow (seconds).
pub const ARROW_LIFETIME_SECS: f32 = 5.0;

/// Safety lifetime of cannon, magic and sniper projectiles (seconds).
pub const SHORT_PROJECTILE_LIFETIME_SECS: f32 = 3.0;

/// Peak height of a cannon shell's arc.
pub const CANNON_ARC_HEIGHT: f32 = 2.0;

/// Radius of a cannon shell's area damage.
pub const CANNON_SPLASH_RADIUS: f32 = 1.5;

/// Per-axis magnitude of the magic bolt's random drift (units per second).
pub const MAGIC_JITTER: f32 = 0.02;

/// Journey lengths below this resolve an arcing shell immediately.
pub const MIN_JOURNEY_LENGTH: f32 = 1e-4;

// --- Spatial index ---

/// Cell size of the enemy spatial hash (world units).
pub const SPATIAL_CELL_SIZE: f32 = 2.0;

// --- Wave spawning ---

/// Longest time the spawner waits for the final wave to clear (seconds).
pub const WAVE_CLEAR_TIMEOUT_SECS: f64 = 600.0;

/// How often the wave-clear wait logs the remaining count (seconds).
pub const WAVE_CLEAR_REPORT_INTERVAL_SECS: f64 = 5.0;

// --- Progression ---

/// Highest level id that can be unlocked.
pub const MAX_UNLOCKABLE_LEVEL: u32 = 7;

/// Remaining-health fractions at or below which a victory earns 1 / 2 stars.
pub const ONE_STAR_HEALTH_FRACTION: f32 = 0.4;
pub const TWO_STAR_HEALTH_FRACTION: f32 = 0.7;

// --- Engine ---

/// Highest accepted time scale.
pub const MAX_TIME_SCALE: f64 = 4.0;
