//! Level, enemy and tower configuration.
//!
//! These are already-parsed data structures from the simulation's point of
//! view: the spawner and the economy only ever read them. JSON loading and
//! validation live here so every consumer sees the same rules.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{EnemyKind, TowerKind};
use crate::error::ConfigError;
use crate::types::Vec2;

// ---- Levels ----

/// One spawn instruction inside a wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub kind: EnemyKind,
    pub count: u32,
    /// Seconds between consecutive units of this entry.
    pub interval_secs: f64,
    /// Index into `LevelConfig::paths`.
    pub path: usize,
}

/// An ordered batch of spawn entries started after a delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Seconds to wait before the first entry starts.
    #[serde(default)]
    pub start_delay_secs: f64,
    pub entries: Vec<SpawnEntry>,
}

impl WaveConfig {
    /// Total number of enemies this wave promises.
    pub fn enemy_count(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

/// Immutable description of a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_initial_currency")]
    pub initial_currency: u32,
    #[serde(default = "default_initial_health")]
    pub initial_health: i32,
    pub waves: Vec<WaveConfig>,
    /// One ordered waypoint list per path index.
    pub paths: Vec<Vec<Vec2>>,
    /// Positions where towers may be built.
    #[serde(default)]
    pub build_nodes: Vec<Vec2>,
    /// Towers available in this level; the default catalog when omitted.
    #[serde(default)]
    pub towers: Option<TowerCatalog>,
}

fn default_initial_currency() -> u32 {
    DEFAULT_INITIAL_CURRENCY
}

fn default_initial_health() -> i32 {
    DEFAULT_INITIAL_HEALTH
}

impl LevelConfig {
    /// Parse and validate a level from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let level: LevelConfig = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.waves.is_empty() {
            return Err(ConfigError::NoWaves { level: self.id });
        }
        if self.paths.is_empty() {
            return Err(ConfigError::NoPaths { level: self.id });
        }
        if let Some(path) = self.paths.iter().position(|p| p.is_empty()) {
            return Err(ConfigError::EmptyPath { path });
        }

        for (wave_idx, wave) in self.waves.iter().enumerate() {
            if wave.start_delay_secs < 0.0 {
                return Err(ConfigError::NegativeDelay {
                    wave: wave_idx,
                    delay: wave.start_delay_secs,
                });
            }
            for (entry_idx, entry) in wave.entries.iter().enumerate() {
                if entry.path >= self.paths.len() {
                    return Err(ConfigError::UnknownPath {
                        wave: wave_idx,
                        entry: entry_idx,
                        path: entry.path,
                        available: self.paths.len(),
                    });
                }
                if entry.interval_secs < 0.0 {
                    return Err(ConfigError::NegativeInterval {
                        wave: wave_idx,
                        entry: entry_idx,
                        interval: entry.interval_secs,
                    });
                }
            }
        }

        if let Some(towers) = &self.towers {
            towers.validate()?;
        }
        Ok(())
    }

    /// Total number of enemies across all waves.
    pub fn total_enemies(&self) -> u32 {
        self.waves.iter().map(WaveConfig::enemy_count).sum()
    }

    /// The tower catalog in effect for this level.
    pub fn tower_catalog(&self) -> TowerCatalog {
        self.towers.clone().unwrap_or_default()
    }
}

// ---- Enemies ----

/// Stats for one enemy kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    pub kind: EnemyKind,
    #[serde(default)]
    pub name: String,
    pub max_health: i32,
    pub currency_reward: u32,
    pub move_speed: f32,
    #[serde(default)]
    pub physical_resistance: f32,
    #[serde(default)]
    pub magic_resistance: f32,
    #[serde(default)]
    pub can_fly: bool,
}

impl EnemyConfig {
    /// Profile used when a kind is spawned without any config.
    pub fn fallback(kind: EnemyKind) -> Self {
        Self {
            kind,
            name: String::new(),
            max_health: FALLBACK_ENEMY_HEALTH,
            currency_reward: FALLBACK_ENEMY_REWARD,
            move_speed: FALLBACK_ENEMY_SPEED,
            physical_resistance: 0.0,
            magic_resistance: 0.0,
            can_fly: false,
        }
    }

    /// Config values with the kind's guarantees applied on top:
    /// Defence kinds get at least 50% of their resistance, `Fly` always flies,
    /// `Fast` moves at least at the fast minimum. Resistances are clamped to
    /// the [0, 0.9] band.
    pub fn effective(&self) -> EnemyConfig {
        let mut out = self.clone();
        match self.kind {
            EnemyKind::DefencePhysical => {
                out.physical_resistance = out.physical_resistance.max(DEFENCE_KIND_MIN_RESISTANCE);
            }
            EnemyKind::DefenceMagic => {
                out.magic_resistance = out.magic_resistance.max(DEFENCE_KIND_MIN_RESISTANCE);
            }
            EnemyKind::Fly => out.can_fly = true,
            EnemyKind::Fast => out.move_speed = out.move_speed.max(FAST_KIND_MIN_SPEED),
            _ => {}
        }
        out.physical_resistance = out.physical_resistance.clamp(0.0, MAX_RESISTANCE);
        out.magic_resistance = out.magic_resistance.clamp(0.0, MAX_RESISTANCE);
        out
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health <= 0 {
            return Err(ConfigError::NonPositiveHealth {
                kind: self.kind,
                value: self.max_health,
            });
        }
        for (which, value) in [
            ("physical", self.physical_resistance),
            ("magic", self.magic_resistance),
        ] {
            if !(0.0..=MAX_RESISTANCE).contains(&value) {
                return Err(ConfigError::ResistanceOutOfRange {
                    kind: self.kind,
                    which,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// All configured enemy kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemyConfig>,
}

impl EnemyCatalog {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let catalog: EnemyCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for enemy in &self.enemies {
            if !seen.insert(enemy.kind) {
                return Err(ConfigError::DuplicateEnemy(enemy.kind));
            }
            enemy.validate()?;
        }
        Ok(())
    }

    pub fn get(&self, kind: EnemyKind) -> Option<&EnemyConfig> {
        self.enemies.iter().find(|e| e.kind == kind)
    }
}

// ---- Towers ----

/// Projectile parameters, one variant per tower kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProjectileSpec {
    Arrow {
        speed: f32,
        lifetime_secs: f32,
    },
    Cannon {
        speed: f32,
        lifetime_secs: f32,
        arc_height: f32,
        splash_radius: f32,
    },
    Magic {
        speed: f32,
        lifetime_secs: f32,
    },
    Sniper {
        speed: f32,
        lifetime_secs: f32,
    },
}

impl ProjectileSpec {
    pub fn default_for(kind: TowerKind) -> Self {
        match kind {
            TowerKind::Arrow => ProjectileSpec::Arrow {
                speed: PROJECTILE_SPEED,
                lifetime_secs: ARROW_LIFETIME_SECS,
            },
            TowerKind::Cannon => ProjectileSpec::Cannon {
                speed: PROJECTILE_SPEED,
                lifetime_secs: SHORT_PROJECTILE_LIFETIME_SECS,
                arc_height: CANNON_ARC_HEIGHT,
                splash_radius: CANNON_SPLASH_RADIUS,
            },
            TowerKind::Magic => ProjectileSpec::Magic {
                speed: PROJECTILE_SPEED,
                lifetime_secs: SHORT_PROJECTILE_LIFETIME_SECS,
            },
            TowerKind::Sniper => ProjectileSpec::Sniper {
                speed: SNIPER_PROJECTILE_SPEED,
                lifetime_secs: SHORT_PROJECTILE_LIFETIME_SECS,
            },
        }
    }

    /// Tower kind this projectile belongs to.
    pub fn kind(&self) -> TowerKind {
        match self {
            ProjectileSpec::Arrow { .. } => TowerKind::Arrow,
            ProjectileSpec::Cannon { .. } => TowerKind::Cannon,
            ProjectileSpec::Magic { .. } => TowerKind::Magic,
            ProjectileSpec::Sniper { .. } => TowerKind::Sniper,
        }
    }

    pub fn speed(&self) -> f32 {
        match *self {
            ProjectileSpec::Arrow { speed, .. }
            | ProjectileSpec::Cannon { speed, .. }
            | ProjectileSpec::Magic { speed, .. }
            | ProjectileSpec::Sniper { speed, .. } => speed,
        }
    }

    pub fn lifetime_secs(&self) -> f32 {
        match *self {
            ProjectileSpec::Arrow { lifetime_secs, .. }
            | ProjectileSpec::Cannon { lifetime_secs, .. }
            | ProjectileSpec::Magic { lifetime_secs, .. }
            | ProjectileSpec::Sniper { lifetime_secs, .. } => lifetime_secs,
        }
    }
}

/// Build cost and combat stats of one tower kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerSpec {
    pub kind: TowerKind,
    pub cost: u32,
    pub range: f32,
    /// Attacks per second.
    pub attack_rate: f32,
    pub damage: i32,
    pub projectile: ProjectileSpec,
}

impl TowerSpec {
    pub fn default_for(kind: TowerKind) -> Self {
        let (cost, range, attack_rate, damage) = match kind {
            TowerKind::Arrow => (ARROW_COST, ARROW_RANGE, ARROW_ATTACK_RATE, ARROW_DAMAGE),
            TowerKind::Cannon => (CANNON_COST, CANNON_RANGE, CANNON_ATTACK_RATE, CANNON_DAMAGE),
            TowerKind::Magic => (MAGIC_COST, MAGIC_RANGE, MAGIC_ATTACK_RATE, MAGIC_DAMAGE),
            TowerKind::Sniper => (SNIPER_COST, SNIPER_RANGE, SNIPER_ATTACK_RATE, SNIPER_DAMAGE),
        };
        Self {
            kind,
            cost,
            range,
            attack_rate,
            damage,
            projectile: ProjectileSpec::default_for(kind),
        }
    }

    /// Seconds between two attacks.
    pub fn attack_interval_secs(&self) -> f64 {
        1.0 / self.attack_rate as f64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field| ConfigError::InvalidTowerStat {
            kind: self.kind,
            field,
        };
        if self.range <= 0.0 {
            return Err(invalid("range"));
        }
        if self.attack_rate <= 0.0 {
            return Err(invalid("attack rate"));
        }
        if self.damage <= 0 {
            return Err(invalid("damage"));
        }
        if self.projectile.speed() <= 0.0 {
            return Err(invalid("projectile speed"));
        }
        if self.projectile.kind() != self.kind {
            return Err(ConfigError::ProjectileMismatch {
                kind: self.kind,
                projectile: self.projectile.kind(),
            });
        }
        Ok(())
    }
}

/// The tower kinds a level lets the player build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerCatalog {
    pub towers: Vec<TowerSpec>,
}

impl Default for TowerCatalog {
    fn default() -> Self {
        Self {
            towers: TowerKind::ALL.iter().map(|&k| TowerSpec::default_for(k)).collect(),
        }
    }
}

impl TowerCatalog {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for spec in &self.towers {
            if !seen.insert(spec.kind) {
                return Err(ConfigError::DuplicateTower(spec.kind));
            }
            spec.validate()?;
        }
        Ok(())
    }

    pub fn get(&self, kind: TowerKind) -> Option<&TowerSpec> {
        self.towers.iter().find(|t| t.kind == kind)
    }
}
