//! Error types for configuration loading and tower construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::{EnemyKind, TowerKind};

/// A level, enemy catalog or tower catalog that cannot be used as given.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level {level} has no waves")]
    NoWaves { level: u32 },
    #[error("level {level} has no paths")]
    NoPaths { level: u32 },
    #[error("path {path} has no waypoints")]
    EmptyPath { path: usize },
    #[error("wave {wave} entry {entry} uses path {path}, but only {available} paths exist")]
    UnknownPath {
        wave: usize,
        entry: usize,
        path: usize,
        available: usize,
    },
    #[error("wave {wave} entry {entry} has a negative spawn interval ({interval})")]
    NegativeInterval {
        wave: usize,
        entry: usize,
        interval: f64,
    },
    #[error("wave {wave} has a negative start delay ({delay})")]
    NegativeDelay { wave: usize, delay: f64 },
    #[error("{kind:?} {which} resistance {value} is outside [0, 0.9]")]
    ResistanceOutOfRange {
        kind: EnemyKind,
        which: &'static str,
        value: f32,
    },
    #[error("{kind:?} has non-positive max health ({value})")]
    NonPositiveHealth { kind: EnemyKind, value: i32 },
    #[error("enemy kind {0:?} is configured more than once")]
    DuplicateEnemy(EnemyKind),
    #[error("tower kind {0:?} is configured more than once")]
    DuplicateTower(TowerKind),
    #[error("{kind:?} tower has a non-positive {field}")]
    InvalidTowerStat { kind: TowerKind, field: &'static str },
    #[error("{kind:?} tower is configured with a {projectile:?} projectile")]
    ProjectileMismatch {
        kind: TowerKind,
        projectile: TowerKind,
    },
}

/// Why a build request was refused. A refused build changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BuildError {
    #[error("{0:?} is not buildable in this level")]
    UnknownKind(TowerKind),
    #[error("not enough currency: costs {cost}, have {have}")]
    InsufficientFunds { cost: u32, have: u32 },
    #[error("build node {0} does not exist")]
    UnknownNode(usize),
    #[error("build node {0} is already occupied")]
    NodeOccupied(usize),
    #[error("building is disabled")]
    Disabled,
}
