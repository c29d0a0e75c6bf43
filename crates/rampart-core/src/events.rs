//! Events emitted by the simulation for UI, audio and log consumers.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::error::BuildError;
use crate::types::{EnemyId, Vec2};

/// Something observable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    /// A wave's start delay elapsed; `wave` is 1-based.
    WaveStarted { wave: usize, enemies: u32 },
    /// The live counter was raised for a whole spawn entry.
    EntryQueued { wave: usize, kind: EnemyKind, count: u32 },
    /// An enemy was activated at the head of its path. `at_secs` is the
    /// scheduled spawn time.
    EnemySpawned {
        id: EnemyId,
        kind: EnemyKind,
        path: usize,
        at_secs: f64,
    },
    EnemyDefeated {
        id: EnemyId,
        kind: EnemyKind,
        reward: u32,
    },
    EnemyReachedEnd {
        id: EnemyId,
        kind: EnemyKind,
        health_left: i32,
    },
    TowerBuilt {
        kind: TowerKind,
        position: Vec2,
        node: Option<usize>,
        cost: u32,
    },
    BuildRejected { kind: TowerKind, reason: BuildError },
    ProjectileFired { source: TowerKind, target: EnemyId },
    /// A single-target hit landed.
    HitResolved {
        target: EnemyId,
        damage: i32,
        killed: bool,
    },
    /// An area hit landed; `victims` may be empty.
    SplashResolved {
        center: Vec2,
        radius: f32,
        victims: Vec<EnemyId>,
    },
    /// The spawner observed the stop signal.
    SpawningStopped,
    /// The final wave did not clear within the timeout.
    WaveClearTimedOut { remaining: i32 },
    LevelEnded { outcome: LevelOutcome, stars: u8 },
}
