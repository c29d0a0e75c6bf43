//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Buildable tower kinds. Each kind fixes its damage type, its flying-target
/// eligibility and the projectile model it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    Arrow,
    Cannon,
    Magic,
    Sniper,
}

impl TowerKind {
    pub const ALL: [TowerKind; 4] = [
        TowerKind::Arrow,
        TowerKind::Cannon,
        TowerKind::Magic,
        TowerKind::Sniper,
    ];

    pub fn damage_type(self) -> DamageType {
        match self {
            TowerKind::Magic => DamageType::Magic,
            TowerKind::Arrow | TowerKind::Cannon | TowerKind::Sniper => DamageType::Physical,
        }
    }

    /// Cannons lob shells along an arc and cannot hit air units.
    pub fn can_target_flying(self) -> bool {
        !matches!(self, TowerKind::Cannon)
    }
}

impl std::str::FromStr for TowerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arrow" => Ok(TowerKind::Arrow),
            "cannon" => Ok(TowerKind::Cannon),
            "magic" => Ok(TowerKind::Magic),
            "sniper" => Ok(TowerKind::Sniper),
            other => Err(format!("unknown tower kind: {other}")),
        }
    }
}

/// Enemy archetypes. Some kinds enforce minimum stats on top of their config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    DefencePhysical,
    DefencePhysicalPro,
    DefenceMagic,
    DefenceMagicPro,
    Fast,
    Fly,
    FlyPro,
    FlyMax,
    FlyFast,
}

/// Which resistance a hit is checked against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    #[default]
    Physical,
    Magic,
}

/// Game phase (top-level state of a level run).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level loaded, waiting for `StartLevel`.
    #[default]
    Ready,
    Active,
    Paused,
    Victory,
    Defeat,
}

impl GamePhase {
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::Defeat)
    }
}

/// Coarse spawner state exposed in snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnerStatus {
    #[default]
    Idle,
    /// Counting down a wave's start delay.
    WaveDelay,
    /// Emitting the units of a wave.
    SpawningWave,
    /// Final wave fully spawned, waiting for the live count to drain.
    WaitingWaveClear,
    /// Victory raised.
    Completed,
    /// Stop signal observed.
    Aborted,
    /// Spawning ended without a decision (timeout or player already dead).
    Unresolved,
}

/// Decision raised when a level run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    Victory,
    Defeat,
}
