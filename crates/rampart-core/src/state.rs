//! Game state snapshot: the complete visible state sent to the frontend each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::CombatEvent;
use crate::types::{EnemyId, SimTime, Vec2};

/// Complete game state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub level_id: u32,
    pub currency: u32,
    pub health: i32,
    pub waves: WaveView,
    pub enemies: Vec<EnemyView>,
    pub towers: Vec<TowerView>,
    pub projectiles: Vec<ProjectileView>,
    pub build_nodes: Vec<BuildNodeView>,
    pub events: Vec<CombatEvent>,
    pub score: ScoreView,
}

/// Spawner progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    /// Number of waves started so far.
    pub current: usize,
    pub total: usize,
    /// Live-enemy counter (promised minus removed).
    pub live_enemies: i32,
    pub status: SpawnerStatus,
}

/// An active enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub position: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub flying: bool,
}

/// A built tower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerView {
    pub kind: TowerKind,
    pub position: Vec2,
    pub range: f32,
    pub target: Option<EnemyId>,
    pub enabled: bool,
}

/// A projectile in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub source: TowerKind,
    pub position: Vec2,
    pub facing: f32,
}

/// A build node and whether it can still take a tower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildNodeView {
    pub position: Vec2,
    pub occupied: bool,
    pub enabled: bool,
}

/// Running score for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub enemies_spawned: u32,
    pub enemies_defeated: u32,
    pub enemies_leaked: u32,
    pub towers_built: u32,
    pub projectiles_fired: u32,
    /// Star rating, only meaningful once the level has ended.
    pub stars: u8,
}
