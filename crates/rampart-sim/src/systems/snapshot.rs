//! Snapshot system: builds a `GameStateSnapshot` from the world and pool.
//!
//! Read-only; never modifies simulation state.

use hecs::World;

use rampart_core::components::{Projectile, Tower};
use rampart_core::enums::GamePhase;
use rampart_core::events::CombatEvent;
use rampart_core::state::*;
use rampart_core::types::{SimTime, Transform};

use crate::context::{LevelRun, PlayerState};
use crate::engine::BuildNode;
use crate::pool::EnemyPool;

pub struct SnapshotInput<'a> {
    pub world: &'a World,
    pub pool: &'a EnemyPool,
    pub time: SimTime,
    pub phase: GamePhase,
    pub level_id: u32,
    pub currency: u32,
    pub player: &'a PlayerState,
    pub run: &'a LevelRun,
    pub waves: WaveView,
    pub build_nodes: &'a [BuildNode],
    pub stars: u8,
}

pub fn build_snapshot(input: SnapshotInput<'_>, events: Vec<CombatEvent>) -> GameStateSnapshot {
    GameStateSnapshot {
        time: input.time,
        phase: input.phase,
        level_id: input.level_id,
        currency: input.currency,
        health: input.player.health,
        waves: input.waves,
        enemies: build_enemies(input.pool),
        towers: build_towers(input.world, input.pool),
        projectiles: build_projectiles(input.world),
        build_nodes: input
            .build_nodes
            .iter()
            .map(|node| BuildNodeView {
                position: node.position,
                occupied: node.occupied,
                enabled: node.enabled,
            })
            .collect(),
        events,
        score: ScoreView {
            enemies_spawned: input.run.spawned_total,
            enemies_defeated: input.run.defeated_total,
            enemies_leaked: input.run.reached_end_total,
            towers_built: input.run.towers_built,
            projectiles_fired: input.run.projectiles_fired,
            stars: input.stars,
        },
    }
}

fn build_enemies(pool: &EnemyPool) -> Vec<EnemyView> {
    pool.iter_active()
        .map(|(id, enemy)| EnemyView {
            id,
            kind: enemy.kind,
            position: enemy.position,
            health: enemy.health,
            max_health: enemy.max_health,
            flying: enemy.can_fly,
        })
        .collect()
}

/// Towers sorted by position for a stable order. A target killed after
/// targeting ran this tick is reported as none.
fn build_towers(world: &World, pool: &EnemyPool) -> Vec<TowerView> {
    let mut towers: Vec<TowerView> = world
        .query::<(&Transform, &Tower)>()
        .iter()
        .map(|(_, (transform, tower))| TowerView {
            kind: tower.kind,
            position: transform.position,
            range: tower.range,
            target: tower.target.filter(|id| pool.is_live(*id)),
            enabled: tower.enabled,
        })
        .collect();
    towers.sort_by(|a, b| {
        a.position
            .x
            .total_cmp(&b.position.x)
            .then(a.position.y.total_cmp(&b.position.y))
    });
    towers
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    world
        .query::<(&Transform, &Projectile)>()
        .iter()
        .map(|(_, (transform, projectile))| ProjectileView {
            source: projectile.source,
            position: transform.position,
            facing: transform.facing,
        })
        .collect()
}
