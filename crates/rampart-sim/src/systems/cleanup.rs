//! Cleanup: despawns finished projectiles and runs the level-end sweep.

use hecs::{Entity, World};

use rampart_core::components::Tower;

use crate::pool::EnemyPool;

/// Despawn every entity queued in `despawn_buffer` this tick.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Disable all combat once a level has ended: every active enemy goes back to
/// the pool (counters untouched) and every tower stops acting. Projectiles
/// already in flight are left to expire on their own.
pub fn level_end_sweep(world: &mut World, pool: &mut EnemyPool) -> usize {
    let ids = pool.active_ids();
    for &id in &ids {
        pool.release(id);
    }
    for (_entity, tower) in world.query_mut::<&mut Tower>() {
        tower.enabled = false;
        tower.target = None;
    }
    tracing::debug!(released = ids.len(), "level-end sweep");
    ids.len()
}
