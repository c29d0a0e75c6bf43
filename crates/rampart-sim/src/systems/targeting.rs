//! Tower targeting and attack timing.
//!
//! Each enabled tower keeps its current target while it stays live, in range
//! and eligible; otherwise it picks the nearest eligible enemy from the
//! spatial hash. A tower with a target fires once `now` has reached its next
//! attack time, and the next attack is scheduled one interval from `now`.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use rampart_core::components::{Enemy, Tower};
use rampart_core::events::CombatEvent;
use rampart_core::types::{heading_of, EnemyId, Transform, Vec2};

use crate::context::CombatContext;
use crate::pool::EnemyPool;
use crate::spatial::SpatialHash;
use crate::world_setup;

/// Can `tower` standing at `origin` keep or take `enemy`?
pub fn is_valid_target(tower: &Tower, origin: Vec2, enemy: &Enemy) -> bool {
    (tower.can_target_flying || !enemy.can_fly) && enemy.position.distance(origin) <= tower.range
}

/// Nearest eligible enemy within range. Ties keep the first candidate in
/// spatial-hash order.
pub fn acquire_target(
    tower: &Tower,
    origin: Vec2,
    pool: &EnemyPool,
    spatial: &SpatialHash,
) -> Option<EnemyId> {
    let mut best: Option<(EnemyId, f32)> = None;
    for (id, _) in spatial.query_radius(origin, tower.range) {
        let Some(enemy) = pool.get(id) else {
            continue;
        };
        if !is_valid_target(tower, origin, enemy) {
            continue;
        }
        let distance = enemy.position.distance(origin);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((id, distance));
        }
    }
    best.map(|(id, _)| id)
}

pub fn run(
    world: &mut World,
    ctx: &mut CombatContext<'_>,
    spatial: &SpatialHash,
    rng: &mut ChaCha8Rng,
    now: f64,
) {
    let mut shots: Vec<(Tower, Vec2, EnemyId)> = Vec::new();

    for (_entity, (transform, tower)) in world.query_mut::<(&mut Transform, &mut Tower)>() {
        if !tower.enabled {
            continue;
        }
        let origin = transform.position;

        let keep = tower
            .target
            .and_then(|id| ctx.pool.get(id))
            .is_some_and(|enemy| is_valid_target(tower, origin, enemy));
        if !keep {
            tower.target = acquire_target(tower, origin, ctx.pool, spatial);
        }

        let Some(target) = tower.target else {
            continue;
        };
        if let Some(enemy) = ctx.pool.get(target) {
            transform.facing = heading_of(enemy.position - origin);
        }
        if now >= tower.next_attack_secs {
            tower.next_attack_secs = now + 1.0 / tower.attack_rate as f64;
            shots.push((tower.clone(), origin, target));
        }
    }

    for (tower, origin, target) in shots {
        if world_setup::spawn_projectile(world, rng, ctx.pool, &tower, origin, target).is_some() {
            ctx.run.projectiles_fired += 1;
            ctx.events.push(CombatEvent::ProjectileFired {
                source: tower.kind,
                target,
            });
        }
    }
}
