//! Enemy path following.
//!
//! Each active enemy walks toward its current waypoint at its move speed.
//! The step is clamped so an enemy never overshoots a waypoint; arriving
//! within `WAYPOINT_ARRIVAL_EPSILON` advances to the next one. Passing the
//! last waypoint leaks the enemy: the player loses health and the instance
//! goes back to the pool.

use rampart_core::constants::WAYPOINT_ARRIVAL_EPSILON;
use rampart_core::events::CombatEvent;
use rampart_core::types::{EnemyId, Vec2};

use crate::context::CombatContext;

pub fn run(ctx: &mut CombatContext<'_>, paths: &[Vec<Vec2>], dt: f32, leaked: &mut Vec<EnemyId>) {
    leaked.clear();

    for id in ctx.pool.active_ids() {
        let Some(enemy) = ctx.pool.get_mut(id) else {
            continue;
        };
        let Some(progress) = enemy.path.as_mut() else {
            continue;
        };
        let Some(path) = paths.get(progress.path) else {
            continue;
        };
        let Some(&waypoint) = path.get(progress.waypoint) else {
            leaked.push(id);
            continue;
        };

        let to = waypoint - enemy.position;
        let step = enemy.move_speed * dt;
        enemy.position = if to.length() <= step {
            waypoint
        } else {
            enemy.position + to.normalize_or_zero() * step
        };

        if enemy.position.distance(waypoint) <= WAYPOINT_ARRIVAL_EPSILON {
            progress.waypoint += 1;
            if progress.waypoint >= path.len() {
                leaked.push(id);
            }
        }
    }

    for &id in leaked.iter() {
        let Some(enemy) = ctx.pool.get(id) else {
            continue;
        };
        let (kind, health_left) = (enemy.kind, enemy.health);
        ctx.on_enemy_reached_end();
        ctx.events.push(CombatEvent::EnemyReachedEnd {
            id,
            kind,
            health_left,
        });
        ctx.pool.release(id);
    }
}
