//! Spawn factories for enemies, towers and projectiles.
//!
//! Towers and projectiles are hecs entities carrying a `Transform`; enemies
//! are pooled instances activated in place.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rampart_core::components::*;
use rampart_core::config::{EnemyConfig, ProjectileSpec, TowerSpec};
use rampart_core::enums::EnemyKind;
use rampart_core::types::{heading_of, EnemyId, Transform, Vec2};

use crate::pool::EnemyPool;

/// Take a pooled instance of `kind` and activate it with the kind's effective
/// stats at `position`. Health starts full.
pub fn activate_enemy(
    pool: &mut EnemyPool,
    kind: EnemyKind,
    config: &EnemyConfig,
    position: Vec2,
    path: Option<PathProgress>,
) -> EnemyId {
    let stats = config.effective();
    let id = pool.acquire(kind);
    if let Some(enemy) = pool.get_mut(id) {
        enemy.position = position;
        enemy.path = path;
        enemy.health = stats.max_health;
        enemy.max_health = stats.max_health;
        enemy.physical_resistance = stats.physical_resistance;
        enemy.magic_resistance = stats.magic_resistance;
        enemy.can_fly = stats.can_fly;
        enemy.move_speed = stats.move_speed;
        enemy.currency_reward = stats.currency_reward;
    }
    id
}

/// Place a tower with the stats of `spec`. Cost is handled by the economy.
pub fn spawn_tower(
    world: &mut World,
    spec: &TowerSpec,
    position: Vec2,
    node: Option<usize>,
) -> hecs::Entity {
    let tower = Tower {
        kind: spec.kind,
        range: spec.range,
        attack_rate: spec.attack_rate,
        damage: spec.damage,
        damage_type: spec.kind.damage_type(),
        can_target_flying: spec.kind.can_target_flying(),
        projectile: spec.projectile,
        target: None,
        next_attack_secs: 0.0,
        enabled: true,
        node,
    };
    world.spawn((Transform::at(position), tower))
}

/// Fire a projectile from `origin` at `target`. Returns `None` without
/// spawning anything when the target is no longer live.
pub fn spawn_projectile(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    pool: &EnemyPool,
    tower: &Tower,
    origin: Vec2,
    target: EnemyId,
) -> Option<hecs::Entity> {
    let target_pos = pool.get(target)?.position;
    let to_target = target_pos - origin;

    let (motion, facing) = match tower.projectile {
        ProjectileSpec::Arrow { speed, .. } => (
            ProjectileMotion::Linear {
                speed,
                last_known: target_pos,
                target_lost: false,
            },
            heading_of(to_target),
        ),
        ProjectileSpec::Magic { speed, .. } => (
            ProjectileMotion::Homing {
                speed,
                last_known: target_pos,
                target_lost: false,
            },
            rng.gen_range(0.0..std::f32::consts::TAU),
        ),
        ProjectileSpec::Sniper { speed, .. } => {
            (ProjectileMotion::Direct { speed }, heading_of(to_target))
        }
        ProjectileSpec::Cannon {
            speed,
            arc_height,
            splash_radius,
            ..
        } => (
            ProjectileMotion::Arcing {
                speed,
                start: origin,
                target_point: target_pos,
                journey_length: to_target.length(),
                arc_height,
                splash_radius,
                target_lost: false,
            },
            heading_of(Vec2::new(to_target.x, arc_height)),
        ),
    };

    let projectile = Projectile {
        source: tower.kind,
        damage: tower.damage,
        damage_type: tower.damage_type,
        target: Some(target),
        elapsed_secs: 0.0,
        lifetime_secs: tower.projectile.lifetime_secs(),
        motion,
    };

    Some(world.spawn((
        Transform {
            position: origin,
            facing,
        },
        projectile,
    )))
}
