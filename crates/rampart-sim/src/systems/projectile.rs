//! Projectile motion models.
//!
//! Every projectile ages first and is removed once its lifetime runs out.
//! Survivors move according to their model and, on arrival, queue a
//! `PendingHit` for the damage pass. A projectile that arrives or fizzles is
//! queued for despawn in the same tick.

use std::f32::consts::PI;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rampart_core::components::{Projectile, ProjectileMotion};
use rampart_core::constants::{MAGIC_JITTER, MIN_JOURNEY_LENGTH};
use rampart_core::enums::DamageType;
use rampart_core::types::{heading_of, EnemyId, Transform, Vec2};

use crate::pool::EnemyPool;

/// A hit waiting to be applied by the damage pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingHit {
    Single {
        target: EnemyId,
        damage: i32,
        damage_type: DamageType,
    },
    Splash {
        center: Vec2,
        radius: f32,
        damage: i32,
        damage_type: DamageType,
    },
}

enum Step {
    Flying,
    Hit(PendingHit),
    Fizzle,
}

pub fn run(
    world: &mut World,
    pool: &EnemyPool,
    rng: &mut ChaCha8Rng,
    dt: f32,
    hits: &mut Vec<PendingHit>,
    despawn_buffer: &mut Vec<Entity>,
) {
    for (entity, (transform, projectile)) in
        world.query_mut::<(&mut Transform, &mut Projectile)>()
    {
        projectile.elapsed_secs += dt;
        if projectile.elapsed_secs >= projectile.lifetime_secs {
            despawn_buffer.push(entity);
            continue;
        }

        match step(transform, projectile, pool, rng, dt) {
            Step::Flying => {}
            Step::Hit(hit) => {
                hits.push(hit);
                despawn_buffer.push(entity);
            }
            Step::Fizzle => despawn_buffer.push(entity),
        }
    }
}

fn step(
    transform: &mut Transform,
    projectile: &mut Projectile,
    pool: &EnemyPool,
    rng: &mut ChaCha8Rng,
    dt: f32,
) -> Step {
    let live_target = projectile
        .target
        .and_then(|id| pool.get(id).map(|enemy| (id, enemy.position)));
    let single = |target: EnemyId| {
        Step::Hit(PendingHit::Single {
            target,
            damage: projectile.damage,
            damage_type: projectile.damage_type,
        })
    };

    match &mut projectile.motion {
        ProjectileMotion::Linear {
            speed,
            last_known,
            target_lost,
        } => {
            let arrived = pursue(transform, live_target, last_known, target_lost, *speed * dt);
            match (arrived, live_target) {
                (false, _) => Step::Flying,
                (true, Some((id, _))) if !*target_lost => single(id),
                (true, _) => Step::Fizzle,
            }
        }

        ProjectileMotion::Homing {
            speed,
            last_known,
            target_lost,
        } => {
            let arrived = pursue(transform, live_target, last_known, target_lost, *speed * dt);
            if !arrived {
                let jitter = MAGIC_JITTER * dt;
                transform.position += Vec2::new(
                    rng.gen_range(-jitter..=jitter),
                    rng.gen_range(-jitter..=jitter),
                );
                return Step::Flying;
            }
            match live_target {
                Some((id, _)) if !*target_lost => single(id),
                _ => Step::Fizzle,
            }
        }

        ProjectileMotion::Direct { speed } => {
            let Some((id, target_pos)) = live_target else {
                return Step::Fizzle;
            };
            let to = target_pos - transform.position;
            let travel = *speed * dt;
            if to.length() <= travel {
                transform.position = target_pos;
                return single(id);
            }
            transform.position += to.normalize_or_zero() * travel;
            transform.facing = heading_of(to);
            Step::Flying
        }

        ProjectileMotion::Arcing {
            speed,
            start,
            target_point,
            journey_length,
            arc_height,
            splash_radius,
            target_lost,
        } => {
            if !*target_lost {
                match live_target {
                    Some((_, pos)) => {
                        *target_point = pos;
                        *journey_length = (pos - *start).length();
                    }
                    None => *target_lost = true,
                }
            }

            let progress = if *journey_length < MIN_JOURNEY_LENGTH {
                1.0
            } else {
                projectile.elapsed_secs * *speed / *journey_length
            };

            if progress >= 1.0 {
                transform.position = *target_point;
                return Step::Hit(PendingHit::Splash {
                    center: *target_point,
                    radius: *splash_radius,
                    damage: projectile.damage,
                    damage_type: projectile.damage_type,
                });
            }

            transform.position =
                start.lerp(*target_point, progress) + Vec2::Y * *arc_height * (PI * progress).sin();
            transform.facing = if progress < 0.5 {
                heading_of(Vec2::new(target_point.x - start.x, *arc_height))
            } else {
                heading_of(*target_point - transform.position)
            };
            Step::Flying
        }
    }
}

/// Shared pursuit step of the linear and homing models. Tracks the live
/// target's position, switching to lost mode the first tick it is gone.
/// Returns true once the projectile reaches the aim point.
fn pursue(
    transform: &mut Transform,
    live_target: Option<(EnemyId, Vec2)>,
    last_known: &mut Vec2,
    target_lost: &mut bool,
    travel: f32,
) -> bool {
    if !*target_lost {
        match live_target {
            Some((_, pos)) => *last_known = pos,
            None => *target_lost = true,
        }
    }

    let to = *last_known - transform.position;
    if to.length() <= travel {
        transform.position = *last_known;
        return true;
    }
    transform.position += to.normalize_or_zero() * travel;
    transform.facing = heading_of(to);
    false
}
