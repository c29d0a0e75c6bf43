//! Damage resolution.

use rampart_core::constants::MIN_DAMAGE;
use rampart_core::enums::DamageType;
use rampart_core::events::CombatEvent;
use rampart_core::types::{EnemyId, Vec2};

use crate::context::CombatContext;
use crate::spatial::SpatialHash;
use crate::systems::projectile::PendingHit;

/// What a single damage application did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The target was not live; nothing happened.
    Ignored,
    Damaged { dealt: i32, remaining: i32 },
    Killed { dealt: i32, reward: u32 },
}

/// Absorbs f32 representation error in configured resistances (0.6 is stored
/// as 0.6000000238) so the floor lands on the exact product.
const FLOOR_EPSILON: f64 = 1e-3;

/// Damage left after resistance: `max(1, floor(raw * (1 - resistance)))`.
pub fn resolve_damage(raw: i32, resistance: f32) -> i32 {
    let actual = (raw as f64 * (1.0 - resistance as f64) + FLOOR_EPSILON).floor() as i32;
    actual.max(MIN_DAMAGE)
}

/// Apply one hit to `target`. A kill pays the reward, decrements the live
/// count and returns the instance to the pool.
pub fn apply_damage(
    ctx: &mut CombatContext<'_>,
    target: EnemyId,
    raw: i32,
    damage_type: DamageType,
) -> DamageOutcome {
    let Some(enemy) = ctx.pool.get_mut(target) else {
        return DamageOutcome::Ignored;
    };

    let dealt = resolve_damage(raw, enemy.resistance_for(damage_type));
    enemy.health = (enemy.health - dealt).max(0);
    if enemy.health > 0 {
        return DamageOutcome::Damaged {
            dealt,
            remaining: enemy.health,
        };
    }

    let (kind, reward) = (enemy.kind, enemy.currency_reward);
    ctx.economy.earn(reward);
    ctx.on_enemy_defeated();
    ctx.pool.release(target);
    ctx.events.push(CombatEvent::EnemyDefeated {
        id: target,
        kind,
        reward,
    });
    tracing::debug!(%target, ?kind, reward, "enemy defeated");
    DamageOutcome::Killed { dealt, reward }
}

/// Every live enemy within `radius` of `center`, boundary inclusive, as seen
/// by this tick's spatial index. Enemies killed earlier in the tick are
/// dropped by the pool lookup.
pub fn splash_victims(
    ctx: &CombatContext<'_>,
    spatial: &SpatialHash,
    center: Vec2,
    radius: f32,
) -> Vec<EnemyId> {
    spatial
        .query_radius(center, radius)
        .into_iter()
        .filter(|&(id, _)| ctx.pool.is_live(id))
        .map(|(id, _)| id)
        .collect()
}

/// Apply the hits queued by the projectile pass, in queue order.
pub fn run(ctx: &mut CombatContext<'_>, spatial: &SpatialHash, hits: &mut Vec<PendingHit>) {
    for hit in hits.drain(..) {
        match hit {
            PendingHit::Single {
                target,
                damage,
                damage_type,
            } => {
                let outcome = apply_damage(ctx, target, damage, damage_type);
                let (dealt, killed) = match outcome {
                    DamageOutcome::Ignored => continue,
                    DamageOutcome::Damaged { dealt, .. } => (dealt, false),
                    DamageOutcome::Killed { dealt, .. } => (dealt, true),
                };
                ctx.events.push(CombatEvent::HitResolved {
                    target,
                    damage: dealt,
                    killed,
                });
            }
            PendingHit::Splash {
                center,
                radius,
                damage,
                damage_type,
            } => {
                let victims = splash_victims(ctx, spatial, center, radius);
                for &victim in &victims {
                    apply_damage(ctx, victim, damage, damage_type);
                }
                ctx.events.push(CombatEvent::SplashResolved {
                    center,
                    radius,
                    victims,
                });
            }
        }
    }
}
