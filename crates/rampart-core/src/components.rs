//! Entity components.
//!
//! Components are plain data structs with no game logic; systems in
//! `rampart-sim` own the behavior. Towers and projectiles live in a hecs
//! world next to a `Transform`; enemies live in the pool arena.

use serde::{Deserialize, Serialize};

use crate::config::ProjectileSpec;
use crate::enums::{DamageType, EnemyKind, TowerKind};
use crate::types::{EnemyId, Vec2};

/// Where an enemy is along its assigned path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathProgress {
    /// Index into the level's path list.
    pub path: usize,
    /// Index of the waypoint the enemy is currently walking toward.
    pub waypoint: usize,
}

/// Combat state of a pooled enemy instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub position: Vec2,
    /// At most one path assignment; `None` means the enemy stands still.
    pub path: Option<PathProgress>,
    /// Never negative at rest.
    pub health: i32,
    pub max_health: i32,
    /// Fraction in [0, 0.9].
    pub physical_resistance: f32,
    /// Fraction in [0, 0.9].
    pub magic_resistance: f32,
    pub can_fly: bool,
    pub move_speed: f32,
    pub currency_reward: u32,
}

impl Enemy {
    /// A blank instance as created by the pool before its first activation.
    pub fn dormant(kind: EnemyKind) -> Self {
        Self {
            kind,
            position: Vec2::ZERO,
            path: None,
            health: 0,
            max_health: 0,
            physical_resistance: 0.0,
            magic_resistance: 0.0,
            can_fly: false,
            move_speed: 0.0,
            currency_reward: 0,
        }
    }

    pub fn resistance_for(&self, damage_type: DamageType) -> f32 {
        match damage_type {
            DamageType::Physical => self.physical_resistance,
            DamageType::Magic => self.magic_resistance,
        }
    }
}

/// A built tower. Position lives in the entity's `Transform`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    pub kind: TowerKind,
    pub range: f32,
    /// Attacks per second.
    pub attack_rate: f32,
    pub damage: i32,
    pub damage_type: DamageType,
    pub can_target_flying: bool,
    pub projectile: ProjectileSpec,
    /// Weak reference: resolved through the pool every tick.
    pub target: Option<EnemyId>,
    /// Simulation time at which the next attack may fire.
    pub next_attack_secs: f64,
    /// Cleared by the level-end sweep.
    pub enabled: bool,
    /// Build node this tower occupies, if it was built on one.
    pub node: Option<usize>,
}

/// A projectile in flight. Position lives in the entity's `Transform`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub source: TowerKind,
    pub damage: i32,
    pub damage_type: DamageType,
    /// Weak reference to the enemy this projectile was fired at.
    pub target: Option<EnemyId>,
    pub elapsed_secs: f32,
    /// Safety bound: the projectile is removed once this much time has passed.
    pub lifetime_secs: f32,
    pub motion: ProjectileMotion,
}

/// Model-specific kinematic state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum ProjectileMotion {
    /// Straight pursuit of the live target; flies on to the last known point
    /// once the target is gone and fizzles there.
    Linear {
        speed: f32,
        last_known: Vec2,
        target_lost: bool,
    },
    /// Pursuit with a small random drift and a continuously updated facing.
    Homing {
        speed: f32,
        last_known: Vec2,
        target_lost: bool,
    },
    /// High-speed pursuit with no lost-target mode.
    Direct { speed: f32 },
    /// Half-sine arc from the launch point to the target point, resolving as
    /// an area hit.
    Arcing {
        speed: f32,
        start: Vec2,
        target_point: Vec2,
        journey_length: f32,
        arc_height: f32,
        splash_radius: f32,
        target_lost: bool,
    },
}
