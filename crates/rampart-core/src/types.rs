//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Stable handle to a slot in the enemy pool.
///
/// The generation is bumped every time the slot is returned to the pool, so a
/// handle held by a tower or projectile stops resolving as soon as the enemy it
/// named dies or leaks, even if the slot is immediately reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyId {
    pub index: u32,
    pub generation: u32,
}

impl EnemyId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl std::fmt::Display for EnemyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{}g{}", self.index, self.generation)
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of arbitrary length (variable frame step).
    pub fn advance_by(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt.max(0.0);
    }
}

/// Position and facing of a hecs entity (towers and projectiles).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    /// Facing angle in radians, counter-clockwise from +x.
    pub facing: f32,
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            facing: 0.0,
        }
    }
}

/// Angle of a direction vector in radians (0 = +x, counter-clockwise).
pub fn heading_of(direction: Vec2) -> f32 {
    direction.y.atan2(direction.x)
}
