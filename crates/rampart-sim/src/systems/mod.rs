//! Combat systems run by the engine each tick.
//!
//! Systems are plain functions over the hecs world and the `CombatContext`.
//! They do not own state; the engine holds it and calls them in a fixed
//! order.

pub mod cleanup;
pub mod damage;
pub mod movement;
pub mod projectile;
pub mod snapshot;
pub mod targeting;
pub mod wave_spawner;
