//! Combat simulation for RAMPART.
//!
//! Owns the hecs world of towers and projectiles, the pooled enemies and the
//! wave spawner, runs the combat systems at a fixed tick rate, and produces
//! `GameStateSnapshot`s for the frontend.

pub mod context;
pub mod economy;
pub mod engine;
pub mod pool;
pub mod scenario;
pub mod spatial;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use rampart_core as core;

#[cfg(test)]
mod tests;
