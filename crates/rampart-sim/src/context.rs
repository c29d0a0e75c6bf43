//! Shared run state handed to the combat systems each tick.
//!
//! Nothing here is global: the engine owns one of each and lends them to the
//! systems through `CombatContext`.

use rampart_core::constants::LEAK_DAMAGE;
use rampart_core::events::CombatEvent;

use crate::economy::Economy;
use crate::pool::EnemyPool;

/// Progress and counters of the current level run.
#[derive(Debug, Clone, Default)]
pub struct LevelRun {
    /// Number of waves started so far.
    pub current_wave: usize,
    /// Enemies promised by started spawn entries minus enemies removed by
    /// defeat or leaking. Can briefly go negative when a removal races an
    /// entry that was never fully spawned.
    pub live_enemies: i32,
    pub stop_requested: bool,
    pub level_completed: bool,
    pub spawned_total: u32,
    pub defeated_total: u32,
    pub reached_end_total: u32,
    pub towers_built: u32,
    pub projectiles_fired: u32,
}

impl LevelRun {
    /// Ask the spawner to stop at its next checkpoint. Idempotent.
    pub fn stop_spawning(&mut self) {
        if !self.stop_requested {
            tracing::debug!("stop spawning requested");
        }
        self.stop_requested = true;
    }
}

/// The player's base.
#[derive(Debug, Clone, Copy)]
pub struct PlayerState {
    pub health: i32,
    pub initial_health: i32,
}

impl PlayerState {
    pub fn new(initial_health: i32) -> Self {
        Self {
            health: initial_health,
            initial_health,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Mutable borrows of everything a combat system may touch outside the ECS
/// world.
pub struct CombatContext<'a> {
    pub pool: &'a mut EnemyPool,
    pub run: &'a mut LevelRun,
    pub economy: &'a mut Economy,
    pub player: &'a mut PlayerState,
    pub events: &'a mut Vec<CombatEvent>,
}

impl CombatContext<'_> {
    /// An enemy walked off the end of its path.
    pub fn on_enemy_reached_end(&mut self) {
        self.run.live_enemies -= 1;
        self.run.reached_end_total += 1;
        self.player.health -= LEAK_DAMAGE;
        tracing::debug!(
            health = self.player.health,
            live = self.run.live_enemies,
            "enemy reached the end"
        );
    }

    /// An enemy's health reached zero.
    pub fn on_enemy_defeated(&mut self) {
        self.run.live_enemies -= 1;
        self.run.defeated_total += 1;
    }
}
