//! Wave spawner: an explicit state machine driven by simulation time.
//!
//! Every wait is an absolute deadline, so unit spacing stays exact no matter
//! how the tick length lines up with the configured intervals. Several
//! deadlines that fall inside one tick are all processed in that tick, each
//! spawn stamped with its scheduled time.

use rampart_core::components::PathProgress;
use rampart_core::config::{EnemyCatalog, EnemyConfig, LevelConfig, SpawnEntry};
use rampart_core::constants::{WAVE_CLEAR_REPORT_INTERVAL_SECS, WAVE_CLEAR_TIMEOUT_SECS};
use rampart_core::enums::{LevelOutcome, SpawnerStatus};
use rampart_core::events::CombatEvent;

use crate::context::CombatContext;
use crate::world_setup;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnerState {
    Idle,
    /// Waiting out a wave's start delay.
    WaveDelay { wave: usize, until: f64 },
    /// Emitting the units of `entry`; the next one is due at `next_at`.
    Spawning {
        wave: usize,
        entry: usize,
        spawned: u32,
        next_at: f64,
    },
    /// All waves spawned; waiting for the live count to drain. No decision
    /// is made before `since`, the end of the last unit's trailing interval.
    WaitingClear { since: f64, last_report: f64 },
    Completed,
    Aborted,
    Unresolved,
}

#[derive(Debug, Clone)]
pub struct WaveSpawner {
    state: SpawnerState,
}

impl Default for WaveSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveSpawner {
    pub fn new() -> Self {
        Self {
            state: SpawnerState::Idle,
        }
    }

    pub fn state(&self) -> SpawnerState {
        self.state
    }

    pub fn status(&self) -> SpawnerStatus {
        match self.state {
            SpawnerState::Idle => SpawnerStatus::Idle,
            SpawnerState::WaveDelay { .. } => SpawnerStatus::WaveDelay,
            SpawnerState::Spawning { .. } => SpawnerStatus::SpawningWave,
            SpawnerState::WaitingClear { .. } => SpawnerStatus::WaitingWaveClear,
            SpawnerState::Completed => SpawnerStatus::Completed,
            SpawnerState::Aborted => SpawnerStatus::Aborted,
            SpawnerState::Unresolved => SpawnerStatus::Unresolved,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            SpawnerState::Completed | SpawnerState::Aborted | SpawnerState::Unresolved
        )
    }

    /// Leave `Idle` and schedule the first wave. Has no effect once started.
    pub fn start(&mut self, now: f64, level: &LevelConfig) {
        if self.state != SpawnerState::Idle {
            return;
        }
        self.state = match level.waves.first() {
            Some(first) => SpawnerState::WaveDelay {
                wave: 0,
                until: now + first.start_delay_secs,
            },
            None => {
                tracing::warn!(level = level.id, "level has no waves; nothing to spawn");
                SpawnerState::Unresolved
            }
        };
    }

    /// Process every deadline that is due at `now`. Returns the victory
    /// decision on the tick the final wave clears.
    pub fn advance(
        &mut self,
        now: f64,
        ctx: &mut CombatContext<'_>,
        level: &LevelConfig,
        enemies: &EnemyCatalog,
    ) -> Option<LevelOutcome> {
        loop {
            if ctx.run.stop_requested && !self.is_finished() && self.state != SpawnerState::Idle {
                tracing::info!(wave = ctx.run.current_wave, "spawning stopped");
                ctx.events.push(CombatEvent::SpawningStopped);
                self.state = SpawnerState::Aborted;
                return None;
            }

            match self.state {
                SpawnerState::Idle
                | SpawnerState::Completed
                | SpawnerState::Aborted
                | SpawnerState::Unresolved => return None,

                SpawnerState::WaveDelay { wave, until } => {
                    if now < until {
                        return None;
                    }
                    let enemy_count = level.waves[wave].enemy_count();
                    ctx.run.current_wave = wave + 1;
                    ctx.events.push(CombatEvent::WaveStarted {
                        wave: wave + 1,
                        enemies: enemy_count,
                    });
                    tracing::info!(wave = wave + 1, enemies = enemy_count, "wave started");
                    self.state = begin_entry(wave, 0, until, ctx, level);
                }

                SpawnerState::Spawning {
                    wave,
                    entry,
                    spawned,
                    next_at,
                } => {
                    if now < next_at {
                        return None;
                    }
                    let spawn = &level.waves[wave].entries[entry];
                    spawn_unit(spawn, next_at, ctx, level, enemies);

                    let spawned = spawned + 1;
                    let next_at = next_at + spawn.interval_secs;
                    self.state = if spawned < spawn.count {
                        SpawnerState::Spawning {
                            wave,
                            entry,
                            spawned,
                            next_at,
                        }
                    } else {
                        begin_entry(wave, entry + 1, next_at, ctx, level)
                    };
                }

                SpawnerState::WaitingClear { since, last_report } => {
                    if now < since {
                        return None;
                    }
                    if ctx.run.live_enemies <= 0 {
                        if ctx.player.is_alive() && !ctx.run.stop_requested {
                            tracing::info!(level = level.id, "all waves cleared");
                            ctx.run.level_completed = true;
                            self.state = SpawnerState::Completed;
                            return Some(LevelOutcome::Victory);
                        }
                        tracing::warn!(
                            health = ctx.player.health,
                            "waves cleared without a decision"
                        );
                        self.state = SpawnerState::Unresolved;
                        return None;
                    }
                    if now - since >= WAVE_CLEAR_TIMEOUT_SECS {
                        tracing::warn!(
                            remaining = ctx.run.live_enemies,
                            "timed out waiting for the final wave to clear"
                        );
                        ctx.events.push(CombatEvent::WaveClearTimedOut {
                            remaining: ctx.run.live_enemies,
                        });
                        self.state = SpawnerState::Unresolved;
                        return None;
                    }
                    if now - last_report >= WAVE_CLEAR_REPORT_INTERVAL_SECS {
                        tracing::debug!(
                            remaining = ctx.run.live_enemies,
                            "waiting for wave clear"
                        );
                        self.state = SpawnerState::WaitingClear {
                            since,
                            last_report: now,
                        };
                    }
                    return None;
                }
            }
        }
    }
}

/// Move to the first non-empty entry at or after `entry`, raising the live
/// counter by its whole count. Falls through to the next wave's delay, or to
/// the wave-clear wait after the last wave.
fn begin_entry(
    wave: usize,
    entry: usize,
    at: f64,
    ctx: &mut CombatContext<'_>,
    level: &LevelConfig,
) -> SpawnerState {
    let entries = &level.waves[wave].entries;
    if let Some((idx, spawn)) = entries
        .iter()
        .enumerate()
        .skip(entry)
        .find(|(_, e)| e.count > 0)
    {
        ctx.run.live_enemies += spawn.count as i32;
        ctx.events.push(CombatEvent::EntryQueued {
            wave: wave + 1,
            kind: spawn.kind,
            count: spawn.count,
        });
        return SpawnerState::Spawning {
            wave,
            entry: idx,
            spawned: 0,
            next_at: at,
        };
    }

    match level.waves.get(wave + 1) {
        Some(next) => SpawnerState::WaveDelay {
            wave: wave + 1,
            until: at + next.start_delay_secs,
        },
        None => {
            tracing::debug!(live = ctx.run.live_enemies, "final wave spawned");
            SpawnerState::WaitingClear {
                since: at,
                last_report: at,
            }
        }
    }
}

/// Activate one enemy at the head of the entry's path.
fn spawn_unit(
    spawn: &SpawnEntry,
    at: f64,
    ctx: &mut CombatContext<'_>,
    level: &LevelConfig,
    enemies: &EnemyCatalog,
) {
    let Some(start) = level.paths.get(spawn.path).and_then(|p| p.first()).copied() else {
        tracing::error!(path = spawn.path, kind = ?spawn.kind, "spawn path missing or empty");
        ctx.run.live_enemies -= 1;
        return;
    };

    let fallback;
    let config = match enemies.get(spawn.kind) {
        Some(config) => config,
        None => {
            tracing::error!(kind = ?spawn.kind, "no enemy config; using fallback stats");
            fallback = EnemyConfig::fallback(spawn.kind);
            &fallback
        }
    };

    let progress = PathProgress {
        path: spawn.path,
        waypoint: 0,
    };
    let id = world_setup::activate_enemy(ctx.pool, spawn.kind, config, start, Some(progress));
    ctx.run.spawned_total += 1;
    ctx.events.push(CombatEvent::EnemySpawned {
        id,
        kind: spawn.kind,
        path: spawn.path,
        at_secs: at,
    });
    tracing::trace!(%id, kind = ?spawn.kind, at, "enemy spawned");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::config::{TowerCatalog, WaveConfig};
    use rampart_core::enums::EnemyKind;
    use rampart_core::types::Vec2;

    use crate::context::{LevelRun, PlayerState};
    use crate::economy::Economy;
    use crate::pool::EnemyPool;

    struct Harness {
        pool: EnemyPool,
        run: LevelRun,
        economy: Economy,
        player: PlayerState,
        events: Vec<CombatEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                pool: EnemyPool::new(),
                run: LevelRun::default(),
                economy: Economy::new(0, TowerCatalog::default()),
                player: PlayerState::new(10),
                events: Vec::new(),
            }
        }

        fn advance(
            &mut self,
            spawner: &mut WaveSpawner,
            now: f64,
            level: &LevelConfig,
        ) -> Option<LevelOutcome> {
            let mut ctx = CombatContext {
                pool: &mut self.pool,
                run: &mut self.run,
                economy: &mut self.economy,
                player: &mut self.player,
                events: &mut self.events,
            };
            spawner.advance(now, &mut ctx, level, &EnemyCatalog::default())
        }

        fn spawn_times(&self) -> Vec<f64> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    CombatEvent::EnemySpawned { at_secs, .. } => Some(*at_secs),
                    _ => None,
                })
                .collect()
        }
    }

    fn entry(count: u32, interval_secs: f64) -> SpawnEntry {
        SpawnEntry {
            kind: EnemyKind::Basic,
            count,
            interval_secs,
            path: 0,
        }
    }

    fn level(waves: Vec<WaveConfig>) -> LevelConfig {
        LevelConfig {
            id: 1,
            name: String::new(),
            initial_currency: 0,
            initial_health: 10,
            waves,
            paths: vec![vec![Vec2::ZERO, Vec2::new(10.0, 0.0)]],
            build_nodes: Vec::new(),
            towers: None,
        }
    }

    fn wave(delay: f64, entries: Vec<SpawnEntry>) -> WaveConfig {
        WaveConfig {
            start_delay_secs: delay,
            entries,
        }
    }

    #[test]
    fn live_count_reflects_whole_entry_before_spawning() {
        let level = level(vec![wave(2.0, vec![entry(3, 1.0)])]);
        let mut h = Harness::new();
        let mut spawner = WaveSpawner::new();
        spawner.start(0.0, &level);

        h.advance(&mut spawner, 1.0, &level);
        assert_eq!(h.run.live_enemies, 0, "still in the start delay");
        assert_eq!(spawner.status(), SpawnerStatus::WaveDelay);

        h.advance(&mut spawner, 2.0, &level);
        assert_eq!(h.run.live_enemies, 3, "whole entry counted at wave start");
        assert_eq!(h.run.current_wave, 1);
        assert_eq!(h.pool.active_count(), 1, "first unit spawns on entry start");
    }

    #[test]
    fn units_are_spaced_by_interval() {
        let level = level(vec![wave(0.0, vec![entry(3, 1.0)])]);
        let mut h = Harness::new();
        let mut spawner = WaveSpawner::new();
        spawner.start(0.0, &level);

        let mut t = 0.0;
        while t <= 5.0 {
            h.advance(&mut spawner, t, &level);
            t += 0.1;
        }
        let times = h.spawn_times();
        assert_eq!(times.len(), 3);
        assert_eq!(times, vec![0.0, 1.0, 2.0], "scheduled times are exact");
        assert_eq!(h.pool.active_count(), 3);
    }

    #[test]
    fn one_large_step_catches_up_every_deadline() {
        let level = level(vec![wave(1.0, vec![entry(4, 0.5)])]);
        let mut h = Harness::new();
        let mut spawner = WaveSpawner::new();
        spawner.start(0.0, &level);

        h.advance(&mut spawner, 10.0, &level);
        assert_eq!(h.spawn_times(), vec![1.0, 1.5, 2.0, 2.5]);
        assert_eq!(spawner.status(), SpawnerStatus::WaitingWaveClear);
    }

    #[test]
    fn next_entry_waits_out_the_trailing_interval() {
        let level = level(vec![wave(0.0, vec![entry(1, 3.0), entry(1, 1.0)])]);
        let mut h = Harness::new();
        let mut spawner = WaveSpawner::new();
        spawner.start(0.0, &level);
        h.advance(&mut spawner, 10.0, &level);
        assert_eq!(h.spawn_times(), vec![0.0, 3.0]);
    }

    #[test]
    fn zero_count_entries_are_skipped() {
        let level = level(vec![wave(0.0, vec![entry(0, 5.0), entry(2, 1.0)])]);
        let mut h = Harness::new();
        let mut spawner = WaveSpawner::new();
        spawner.start(0.0, &level);
        h.advance(&mut spawner, 0.0, &level);
        assert_eq!(h.run.live_enemies, 2);
        assert_eq!(h.spawn_times(), vec![0.0]);
    }

    #[test]
    fn victory_raised_once_after_final_clear() {
        let level = level(vec![wave(0.0, vec![entry(1, 0.0)])]);
        let mut h = Harness::new();
        let mut spawner = WaveSpawner::new();
        spawner.start(0.0, &level);
        assert_eq!(h.advance(&mut spawner, 0.0, &level), None);
        assert_eq!(spawner.status(), SpawnerStatus::WaitingWaveClear);

        // Simulate the enemy dying.
        let id = h.pool.active_ids()[0];
        h.pool.release(id);
        h.run.live_enemies -= 1;

        assert_eq!(
            h.advance(&mut spawner, 1.0, &level),
            Some(LevelOutcome::Victory)
        );
        assert!(h.run.level_completed);
        assert_eq!(h.advance(&mut spawner, 2.0, &level), None, "raised only once");
        assert_eq!(spawner.status(), SpawnerStatus::Completed);
    }

    #[test]
    fn victory_waits_out_the_final_interval() {
        let level = level(vec![wave(0.0, vec![entry(1, 5.0)])]);
        let mut h = Harness::new();
        let mut spawner = WaveSpawner::new();
        spawner.start(0.0, &level);
        h.advance(&mut spawner, 0.0, &level);

        let id = h.pool.active_ids()[0];
        h.pool.release(id);
        h.run.live_enemies -= 1;

        assert_eq!(h.advance(&mut spawner, 0.1, &level), None);
        assert_eq!(h.advance(&mut spawner, 4.9, &level), None);
        assert!(!h.run.level_completed, "still inside the trailing interval");
        assert_eq!(
            h.advance(&mut spawner, 5.0, &level),
            Some(LevelOutcome::Victory)
        );
    }

    #[test]
    fn dead_player_gets_no_victory() {
        let level = level(vec![wave(0.0, vec![entry(1, 0.0)])]);
        let mut h = Harness::new();
        let mut spawner = WaveSpawner::new();
        spawner.start(0.0, &level);
        h.advance(&mut spawner, 0.0, &level);
        h.run.live_enemies = 0;
        h.player.health = 0;

        assert_eq!(h.advance(&mut spawner, 1.0, &level), None);
        assert_eq!(spawner.status(), SpawnerStatus::Unresolved);
    }

    #[test]
    fn stop_signal_aborts_mid_wave() {
        let level = level(vec![wave(0.0, vec![entry(5, 1.0)]), wave(1.0, vec![entry(5, 1.0)])]);
        let mut h = Harness::new();
        let mut spawner = WaveSpawner::new();
        spawner.start(0.0, &level);
        h.advance(&mut spawner, 1.0, &level);
        assert_eq!(h.spawn_times().len(), 2);

        h.run.stop_spawning();
        h.run.stop_spawning();
        h.advance(&mut spawner, 30.0, &level);
        h.advance(&mut spawner, 31.0, &level);

        assert_eq!(spawner.status(), SpawnerStatus::Aborted);
        assert_eq!(h.spawn_times().len(), 2, "no spawns after the stop signal");
        let stops = h
            .events
            .iter()
            .filter(|e| matches!(e, CombatEvent::SpawningStopped))
            .count();
        assert_eq!(stops, 1, "cancellation happens exactly once");
        assert_eq!(h.pool.active_count(), 2, "already-spawned enemies are untouched");
    }

    #[test]
    fn stop_signal_aborts_wave_clear_wait() {
        let level = level(vec![wave(0.0, vec![entry(1, 0.0)])]);
        let mut h = Harness::new();
        let mut spawner = WaveSpawner::new();
        spawner.start(0.0, &level);
        h.advance(&mut spawner, 0.0, &level);
        h.run.stop_spawning();
        h.run.live_enemies = 0;
        assert_eq!(h.advance(&mut spawner, 1.0, &level), None);
        assert_eq!(spawner.status(), SpawnerStatus::Aborted);
    }

    #[test]
    fn wave_clear_times_out() {
        let level = level(vec![wave(0.0, vec![entry(1, 0.0)])]);
        let mut h = Harness::new();
        let mut spawner = WaveSpawner::new();
        spawner.start(0.0, &level);
        h.advance(&mut spawner, 0.0, &level);

        h.advance(&mut spawner, WAVE_CLEAR_TIMEOUT_SECS - 1.0, &level);
        assert_eq!(spawner.status(), SpawnerStatus::WaitingWaveClear);
        h.advance(&mut spawner, WAVE_CLEAR_TIMEOUT_SECS, &level);
        assert_eq!(spawner.status(), SpawnerStatus::Unresolved);
        assert!(h
            .events
            .contains(&CombatEvent::WaveClearTimedOut { remaining: 1 }));
    }

    #[test]
    fn invalid_path_is_not_counted_live() {
        let mut level = level(vec![wave(0.0, vec![entry(2, 0.0)])]);
        level.waves[0].entries[0].path = 7;
        let mut h = Harness::new();
        let mut spawner = WaveSpawner::new();
        spawner.start(0.0, &level);
        h.advance(&mut spawner, 0.0, &level);
        assert_eq!(h.pool.active_count(), 0);
        assert_eq!(h.run.live_enemies, 0, "failed spawns give back their count");
    }

    #[test]
    fn missing_enemy_config_uses_fallback() {
        let level = level(vec![wave(0.0, vec![entry(1, 0.0)])]);
        let mut h = Harness::new();
        let mut spawner = WaveSpawner::new();
        spawner.start(0.0, &level);
        h.advance(&mut spawner, 0.0, &level);
        let id = h.pool.active_ids()[0];
        let enemy = h.pool.get(id).unwrap();
        assert_eq!(enemy.health, rampart_core::constants::FALLBACK_ENEMY_HEALTH);
        assert_eq!(enemy.position, Vec2::ZERO, "placed at the first waypoint");
    }
}
