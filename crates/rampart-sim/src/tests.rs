//! Tests for the simulation engine: tick loop, commands, combat pipeline and
//! level outcomes.

use rampart_core::commands::PlayerCommand;
use rampart_core::config::{EnemyCatalog, EnemyConfig, LevelConfig, SpawnEntry, WaveConfig};
use rampart_core::enums::*;
use rampart_core::error::BuildError;
use rampart_core::events::CombatEvent;
use rampart_core::types::Vec2;

use crate::engine::{SimConfig, SimulationEngine};
use crate::scenario::{default_enemies, demo_level};
use crate::systems::damage::DamageOutcome;

fn entry(kind: EnemyKind, count: u32, interval_secs: f64) -> SpawnEntry {
    SpawnEntry {
        kind,
        count,
        interval_secs,
        path: 0,
    }
}

fn level_with(waves: Vec<WaveConfig>, path: Vec<Vec2>) -> LevelConfig {
    LevelConfig {
        id: 1,
        name: "test".into(),
        initial_currency: 500,
        initial_health: 15,
        waves,
        paths: vec![path],
        build_nodes: vec![Vec2::new(0.0, 2.0), Vec2::new(4.0, 2.0)],
        towers: None,
    }
}

/// A level whose only wave never arrives, so tests control every enemy.
fn quiet_level() -> LevelConfig {
    level_with(
        vec![WaveConfig {
            start_delay_secs: 10_000.0,
            entries: vec![entry(EnemyKind::Basic, 1, 1.0)],
        }],
        vec![Vec2::new(50.0, 50.0), Vec2::new(60.0, 50.0)],
    )
}

fn engine_for(level: LevelConfig) -> SimulationEngine {
    SimulationEngine::new(SimConfig::default(), level, default_enemies())
}

fn started(level: LevelConfig) -> SimulationEngine {
    let mut engine = engine_for(level);
    engine.queue_command(PlayerCommand::StartLevel);
    engine
}

/// Tick `n` times, collecting every emitted event.
fn run_ticks(engine: &mut SimulationEngine, n: usize) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    for _ in 0..n {
        events.extend(engine.tick().events);
    }
    events
}

fn count(events: &[CombatEvent], pred: impl Fn(&CombatEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let build = |seed| {
        let mut engine = SimulationEngine::new(
            SimConfig {
                seed,
                ..Default::default()
            },
            demo_level(),
            default_enemies(),
        );
        engine.queue_commands([
            PlayerCommand::BuildTower {
                node: 0,
                kind: TowerKind::Magic,
            },
            PlayerCommand::BuildTower {
                node: 1,
                kind: TowerKind::Cannon,
            },
            PlayerCommand::StartLevel,
        ]);
        engine
    };
    let mut engine_a = build(12345);
    let mut engine_b = build(12345);

    for _ in 0..900 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

// ---- Tick timing and phases ----

#[test]
fn test_tick_timing_30_ticks_one_second() {
    let mut engine = started(quiet_level());
    for _ in 0..30 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 30);
    assert!((engine.time().elapsed_secs - 1.0).abs() < 1e-9);
}

#[test]
fn test_ready_phase_does_not_advance() {
    let mut engine = engine_for(quiet_level());
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Ready);
    assert_eq!(snap.time.tick, 0);
    assert_eq!(snap.waves.status, SpawnerStatus::Idle);
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = started(quiet_level());
    run_ticks(&mut engine, 10);

    engine.queue_command(PlayerCommand::Pause);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Paused);
    let paused_at = snap.time.tick;
    run_ticks(&mut engine, 10);
    assert_eq!(engine.time().tick, paused_at, "time must not advance while paused");

    engine.queue_command(PlayerCommand::Resume);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Active);
    assert_eq!(engine.time().tick, paused_at + 1);
}

#[test]
fn test_set_time_scale() {
    let mut engine = started(quiet_level());
    engine.queue_command(PlayerCommand::SetTimeScale { scale: 2.0 });
    run_ticks(&mut engine, 15);
    assert!(
        (engine.time().elapsed_secs - 1.0).abs() < 1e-9,
        "15 ticks at double speed is one second"
    );

    engine.queue_command(PlayerCommand::SetTimeScale { scale: 100.0 });
    engine.tick();
    assert_eq!(engine.time_scale(), rampart_core::constants::MAX_TIME_SCALE);
}

// ---- Targeting and damage ----

#[test]
fn test_arrow_hit_against_physical_resistance() {
    let catalog = EnemyCatalog {
        enemies: vec![EnemyConfig {
            physical_resistance: 0.5,
            ..EnemyConfig::fallback(EnemyKind::Basic)
        }],
    };
    let mut engine = SimulationEngine::new(SimConfig::default(), quiet_level(), catalog);
    engine.queue_command(PlayerCommand::StartLevel);
    engine.build_tower(TowerKind::Arrow, Vec2::ZERO).unwrap();
    let target = engine.spawn_enemy_at(EnemyKind::Basic, Vec2::new(2.9, 0.0));

    let events = run_ticks(&mut engine, 20);

    assert_eq!(engine.pool().get(target).unwrap().health, 90, "floor(20 * 0.5) = 10");
    assert_eq!(
        count(&events, |e| matches!(e, CombatEvent::ProjectileFired { .. })),
        1,
        "one attack per second"
    );
    assert!(events.contains(&CombatEvent::HitResolved {
        target,
        damage: 10,
        killed: false,
    }));
}

#[test]
fn test_attack_rate_does_not_queue_missed_attacks() {
    let mut engine = started(quiet_level());
    engine.build_tower(TowerKind::Arrow, Vec2::ZERO).unwrap();
    engine.spawn_enemy_at(EnemyKind::DefencePhysicalPro, Vec2::new(1.0, 0.0));

    let events = run_ticks(&mut engine, 100);
    // Attacks near 0, 1, 2 and 3 seconds; the next is not due before 4.
    assert_eq!(
        count(&events, |e| matches!(e, CombatEvent::ProjectileFired { .. })),
        4
    );
}

#[test]
fn test_cannon_ignores_flying_even_when_nearest() {
    let mut engine = started(quiet_level());
    engine.build_tower(TowerKind::Cannon, Vec2::ZERO).unwrap();
    let flyer = engine.spawn_enemy_at(EnemyKind::Fly, Vec2::new(1.0, 0.0));
    let walker = engine.spawn_enemy_at(EnemyKind::Basic, Vec2::new(2.5, 0.0));

    let snap = engine.tick();
    assert_eq!(snap.towers[0].target, Some(walker));
    assert_ne!(snap.towers[0].target, Some(flyer));
}

#[test]
fn test_cannon_reacquires_ground_target_past_nearer_flyer() {
    let level = level_with(
        vec![WaveConfig {
            start_delay_secs: 10_000.0,
            entries: vec![entry(EnemyKind::Basic, 1, 1.0)],
        }],
        vec![Vec2::new(2.0, 0.0), Vec2::new(20.0, 0.0)],
    );
    let mut engine = started(level);
    engine.build_tower(TowerKind::Cannon, Vec2::ZERO).unwrap();
    let walker = engine.spawn_enemy_on_path(EnemyKind::Fast, 0);
    let flyer = engine.spawn_enemy_at(EnemyKind::Fly, Vec2::new(0.5, 0.0));
    let other = engine.spawn_enemy_at(EnemyKind::Basic, Vec2::new(0.0, -2.5));

    let snap = engine.tick();
    assert_eq!(snap.towers[0].target, Some(walker), "nearest ground enemy first");

    let mut left_range = false;
    for _ in 0..60 {
        let snap = engine.tick();
        let walker_pos = engine.pool().get(walker).map(|e| e.position);
        if walker_pos.is_some_and(|p| p.length() > 3.0) {
            left_range = true;
            assert_ne!(snap.towers[0].target, Some(walker));
            assert_ne!(snap.towers[0].target, Some(flyer), "cannons never target flyers");
            assert_eq!(snap.towers[0].target, Some(other), "next nearest ground enemy");
            break;
        }
    }
    assert!(left_range, "walker must leave the cannon's range");
}

#[test]
fn test_arrow_takes_nearest_including_flying() {
    let mut engine = started(quiet_level());
    engine.build_tower(TowerKind::Arrow, Vec2::ZERO).unwrap();
    let flyer = engine.spawn_enemy_at(EnemyKind::Fly, Vec2::new(1.0, 0.0));
    engine.spawn_enemy_at(EnemyKind::Basic, Vec2::new(2.5, 0.0));

    let snap = engine.tick();
    assert_eq!(snap.towers[0].target, Some(flyer));
}

#[test]
fn test_no_target_out_of_range() {
    let mut engine = started(quiet_level());
    engine.build_tower(TowerKind::Arrow, Vec2::ZERO).unwrap();
    engine.spawn_enemy_at(EnemyKind::Basic, Vec2::new(3.01, 0.0));

    let events = run_ticks(&mut engine, 30);
    assert_eq!(count(&events, |e| matches!(e, CombatEvent::ProjectileFired { .. })), 0);
}

#[test]
fn test_cannon_splash_radius() {
    let mut engine = started(quiet_level());
    engine.build_tower(TowerKind::Cannon, Vec2::ZERO).unwrap();
    let target = engine.spawn_enemy_at(EnemyKind::Basic, Vec2::new(2.0, 0.0));
    let near = engine.spawn_enemy_at(EnemyKind::Basic, Vec2::new(2.0, 1.0));
    let far = engine.spawn_enemy_at(EnemyKind::Basic, Vec2::new(2.0, 2.0));

    run_ticks(&mut engine, 30);

    let health = |id| engine.pool().get(id).unwrap().health;
    assert_eq!(health(target), 70);
    assert_eq!(health(near), 70, "inside the splash radius");
    assert_eq!(health(far), 100, "outside the splash radius");
}

#[test]
fn test_kill_pays_reward() {
    let mut engine = started(quiet_level());
    engine.tick();
    let before = engine.currency();
    let id = engine.spawn_enemy_at(EnemyKind::Fast, Vec2::new(1.0, 1.0));

    let outcome = engine.apply_damage(id, 500, DamageType::Magic);
    assert!(matches!(outcome, DamageOutcome::Killed { reward: 12, .. }));
    assert_eq!(engine.currency(), before + 12);
    assert!(!engine.pool().is_live(id));
    assert_eq!(engine.apply_damage(id, 500, DamageType::Magic), DamageOutcome::Ignored);
}

#[test]
fn test_tower_targets_stay_valid() {
    let mut engine = engine_for(demo_level());
    engine.queue_commands([
        PlayerCommand::BuildTower {
            node: 0,
            kind: TowerKind::Cannon,
        },
        PlayerCommand::BuildTower {
            node: 1,
            kind: TowerKind::Arrow,
        },
        PlayerCommand::BuildTower {
            node: 2,
            kind: TowerKind::Magic,
        },
        PlayerCommand::StartLevel,
    ]);

    for _ in 0..1200 {
        let snap = engine.tick();
        for tower in &snap.towers {
            let Some(target) = tower.target else { continue };
            let enemy = snap
                .enemies
                .iter()
                .find(|e| e.id == target)
                .expect("a tower target is always active");
            assert!(enemy.position.distance(tower.position) <= tower.range + 1e-4);
            if tower.kind == TowerKind::Cannon {
                assert!(!enemy.flying, "cannons never hold a flying target");
            }
        }
    }
}

// ---- Building ----

#[test]
fn test_build_on_nodes() {
    let mut engine = engine_for(quiet_level());
    engine.queue_command(PlayerCommand::BuildTower {
        node: 0,
        kind: TowerKind::Sniper,
    });
    let snap = engine.tick();
    assert_eq!(snap.currency, 400);
    assert!(snap.build_nodes[0].occupied);
    assert_eq!(snap.towers.len(), 1);

    engine.queue_commands([
        PlayerCommand::BuildTower {
            node: 0,
            kind: TowerKind::Arrow,
        },
        PlayerCommand::BuildTower {
            node: 9,
            kind: TowerKind::Arrow,
        },
    ]);
    let snap = engine.tick();
    assert_eq!(snap.currency, 400, "rejected builds cost nothing");
    assert!(snap.events.contains(&CombatEvent::BuildRejected {
        kind: TowerKind::Arrow,
        reason: BuildError::NodeOccupied(0),
    }));
    assert!(snap.events.contains(&CombatEvent::BuildRejected {
        kind: TowerKind::Arrow,
        reason: BuildError::UnknownNode(9),
    }));
}

#[test]
fn test_build_refused_without_funds() {
    let mut level = quiet_level();
    level.initial_currency = 60;
    let mut engine = engine_for(level);
    assert!(engine.can_afford(TowerKind::Arrow));
    assert!(!engine.can_afford(TowerKind::Cannon));

    assert_eq!(
        engine.build_at_node(1, TowerKind::Cannon),
        Err(BuildError::InsufficientFunds { cost: 80, have: 60 })
    );
    assert!(!engine.build_nodes()[1].occupied);
    assert_eq!(engine.currency(), 60);
    assert!(engine.build_at_node(1, TowerKind::Arrow).is_ok());
    assert_eq!(engine.currency(), 10);
}

// ---- Waves ----

#[test]
fn test_wave_spawns_three_one_second_apart() {
    let level = level_with(
        vec![WaveConfig {
            start_delay_secs: 0.0,
            entries: vec![entry(EnemyKind::Basic, 3, 1.0)],
        }],
        vec![Vec2::ZERO, Vec2::new(100.0, 0.0)],
    );
    let mut engine = started(level);

    let first = engine.tick();
    assert_eq!(first.waves.live_enemies, 3, "whole entry counted at wave start");
    assert_eq!(first.enemies.len(), 1);

    let mut events = first.events;
    events.extend(run_ticks(&mut engine, 90));
    let spawns: Vec<(usize, f64)> = events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::EnemySpawned { path, at_secs, .. } => Some((*path, *at_secs)),
            _ => None,
        })
        .collect();
    assert_eq!(spawns, vec![(0, 0.0), (0, 1.0), (0, 2.0)]);
    assert_eq!(engine.pool().active_count(), 3);
}

#[test]
fn test_victory_raised_once() {
    let level = level_with(
        vec![WaveConfig {
            start_delay_secs: 0.0,
            entries: vec![entry(EnemyKind::Basic, 1, 0.5)],
        }],
        vec![Vec2::ZERO, Vec2::new(100.0, 0.0)],
    );
    let mut engine = started(level);
    let mut events = engine.tick().events;
    let id = engine.pool().active_ids()[0];
    engine.apply_damage(id, 1000, DamageType::Physical);
    events.extend(run_ticks(&mut engine, 60));

    assert_eq!(engine.phase(), GamePhase::Victory);
    assert_eq!(engine.outcome(), Some(LevelOutcome::Victory));
    assert_eq!(engine.stars(), 3);
    assert_eq!(
        count(&events, |e| matches!(e, CombatEvent::LevelEnded { .. })),
        1,
        "victory is raised exactly once"
    );
    assert_eq!(engine.spawner().status(), SpawnerStatus::Completed);
}

#[test]
fn test_defeat_stops_spawning() {
    let mut level = level_with(
        vec![WaveConfig {
            start_delay_secs: 0.0,
            entries: vec![entry(EnemyKind::Basic, 5, 1.0)],
        }],
        vec![Vec2::ZERO, Vec2::new(1.0, 0.0)],
    );
    level.initial_health = 2;
    let mut engine = started(level);
    engine.build_at_node(0, TowerKind::Arrow).unwrap();

    let events = run_ticks(&mut engine, 300);

    assert_eq!(engine.phase(), GamePhase::Defeat);
    assert_eq!(engine.outcome(), Some(LevelOutcome::Defeat));
    assert_eq!(engine.player().health, 0);
    assert!(!events.contains(&CombatEvent::LevelEnded {
        outcome: LevelOutcome::Victory,
        stars: 3,
    }));
    assert_eq!(count(&events, |e| matches!(e, CombatEvent::SpawningStopped)), 1);
    assert_eq!(engine.spawner().status(), SpawnerStatus::Aborted);

    let ended_at = events
        .iter()
        .position(|e| matches!(e, CombatEvent::LevelEnded { .. }))
        .unwrap();
    assert!(
        !events[ended_at..]
            .iter()
            .any(|e| matches!(e, CombatEvent::EnemySpawned { .. })),
        "no spawns after defeat"
    );
    assert!(engine.run_state().spawned_total < 5);
}

#[test]
fn test_level_end_sweep_disables_everything() {
    let mut level = level_with(
        vec![WaveConfig {
            start_delay_secs: 0.0,
            entries: vec![entry(EnemyKind::Fast, 3, 0.2)],
        }],
        vec![Vec2::ZERO, Vec2::new(1.0, 0.0)],
    );
    level.initial_health = 1;
    let mut engine = started(level);
    engine.build_at_node(1, TowerKind::Sniper).unwrap();
    run_ticks(&mut engine, 120);

    assert_eq!(engine.phase(), GamePhase::Defeat);
    assert_eq!(engine.pool().active_count(), 0, "enemies returned to the pool");
    assert!(engine.build_nodes().iter().all(|n| !n.enabled));
    let snap = engine.tick();
    assert!(snap.towers.iter().all(|t| !t.enabled && t.target.is_none()));
    assert_eq!(
        engine.build_at_node(0, TowerKind::Arrow),
        Err(BuildError::Disabled)
    );
    assert_eq!(engine.stars(), 0);
}

#[test]
fn test_stop_spawning_idempotent() {
    let level = level_with(
        vec![WaveConfig {
            start_delay_secs: 0.0,
            entries: vec![entry(EnemyKind::Basic, 5, 1.0)],
        }],
        vec![Vec2::ZERO, Vec2::new(100.0, 0.0)],
    );
    let mut engine = started(level);
    let mut events = run_ticks(&mut engine, 5);

    engine.stop_spawning();
    engine.stop_spawning();
    events.extend(run_ticks(&mut engine, 120));

    assert_eq!(count(&events, |e| matches!(e, CombatEvent::SpawningStopped)), 1);
    assert_eq!(engine.spawner().status(), SpawnerStatus::Aborted);
    assert_eq!(engine.pool().active_count(), 1, "spawned enemies keep walking");
    assert_eq!(engine.phase(), GamePhase::Active, "stopping spawns does not end the level");
}

#[test]
fn test_live_count_matches_events() {
    let mut engine = engine_for(demo_level());
    engine.queue_commands([
        PlayerCommand::BuildTower {
            node: 0,
            kind: TowerKind::Arrow,
        },
        PlayerCommand::BuildTower {
            node: 2,
            kind: TowerKind::Magic,
        },
        PlayerCommand::StartLevel,
    ]);

    let mut queued = 0i32;
    let mut removed = 0i32;
    for _ in 0..3600 {
        let snap = engine.tick();
        for event in &snap.events {
            match event {
                CombatEvent::EntryQueued { count, .. } => queued += *count as i32,
                CombatEvent::EnemyDefeated { .. } | CombatEvent::EnemyReachedEnd { .. } => {
                    removed += 1
                }
                _ => {}
            }
        }
        assert_eq!(snap.waves.live_enemies, queued - removed);
        assert!(snap.waves.live_enemies >= 0);
        if snap.phase.is_over() {
            break;
        }
    }
    assert!(engine.phase().is_over(), "demo level must finish");
}

#[test]
fn test_projectiles_expire_after_level_end() {
    let level = level_with(
        vec![WaveConfig {
            start_delay_secs: 0.0,
            entries: vec![entry(EnemyKind::Basic, 1, 0.0)],
        }],
        vec![Vec2::new(0.0, 2.5), Vec2::new(100.0, 2.5)],
    );
    let mut engine = started(level);
    engine.build_tower(TowerKind::Arrow, Vec2::ZERO).unwrap();
    let snap = engine.tick();
    assert_eq!(snap.projectiles.len(), 1);

    let id = engine.pool().active_ids()[0];
    engine.apply_damage(id, 1000, DamageType::Physical);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Victory);

    run_ticks(&mut engine, 30);
    assert_eq!(engine.tick().projectiles.len(), 0);
}
