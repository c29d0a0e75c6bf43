//! Built-in content: a demo level and the default enemy roster.
//!
//! Used by the level runner when no config files are given, and by tests
//! that want a realistic level without hand-building one.

use rampart_core::config::{EnemyCatalog, EnemyConfig, LevelConfig, SpawnEntry, WaveConfig};
use rampart_core::enums::EnemyKind;
use rampart_core::types::Vec2;

#[allow(clippy::too_many_arguments)]
fn enemy(
    kind: EnemyKind,
    name: &str,
    max_health: i32,
    currency_reward: u32,
    move_speed: f32,
    physical_resistance: f32,
    magic_resistance: f32,
    can_fly: bool,
) -> EnemyConfig {
    EnemyConfig {
        kind,
        name: name.to_string(),
        max_health,
        currency_reward,
        move_speed,
        physical_resistance,
        magic_resistance,
        can_fly,
    }
}

/// Stats for every enemy kind.
pub fn default_enemies() -> EnemyCatalog {
    EnemyCatalog {
        enemies: vec![
            enemy(EnemyKind::Basic, "Grunt", 100, 10, 2.0, 0.0, 0.0, false),
            enemy(EnemyKind::DefencePhysical, "Shieldbearer", 150, 15, 1.5, 0.5, 0.0, false),
            enemy(EnemyKind::DefencePhysicalPro, "Bulwark", 220, 25, 1.3, 0.7, 0.1, false),
            enemy(EnemyKind::DefenceMagic, "Warded", 150, 15, 1.5, 0.0, 0.5, false),
            enemy(EnemyKind::DefenceMagicPro, "Spellbreaker", 220, 25, 1.3, 0.1, 0.7, false),
            enemy(EnemyKind::Fast, "Runner", 70, 12, 3.5, 0.0, 0.0, false),
            enemy(EnemyKind::Fly, "Bat", 80, 12, 2.2, 0.0, 0.0, true),
            enemy(EnemyKind::FlyPro, "Wyvern", 160, 20, 2.0, 0.3, 0.2, true),
            enemy(EnemyKind::FlyMax, "Drake", 300, 40, 1.8, 0.4, 0.4, true),
            enemy(EnemyKind::FlyFast, "Hawk", 90, 15, 3.5, 0.0, 0.0, true),
        ],
    }
}

/// A small three-wave level on an S-shaped path.
pub fn demo_level() -> LevelConfig {
    let entry = |kind, count, interval_secs| SpawnEntry {
        kind,
        count,
        interval_secs,
        path: 0,
    };

    LevelConfig {
        id: 1,
        name: "Crossroads".to_string(),
        initial_currency: 250,
        initial_health: 15,
        waves: vec![
            WaveConfig {
                start_delay_secs: 2.0,
                entries: vec![entry(EnemyKind::Basic, 6, 1.0)],
            },
            WaveConfig {
                start_delay_secs: 5.0,
                entries: vec![
                    entry(EnemyKind::Basic, 4, 0.8),
                    entry(EnemyKind::Fast, 3, 0.6),
                ],
            },
            WaveConfig {
                start_delay_secs: 5.0,
                entries: vec![
                    entry(EnemyKind::DefencePhysical, 3, 1.2),
                    entry(EnemyKind::Fly, 4, 0.8),
                ],
            },
        ],
        paths: vec![vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 6.0),
            Vec2::new(0.0, 6.0),
            Vec2::new(0.0, 12.0),
            Vec2::new(12.0, 12.0),
        ]],
        build_nodes: vec![
            Vec2::new(5.0, 2.0),
            Vec2::new(8.0, 3.0),
            Vec2::new(5.0, 4.0),
            Vec2::new(2.0, 9.0),
            Vec2::new(6.0, 10.0),
        ],
        towers: None,
    }
}
