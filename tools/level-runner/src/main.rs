//! level-runner: plays a level headlessly and reports the outcome.
//!
//! Usage:
//!   level-runner                                  (built-in demo level)
//!   level-runner --level level.json --enemies enemies.json --seed 7
//!   level-runner --build arrow@0 --build cannon@2 --json
//!
//! Logging is controlled with `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rampart_core::commands::PlayerCommand;
use rampart_core::config::{EnemyCatalog, LevelConfig};
use rampart_core::enums::{LevelOutcome, TowerKind};
use rampart_core::error::ConfigError;
use rampart_core::progress::LevelProgress;
use rampart_sim::scenario;
use rampart_sim::{SimConfig, SimulationEngine};

#[derive(Parser, Debug)]
#[command(name = "level-runner")]
#[command(about = "Run a tower-defense level without a frontend")]
struct Args {
    /// Level config JSON (defaults to the built-in demo level)
    #[arg(long)]
    level: Option<PathBuf>,

    /// Enemy catalog JSON (defaults to the built-in roster)
    #[arg(long)]
    enemies: Option<PathBuf>,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Give up after this many simulated seconds
    #[arg(long, default_value_t = 900.0)]
    max_secs: f64,

    /// Tower to build before the level starts, as KIND@NODE (repeatable)
    #[arg(long = "build", value_parser = parse_build)]
    builds: Vec<(TowerKind, usize)>,

    /// Print the final snapshot as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn parse_build(s: &str) -> Result<(TowerKind, usize), String> {
    let (kind, node) = s
        .split_once('@')
        .ok_or_else(|| format!("expected KIND@NODE, got {s}"))?;
    let kind = kind.parse::<TowerKind>()?;
    let node = node
        .parse::<usize>()
        .map_err(|e| format!("bad node index {node}: {e}"))?;
    Ok((kind, node))
}

fn read_config(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {e}", path.display());
        process::exit(1);
    })
}

fn load_or_exit<T>(path: &Path, parse: impl FnOnce(&str) -> Result<T, ConfigError>) -> T {
    parse(&read_config(path)).unwrap_or_else(|e| {
        eprintln!("Invalid config {}: {e}", path.display());
        process::exit(1);
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!(?args, "level-runner starting");

    let level = match &args.level {
        Some(path) => load_or_exit(path, LevelConfig::from_json),
        None => scenario::demo_level(),
    };
    let enemies = match &args.enemies {
        Some(path) => load_or_exit(path, EnemyCatalog::from_json),
        None => scenario::default_enemies(),
    };

    let mut engine = SimulationEngine::new(
        SimConfig {
            seed: args.seed,
            ..Default::default()
        },
        level,
        enemies,
    );
    engine.queue_commands(
        args.builds
            .iter()
            .map(|&(kind, node)| PlayerCommand::BuildTower { node, kind }),
    );
    engine.queue_command(PlayerCommand::StartLevel);

    let mut snapshot = engine.tick();
    while !snapshot.phase.is_over() && snapshot.time.elapsed_secs < args.max_secs {
        snapshot = engine.tick();
    }
    if engine.outcome().is_none() {
        tracing::warn!(max_secs = args.max_secs, "level did not finish");
    }

    if args.json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Cannot serialize snapshot: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let run = engine.run_state();
    println!("level {} ({})", engine.level().id, engine.level().name);
    match engine.outcome() {
        Some(outcome) => println!("  outcome:   {outcome:?} ({} stars)", engine.stars()),
        None => println!("  outcome:   undecided after {:.1}s", snapshot.time.elapsed_secs),
    }
    println!("  time:      {:.1}s ({} ticks)", snapshot.time.elapsed_secs, snapshot.time.tick);
    println!("  waves:     {}/{}", snapshot.waves.current, snapshot.waves.total);
    println!(
        "  enemies:   {} spawned, {} defeated, {} leaked",
        run.spawned_total, run.defeated_total, run.reached_end_total
    );
    println!(
        "  towers:    {} built, {} shots",
        run.towers_built, run.projectiles_fired
    );
    println!(
        "  player:    {} health, {} currency",
        engine.player().health,
        engine.currency()
    );

    let mut progress = LevelProgress::default();
    let victory = engine.outcome() == Some(LevelOutcome::Victory);
    if let Some(unlocked) = progress.record_result(engine.level().id, victory, engine.stars()) {
        println!("  unlocked:  level {unlocked}");
    }
}
