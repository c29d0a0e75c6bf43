//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs world, the enemy pool and every piece of
//! run state, processes player commands at tick boundaries, runs the combat
//! systems in a fixed order and produces `GameStateSnapshot`s. Completely
//! headless, enabling deterministic testing.

use std::collections::{BTreeSet, VecDeque};

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rampart_core::commands::PlayerCommand;
use rampart_core::config::{EnemyCatalog, LevelConfig};
use rampart_core::constants::{DEFAULT_POOL_SIZE, DT, MAX_TIME_SCALE, SPATIAL_CELL_SIZE};
use rampart_core::enums::{DamageType, GamePhase, LevelOutcome, TowerKind};
use rampart_core::error::BuildError;
use rampart_core::events::CombatEvent;
use rampart_core::progress::star_rating;
use rampart_core::state::{GameStateSnapshot, WaveView};
use rampart_core::types::{EnemyId, SimTime, Vec2};

use crate::context::{CombatContext, LevelRun, PlayerState};
use crate::economy::Economy;
use crate::pool::EnemyPool;
use crate::spatial::SpatialHash;
use crate::systems;
use crate::systems::damage::DamageOutcome;
use crate::systems::projectile::PendingHit;
use crate::systems::snapshot::SnapshotInput;
use crate::systems::wave_spawner::WaveSpawner;

/// Configuration for starting a new simulation.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
        }
    }
}

/// A spot where the player may build one tower.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildNode {
    pub position: Vec2,
    pub occupied: bool,
    /// Cleared by the level-end sweep.
    pub enabled: bool,
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    leaked_buffer: Vec<EnemyId>,
    pending_hits: Vec<PendingHit>,
    events: Vec<CombatEvent>,

    level: LevelConfig,
    enemy_catalog: EnemyCatalog,
    pool: EnemyPool,
    spatial: SpatialHash,
    run: LevelRun,
    economy: Economy,
    player: PlayerState,
    spawner: WaveSpawner,
    build_nodes: Vec<BuildNode>,
    outcome: Option<LevelOutcome>,
    stars: u8,
}

impl SimulationEngine {
    /// Load `level` and get ready for `StartLevel`. Configs are expected to be
    /// validated already.
    pub fn new(config: SimConfig, level: LevelConfig, enemy_catalog: EnemyCatalog) -> Self {
        let mut pool = EnemyPool::new();
        let kinds: BTreeSet<_> = level
            .waves
            .iter()
            .flat_map(|w| w.entries.iter().map(|e| e.kind))
            .collect();
        pool.prewarm(kinds, DEFAULT_POOL_SIZE);

        let build_nodes = level
            .build_nodes
            .iter()
            .map(|&position| BuildNode {
                position,
                occupied: false,
                enabled: true,
            })
            .collect();

        tracing::info!(
            level = level.id,
            waves = level.waves.len(),
            enemies = level.total_enemies(),
            seed = config.seed,
            "level loaded"
        );

        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale.clamp(0.0, MAX_TIME_SCALE),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            leaked_buffer: Vec::new(),
            pending_hits: Vec::new(),
            events: Vec::new(),
            economy: Economy::new(level.initial_currency, level.tower_catalog()),
            player: PlayerState::new(level.initial_health),
            level,
            enemy_catalog,
            pool,
            spatial: SpatialHash::new(SPATIAL_CELL_SIZE),
            run: LevelRun::default(),
            spawner: WaveSpawner::new(),
            build_nodes,
            outcome: None,
            stars: 0,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one fixed tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.advance(DT)
    }

    /// Advance the simulation by one frame of `frame_dt` seconds (scaled by
    /// the time scale) and return the resulting snapshot.
    pub fn advance(&mut self, frame_dt: f64) -> GameStateSnapshot {
        self.process_commands();

        let dt = frame_dt.max(0.0) * self.time_scale;
        match self.phase {
            GamePhase::Active => {
                self.run_systems(dt);
                self.time.advance_by(dt);
            }
            GamePhase::Victory | GamePhase::Defeat => {
                self.run_projectiles_only(dt);
                self.time.advance_by(dt);
            }
            GamePhase::Ready | GamePhase::Paused => {}
        }

        self.snapshot()
    }

    /// Build the current snapshot, draining events emitted since the last one.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        let input = SnapshotInput {
            world: &self.world,
            pool: &self.pool,
            time: self.time,
            phase: self.phase,
            level_id: self.level.id,
            currency: self.economy.currency,
            player: &self.player,
            run: &self.run,
            waves: WaveView {
                current: self.run.current_wave,
                total: self.level.waves.len(),
                live_enemies: self.run.live_enemies,
                status: self.spawner.status(),
            },
            build_nodes: &self.build_nodes,
            stars: self.stars,
        };
        systems::snapshot::build_snapshot(input, events)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn pool(&self) -> &EnemyPool {
        &self.pool
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn run_state(&self) -> &LevelRun {
        &self.run
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn currency(&self) -> u32 {
        self.economy.currency
    }

    pub fn spawner(&self) -> &WaveSpawner {
        &self.spawner
    }

    pub fn build_nodes(&self) -> &[BuildNode] {
        &self.build_nodes
    }

    /// The decision that ended the level, once there is one.
    pub fn outcome(&self) -> Option<LevelOutcome> {
        self.outcome
    }

    pub fn stars(&self) -> u8 {
        self.stars
    }

    pub fn can_afford(&self, kind: TowerKind) -> bool {
        self.economy.can_afford(kind)
    }

    /// Ask the spawner to stop at its next checkpoint. Idempotent.
    pub fn stop_spawning(&mut self) {
        self.run.stop_spawning();
    }

    /// Apply one hit to `target` outside the projectile pipeline.
    pub fn apply_damage(
        &mut self,
        target: EnemyId,
        raw: i32,
        damage_type: DamageType,
    ) -> DamageOutcome {
        let mut ctx = CombatContext {
            pool: &mut self.pool,
            run: &mut self.run,
            economy: &mut self.economy,
            player: &mut self.player,
            events: &mut self.events,
        };
        systems::damage::apply_damage(&mut ctx, target, raw, damage_type)
    }

    /// Build `kind` on build node `node`.
    pub fn build_at_node(&mut self, node: usize, kind: TowerKind) -> Result<Entity, BuildError> {
        let slot = *self
            .build_nodes
            .get(node)
            .ok_or(BuildError::UnknownNode(node))?;
        if !slot.enabled {
            return Err(BuildError::Disabled);
        }
        if slot.occupied {
            return Err(BuildError::NodeOccupied(node));
        }

        let entity = self.place_tower(kind, slot.position, Some(node))?;
        self.build_nodes[node].occupied = true;
        Ok(entity)
    }

    /// Build `kind` at an arbitrary position, bypassing build nodes.
    pub fn build_tower(&mut self, kind: TowerKind, position: Vec2) -> Result<Entity, BuildError> {
        if self.phase.is_over() {
            return Err(BuildError::Disabled);
        }
        self.place_tower(kind, position, None)
    }

    /// Activate an enemy standing still at `position` (for testing). Counts
    /// toward the live total like a spawned enemy.
    #[cfg(test)]
    pub fn spawn_enemy_at(&mut self, kind: rampart_core::enums::EnemyKind, position: Vec2) -> EnemyId {
        let fallback = rampart_core::config::EnemyConfig::fallback(kind);
        let config = self.enemy_catalog.get(kind).unwrap_or(&fallback);
        let id = crate::world_setup::activate_enemy(&mut self.pool, kind, config, position, None);
        self.run.live_enemies += 1;
        self.run.spawned_total += 1;
        id
    }

    /// Activate an enemy at the head of `path` as the spawner would.
    #[cfg(test)]
    pub fn spawn_enemy_on_path(&mut self, kind: rampart_core::enums::EnemyKind, path: usize) -> EnemyId {
        let start = self.level.paths[path][0];
        let id = self.spawn_enemy_at(kind, start);
        if let Some(enemy) = self.pool.get_mut(id) {
            enemy.path = Some(rampart_core::components::PathProgress { path, waypoint: 0 });
        }
        id
    }

    /// Overwrite the player's health (for testing).
    #[cfg(test)]
    pub fn set_player_health(&mut self, health: i32) {
        self.player.health = health;
    }

    fn place_tower(
        &mut self,
        kind: TowerKind,
        position: Vec2,
        node: Option<usize>,
    ) -> Result<Entity, BuildError> {
        let cost = self.economy.cost_of(kind).unwrap_or(0);
        let entity = self.economy.build(&mut self.world, kind, position, node)?;
        self.run.towers_built += 1;
        self.events.push(CombatEvent::TowerBuilt {
            kind,
            position,
            node,
            cost,
        });
        Ok(entity)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartLevel => {
                if self.phase == GamePhase::Ready {
                    self.spawner.start(self.time.elapsed_secs, &self.level);
                    self.phase = GamePhase::Active;
                    tracing::info!(level = self.level.id, "level started");
                }
            }
            PlayerCommand::BuildTower { node, kind } => {
                if let Err(reason) = self.build_at_node(node, kind) {
                    tracing::warn!(node, ?kind, %reason, "build rejected");
                    self.events.push(CombatEvent::BuildRejected { kind, reason });
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
            }
        }
    }

    /// Run all systems in order. Every system sees the clock as it was at
    /// the start of the tick.
    fn run_systems(&mut self, dt: f64) {
        let now = self.time.elapsed_secs;
        let step = dt as f32;

        let mut ctx = CombatContext {
            pool: &mut self.pool,
            run: &mut self.run,
            economy: &mut self.economy,
            player: &mut self.player,
            events: &mut self.events,
        };

        // 1. Wave spawning
        let decision = self
            .spawner
            .advance(now, &mut ctx, &self.level, &self.enemy_catalog);
        // 2. Enemy movement (leaks hurt the player)
        systems::movement::run(&mut ctx, &self.level.paths, step, &mut self.leaked_buffer);
        // 3. Spatial index rebuild
        self.spatial.clear();
        for (id, enemy) in ctx.pool.iter_active() {
            self.spatial.insert(id, enemy.position);
        }
        // 4. Targeting and firing
        systems::targeting::run(&mut self.world, &mut ctx, &self.spatial, &mut self.rng, now);
        // 5. Projectile motion
        systems::projectile::run(
            &mut self.world,
            ctx.pool,
            &mut self.rng,
            step,
            &mut self.pending_hits,
            &mut self.despawn_buffer,
        );
        // 6. Damage
        systems::damage::run(&mut ctx, &self.spatial, &mut self.pending_hits);
        // 7. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);

        // 8. Level end
        if !self.player.is_alive() {
            self.end_level(LevelOutcome::Defeat);
        } else if decision == Some(LevelOutcome::Victory) {
            self.end_level(LevelOutcome::Victory);
        }
    }

    /// After the level ends, projectiles keep flying until they expire or
    /// arrive. Their hits land on nothing.
    fn run_projectiles_only(&mut self, dt: f64) {
        systems::projectile::run(
            &mut self.world,
            &self.pool,
            &mut self.rng,
            dt as f32,
            &mut self.pending_hits,
            &mut self.despawn_buffer,
        );
        self.pending_hits.clear();
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    fn end_level(&mut self, outcome: LevelOutcome) {
        if self.phase.is_over() {
            return;
        }

        self.run.stop_spawning();
        if outcome == LevelOutcome::Defeat {
            // Let the spawner observe the stop signal before the sweep.
            let mut ctx = CombatContext {
                pool: &mut self.pool,
                run: &mut self.run,
                economy: &mut self.economy,
                player: &mut self.player,
                events: &mut self.events,
            };
            self.spawner.advance(
                self.time.elapsed_secs,
                &mut ctx,
                &self.level,
                &self.enemy_catalog,
            );
        }

        self.stars = match outcome {
            LevelOutcome::Victory => star_rating(self.player.health, self.player.initial_health),
            LevelOutcome::Defeat => 0,
        };
        self.outcome = Some(outcome);
        self.phase = match outcome {
            LevelOutcome::Victory => GamePhase::Victory,
            LevelOutcome::Defeat => GamePhase::Defeat,
        };

        systems::cleanup::level_end_sweep(&mut self.world, &mut self.pool);
        for node in &mut self.build_nodes {
            node.enabled = false;
        }

        self.events.push(CombatEvent::LevelEnded {
            outcome,
            stars: self.stars,
        });
        tracing::info!(
            ?outcome,
            stars = self.stars,
            health = self.player.health,
            defeated = self.run.defeated_total,
            leaked = self.run.reached_end_total,
            "level ended"
        );
    }
}
