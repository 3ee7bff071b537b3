//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems, and produces `GameStateSnapshot`s. Completely headless
//! (no terminal dependency), enabling deterministic testing.

use std::collections::VecDeque;

use glam::DVec2;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use barrage_core::commands::PlayerCommand;
use barrage_core::components::{HeldInput, Player, Position, Projectile};
use barrage_core::config::{ArchetypeTable, GameConfig};
use barrage_core::enums::{GameMode, GamePhase, ProjectileOwner};
use barrage_core::error::ConfigError;
use barrage_core::events::GameEvent;
use barrage_core::state::GameStateSnapshot;
use barrage_core::types::{SimTime, Size};

use crate::session::SessionState;
use crate::systems;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    config: GameConfig,
    archetypes: ArchetypeTable,
    world: World,
    time: SimTime,
    phase: GamePhase,
    mode: GameMode,
    session: SessionState,
    rng: ChaCha8Rng,
    next_serial: u64,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<GameEvent>,
    render_requested: bool,
}

impl SimulationEngine {
    /// Create a new simulation engine. Invalid configuration is rejected
    /// here, so an engine that exists can always start a session.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            archetypes: ArchetypeTable::new(config.enemies.archetypes.clone()),
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            mode: GameMode::default(),
            session: SessionState::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_serial: 0,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            render_requested: false,
            config,
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply queued commands, then advance one tick if running.
    ///
    /// Returns a snapshot when a render is requested: after every running
    /// tick (including the one that terminates the session), on mode
    /// selection and on resume. Returns `None` while not started, paused
    /// or terminated.
    pub fn tick(&mut self) -> Option<GameStateSnapshot> {
        self.process_commands();

        if self.phase == GamePhase::Running {
            self.run_systems();
            self.time.advance(self.config.tick_rate);
            self.render_requested = true;
        }

        if !std::mem::take(&mut self.render_requested) {
            return None;
        }

        let events = std::mem::take(&mut self.events);
        Some(systems::snapshot::build_snapshot(
            &self.world,
            &self.archetypes,
            &self.config.field,
            &self.time,
            self.phase,
            self.mode,
            &self.session,
            events,
        ))
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn score(&self) -> u64 {
        self.session.score
    }

    pub fn round(&self) -> u32 {
        self.session.round
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Spawn an enemy of the named archetype at an exact position (for tests).
    #[cfg(test)]
    pub fn spawn_enemy_at(&mut self, kind: &str, x: f64, y: f64) -> Entity {
        let id = self
            .archetypes
            .find(kind)
            .unwrap_or_else(|| panic!("no archetype named {kind}"));
        world_setup::spawn_enemy(
            &mut self.world,
            &self.archetypes,
            id,
            DVec2::new(x, y),
            barrage_core::enums::Drift::Right,
            &mut self.next_serial,
        )
    }

    /// Move a player to an exact position (for tests).
    #[cfg(test)]
    pub fn place_player(&mut self, slot: usize, x: f64, y: f64) {
        let entity = self.player_entity(slot).expect("player slot exists");
        let mut pos = self.world.get::<&mut Position>(entity).unwrap();
        pos.0 = DVec2::new(x, y);
    }

    /// Overwrite a player's lives (for tests).
    #[cfg(test)]
    pub fn set_lives(&mut self, slot: usize, lives: u32) {
        let entity = self.player_entity(slot).expect("player slot exists");
        self.world.get::<&mut Player>(entity).unwrap().lives = lives;
    }

    /// Get a read-only reference to the session state.
    #[cfg(test)]
    pub fn session(&self) -> &SessionState {
        &self.session
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
            PlayerCommand::SelectMode { mode } => {
                if self.phase != GamePhase::NotStarted {
                    debug!(?mode, phase = ?self.phase, "mode select ignored after start");
                } else if let Err(err) = self.config.validate_mode(mode) {
                    warn!(?mode, %err, "mode select rejected");
                } else {
                    self.start_session(mode);
                }
            }
            PlayerCommand::TogglePause => match self.phase {
                GamePhase::Running => {
                    self.phase = GamePhase::Paused;
                    self.events.push(GameEvent::Paused);
                    info!(tick = self.time.tick, "paused");
                }
                GamePhase::Paused => {
                    self.phase = GamePhase::Running;
                    self.events.push(GameEvent::Resumed);
                    self.render_requested = true;
                    info!(tick = self.time.tick, "resumed");
                }
                phase => debug!(?phase, "pause toggle ignored"),
            },
            PlayerCommand::Reset => {
                if self.phase != GamePhase::NotStarted {
                    self.clear_session();
                    self.phase = GamePhase::NotStarted;
                    info!("session reset");
                }
            }
            PlayerCommand::AdvanceRound => {
                if matches!(self.phase, GamePhase::Running | GamePhase::Paused) {
                    self.session.advance_round();
                }
            }
            PlayerCommand::Steer {
                player,
                left,
                right,
            } => {
                let mut steered = false;
                for (_entity, (p, input)) in self.world.query_mut::<(&Player, &mut HeldInput)>() {
                    if p.slot == player {
                        *input = HeldInput { left, right };
                        steered = true;
                    }
                }
                if !steered {
                    debug!(player, "steer for unknown player ignored");
                }
            }
            PlayerCommand::Fire { player } => {
                if self.phase == GamePhase::Running {
                    self.fire(player);
                } else {
                    debug!(player, phase = ?self.phase, "fire ignored");
                }
            }
        }
    }

    /// Reset the world and spawn the players for `mode`.
    fn start_session(&mut self, mode: GameMode) {
        self.clear_session();
        world_setup::setup_session(&mut self.world, &self.config, mode, &mut self.next_serial);
        self.mode = mode;
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::SessionStarted { mode });
        self.render_requested = true;
        info!(?mode, "session started");
    }

    fn clear_session(&mut self) {
        self.world.clear();
        self.session = SessionState::default();
        self.time = SimTime::default();
        self.next_serial = 0;
        self.despawn_buffer.clear();
        self.events.clear();
    }

    /// One trigger pull from a live player whose cooldown has elapsed.
    fn fire(&mut self, slot: usize) {
        let Some(entity) = self.player_entity(slot) else {
            debug!(player = slot, "fire for unknown player ignored");
            return;
        };

        let origin = {
            let Ok(mut query) = self
                .world
                .query_one::<(&Position, &Size, &mut Player)>(entity)
            else {
                return;
            };
            let Some((pos, size, player)) = query.get() else {
                return;
            };
            if player.lives == 0 || player.fire_cooldown > 0 {
                return;
            }
            player.fire_cooldown = self.config.projectile.fire_cooldown_ticks;

            let shot = self.config.projectile.size;
            DVec2::new(
                world_setup::centred_x(pos.0.x, size.width, shot.width),
                pos.0.y - shot.height,
            )
        };

        world_setup::spawn_projectile(
            &mut self.world,
            origin,
            self.config.projectile.size,
            Projectile {
                owner: ProjectileOwner::Player(slot),
                speed: self.config.projectile.speed,
                color: self.config.projectile.color,
            },
            &mut self.next_serial,
        );
    }

    fn player_entity(&self, slot: usize) -> Option<Entity> {
        self.world
            .query::<&Player>()
            .iter()
            .find(|(_, p)| p.slot == slot)
            .map(|(entity, _)| entity)
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Players
        systems::movement::move_players(&mut self.world, &self.config.field);
        // 2. Enemy descent
        systems::movement::move_enemies(
            &mut self.world,
            &self.archetypes,
            &self.config.field,
            self.config.enemies.drift_speed,
        );
        // 3. Spawning
        systems::spawner::run(
            &mut self.world,
            &mut self.rng,
            &self.archetypes,
            &self.config,
            &mut self.next_serial,
        );
        // 4. Enemy fire
        if self.config.enemies.fire_enabled {
            systems::enemy_fire::run(
                &mut self.world,
                &mut self.rng,
                &self.archetypes,
                &self.config,
                &mut self.next_serial,
            );
        }
        // 5. Projectiles
        systems::movement::move_projectiles(&mut self.world);
        // 6. Collisions, scoring, life loss, termination
        let result = systems::collision::run(
            &mut self.world,
            &self.archetypes,
            &mut self.session,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        if result.terminated {
            self.phase = GamePhase::Terminated;
        }
        // 7. Cleanup (off-field)
        systems::cleanup::run(&mut self.world, &self.config.field, &mut self.despawn_buffer);
    }
}
