//! Play-session engine — the core of the game.
//!
//! `GameEngine` owns the hecs ECS world, processes queued commands, runs
//! all systems once per host frame, and produces `FrameSnapshot`s.
//! Completely headless, enabling deterministic testing: the same seed and
//! the same timestamp/command sequence replay the same session.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use invaders_core::commands::{InputState, PlayerCommand};
use invaders_core::components::Invader;
use invaders_core::constants::*;
use invaders_core::enums::{BossTier, GamePhase};
use invaders_core::events::AudioCue;
use invaders_core::session::{LevelOutcome, SessionState};
use invaders_core::state::FrameSnapshot;

use crate::clock::FrameClock;
use crate::schedule::{ActionQueue, DeferredAction};
use crate::scoring;
use crate::systems;
use crate::world_setup;

/// Configuration for starting a new engine.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same session.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// The play-session engine. Owns the ECS world and all per-session state.
pub struct GameEngine {
    world: World,
    session: SessionState,
    phase: GamePhase,
    input: InputState,
    clock: FrameClock,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    audio_cues: Vec<AudioCue>,
    actions: ActionQueue,
    due_actions: Vec<DeferredAction>,
    /// Shared formation direction: +1 right, -1 left.
    formation_dir: f64,
    last_shot_ms: f64,
    next_asteroid_ms: f64,
    boss_defeated_at_ms: Option<f64>,
    outcome: Option<LevelOutcome>,
}

impl GameEngine {
    /// Create a new engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            session: SessionState::new_run(),
            phase: GamePhase::default(),
            input: InputState::default(),
            clock: FrameClock::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            audio_cues: Vec::new(),
            actions: ActionQueue::new(),
            due_actions: Vec::new(),
            formation_dir: 1.0,
            last_shot_ms: 0.0,
            next_asteroid_ms: 0.0,
            boss_defeated_at_ms: None,
            outcome: None,
        }
    }

    /// Queue a command for processing at the next update boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one frame and return the resulting
    /// snapshot. `timestamp_ms` is the host's monotonic frame timestamp;
    /// the first call only bootstraps the clock.
    pub fn update(&mut self, timestamp_ms: f64) -> FrameSnapshot {
        let delta = self.clock.normalize(timestamp_ms);
        self.process_commands(timestamp_ms);

        if self.phase == GamePhase::Playing {
            if let Some(delta_ms) = delta {
                self.run_systems(timestamp_ms, delta_ms);
            }
        }

        let audio_cues = std::mem::take(&mut self.audio_cues);
        let outcome = self.outcome.take();
        systems::snapshot::build(&self.world, self.phase, &self.session, audio_cues, outcome)
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current session state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Process all queued commands.
    fn process_commands(&mut self, now_ms: f64) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command, now_ms);
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: PlayerCommand, now_ms: f64) {
        match command {
            PlayerCommand::StartRun => {
                self.session = SessionState::new_run();
                self.begin_level(now_ms);
            }
            PlayerCommand::LoadSession { state } => {
                self.session = state;
                self.begin_level(now_ms);
            }
            PlayerCommand::AdvanceLevel => {
                if self.phase == GamePhase::LevelComplete {
                    self.session.level = (self.session.level + 1).min(MAX_LEVEL);
                    self.begin_level(now_ms);
                }
            }
            PlayerCommand::ReturnToMenu => {
                self.world.clear();
                self.actions.clear();
                self.outcome = None;
                self.phase = GamePhase::MainMenu;
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Playing {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Playing;
                }
            }
            PlayerCommand::SetInput { input } => {
                self.input = input;
            }
        }
    }

    /// Tear down the old field and build the session's current level.
    fn begin_level(&mut self, now_ms: f64) {
        self.world.clear();
        self.actions.clear();
        self.audio_cues.clear();
        self.outcome = None;
        self.boss_defeated_at_ms = None;
        self.formation_dir = 1.0;
        // The first trigger pull should not wait out a stale cooldown.
        self.last_shot_ms = now_ms - FIRE_COOLDOWN_MS;
        self.next_asteroid_ms = now_ms + ASTEROID_INTERVAL_MS;
        self.input = InputState::default();

        let level = self.session.level;
        self.session.start_level(level, now_ms);
        world_setup::setup_level(&mut self.world, &self.session, &mut self.rng);
        self.phase = GamePhase::Playing;
    }

    /// Run all systems in order for one normalized frame.
    fn run_systems(&mut self, now_ms: f64, delta_ms: f64) {
        let scale = delta_ms / CANONICAL_FRAME_MS;

        // 1. Player input, movement, firing
        systems::player::run(
            &mut self.world,
            &self.input,
            &self.session,
            &mut self.last_shot_ms,
            now_ms,
            scale,
            &mut self.audio_cues,
        );
        // 2. Invader formation, reinforcements, hazard emission
        systems::formation::run(
            &mut self.world,
            &mut self.session,
            &mut self.rng,
            &mut self.formation_dir,
            now_ms,
            scale,
        );
        // 3. Boss spawn trigger, motion, attacks, minions
        systems::boss::run(
            &mut self.world,
            &mut self.session,
            &mut self.actions,
            &mut self.audio_cues,
            now_ms,
            scale,
        );
        // 4. Deferred actions coming due (staggered shots, defeat bursts)
        self.fire_due_actions(now_ms);
        // 5. Free-flying kinematics
        systems::motion::run(&mut self.world, scale);
        // 6. Asteroid cadence (boss levels)
        systems::asteroid::run(
            &mut self.world,
            &mut self.rng,
            self.session.level,
            &mut self.next_asteroid_ms,
            now_ms,
        );
        // 7. Collision resolution
        systems::collision::run(
            &mut self.world,
            &mut self.session,
            &mut self.rng,
            &mut self.actions,
            &mut self.audio_cues,
            &mut self.boss_defeated_at_ms,
            &mut self.despawn_buffer,
            now_ms,
        );
        // 8. Off-screen / expired sweep
        systems::cleanup::run(&mut self.world, &mut self.actions, &mut self.despawn_buffer, now_ms);
        // 9. Terminal conditions
        self.check_completion(now_ms);
    }

    /// Drain and apply every deferred action that has come due.
    fn fire_due_actions(&mut self, now_ms: f64) {
        let mut due = std::mem::take(&mut self.due_actions);
        self.actions.drain_due(now_ms, &mut due);
        for action in due.drain(..) {
            match action {
                DeferredAction::SpawnHazard { x, y } => {
                    world_setup::spawn_hazard(&mut self.world, &mut self.rng, x, y);
                }
                DeferredAction::SpawnExplosion { x, y, large } => {
                    world_setup::spawn_explosion(&mut self.world, x, y, large, now_ms);
                }
            }
        }
        self.due_actions = due;
    }

    /// Detect the end of a level attempt and report the outcome exactly
    /// once. Defeat takes priority over a simultaneous clear.
    fn check_completion(&mut self, now_ms: f64) {
        if self.phase != GamePhase::Playing {
            return;
        }

        if self.session.lives == 0 {
            self.actions.clear();
            self.phase = GamePhase::GameOver;
            self.outcome = Some(LevelOutcome::PlayerDefeated {
                state: self.session.clone(),
            });
            return;
        }

        let cleared = if BossTier::for_level(self.session.level).is_some() {
            // Boss levels end on boss defeat, after a short settle delay
            // for the defeat burst sequence.
            self.boss_defeated_at_ms
                .is_some_and(|defeated| now_ms - defeated >= BOSS_DEFEAT_SETTLE_MS)
        } else {
            self.world.query_mut::<&Invader>().into_iter().next().is_none()
        };
        if !cleared {
            return;
        }

        let elapsed = now_ms - self.session.level_start_ms;
        let bonus = scoring::level_clear_bonus(self.session.level, elapsed, self.session.lives);
        self.session.add_score(bonus);
        self.actions.clear();

        if self.session.level >= MAX_LEVEL {
            self.phase = GamePhase::Victory;
            self.outcome = Some(LevelOutcome::GameWon {
                state: self.session.clone(),
            });
        } else {
            self.phase = GamePhase::LevelComplete;
            self.outcome = Some(LevelOutcome::LevelCleared {
                state: self.session.clone(),
            });
        }
    }

    /// Jump straight into a level with the current session (for tests).
    #[cfg(test)]
    pub fn start_level_for_test(&mut self, level: u32, now_ms: f64) {
        self.session.level = level;
        self.begin_level(now_ms);
        // begin_level expects update() to have fed the clock already when
        // called via commands; tests drive it directly.
        self.clock.reset();
    }

    /// Get a mutable reference to the ECS world (for tests).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Get a mutable reference to the session state (for tests).
    #[cfg(test)]
    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    /// Get a read-only reference to the deferred action queue (for tests).
    #[cfg(test)]
    pub fn action_queue(&self) -> &ActionQueue {
        &self.actions
    }
}
