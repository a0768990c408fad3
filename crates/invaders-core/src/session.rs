//! Session state — the record carried across a whole run.
//!
//! Owned by the engine while a level is in play; handed to the host inside
//! each `LevelOutcome` and accepted back via `PlayerCommand::LoadSession`
//! at scene-transition boundaries. The engine itself never touches storage.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::PowerUpTier;

/// Mutable aggregate for one play-through.
///
/// Invariants: `score` never decreases, `lives` never goes negative
/// (saturating), `level` stays in `1..=MAX_LEVEL`, and `laser_count` is one
/// of {1, 2, 4} and only ever increases within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub laser_count: u32,
    pub auto_fire: bool,
    /// Shot speed in pixels per canonical frame.
    pub laser_speed: f64,
    // One-shot flags, reset at each level start.
    pub boss_spawned: bool,
    pub reinforcements_added: bool,
    pub extra_life_dropped: bool,
    /// Wall-clock timestamp of the current level start, for the time bonus.
    pub level_start_ms: f64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new_run()
    }
}

impl SessionState {
    /// Fresh session for a new run.
    pub fn new_run() -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            laser_count: 1,
            auto_fire: false,
            laser_speed: SHOT_STEP,
            boss_spawned: false,
            reinforcements_added: false,
            extra_life_dropped: false,
            level_start_ms: 0.0,
        }
    }

    /// Reset per-level flags and stamp the level start time.
    pub fn start_level(&mut self, level: u32, now_ms: f64) {
        self.level = level.clamp(1, MAX_LEVEL);
        self.boss_spawned = false;
        self.reinforcements_added = false;
        self.extra_life_dropped = false;
        self.level_start_ms = now_ms;
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Lose one life. Returns true when no lives remain.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    pub fn gain_life(&mut self) {
        self.lives = self.lives.saturating_add(1);
    }

    /// Apply a collected weapon upgrade. Monotonic: re-collecting a lower
    /// tier never downgrades what a higher tier already granted.
    pub fn apply_power_up(&mut self, tier: PowerUpTier) {
        match tier {
            PowerUpTier::RapidFire => {
                self.auto_fire = true;
                self.laser_speed = self.laser_speed.max(SHOT_STEP + SHOT_STEP_UPGRADE);
            }
            PowerUpTier::DualShot => {
                self.laser_count = self.laser_count.max(2);
            }
            PowerUpTier::QuadShot => {
                self.laser_count = self.laser_count.max(4);
            }
        }
    }
}

/// Terminal result of one level attempt, carrying the final session record
/// for the scene-flow layer to persist and act on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LevelOutcome {
    LevelCleared { state: SessionState },
    PlayerDefeated { state: SessionState },
    GameWon { state: SessionState },
}
