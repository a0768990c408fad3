//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::{FINAL_BOSS_LEVEL, FIRST_BOSS_LEVEL};

/// Entity category, used for snapshot views and collision grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Invader,
    Boss,
    PlayerShot,
    Hazard,
    PowerUp,
    ExtraLife,
    Asteroid,
    Explosion,
}

/// How an invader entered the field. Drives scoring and the reinforcement
/// trigger, which only counts `Initial` survivors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveOrigin {
    /// Part of the level's starting 4x10 grid.
    #[default]
    Initial,
    /// Added mid-level as a reinforcement row (levels 6-10).
    Reinforcement,
    /// Flanker spawned by the final boss, outside the grid bookkeeping.
    BossMinion,
}

/// Weapon upgrade tiers, in ascending order. Collecting a pickup never
/// downgrades a higher tier already held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerUpTier {
    /// Level 3: auto-fire plus faster shots.
    RapidFire,
    /// Level 5: two shots per trigger pull.
    DualShot,
    /// Level 9: four shots per trigger pull.
    QuadShot,
}

impl PowerUpTier {
    /// The tier offered on a given level, if any.
    pub fn for_level(level: u32) -> Option<Self> {
        match level {
            3 => Some(Self::RapidFire),
            5 => Some(Self::DualShot),
            9 => Some(Self::QuadShot),
            _ => None,
        }
    }
}

/// Which boss encounter this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossTier {
    LevelFive,
    LevelTen,
}

impl BossTier {
    /// The boss fought on a given level, if any.
    pub fn for_level(level: u32) -> Option<Self> {
        match level {
            FIRST_BOSS_LEVEL => Some(Self::LevelFive),
            FINAL_BOSS_LEVEL => Some(Self::LevelTen),
            _ => None,
        }
    }
}

/// Boss lifecycle. `Inactive` has no representation: the boss entity simply
/// does not exist before its spawn trigger fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    Active,
    /// Shield up; hits drain shield health instead of boss health.
    Shielded,
    Defeated,
}

/// Result of landing one hit on a boss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossHit {
    /// Shield absorbed the hit; boss health unchanged.
    Absorbed,
    /// This hit depleted the shield; boss health unchanged.
    ShieldDown,
    /// Boss health reduced, boss still alive.
    Damaged,
    Defeated,
}

/// Top-level game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Playing,
    Paused,
    /// A level attempt ended in `LevelCleared`; awaiting `AdvanceLevel`.
    LevelComplete,
    GameOver,
    Victory,
}
