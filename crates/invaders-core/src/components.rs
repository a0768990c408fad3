//! ECS components for hecs entities.
//!
//! Components are plain data structs; game logic lives in systems. The only
//! methods here are small data-local helpers (AABB overlap, health decrement)
//! with no knowledge of the world around them.

use serde::{Deserialize, Serialize};

use crate::enums::{BossPhase, BossTier, PowerUpTier, WaveOrigin};
use crate::types::Position;

/// Marks the player's ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerShip;

/// A grid enemy (or boss minion).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invader {
    pub origin: WaveOrigin,
    /// Grid row within its batch (initial wave or reinforcement batch).
    pub row: u32,
    pub col: u32,
    /// Set while a reinforcement row still uses the taller step-down.
    /// Cleared a fixed dwell after the row reaches formation.
    pub fresh_row: bool,
    /// Target formation Y while descending from above the field.
    pub descent_target_y: Option<f64>,
    /// Timestamp at which the descent finished.
    pub arrived_at_ms: Option<f64>,
    /// Last hazard emission, for the per-invader cooldown.
    pub last_hazard_ms: f64,
    pub hazard_probability: f64,
}

/// Marks a player-fired shot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerShot;

/// A falling hazard emitted by invaders or the boss.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hazard {
    /// Fragments are shrapnel from a destroyed hazard: short-lived,
    /// gravity-affected, and they never shatter again.
    pub fragment: bool,
}

/// A falling weapon upgrade.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUpDrop {
    pub tier: PowerUpTier,
}

/// A falling extra-life pickup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExtraLifeDrop;

/// A drifting asteroid (boss levels only).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AsteroidDrift;

/// A short-lived explosion effect entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Explosion {
    /// Larger burst rendered for player deaths and boss defeats.
    pub large: bool,
}

/// Axis-aligned bounding box half-extents around the entity's position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Body {
    pub half_w: f64,
    pub half_h: f64,
}

impl Body {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            half_w: width / 2.0,
            half_h: height / 2.0,
        }
    }

    /// AABB overlap test against another body.
    pub fn overlaps(&self, pos: &Position, other: &Body, other_pos: &Position) -> bool {
        (pos.x - other_pos.x).abs() <= self.half_w + other.half_w
            && (pos.y - other_pos.y).abs() <= self.half_h + other.half_h
    }
}

/// Hit points. An entity with `hp <= 0` is destroyed by the next sweep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub hp: i32,
}

impl Health {
    pub fn new(hp: i32) -> Self {
        Self { hp }
    }

    /// Apply one hit. Returns true when this hit destroyed the entity.
    pub fn hit(&mut self) -> bool {
        self.hp -= 1;
        self.hp <= 0
    }
}

/// Visual rotation, advanced every frame.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Spin {
    /// Current angle in degrees.
    pub angle: f64,
    /// Degrees per canonical frame.
    pub rate: f64,
}

/// Expiry timestamp for ephemeral entities (explosions, fragments).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lifetime {
    pub expires_at_ms: f64,
}

/// Boss encounter state. Data only; transitions and hit arithmetic live in
/// the boss behavior crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossState {
    pub tier: BossTier,
    pub phase: BossPhase,
    pub health: i32,
    pub max_health: i32,
    /// Horizontal speed in pixels per canonical frame; vertical is half.
    pub speed: f64,
    pub dir_x: f64,
    pub dir_y: f64,
    /// Next attack pattern index (round-robin mod 3).
    pub attack_pattern: u8,
    pub last_attack_ms: f64,
    pub last_minion_ms: f64,
    pub shield_health: i32,
    /// The shield rises exactly once per fight.
    pub shield_spent: bool,
}
