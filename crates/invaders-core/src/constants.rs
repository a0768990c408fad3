//! Simulation constants and tuning parameters.
//!
//! All speeds are expressed in pixels per canonical frame so that motion
//! integrates as `step * (safe_delta / CANONICAL_FRAME_MS)`, independent of
//! the actual render rate.

// --- Frame clock ---

/// Reference 60 Hz frame interval in milliseconds.
pub const CANONICAL_FRAME_MS: f64 = 1000.0 / 60.0;

/// Raw deltas below this are replaced by the canonical step (jitter guard).
pub const MIN_FRAME_MS: f64 = 5.0;

/// Raw deltas above this are replaced by the canonical step (stall guard).
pub const MAX_FRAME_MS: f64 = 100.0;

// --- Play field ---

pub const FIELD_WIDTH: f64 = 800.0;
pub const FIELD_HEIGHT: f64 = 600.0;

/// Invaders whose bottom edge passes `FIELD_HEIGHT - BOTTOM_MARGIN` count as
/// having broken through the defense line.
pub const BOTTOM_MARGIN: f64 = 10.0;

// --- Player ---

pub const PLAYER_WIDTH: f64 = 60.0;
pub const PLAYER_HEIGHT: f64 = 60.0;
pub const PLAYER_STEP: f64 = 5.0;

/// Player spawn height above the bottom edge.
pub const PLAYER_SPAWN_OFFSET: f64 = 50.0;

pub const FIRE_COOLDOWN_MS: f64 = 500.0;

// --- Player shots ---

pub const SHOT_WIDTH: f64 = 7.0;
pub const SHOT_HEIGHT: f64 = 15.0;

/// Base shot speed; raised by the rapid-fire upgrade.
pub const SHOT_STEP: f64 = 400.0 / 60.0;
pub const SHOT_STEP_UPGRADE: f64 = 2.0;

/// Muzzle offsets for the dual- and quad-shot weapon tiers.
pub const DUAL_SHOT_OFFSET: f64 = 15.0;
pub const QUAD_SHOT_OFFSETS: [f64; 4] = [-45.0, -15.0, 15.0, 45.0];

// --- Invaders ---

pub const INVADER_WIDTH: f64 = 50.0;
pub const INVADER_HEIGHT: f64 = 30.0;
pub const INVADER_ROWS: u32 = 4;
pub const INVADER_COLS: u32 = 10;
pub const INVADER_SPACING: f64 = 10.0;
pub const INVADER_STEP: f64 = 1.0;

/// Top edge of the initial formation.
pub const GRID_TOP_Y: f64 = 50.0;

/// The whole grid starts slightly lower on later levels, capped at 3 steps.
pub const GRID_LEVEL_OFFSET: f64 = 10.0;
pub const GRID_LEVEL_OFFSET_CAP: u32 = 3;

/// Row 0 health; each row below has one less, floored at 1.
pub const INVADER_TOP_ROW_HEALTH: i32 = 4;

/// Formation step-down on edge contact, for rows already in formation.
pub const FORMATION_DROP: f64 = INVADER_HEIGHT / 2.0;

// Horizontal speed bonus added to every invader as the original wave thins.
pub const SPEED_BONUS_UNDER_20: f64 = 1.0;
pub const SPEED_BONUS_UNDER_10: f64 = 2.0;
pub const SPEED_BONUS_UNDER_5: f64 = 3.0;

// --- Reinforcement rows (levels 6-10) ---

/// First level on which reinforcement rows appear.
pub const REINFORCEMENT_MIN_LEVEL: u32 = 6;

/// Row health is this plus the row index within the batch.
pub const REINFORCEMENT_BASE_HEALTH: i32 = 4;

/// Descent speed while a fresh row drops into formation.
pub const REINFORCEMENT_DESCENT_STEP: f64 = 1.0;

/// How far above its formation slot a fresh row enters the field.
pub const REINFORCEMENT_ENTRY_OFFSET: f64 = 200.0;

/// Dwell after arrival before a fresh row behaves like the rest of the grid.
pub const REINFORCEMENT_DWELL_MS: f64 = 5000.0;

/// Minimum step-down for fresh rows on edge contact.
pub const REINFORCEMENT_MIN_DROP: f64 = 2.0;

// --- Hazard drops ---

pub const HAZARD_WIDTH: f64 = 5.0;
pub const HAZARD_HEIGHT: f64 = 10.0;
pub const HAZARD_STEP: f64 = 120.0 / 60.0;

/// Per-tick emission probability for each grid invader.
pub const HAZARD_PROBABILITY: f64 = 0.0005;

/// Minimum interval between two drops from the same invader.
pub const HAZARD_COOLDOWN_MS: f64 = 2000.0;

/// Hazards destroyed on impact may shatter into short-lived fragments.
pub const FRAGMENT_CHANCE: f64 = 0.5;
pub const FRAGMENT_COUNT: u32 = 3;
pub const FRAGMENT_LIFETIME_MS: f64 = 500.0;
pub const FRAGMENT_MIN_STEP: f64 = 50.0 / 60.0;
pub const FRAGMENT_MAX_STEP: f64 = 200.0 / 60.0;

/// Downward acceleration on fragments, pixels per frame per frame.
pub const FRAGMENT_GRAVITY: f64 = 0.05;

// --- Pickups ---

pub const PICKUP_SIZE: f64 = 40.0;
pub const POWERUP_STEP: f64 = 100.0 / 60.0;
pub const EXTRA_LIFE_STEP: f64 = 80.0 / 60.0;

/// Sideways drift range for a dropped extra life, pixels per frame.
pub const EXTRA_LIFE_DRIFT: f64 = 20.0 / 60.0;

/// Slight downward acceleration on extra-life drops.
pub const EXTRA_LIFE_GRAVITY: f64 = 0.025;

/// Chance that a destroyed invader drops an extra life (once per level).
pub const EXTRA_LIFE_DROP_CHANCE: f64 = 0.01;

// --- Asteroids ---

pub const ASTEROID_SIZE: f64 = 40.0;

/// Spawn cadence on boss levels.
pub const ASTEROID_INTERVAL_MS: f64 = 2000.0;

// --- Bosses ---

pub const FIRST_BOSS_LEVEL: u32 = 5;
pub const FINAL_BOSS_LEVEL: u32 = 10;

/// Level-5 boss spawns once this many grid enemies remain.
pub const BOSS_L5_TRIGGER_REMAINING: usize = 1;

/// Level-10 boss spawns once this many remain, or after the level timer.
pub const BOSS_L10_TRIGGER_REMAINING: usize = 5;
pub const BOSS_L10_TRIGGER_MS: f64 = 60_000.0;

pub const BOSS_ATTACK_INTERVAL_MS: f64 = 3000.0;

/// Radial burst: shot count and per-shot stagger.
pub const BOSS_BURST_SHOTS: u32 = 8;
pub const BOSS_BURST_STAGGER_MS: f64 = 100.0;

/// Spread radius / lateral spacing shared by all three attack patterns.
pub const BOSS_SHOT_SPREAD: f64 = 30.0;

pub const BOSS_MINION_INTERVAL_MS: f64 = 8000.0;
pub const BOSS_MINION_HEALTH: i32 = 2;
pub const BOSS_MINION_GAP: f64 = 50.0;
pub const BOSS_MINION_RISE: f64 = 30.0;

/// Vertical band the boss bounces within.
pub const BOSS_BAND_TOP: f64 = 50.0;
pub const BOSS_BAND_BOTTOM_MARGIN: f64 = 100.0;

/// Shield parameters (final boss only).
pub const BOSS_SHIELD_HEALTH: i32 = 100;
pub const BOSS_SHIELD_ABSORB: i32 = 10;
pub const BOSS_SHIELD_TRIGGER_FRACTION: f64 = 0.5;

/// Below this health fraction every hit also speeds the boss up.
pub const BOSS_ENRAGE_FRACTION: f64 = 0.3;
pub const BOSS_ENRAGE_FACTOR: f64 = 1.1;

/// Defeat explosion sequence.
pub const BOSS_DEFEAT_BURSTS: u32 = 4;
pub const BOSS_DEFEAT_BURST_GAP_MS: f64 = 200.0;

/// Delay between boss defeat and the level-complete report.
pub const BOSS_DEFEAT_SETTLE_MS: f64 = 800.0;

// --- Explosions ---

pub const EXPLOSION_SIZE: f64 = 40.0;
pub const EXPLOSION_LIFETIME_MS: f64 = 500.0;

// --- Levels, lives, scoring ---

pub const MAX_LEVEL: u32 = 10;
pub const STARTING_LIVES: u32 = 5;

pub const SCORE_INVADER: u32 = 10;
pub const SCORE_ASTEROID: u32 = 15;
pub const SCORE_BOSS: u32 = 200;

/// Reinforcement kills score `BASE + PER_LEVEL * (level - 6)`.
pub const REINFORCEMENT_SCORE_BASE: u32 = 15;
pub const REINFORCEMENT_SCORE_PER_LEVEL: u32 = 5;

/// Level-clear bonus arithmetic.
pub const LIFE_BONUS_PER_LIFE: u32 = 50;
pub const TIME_BONUS_BASE: u32 = 50;
pub const TIME_BONUS_PER_SEC: u32 = 10;

/// Par completion times per level (ms), indexed by `level - 1`.
pub const LEVEL_PAR_MS: [f64; 10] = [
    30_000.0, 35_000.0, 40_000.0, 45_000.0, 60_000.0, 50_000.0, 55_000.0, 60_000.0, 65_000.0,
    90_000.0,
];
