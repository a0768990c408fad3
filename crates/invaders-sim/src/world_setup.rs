//! Entity spawn factories for setting up and replenishing the play field.
//!
//! Creates the player ship, invader formations, bosses, shots, hazards,
//! pickups, and effect entities with appropriate component bundles.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use invaders_core::components::*;
use invaders_core::constants::*;
use invaders_core::enums::{BossTier, PowerUpTier, WaveOrigin};
use invaders_core::session::SessionState;
use invaders_core::types::{Position, Velocity};

use invaders_boss_ai::{fsm, profiles};

/// Set up a fresh level: player ship, the initial wave, and — on power-up
/// levels — one falling upgrade.
pub fn setup_level(world: &mut World, session: &SessionState, rng: &mut ChaCha8Rng) {
    spawn_player(world);
    spawn_wave(world, session.level);
    if let Some(tier) = PowerUpTier::for_level(session.level) {
        spawn_power_up(world, rng, tier);
    }
}

/// Spawn the player's ship centered above the bottom edge.
pub fn spawn_player(world: &mut World) -> hecs::Entity {
    world.spawn((
        PlayerShip,
        Position::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - PLAYER_SPAWN_OFFSET),
        Body::new(PLAYER_WIDTH, PLAYER_HEIGHT),
    ))
}

/// Spawn the initial 4x10 wave for a level.
///
/// Row health runs 4, 3, 2, 1 top to bottom; the whole grid sits slightly
/// lower on later levels (capped).
pub fn spawn_wave(world: &mut World, level: u32) {
    let level_offset = f64::from((level - 1).min(GRID_LEVEL_OFFSET_CAP)) * GRID_LEVEL_OFFSET;
    for row in 0..INVADER_ROWS {
        for col in 0..INVADER_COLS {
            let health = (INVADER_TOP_ROW_HEALTH - row as i32).max(1);
            world.spawn((
                Invader {
                    origin: WaveOrigin::Initial,
                    row,
                    col,
                    fresh_row: false,
                    descent_target_y: None,
                    arrived_at_ms: None,
                    last_hazard_ms: 0.0,
                    hazard_probability: HAZARD_PROBABILITY,
                },
                Position::new(grid_column_x(col), grid_row_y(row) + level_offset),
                Body::new(INVADER_WIDTH, INVADER_HEIGHT),
                Health::new(health),
            ));
        }
    }
}

/// Spawn `rows` reinforcement rows above the field, descending into the top
/// formation slots. Later rows in the batch are tougher: health `4 + row`.
pub fn spawn_reinforcement_rows(world: &mut World, rows: u32) {
    for row in 0..rows {
        let target_y = grid_row_y(row);
        for col in 0..INVADER_COLS {
            world.spawn((
                Invader {
                    origin: WaveOrigin::Reinforcement,
                    row,
                    col,
                    fresh_row: true,
                    descent_target_y: Some(target_y),
                    arrived_at_ms: None,
                    last_hazard_ms: 0.0,
                    hazard_probability: HAZARD_PROBABILITY,
                },
                Position::new(grid_column_x(col), target_y - REINFORCEMENT_ENTRY_OFFSET),
                Body::new(INVADER_WIDTH, INVADER_HEIGHT),
                Health::new(REINFORCEMENT_BASE_HEALTH + row as i32),
            ));
        }
    }
}

/// Spawn a boss near the top center of the field.
pub fn spawn_boss(world: &mut World, tier: BossTier, now_ms: f64) -> hecs::Entity {
    let profile = profiles::get_profile(tier);
    world.spawn((
        fsm::new_boss(tier, now_ms),
        Position::new(FIELD_WIDTH / 2.0, BOSS_BAND_TOP + profile.height / 2.0),
        Body::new(profile.width, profile.height),
    ))
}

/// Spawn the final boss's two flanking minions, one per side.
pub fn spawn_minions(world: &mut World, boss_pos: Position, boss_half_w: f64) {
    for (side, col) in [(-1.0, 0), (1.0, 1)] {
        world.spawn((
            Invader {
                origin: WaveOrigin::BossMinion,
                row: 0,
                col,
                fresh_row: false,
                descent_target_y: None,
                arrived_at_ms: None,
                last_hazard_ms: 0.0,
                hazard_probability: HAZARD_PROBABILITY,
            },
            Position::new(
                boss_pos.x + side * (boss_half_w + BOSS_MINION_GAP),
                boss_pos.y - BOSS_MINION_RISE,
            ),
            Body::new(INVADER_WIDTH, INVADER_HEIGHT),
            Health::new(BOSS_MINION_HEALTH),
        ));
    }
}

/// Spawn one player shot heading up.
pub fn spawn_shot(world: &mut World, x: f64, y: f64, step: f64) {
    world.spawn((
        PlayerShot,
        Position::new(x, y),
        Velocity::new(0.0, -step),
        Body::new(SHOT_WIDTH, SHOT_HEIGHT),
    ));
}

/// Spawn a falling hazard at the given position.
pub fn spawn_hazard(world: &mut World, rng: &mut ChaCha8Rng, x: f64, y: f64) {
    world.spawn((
        Hazard { fragment: false },
        Position::new(x, y),
        Velocity::new(0.0, HAZARD_STEP),
        Body::new(HAZARD_WIDTH, HAZARD_HEIGHT),
        Spin {
            angle: rng.gen_range(0.0..360.0),
            rate: rng.gen_range(-5.0..5.0),
        },
    ));
}

/// Spawn the shrapnel fragments of a shattered hazard.
pub fn spawn_fragments(world: &mut World, rng: &mut ChaCha8Rng, x: f64, y: f64, now_ms: f64) {
    for _ in 0..FRAGMENT_COUNT {
        let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
        let step: f64 = rng.gen_range(FRAGMENT_MIN_STEP..FRAGMENT_MAX_STEP);
        world.spawn((
            Hazard { fragment: true },
            Position::new(x, y),
            Velocity::new(angle.cos() * step, angle.sin() * step),
            Body::new(HAZARD_WIDTH * 2.0, HAZARD_HEIGHT * 2.0),
            Spin {
                angle: rng.gen_range(0.0..360.0),
                rate: rng.gen_range(-5.0..5.0),
            },
            Lifetime {
                expires_at_ms: now_ms + FRAGMENT_LIFETIME_MS,
            },
        ));
    }
}

/// Spawn a weapon upgrade falling from the top at a random column.
pub fn spawn_power_up(world: &mut World, rng: &mut ChaCha8Rng, tier: PowerUpTier) {
    let x = rng.gen_range(PICKUP_SIZE..FIELD_WIDTH - PICKUP_SIZE);
    world.spawn((
        PowerUpDrop { tier },
        Position::new(x, 0.0),
        Velocity::new(0.0, POWERUP_STEP),
        Body::new(PICKUP_SIZE, PICKUP_SIZE),
        Spin {
            angle: 0.0,
            rate: 1.0,
        },
    ));
}

/// Spawn an extra-life pickup where an invader died, drifting sideways as
/// it falls.
pub fn spawn_extra_life(world: &mut World, rng: &mut ChaCha8Rng, x: f64, y: f64) {
    world.spawn((
        ExtraLifeDrop,
        Position::new(x, y),
        Velocity::new(rng.gen_range(-EXTRA_LIFE_DRIFT..EXTRA_LIFE_DRIFT), EXTRA_LIFE_STEP),
        Body::new(PICKUP_SIZE, PICKUP_SIZE),
    ));
}

/// Spawn an asteroid drifting in from a random edge (left, right, or top).
pub fn spawn_asteroid(world: &mut World, rng: &mut ChaCha8Rng) {
    let (x, y, vx, vy) = match rng.gen_range(0..3) {
        0 => (
            -ASTEROID_SIZE,
            rng.gen_range(0.0..FIELD_HEIGHT / 2.0),
            rng.gen_range(1.0..3.0),
            rng.gen_range(1.0..2.0),
        ),
        1 => (
            FIELD_WIDTH + ASTEROID_SIZE,
            rng.gen_range(0.0..FIELD_HEIGHT / 2.0),
            -rng.gen_range(1.0..3.0),
            rng.gen_range(1.0..2.0),
        ),
        _ => (
            rng.gen_range(0.0..FIELD_WIDTH - ASTEROID_SIZE),
            -ASTEROID_SIZE,
            rng.gen_range(-1.0..1.0),
            rng.gen_range(2.0..3.0),
        ),
    };
    world.spawn((
        AsteroidDrift,
        Position::new(x, y),
        Velocity::new(vx, vy),
        Body::new(ASTEROID_SIZE, ASTEROID_SIZE),
        Spin {
            angle: 0.0,
            rate: rng.gen_range(-2.0..2.0),
        },
    ));
}

/// Spawn a short-lived explosion effect.
pub fn spawn_explosion(world: &mut World, x: f64, y: f64, large: bool, now_ms: f64) {
    let size = if large {
        EXPLOSION_SIZE * 2.0
    } else {
        EXPLOSION_SIZE
    };
    world.spawn((
        Explosion { large },
        Position::new(x, y),
        Body::new(size, size),
        Lifetime {
            expires_at_ms: now_ms + EXPLOSION_LIFETIME_MS,
        },
    ));
}

/// Center X of a grid column.
fn grid_column_x(col: u32) -> f64 {
    let grid_width = f64::from(INVADER_COLS) * (INVADER_WIDTH + INVADER_SPACING);
    let start_x = (FIELD_WIDTH - grid_width) / 2.0 + INVADER_WIDTH / 2.0 + INVADER_SPACING;
    start_x + f64::from(col) * (INVADER_WIDTH + INVADER_SPACING)
}

/// Center Y of a grid row (before the per-level offset).
fn grid_row_y(row: u32) -> f64 {
    GRID_TOP_Y + f64::from(row) * (INVADER_HEIGHT + INVADER_SPACING)
}
