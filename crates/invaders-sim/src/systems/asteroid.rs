//! Asteroid spawner — boss levels only.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use invaders_core::constants::ASTEROID_INTERVAL_MS;
use invaders_core::enums::BossTier;

use crate::world_setup;

/// Spawn an asteroid from a random edge every interval on boss levels.
/// `next_spawn_ms` is owned by the engine and reset at level start.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    level: u32,
    next_spawn_ms: &mut f64,
    now_ms: f64,
) {
    if BossTier::for_level(level).is_none() {
        return;
    }
    if now_ms >= *next_spawn_ms {
        world_setup::spawn_asteroid(world, rng);
        *next_spawn_ms = now_ms + ASTEROID_INTERVAL_MS;
    }
}
