//! Cleanup system: removes entities that left the field, ran out their
//! lifetime, or lost all health. Uses a pre-allocated buffer to avoid
//! per-tick allocation.

use hecs::{Entity, World};

use invaders_core::components::*;
use invaders_core::constants::{FIELD_HEIGHT, FIELD_WIDTH};
use invaders_core::types::Position;

use crate::schedule::ActionQueue;

/// Sweep the world after collisions; any deferred actions owned by a
/// removed entity are cancelled with it.
pub fn run(world: &mut World, actions: &mut ActionQueue, despawn_buffer: &mut Vec<Entity>, now_ms: f64) {
    despawn_buffer.clear();

    // Shots that flew off the top.
    for (entity, (_shot, pos, body)) in world.query_mut::<(&PlayerShot, &Position, &Body)>() {
        if pos.y + body.half_h < 0.0 {
            despawn_buffer.push(entity);
        }
    }

    // Hazards and pickups that fell past the bottom.
    for (entity, (_hazard, pos)) in world.query_mut::<(&Hazard, &Position)>() {
        if pos.y > FIELD_HEIGHT {
            despawn_buffer.push(entity);
        }
    }
    for (entity, (_drop, pos)) in world.query_mut::<(&PowerUpDrop, &Position)>() {
        if pos.y > FIELD_HEIGHT {
            despawn_buffer.push(entity);
        }
    }
    for (entity, (_pickup, pos)) in world.query_mut::<(&ExtraLifeDrop, &Position)>() {
        if pos.y > FIELD_HEIGHT {
            despawn_buffer.push(entity);
        }
    }

    // Asteroids that drifted out on any side.
    for (entity, (_asteroid, pos, body)) in
        world.query_mut::<(&AsteroidDrift, &Position, &Body)>()
    {
        if pos.y - body.half_h > FIELD_HEIGHT
            || pos.x + body.half_w < -body.half_w
            || pos.x - body.half_w > FIELD_WIDTH + body.half_w
        {
            despawn_buffer.push(entity);
        }
    }

    // Expired ephemerals (explosions, fragments).
    for (entity, lifetime) in world.query_mut::<&Lifetime>() {
        if now_ms >= lifetime.expires_at_ms {
            despawn_buffer.push(entity);
        }
    }

    // Anything whose health hit zero without being swept by the resolver.
    for (entity, health) in world.query_mut::<&Health>() {
        if health.hp <= 0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        actions.cancel_owned_by(entity);
        let _ = world.despawn(entity);
    }
}
