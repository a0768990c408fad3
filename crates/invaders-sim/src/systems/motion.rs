//! Kinematic integration for free-flying entities.
//!
//! Shots, hazards, pickups, and asteroids carry a `Velocity` and integrate
//! here; the player, invaders, and boss are moved by their own systems and
//! deliberately have no `Velocity` component.

use hecs::World;

use invaders_core::components::{Body, ExtraLifeDrop, Hazard, Spin};
use invaders_core::constants::*;
use invaders_core::types::{Position, Velocity};

/// Integrate positions, apply gravity to the entities that have it, spin
/// spinners, and bounce extra-life drops off the side walls.
pub fn run(world: &mut World, scale: f64) {
    // Gravity accelerates per frame, so it scales like every other step.
    for (_entity, (hazard, vel)) in world.query_mut::<(&Hazard, &mut Velocity)>() {
        if hazard.fragment {
            vel.y += FRAGMENT_GRAVITY * scale;
        }
    }
    for (_entity, (_drop, vel)) in world.query_mut::<(&ExtraLifeDrop, &mut Velocity)>() {
        vel.y += EXTRA_LIFE_GRAVITY * scale;
    }

    for (_entity, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
        pos.x += vel.x * scale;
        pos.y += vel.y * scale;
    }

    for (_entity, spin) in world.query_mut::<&mut Spin>() {
        spin.angle = (spin.angle + spin.rate * scale) % 360.0;
    }

    // Extra lives rebound off the side walls while falling.
    for (_entity, (_drop, pos, vel, body)) in
        world.query_mut::<(&ExtraLifeDrop, &mut Position, &mut Velocity, &Body)>()
    {
        if pos.x - body.half_w <= 0.0 {
            pos.x = body.half_w;
            vel.x = vel.x.abs();
        } else if pos.x + body.half_w >= FIELD_WIDTH {
            pos.x = FIELD_WIDTH - body.half_w;
            vel.x = -vel.x.abs();
        }
    }
}
