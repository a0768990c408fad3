//! Player system: held-input movement and trigger handling.

use hecs::World;

use invaders_core::commands::InputState;
use invaders_core::components::{Body, PlayerShip};
use invaders_core::constants::*;
use invaders_core::types::Position;
use invaders_core::events::AudioCue;
use invaders_core::session::SessionState;

use crate::world_setup;

/// Move the player from held input and fire when the trigger (or auto-fire)
/// is down and the cooldown has elapsed.
pub fn run(
    world: &mut World,
    input: &InputState,
    session: &SessionState,
    last_shot_ms: &mut f64,
    now_ms: f64,
    scale: f64,
    audio: &mut Vec<AudioCue>,
) {
    let mut muzzle: Option<(f64, f64)> = None;

    for (_entity, (_player, pos, body)) in
        world.query_mut::<(&PlayerShip, &mut Position, &Body)>()
    {
        let mut dx = 0.0;
        if input.left {
            dx -= PLAYER_STEP * scale;
        }
        if input.right {
            dx += PLAYER_STEP * scale;
        }
        pos.x = (pos.x + dx).clamp(body.half_w, FIELD_WIDTH - body.half_w);
        muzzle = Some((pos.x, pos.y - body.half_h));
    }

    let wants_fire = input.fire || session.auto_fire;
    if !wants_fire || now_ms - *last_shot_ms < FIRE_COOLDOWN_MS {
        return;
    }

    if let Some((x, y)) = muzzle {
        for offset in shot_offsets(session.laser_count) {
            world_setup::spawn_shot(world, x + offset, y, session.laser_speed);
        }
        *last_shot_ms = now_ms;
        audio.push(AudioCue::Shoot);
    }
}

/// Muzzle offsets for the current weapon tier.
fn shot_offsets(laser_count: u32) -> Vec<f64> {
    match laser_count {
        2 => vec![-DUAL_SHOT_OFFSET, DUAL_SHOT_OFFSET],
        4 => QUAD_SHOT_OFFSETS.to_vec(),
        _ => vec![0.0],
    }
}
