//! Invader formation system.
//!
//! Handles reinforcement-row descent, formation-wide horizontal movement
//! with the thinning-wave speed bonus, the shared edge bounce with
//! step-down, hazard emission, and the reinforcement spawn trigger.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use invaders_core::components::{Body, Invader};
use invaders_core::constants::*;
use invaders_core::enums::WaveOrigin;
use invaders_core::session::SessionState;
use invaders_core::types::Position;

use crate::world_setup;

/// Advance every invader one frame. `dir` is the shared formation
/// direction (+1 right, -1 left), owned by the engine.
pub fn run(
    world: &mut World,
    session: &mut SessionState,
    rng: &mut ChaCha8Rng,
    dir: &mut f64,
    now_ms: f64,
    scale: f64,
) {
    let originals = original_survivors(world);
    let bonus = speed_bonus(originals);
    let step = (INVADER_STEP + bonus) * *dir * scale;

    // Reinforcement descent, horizontal march, and edge detection in one
    // pass; spawns are deferred until the query borrow ends.
    let mut edge_hit = false;
    let mut hazards: Vec<(f64, f64)> = Vec::new();

    for (_entity, (invader, pos, body)) in world.query_mut::<(&mut Invader, &mut Position, &Body)>()
    {
        if let Some(target_y) = invader.descent_target_y {
            pos.y += REINFORCEMENT_DESCENT_STEP * scale;
            if pos.y >= target_y {
                pos.y = target_y;
                invader.descent_target_y = None;
                invader.arrived_at_ms = Some(now_ms);
            }
        } else if let Some(arrived) = invader.arrived_at_ms {
            if invader.fresh_row && now_ms - arrived >= REINFORCEMENT_DWELL_MS {
                invader.fresh_row = false;
            }
        }

        pos.x += step;
        if pos.x + body.half_w >= FIELD_WIDTH || pos.x - body.half_w <= 0.0 {
            pos.x = pos.x.clamp(body.half_w, FIELD_WIDTH - body.half_w);
            edge_hit = true;
        }

        // Hazard emission: per-tick draw, bounded by a per-invader cooldown.
        if rng.gen::<f64>() < invader.hazard_probability
            && now_ms - invader.last_hazard_ms >= HAZARD_COOLDOWN_MS
        {
            invader.last_hazard_ms = now_ms;
            hazards.push((pos.x, pos.y + body.half_h));
        }
    }

    // One invader touching an edge reverses the whole formation and steps
    // every row down; fresh reinforcement rows drop further, scaled with
    // level depth.
    if edge_hit {
        *dir = -*dir;
        let fresh_drop = reinforcement_drop(session.level);
        for (_entity, (invader, pos)) in world.query_mut::<(&Invader, &mut Position)>() {
            pos.y += if invader.fresh_row {
                fresh_drop
            } else {
                FORMATION_DROP
            };
        }
    }

    for (x, y) in hazards {
        world_setup::spawn_hazard(world, rng, x, y);
    }

    // Reinforcement trigger: once the original wave is down to one column's
    // worth of survivors, add `level - 5` rows — once per level.
    if session.level >= REINFORCEMENT_MIN_LEVEL
        && !session.reinforcements_added
        && originals <= INVADER_COLS as usize
    {
        world_setup::spawn_reinforcement_rows(world, session.level - REINFORCEMENT_MIN_LEVEL + 1);
        session.reinforcements_added = true;
    }
}

/// Count surviving members of the level's starting grid. Reinforcements and
/// boss minions never count toward the trigger or the speed bonus.
pub fn original_survivors(world: &mut World) -> usize {
    world
        .query_mut::<&Invader>()
        .into_iter()
        .filter(|(_, invader)| invader.origin == WaveOrigin::Initial)
        .count()
}

/// Horizontal speed bonus, recomputed every tick from the live count.
fn speed_bonus(originals: usize) -> f64 {
    if originals <= 5 {
        SPEED_BONUS_UNDER_5
    } else if originals <= 10 {
        SPEED_BONUS_UNDER_10
    } else if originals <= 20 {
        SPEED_BONUS_UNDER_20
    } else {
        0.0
    }
}

/// Step-down applied to fresh reinforcement rows on edge contact. Grows
/// with level depth so deep waves keep pressing.
fn reinforcement_drop(level: u32) -> f64 {
    (INVADER_HEIGHT / f64::from(12 - level.min(11))).max(REINFORCEMENT_MIN_DROP)
}
