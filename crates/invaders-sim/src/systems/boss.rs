//! Boss system: spawn triggers, motion, attack cadence, shield, minions.
//!
//! Pure behavior (hit arithmetic, motion, pattern geometry) lives in the
//! boss behavior crate; this system is the ECS glue around it.

use hecs::World;

use invaders_core::components::{Body, BossState, Invader};
use invaders_core::constants::*;
use invaders_core::enums::{BossPhase, BossTier};
use invaders_core::events::AudioCue;
use invaders_core::session::SessionState;
use invaders_core::types::Position;

use invaders_boss_ai::{fsm, profiles};

use crate::schedule::{ActionQueue, DeferredAction};
use crate::world_setup;

/// Run the boss controller for one frame: spawn when triggered, then drive
/// motion, the shield, the attack cycle, and minion spawning.
pub fn run(
    world: &mut World,
    session: &mut SessionState,
    actions: &mut ActionQueue,
    audio: &mut Vec<AudioCue>,
    now_ms: f64,
    scale: f64,
) {
    maybe_spawn(world, session, now_ms);

    // At most one boss exists; collect its update outside the query borrow.
    let mut minion_origin: Option<(Position, f64)> = None;

    for (entity, (state, pos, body)) in
        world.query_mut::<(&mut BossState, &mut Position, &Body)>()
    {
        if state.phase == BossPhase::Defeated {
            continue;
        }

        let update = fsm::advance_motion(
            state,
            pos.to_vec(),
            glam::DVec2::new(body.half_w, body.half_h),
            scale,
        );
        *pos = Position::from_vec(update.position);
        state.dir_x = update.dir_x;
        state.dir_y = update.dir_y;

        if fsm::maybe_raise_shield(state) {
            audio.push(AudioCue::ShieldUp);
        }

        // Attack cadence is wall-clock, not delta-scaled; patterns rotate
        // round-robin and staggered shots go through the action queue.
        if now_ms - state.last_attack_ms >= BOSS_ATTACK_INTERVAL_MS {
            state.last_attack_ms = now_ms;
            let pattern = state.attack_pattern;
            state.attack_pattern = (state.attack_pattern + 1) % 3;
            for shot in profiles::attack_shots(pattern) {
                actions.schedule(
                    now_ms + shot.delay_ms,
                    Some(entity),
                    DeferredAction::SpawnHazard {
                        x: pos.x + shot.offset.x,
                        y: pos.y + body.half_h + shot.offset.y,
                    },
                );
            }
        }

        if state.tier == BossTier::LevelTen
            && now_ms - state.last_minion_ms >= BOSS_MINION_INTERVAL_MS
        {
            state.last_minion_ms = now_ms;
            minion_origin = Some((*pos, body.half_w));
        }
    }

    if let Some((pos, half_w)) = minion_origin {
        world_setup::spawn_minions(world, pos, half_w);
    }
}

/// Spawn the boss once its level trigger fires, clearing the remaining
/// grid. One-shot per level via the session flag.
fn maybe_spawn(world: &mut World, session: &mut SessionState, now_ms: f64) {
    if session.boss_spawned {
        return;
    }
    let tier = match BossTier::for_level(session.level) {
        Some(tier) => tier,
        None => return,
    };

    let remaining = world.query_mut::<&Invader>().into_iter().count();
    let triggered = match tier {
        BossTier::LevelFive => remaining <= BOSS_L5_TRIGGER_REMAINING,
        BossTier::LevelTen => {
            remaining <= BOSS_L10_TRIGGER_REMAINING
                || now_ms - session.level_start_ms >= BOSS_L10_TRIGGER_MS
        }
    };
    if !triggered {
        return;
    }

    let leftovers: Vec<hecs::Entity> = world
        .query_mut::<&Invader>()
        .into_iter()
        .map(|(entity, _)| entity)
        .collect();
    for entity in leftovers {
        let _ = world.despawn(entity);
    }

    world_setup::spawn_boss(world, tier, now_ms);
    session.boss_spawned = true;
}
