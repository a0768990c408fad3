//! Collision resolver — pairwise AABB tests between entity categories and
//! the score/life/state mutations they trigger.
//!
//! Broad-phase is a plain O(n*m) sweep per category pair, which is fine at
//! this entity count. Entities destroyed earlier in the same tick are
//! tracked in a local set so later pairs skip them instead of re-resolving
//! a stale reference.

use std::collections::HashSet;

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use invaders_core::components::*;
use invaders_core::constants::*;
use invaders_core::enums::{BossHit, PowerUpTier, WaveOrigin};
use invaders_core::events::AudioCue;
use invaders_core::session::SessionState;
use invaders_core::types::Position;

use invaders_boss_ai::fsm;

use crate::schedule::{ActionQueue, DeferredAction};
use crate::scoring;
use crate::world_setup;

/// Resolve every collision pair for this tick and apply the resulting
/// mutations. Destroyed entities are despawned at the end, cancelling any
/// deferred actions they still own.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    session: &mut SessionState,
    rng: &mut ChaCha8Rng,
    actions: &mut ActionQueue,
    audio: &mut Vec<AudioCue>,
    boss_defeated_at: &mut Option<f64>,
    despawn_buffer: &mut Vec<hecs::Entity>,
    now_ms: f64,
) {
    despawn_buffer.clear();
    let mut dead: HashSet<hecs::Entity> = HashSet::new();

    let shots = collect_tagged::<PlayerShot>(world);
    let asteroids = collect_tagged::<AsteroidDrift>(world);
    let invaders: Vec<(hecs::Entity, Position, Body, WaveOrigin)> = world
        .query_mut::<(&Invader, &Position, &Body)>()
        .into_iter()
        .map(|(e, (inv, pos, body))| (e, *pos, *body, inv.origin))
        .collect();
    let hazards: Vec<(hecs::Entity, Position, Body, bool)> = world
        .query_mut::<(&Hazard, &Position, &Body)>()
        .into_iter()
        .map(|(e, (hazard, pos, body))| (e, *pos, *body, hazard.fragment))
        .collect();
    let powerups: Vec<(hecs::Entity, Position, Body, PowerUpTier)> = world
        .query_mut::<(&PowerUpDrop, &Position, &Body)>()
        .into_iter()
        .map(|(e, (drop, pos, body))| (e, *pos, *body, drop.tier))
        .collect();
    let extra_lives = collect_tagged::<ExtraLifeDrop>(world);
    let boss: Option<(hecs::Entity, Position, Body)> = world
        .query_mut::<(&BossState, &Position, &Body)>()
        .into_iter()
        .map(|(e, (_state, pos, body))| (e, *pos, *body))
        .next();
    let player: Option<(hecs::Entity, Position, Body)> = world
        .query_mut::<(&PlayerShip, &Position, &Body)>()
        .into_iter()
        .map(|(e, (_ship, pos, body))| (e, *pos, *body))
        .next();

    // --- Player shots against invaders, the boss, and asteroids ---

    for &(shot, shot_pos, shot_body) in &shots {
        if dead.contains(&shot) {
            continue;
        }

        let mut shot_spent = false;

        for &(invader, pos, body, origin) in &invaders {
            if dead.contains(&invader) {
                continue;
            }
            if !shot_body.overlaps(&shot_pos, &body, &pos) {
                continue;
            }
            shot_spent = true;
            let destroyed = match world.get::<&mut Health>(invader) {
                Ok(mut health) => health.hit(),
                Err(_) => false,
            };
            if destroyed {
                dead.insert(invader);
                despawn_buffer.push(invader);
                session.add_score(scoring::kill_points(origin, session.level));
                world_setup::spawn_explosion(world, pos.x, pos.y, false, now_ms);
                audio.push(AudioCue::Explosion);
                // Rare mercy drop, at most once per level.
                if !session.extra_life_dropped && rng.gen_bool(EXTRA_LIFE_DROP_CHANCE) {
                    session.extra_life_dropped = true;
                    world_setup::spawn_extra_life(world, rng, pos.x, pos.y);
                }
            } else {
                audio.push(AudioCue::Hit);
            }
            break;
        }

        if !shot_spent {
            if let Some((boss_entity, boss_pos, boss_body)) = boss {
                if !dead.contains(&boss_entity) && shot_body.overlaps(&shot_pos, &boss_body, &boss_pos)
                {
                    shot_spent = true;
                    let hit = match world.get::<&mut BossState>(boss_entity) {
                        Ok(mut state) => fsm::apply_hit(&mut state),
                        Err(_) => BossHit::Absorbed,
                    };
                    match hit {
                        BossHit::Absorbed | BossHit::Damaged => audio.push(AudioCue::Hit),
                        BossHit::ShieldDown => audio.push(AudioCue::ShieldDown),
                        BossHit::Defeated => {
                            defeat_boss(
                                world,
                                session,
                                rng,
                                actions,
                                audio,
                                boss_defeated_at,
                                &mut dead,
                                despawn_buffer,
                                boss_entity,
                                boss_pos,
                                boss_body,
                                now_ms,
                            );
                        }
                    }
                }
            }
        }

        if !shot_spent {
            for &(asteroid, pos, body) in &asteroids {
                if dead.contains(&asteroid) {
                    continue;
                }
                if !shot_body.overlaps(&shot_pos, &body, &pos) {
                    continue;
                }
                shot_spent = true;
                dead.insert(asteroid);
                despawn_buffer.push(asteroid);
                session.add_score(SCORE_ASTEROID);
                world_setup::spawn_explosion(world, pos.x, pos.y, false, now_ms);
                audio.push(AudioCue::Explosion);
                break;
            }
        }

        if shot_spent {
            dead.insert(shot);
            despawn_buffer.push(shot);
        }
    }

    // --- Player against everything that falls or rams ---

    if let Some((_player_entity, player_pos, player_body)) = player {
        for &(invader, pos, body, _origin) in &invaders {
            if dead.contains(&invader) {
                continue;
            }
            if player_body.overlaps(&player_pos, &body, &pos) {
                dead.insert(invader);
                despawn_buffer.push(invader);
                lose_life(world, session, audio, player_pos, now_ms);
            }
        }

        for &(hazard, pos, body, fragment) in &hazards {
            if dead.contains(&hazard) {
                continue;
            }
            if player_body.overlaps(&player_pos, &body, &pos) {
                dead.insert(hazard);
                despawn_buffer.push(hazard);
                if !fragment && rng.gen_bool(FRAGMENT_CHANCE) {
                    world_setup::spawn_fragments(world, rng, pos.x, pos.y, now_ms);
                }
                lose_life(world, session, audio, player_pos, now_ms);
            }
        }

        for &(drop, pos, body, tier) in &powerups {
            if dead.contains(&drop) {
                continue;
            }
            if player_body.overlaps(&player_pos, &body, &pos) {
                dead.insert(drop);
                despawn_buffer.push(drop);
                session.apply_power_up(tier);
                audio.push(AudioCue::PowerUp);
            }
        }

        for &(pickup, pos, body) in &extra_lives {
            if dead.contains(&pickup) {
                continue;
            }
            if player_body.overlaps(&player_pos, &body, &pos) {
                dead.insert(pickup);
                despawn_buffer.push(pickup);
                session.gain_life();
                audio.push(AudioCue::PowerUp);
            }
        }

        for &(asteroid, pos, body) in &asteroids {
            if dead.contains(&asteroid) {
                continue;
            }
            if player_body.overlaps(&player_pos, &body, &pos) {
                dead.insert(asteroid);
                despawn_buffer.push(asteroid);
                lose_life(world, session, audio, player_pos, now_ms);
            }
        }
    }

    // --- Invaders breaking through the defense line ---

    for &(invader, pos, body, _origin) in &invaders {
        if dead.contains(&invader) {
            continue;
        }
        if pos.y + body.half_h >= FIELD_HEIGHT - BOTTOM_MARGIN {
            dead.insert(invader);
            despawn_buffer.push(invader);
            world_setup::spawn_explosion(world, pos.x, FIELD_HEIGHT - 20.0, false, now_ms);
            audio.push(AudioCue::Hit);
            session.lose_life();
        }
    }

    // Despawn everything resolved above; cancelling owned deferred actions
    // first keeps the queue from firing for a destroyed entity.
    for entity in despawn_buffer.drain(..) {
        actions.cancel_owned_by(entity);
        let _ = world.despawn(entity);
    }
}

/// Boss down: score it, clear its surviving minions, and queue the defeat
/// explosion sequence. The engine reports the level outcome after a short
/// settle delay.
#[allow(clippy::too_many_arguments)]
fn defeat_boss(
    world: &mut World,
    session: &mut SessionState,
    rng: &mut ChaCha8Rng,
    actions: &mut ActionQueue,
    audio: &mut Vec<AudioCue>,
    boss_defeated_at: &mut Option<f64>,
    dead: &mut HashSet<hecs::Entity>,
    despawn_buffer: &mut Vec<hecs::Entity>,
    boss_entity: hecs::Entity,
    boss_pos: Position,
    boss_body: Body,
    now_ms: f64,
) {
    session.add_score(SCORE_BOSS);
    audio.push(AudioCue::Explosion);
    *boss_defeated_at = Some(now_ms);

    dead.insert(boss_entity);
    despawn_buffer.push(boss_entity);

    let minions: Vec<hecs::Entity> = world
        .query_mut::<&Invader>()
        .into_iter()
        .map(|(e, _)| e)
        .collect();
    for minion in minions {
        if dead.insert(minion) {
            despawn_buffer.push(minion);
        }
    }

    for burst in 0..BOSS_DEFEAT_BURSTS {
        let x = boss_pos.x + rng.gen_range(-boss_body.half_w..boss_body.half_w);
        let y = boss_pos.y + rng.gen_range(-boss_body.half_h..boss_body.half_h);
        actions.schedule(
            now_ms + f64::from(burst) * BOSS_DEFEAT_BURST_GAP_MS,
            None,
            DeferredAction::SpawnExplosion { x, y, large: true },
        );
    }
}

/// Player takes a hit: explosion at the ship, one life gone.
fn lose_life(
    world: &mut World,
    session: &mut SessionState,
    audio: &mut Vec<AudioCue>,
    player_pos: Position,
    now_ms: f64,
) {
    world_setup::spawn_explosion(world, player_pos.x, player_pos.y, true, now_ms);
    audio.push(AudioCue::Hit);
    session.lose_life();
}

/// Snapshot (entity, position, body) triples for one category marker.
fn collect_tagged<T: hecs::Component>(world: &mut World) -> Vec<(hecs::Entity, Position, Body)> {
    world
        .query_mut::<(&T, &Position, &Body)>()
        .into_iter()
        .map(|(e, (_tag, pos, body))| (e, *pos, *body))
        .collect()
}
