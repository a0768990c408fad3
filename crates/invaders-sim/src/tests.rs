//! Tests for the play-session engine: wave integrity, reinforcements,
//! boss encounters, collision scoring, terminal conditions, determinism.

use hecs::Entity;

use invaders_core::commands::{InputState, PlayerCommand};
use invaders_core::components::*;
use invaders_core::constants::*;
use invaders_core::enums::*;
use invaders_core::session::{LevelOutcome, SessionState};
use invaders_core::types::{Position, Velocity};

use crate::engine::{GameEngine, SimConfig};
use crate::scoring;

fn engine() -> GameEngine {
    GameEngine::new(SimConfig::default())
}

/// Engine already playing the given level, clock bootstrapped at t=0.
fn playing(level: u32) -> GameEngine {
    let mut engine = engine();
    engine.start_level_for_test(level, 0.0);
    engine.update(0.0);
    engine
}

fn invader_entities(engine: &mut GameEngine) -> Vec<Entity> {
    engine
        .world_mut()
        .query_mut::<&Invader>()
        .into_iter()
        .map(|(entity, _)| entity)
        .collect()
}

fn original_entities(engine: &mut GameEngine) -> Vec<Entity> {
    engine
        .world_mut()
        .query_mut::<&Invader>()
        .into_iter()
        .filter(|(_, invader)| invader.origin == WaveOrigin::Initial)
        .map(|(entity, _)| entity)
        .collect()
}

fn count_invaders(engine: &mut GameEngine, origin: WaveOrigin) -> usize {
    engine
        .world_mut()
        .query_mut::<&Invader>()
        .into_iter()
        .filter(|(_, invader)| invader.origin == origin)
        .count()
}

fn despawn(engine: &mut GameEngine, entities: &[Entity]) {
    for &entity in entities {
        let _ = engine.world_mut().despawn(entity);
    }
}

fn player_position(engine: &mut GameEngine) -> Position {
    engine
        .world_mut()
        .query_mut::<(&PlayerShip, &Position)>()
        .into_iter()
        .map(|(_, (_, pos))| *pos)
        .next()
        .expect("player ship")
}

/// Spawn a stationary player shot at the given position.
fn spawn_test_shot(engine: &mut GameEngine, x: f64, y: f64) {
    engine.world_mut().spawn((
        PlayerShot,
        Position::new(x, y),
        Velocity::new(0.0, 0.0),
        Body::new(SHOT_WIDTH, SHOT_HEIGHT),
    ));
}

fn spawn_test_invader(engine: &mut GameEngine, x: f64, y: f64, origin: WaveOrigin, hp: i32) {
    engine.world_mut().spawn((
        Invader {
            origin,
            row: 0,
            col: 0,
            fresh_row: false,
            descent_target_y: None,
            arrived_at_ms: None,
            last_hazard_ms: 0.0,
            hazard_probability: 0.0,
        },
        Position::new(x, y),
        Body::new(INVADER_WIDTH, INVADER_HEIGHT),
        Health::new(hp),
    ));
}

// ---- Wave integrity ----

#[test]
fn test_initial_wave_shape_and_health() {
    let mut engine = playing(1);

    let mut rows = std::collections::HashMap::new();
    let mut count = 0;
    for (_entity, (invader, health)) in engine.world_mut().query_mut::<(&Invader, &Health)>() {
        count += 1;
        assert_eq!(invader.origin, WaveOrigin::Initial);
        rows.entry(invader.row).or_insert_with(Vec::new).push(health.hp);
    }
    assert_eq!(count, (INVADER_ROWS * INVADER_COLS) as usize);
    assert_eq!(rows.len(), INVADER_ROWS as usize);

    // Row health runs 4, 3, 2, 1 top to bottom.
    for (row, hps) in &rows {
        assert_eq!(hps.len(), INVADER_COLS as usize);
        for hp in hps {
            assert_eq!(*hp, 4 - *row as i32, "row {row} health");
        }
    }
}

#[test]
fn test_initial_wave_columns_evenly_spaced() {
    let mut engine = playing(1);

    let mut xs: Vec<f64> = engine
        .world_mut()
        .query_mut::<(&Invader, &Position)>()
        .into_iter()
        .filter(|(_, (invader, _))| invader.row == 0)
        .map(|(_, (_, pos))| pos.x)
        .collect();
    xs.sort_by(f64::total_cmp);
    assert_eq!(xs.len(), INVADER_COLS as usize);
    for pair in xs.windows(2) {
        assert!(
            (pair[1] - pair[0] - (INVADER_WIDTH + INVADER_SPACING)).abs() < 1e-9,
            "columns must be evenly spaced"
        );
    }
}

#[test]
fn test_deeper_levels_start_lower() {
    let mut level1 = playing(1);
    let mut level4 = playing(4);
    let top = |engine: &mut GameEngine| {
        engine
            .world_mut()
            .query_mut::<(&Invader, &Position)>()
            .into_iter()
            .map(|(_, (_, pos))| pos.y)
            .fold(f64::MAX, f64::min)
    };
    let delta = top(&mut level4) - top(&mut level1);
    assert!(
        (delta - f64::from(GRID_LEVEL_OFFSET_CAP) * GRID_LEVEL_OFFSET).abs() < 1e-9
    );
}

#[test]
fn test_snapshot_invader_art_cycles_by_row() {
    let mut engine = playing(1);
    let snapshot = engine.update(CANONICAL_FRAME_MS);
    let variants: std::collections::HashSet<u32> = snapshot
        .entities
        .iter()
        .filter(|view| view.kind == EntityKind::Invader)
        .map(|view| view.variant)
        .collect();
    // Four rows, four sprite variants.
    assert_eq!(variants.len(), 4);
    assert!(variants.iter().all(|v| *v < 4));
}

// ---- Formation movement ----

#[test]
fn test_thinning_wave_speeds_up() {
    let step_for_survivors = |keep: usize| {
        let mut engine = playing(1);
        let originals = original_entities(&mut engine);
        despawn(&mut engine, &originals[keep..]);
        let before: f64 = engine
            .world_mut()
            .query_mut::<(&Invader, &Position)>()
            .into_iter()
            .map(|(_, (_, pos))| pos.x)
            .next()
            .unwrap();
        engine.update(CANONICAL_FRAME_MS);
        let after: f64 = engine
            .world_mut()
            .query_mut::<(&Invader, &Position)>()
            .into_iter()
            .map(|(_, (_, pos))| pos.x)
            .next()
            .unwrap();
        after - before
    };

    let full = step_for_survivors(40);
    let five = step_for_survivors(5);
    assert!((full - INVADER_STEP).abs() < 1e-9);
    assert!((five - (INVADER_STEP + SPEED_BONUS_UNDER_5)).abs() < 1e-9);
}

#[test]
fn test_edge_contact_reverses_formation_and_steps_down() {
    let mut engine = playing(1);

    // Park one invader at the right edge; the whole formation must react.
    let target = invader_entities(&mut engine)[0];
    {
        let mut pos = engine.world_mut().get::<&mut Position>(target).unwrap();
        pos.x = FIELD_WIDTH - INVADER_WIDTH / 2.0 - 0.5;
    }
    let ys_before: Vec<f64> = engine
        .world_mut()
        .query_mut::<(&Invader, &Position)>()
        .into_iter()
        .map(|(_, (_, pos))| pos.y)
        .collect();

    engine.update(CANONICAL_FRAME_MS);

    let ys_after: Vec<f64> = engine
        .world_mut()
        .query_mut::<(&Invader, &Position)>()
        .into_iter()
        .map(|(_, (_, pos))| pos.y)
        .collect();
    assert_eq!(ys_before.len(), ys_after.len());
    for (before, after) in ys_before.iter().zip(&ys_after) {
        assert!(
            (after - before - FORMATION_DROP).abs() < 1e-9,
            "every invader steps down together"
        );
    }

    // Reversed: the next frame moves everyone left.
    let x_before: f64 = engine
        .world_mut()
        .query_mut::<(&Invader, &Position)>()
        .into_iter()
        .map(|(_, (_, pos))| pos.x)
        .next()
        .unwrap();
    engine.update(2.0 * CANONICAL_FRAME_MS);
    let x_after: f64 = engine
        .world_mut()
        .query_mut::<(&Invader, &Position)>()
        .into_iter()
        .map(|(_, (_, pos))| pos.x)
        .next()
        .unwrap();
    assert!(x_after < x_before);
}

// ---- Reinforcements ----

#[test]
fn test_reinforcement_trigger_level7_adds_two_rows_once() {
    let mut engine = playing(7);

    // Thin the original wave down to exactly one column's worth.
    let originals = original_entities(&mut engine);
    despawn(&mut engine, &originals[INVADER_COLS as usize..]);

    engine.update(CANONICAL_FRAME_MS);

    assert!(engine.session().reinforcements_added);
    assert_eq!(
        count_invaders(&mut engine, WaveOrigin::Reinforcement),
        2 * INVADER_COLS as usize,
        "level 7 adds level - 5 = 2 rows"
    );

    // Batch rows get tougher as they stack: health 4 + row index.
    for (_entity, (invader, health)) in engine.world_mut().query_mut::<(&Invader, &Health)>() {
        if invader.origin == WaveOrigin::Reinforcement {
            assert_eq!(health.hp, REINFORCEMENT_BASE_HEALTH + invader.row as i32);
            assert!(invader.fresh_row);
            assert!(invader.descent_target_y.is_some());
        }
    }

    // The trigger is one-shot even though the condition still holds.
    let originals = original_entities(&mut engine);
    despawn(&mut engine, &originals[..1]);
    engine.update(2.0 * CANONICAL_FRAME_MS);
    assert_eq!(
        count_invaders(&mut engine, WaveOrigin::Reinforcement),
        2 * INVADER_COLS as usize
    );
}

#[test]
fn test_no_reinforcements_on_early_levels() {
    let mut engine = playing(4);
    let originals = original_entities(&mut engine);
    despawn(&mut engine, &originals[5..]);
    engine.update(CANONICAL_FRAME_MS);
    assert_eq!(count_invaders(&mut engine, WaveOrigin::Reinforcement), 0);
    assert!(!engine.session().reinforcements_added);
}

#[test]
fn test_reinforcement_rows_descend_to_formation() {
    let mut engine = playing(6);
    let originals = original_entities(&mut engine);
    despawn(&mut engine, &originals[..]);

    // Trigger fires with zero originals left; one row spawns above the field.
    engine.update(CANONICAL_FRAME_MS);
    let above = engine
        .world_mut()
        .query_mut::<(&Invader, &Position)>()
        .into_iter()
        .filter(|(_, (_, pos))| pos.y < 0.0)
        .count();
    assert_eq!(above, INVADER_COLS as usize);

    // Descending at ~1px/frame, the row reaches its slot well within
    // REINFORCEMENT_ENTRY_OFFSET frames and later sheds the fresh flag.
    let mut now = CANONICAL_FRAME_MS;
    for _ in 0..(REINFORCEMENT_ENTRY_OFFSET as usize + 10) {
        now += CANONICAL_FRAME_MS;
        engine.update(now);
    }
    for (_entity, (invader, pos)) in engine.world_mut().query_mut::<(&Invader, &Position)>() {
        assert!(invader.descent_target_y.is_none(), "row must have arrived");
        assert!(invader.arrived_at_ms.is_some());
        assert!(pos.y >= GRID_TOP_Y - 1e-9);
    }

    // Dwell out the fresh-row window (plus slack for the arrival time).
    for _ in 0..((REINFORCEMENT_DWELL_MS / CANONICAL_FRAME_MS) as usize + 10) {
        now += CANONICAL_FRAME_MS;
        engine.update(now);
    }
    for (_entity, invader) in engine.world_mut().query_mut::<&Invader>() {
        assert!(!invader.fresh_row);
    }
}

// ---- Collision scoring ----

#[test]
fn test_shot_kills_award_points_by_origin() {
    let mut engine = playing(8);

    // Plant one of each target well below the grid, each with a stationary
    // shot on top of it.
    spawn_test_invader(&mut engine, 200.0, 300.0, WaveOrigin::Initial, 1);
    spawn_test_invader(&mut engine, 400.0, 300.0, WaveOrigin::Reinforcement, 1);
    engine.world_mut().spawn((
        AsteroidDrift,
        Position::new(600.0, 300.0),
        Body::new(ASTEROID_SIZE, ASTEROID_SIZE),
    ));
    spawn_test_shot(&mut engine, 200.0, 300.0);
    spawn_test_shot(&mut engine, 400.0, 300.0);
    spawn_test_shot(&mut engine, 600.0, 300.0);

    let before = engine.session().score;
    engine.update(CANONICAL_FRAME_MS);

    let expected = scoring::kill_points(WaveOrigin::Initial, 8)
        + scoring::kill_points(WaveOrigin::Reinforcement, 8)
        + SCORE_ASTEROID;
    assert_eq!(engine.session().score, before + expected);
    // Reinforcement kill at level 8 is 15 + 5 * 2.
    assert_eq!(scoring::kill_points(WaveOrigin::Reinforcement, 8), 25);
}

#[test]
fn test_score_total_independent_of_tick_granularity() {
    let run = |deltas: &[f64]| {
        let mut engine = playing(8);
        spawn_test_invader(&mut engine, 200.0, 300.0, WaveOrigin::Reinforcement, 1);
        spawn_test_invader(&mut engine, 400.0, 300.0, WaveOrigin::Initial, 1);
        engine.world_mut().spawn((
            AsteroidDrift,
            Position::new(600.0, 300.0),
            Body::new(ASTEROID_SIZE, ASTEROID_SIZE),
        ));
        spawn_test_shot(&mut engine, 200.0, 300.0);
        spawn_test_shot(&mut engine, 400.0, 300.0);
        spawn_test_shot(&mut engine, 600.0, 300.0);

        let mut now = 0.0;
        for delta in deltas {
            now += delta;
            engine.update(now);
        }
        engine.session().score
    };

    // The same collision events split across coarser or finer ticks must
    // not change the total.
    let coarse = run(&[CANONICAL_FRAME_MS, CANONICAL_FRAME_MS]);
    let fine = run(&[8.0, 8.0, 8.0, 8.0]);
    let minimal = run(&[5.0; 7]);
    assert_eq!(coarse, fine);
    assert_eq!(coarse, minimal);
    assert_eq!(coarse, 25 + 10 + 15);
}

#[test]
fn test_damaged_invader_survives_until_health_empties() {
    let mut engine = playing(1);
    spawn_test_invader(&mut engine, 400.0, 300.0, WaveOrigin::Initial, 2);
    spawn_test_shot(&mut engine, 400.0, 300.0);

    let before = engine.session().score;
    engine.update(CANONICAL_FRAME_MS);
    // First hit: damaged, no score, invader alive.
    assert_eq!(engine.session().score, before);

    spawn_test_shot(&mut engine, 400.0, 300.0);
    engine.update(2.0 * CANONICAL_FRAME_MS);
    assert_eq!(engine.session().score, before + SCORE_INVADER);
}

#[test]
fn test_player_collisions_cost_lives() {
    let mut engine = playing(1);
    let player = player_position(&mut engine);
    let lives = engine.session().lives;

    // A fragment hazard: damages the player but never shatters further,
    // keeping the life count deterministic.
    engine.world_mut().spawn((
        Hazard { fragment: true },
        Position::new(player.x, player.y),
        Body::new(HAZARD_WIDTH, HAZARD_HEIGHT),
    ));
    engine.update(CANONICAL_FRAME_MS);
    assert_eq!(engine.session().lives, lives - 1);

    engine.world_mut().spawn((
        AsteroidDrift,
        Position::new(player.x, player.y),
        Body::new(ASTEROID_SIZE, ASTEROID_SIZE),
    ));
    engine.update(2.0 * CANONICAL_FRAME_MS);
    assert_eq!(engine.session().lives, lives - 2);
}

#[test]
fn test_invader_reaching_bottom_costs_life_and_despawns() {
    let mut engine = playing(1);
    let lives = engine.session().lives;
    spawn_test_invader(
        &mut engine,
        100.0,
        FIELD_HEIGHT - BOTTOM_MARGIN,
        WaveOrigin::Initial,
        3,
    );

    engine.update(CANONICAL_FRAME_MS);
    assert_eq!(engine.session().lives, lives - 1);
    assert_eq!(count_invaders(&mut engine, WaveOrigin::Initial), 40);
}

// ---- Terminal conditions ----

#[test]
fn test_life_loss_on_last_life_reports_defeat() {
    let mut engine = playing(1);
    engine.session_mut().lives = 1;
    let player = player_position(&mut engine);
    engine.world_mut().spawn((
        Hazard { fragment: false },
        Position::new(player.x, player.y),
        Body::new(HAZARD_WIDTH, HAZARD_HEIGHT),
    ));

    let snapshot = engine.update(CANONICAL_FRAME_MS);
    match snapshot.outcome {
        Some(LevelOutcome::PlayerDefeated { state }) => {
            assert_eq!(state.lives, 0, "lives reported exactly 0, never negative");
        }
        other => panic!("expected PlayerDefeated, got {other:?}"),
    }
    assert_eq!(engine.phase(), GamePhase::GameOver);
}

#[test]
fn test_clearing_wave_completes_level_with_bonus() {
    let mut engine = playing(1);
    let originals = original_entities(&mut engine);
    despawn(&mut engine, &originals);

    let snapshot = engine.update(CANONICAL_FRAME_MS);
    let expected_bonus =
        scoring::level_clear_bonus(1, CANONICAL_FRAME_MS, STARTING_LIVES);
    match snapshot.outcome {
        Some(LevelOutcome::LevelCleared { state }) => {
            assert_eq!(state.score, expected_bonus);
            assert_eq!(state.level, 1);
        }
        other => panic!("expected LevelCleared, got {other:?}"),
    }
    assert_eq!(engine.phase(), GamePhase::LevelComplete);

    // The outcome is reported exactly once.
    let snapshot = engine.update(2.0 * CANONICAL_FRAME_MS);
    assert!(snapshot.outcome.is_none());
}

#[test]
fn test_advance_level_carries_session_forward() {
    let mut engine = playing(1);
    let originals = original_entities(&mut engine);
    despawn(&mut engine, &originals);
    engine.update(CANONICAL_FRAME_MS);
    let score_after_clear = engine.session().score;
    assert!(score_after_clear > 0);

    engine.queue_command(PlayerCommand::AdvanceLevel);
    engine.update(2.0 * CANONICAL_FRAME_MS);
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(engine.session().level, 2);
    assert_eq!(engine.session().score, score_after_clear);
    assert_eq!(count_invaders(&mut engine, WaveOrigin::Initial), 40);
}

// ---- Boss encounters ----

#[test]
fn test_boss_spawns_on_level5_when_wave_nearly_cleared() {
    let mut engine = playing(5);
    let originals = original_entities(&mut engine);
    despawn(&mut engine, &originals[1..]);

    engine.update(CANONICAL_FRAME_MS);

    assert!(engine.session().boss_spawned);
    let bosses: Vec<BossState> = engine
        .world_mut()
        .query_mut::<&BossState>()
        .into_iter()
        .map(|(_, state)| state.clone())
        .collect();
    assert_eq!(bosses.len(), 1);
    assert_eq!(bosses[0].tier, BossTier::LevelFive);
    assert_eq!(bosses[0].max_health, 50);
    // The last grid stragglers are removed at spawn.
    assert_eq!(invader_entities(&mut engine).len(), 0);
}

#[test]
fn test_final_boss_spawns_by_timer() {
    let mut engine = playing(10);
    // Full wave: the count trigger cannot fire, only the level timer.
    engine.update(CANONICAL_FRAME_MS);
    assert!(!engine.session().boss_spawned);

    engine.update(BOSS_L10_TRIGGER_MS + CANONICAL_FRAME_MS);
    assert!(engine.session().boss_spawned);
    let tier = engine
        .world_mut()
        .query_mut::<&BossState>()
        .into_iter()
        .map(|(_, state)| state.tier)
        .next();
    assert_eq!(tier, Some(BossTier::LevelTen));
}

#[test]
fn test_boss_attack_cycle_schedules_staggered_burst() {
    let mut engine = playing(5);
    let originals = original_entities(&mut engine);
    despawn(&mut engine, &originals);
    engine.update(CANONICAL_FRAME_MS); // boss spawns here

    let hazard_count = |engine: &mut GameEngine| {
        engine
            .world_mut()
            .query_mut::<&Hazard>()
            .into_iter()
            .count()
    };
    assert_eq!(hazard_count(&mut engine), 0);

    // First attack fires pattern 0: an 8-shot radial burst staggered
    // 100ms apart. The first sub-shot lands on the attack tick, the rest
    // stay queued.
    engine.update(CANONICAL_FRAME_MS + BOSS_ATTACK_INTERVAL_MS + 1.0);
    assert_eq!(hazard_count(&mut engine), 1);
    assert_eq!(engine.action_queue().len(), (BOSS_BURST_SHOTS - 1) as usize);

    // One stagger step later the second sub-shot is out.
    engine.update(CANONICAL_FRAME_MS + BOSS_ATTACK_INTERVAL_MS + BOSS_BURST_STAGGER_MS + 1.0);
    assert_eq!(hazard_count(&mut engine), 2);
}

#[test]
fn test_final_boss_spawns_flanking_minions() {
    let mut engine = playing(10);
    // Model the late-wave state: reinforcements already came and went.
    engine.session_mut().reinforcements_added = true;
    let originals = original_entities(&mut engine);
    despawn(&mut engine, &originals[5..]);
    engine.update(CANONICAL_FRAME_MS); // boss spawns, grid removed

    assert_eq!(count_invaders(&mut engine, WaveOrigin::BossMinion), 0);
    engine.update(CANONICAL_FRAME_MS + BOSS_MINION_INTERVAL_MS + 1.0);
    assert_eq!(count_invaders(&mut engine, WaveOrigin::BossMinion), 2);
}

#[test]
fn test_boss_defeat_clears_level_and_minions() {
    let mut engine = playing(5);
    let originals = original_entities(&mut engine);
    despawn(&mut engine, &originals);
    engine.update(CANONICAL_FRAME_MS); // boss spawns

    // Bring the boss to its last hit point, then land one more.
    let boss_entity = engine
        .world_mut()
        .query_mut::<&BossState>()
        .into_iter()
        .map(|(entity, _)| entity)
        .next()
        .unwrap();
    let boss_pos = *engine.world_mut().get::<&Position>(boss_entity).unwrap();
    engine
        .world_mut()
        .get::<&mut BossState>(boss_entity)
        .unwrap()
        .health = 1;
    spawn_test_shot(&mut engine, boss_pos.x, boss_pos.y);

    let before = engine.session().score;
    let mut now = 2.0 * CANONICAL_FRAME_MS;
    let snapshot = engine.update(now);
    assert_eq!(engine.session().score, before + SCORE_BOSS);
    assert!(snapshot.boss.is_none(), "boss entity removed on defeat");

    // The clear is reported after the defeat burst settles.
    let mut cleared = false;
    for _ in 0..((BOSS_DEFEAT_SETTLE_MS / CANONICAL_FRAME_MS) as usize + 2) {
        now += CANONICAL_FRAME_MS;
        if let Some(LevelOutcome::LevelCleared { .. }) = engine.update(now).outcome {
            cleared = true;
            break;
        }
    }
    assert!(cleared);
    assert_eq!(engine.phase(), GamePhase::LevelComplete);
}

#[test]
fn test_final_boss_defeat_wins_the_game() {
    let mut engine = playing(10);
    engine.session_mut().reinforcements_added = true;
    let originals = original_entities(&mut engine);
    despawn(&mut engine, &originals[5..]);
    engine.update(CANONICAL_FRAME_MS); // boss spawns

    let boss_entity = engine
        .world_mut()
        .query_mut::<&BossState>()
        .into_iter()
        .map(|(entity, _)| entity)
        .next()
        .unwrap();
    let boss_pos = *engine.world_mut().get::<&Position>(boss_entity).unwrap();
    {
        // Model a boss already fought through its shield phase.
        let mut state = engine.world_mut().get::<&mut BossState>(boss_entity).unwrap();
        state.health = 1;
        state.shield_spent = true;
    }
    spawn_test_shot(&mut engine, boss_pos.x, boss_pos.y);

    let mut now = 2.0 * CANONICAL_FRAME_MS;
    engine.update(now);
    assert_eq!(invader_entities(&mut engine).len(), 0, "minions go with the boss");

    let mut won = false;
    for _ in 0..((BOSS_DEFEAT_SETTLE_MS / CANONICAL_FRAME_MS) as usize + 2) {
        now += CANONICAL_FRAME_MS;
        if let Some(LevelOutcome::GameWon { .. }) = engine.update(now).outcome {
            won = true;
            break;
        }
    }
    assert!(won);
    assert_eq!(engine.phase(), GamePhase::Victory);
}

// ---- Pickups and weapon tiers ----

#[test]
fn test_power_up_collection_is_monotonic() {
    let mut engine = playing(3);

    // A rapid-fire pickup spawns at level 3 start; drop it on the player.
    let player = player_position(&mut engine);
    let pickup = engine
        .world_mut()
        .query_mut::<&PowerUpDrop>()
        .into_iter()
        .map(|(entity, _)| entity)
        .next()
        .expect("level 3 spawns a power-up");
    *engine.world_mut().get::<&mut Position>(pickup).unwrap() = player;
    engine.update(CANONICAL_FRAME_MS);
    assert!(engine.session().auto_fire);
    assert_eq!(engine.session().laser_count, 1);

    // Collect a quad-shot upgrade, then a stray rapid-fire again: the quad
    // shot must survive.
    let player = player_position(&mut engine);
    engine.world_mut().spawn((
        PowerUpDrop {
            tier: PowerUpTier::QuadShot,
        },
        Position::new(player.x, player.y),
        Body::new(PICKUP_SIZE, PICKUP_SIZE),
    ));
    engine.update(2.0 * CANONICAL_FRAME_MS);
    assert_eq!(engine.session().laser_count, 4);

    let player = player_position(&mut engine);
    engine.world_mut().spawn((
        PowerUpDrop {
            tier: PowerUpTier::RapidFire,
        },
        Position::new(player.x, player.y),
        Body::new(PICKUP_SIZE, PICKUP_SIZE),
    ));
    engine.update(3.0 * CANONICAL_FRAME_MS);
    assert_eq!(engine.session().laser_count, 4, "no downgrade");
}

#[test]
fn test_extra_life_pickup_grants_life() {
    let mut engine = playing(1);
    let lives = engine.session().lives;
    let player = player_position(&mut engine);
    engine.world_mut().spawn((
        ExtraLifeDrop,
        Position::new(player.x, player.y),
        Body::new(PICKUP_SIZE, PICKUP_SIZE),
    ));
    engine.update(CANONICAL_FRAME_MS);
    assert_eq!(engine.session().lives, lives + 1);
}

#[test]
fn test_quad_shot_fires_four_lasers() {
    let mut engine = playing(1);
    engine.session_mut().laser_count = 4;
    engine.queue_command(PlayerCommand::SetInput {
        input: InputState {
            left: false,
            right: false,
            fire: true,
        },
    });
    engine.update(CANONICAL_FRAME_MS);
    let shots = engine
        .world_mut()
        .query_mut::<&PlayerShot>()
        .into_iter()
        .count();
    assert_eq!(shots, 4);
}

#[test]
fn test_fire_cooldown_limits_rate() {
    let mut engine = playing(1);
    engine.queue_command(PlayerCommand::SetInput {
        input: InputState {
            left: false,
            right: false,
            fire: true,
        },
    });
    let mut now = 0.0;
    for _ in 0..6 {
        now += CANONICAL_FRAME_MS;
        engine.update(now);
    }
    // 6 frames is ~100ms: well inside one 500ms cooldown window.
    let shots = engine
        .world_mut()
        .query_mut::<&PlayerShot>()
        .into_iter()
        .count();
    assert_eq!(shots, 1);
}

// ---- Cleanup ----

#[test]
fn test_shots_are_swept_off_the_top() {
    let mut engine = playing(1);
    engine.world_mut().spawn((
        PlayerShot,
        Position::new(100.0, 2.0),
        Velocity::new(0.0, -SHOT_STEP),
        Body::new(SHOT_WIDTH, SHOT_HEIGHT),
    ));
    let mut now = 0.0;
    for _ in 0..4 {
        now += CANONICAL_FRAME_MS;
        engine.update(now);
    }
    let shots = engine
        .world_mut()
        .query_mut::<&PlayerShot>()
        .into_iter()
        .count();
    assert_eq!(shots, 0);
}

#[test]
fn test_expired_ephemerals_are_swept() {
    let mut engine = playing(1);
    engine.world_mut().spawn((
        Explosion { large: false },
        Position::new(100.0, 100.0),
        Body::new(EXPLOSION_SIZE, EXPLOSION_SIZE),
        Lifetime {
            expires_at_ms: EXPLOSION_LIFETIME_MS,
        },
    ));
    let mut now = 0.0;
    for _ in 0..((EXPLOSION_LIFETIME_MS / CANONICAL_FRAME_MS) as usize + 2) {
        now += CANONICAL_FRAME_MS;
        engine.update(now);
    }
    let explosions = engine
        .world_mut()
        .query_mut::<&Explosion>()
        .into_iter()
        .count();
    assert_eq!(explosions, 0);
}

// ---- Phases and pausing ----

#[test]
fn test_pause_freezes_the_field() {
    let mut engine = playing(1);
    engine.update(CANONICAL_FRAME_MS);
    engine.queue_command(PlayerCommand::Pause);
    engine.update(2.0 * CANONICAL_FRAME_MS);
    assert_eq!(engine.phase(), GamePhase::Paused);

    let xs = |engine: &mut GameEngine| {
        let mut xs: Vec<f64> = engine
            .world_mut()
            .query_mut::<(&Invader, &Position)>()
            .into_iter()
            .map(|(_, (_, pos))| pos.x)
            .collect();
        xs.sort_by(f64::total_cmp);
        xs
    };
    let frozen = xs(&mut engine);
    for i in 0..5 {
        engine.update((3.0 + i as f64) * CANONICAL_FRAME_MS);
    }
    assert_eq!(xs(&mut engine), frozen);

    engine.queue_command(PlayerCommand::Resume);
    engine.update(10.0 * CANONICAL_FRAME_MS);
    engine.update(11.0 * CANONICAL_FRAME_MS);
    assert_ne!(xs(&mut engine), frozen);
}

#[test]
fn test_return_to_menu_tears_down_the_field() {
    let mut engine = playing(1);
    engine.queue_command(PlayerCommand::ReturnToMenu);
    let snapshot = engine.update(CANONICAL_FRAME_MS);
    assert_eq!(engine.phase(), GamePhase::MainMenu);
    assert!(snapshot.entities.is_empty());
    assert!(engine.action_queue().is_empty());
}

// ---- Determinism ----

#[test]
fn test_same_seed_same_session() {
    let mut engine_a = GameEngine::new(SimConfig { seed: 1234 });
    let mut engine_b = GameEngine::new(SimConfig { seed: 1234 });
    for engine in [&mut engine_a, &mut engine_b] {
        engine.queue_command(PlayerCommand::StartRun);
        engine.queue_command(PlayerCommand::SetInput {
            input: InputState {
                left: false,
                right: true,
                fire: true,
            },
        });
    }

    let mut now = 0.0;
    for _ in 0..300 {
        let snap_a = engine_a.update(now);
        let snap_b = engine_b.update(now);
        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "snapshots diverged with same seed");
        now += CANONICAL_FRAME_MS;
    }
}

#[test]
fn test_load_session_resumes_persisted_state() {
    let mut engine = engine();
    let mut state = SessionState::new_run();
    state.score = 4321;
    state.lives = 2;
    state.level = 9;
    state.laser_count = 2;
    engine.queue_command(PlayerCommand::LoadSession { state });
    engine.update(0.0);

    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(engine.session().score, 4321);
    assert_eq!(engine.session().level, 9);
    assert_eq!(engine.session().laser_count, 2);
    // Level 9 offers the quad-shot pickup.
    let pickups = engine
        .world_mut()
        .query_mut::<&PowerUpDrop>()
        .into_iter()
        .map(|(_, drop)| drop.tier)
        .collect::<Vec<_>>();
    assert_eq!(pickups, vec![PowerUpTier::QuadShot]);
}
