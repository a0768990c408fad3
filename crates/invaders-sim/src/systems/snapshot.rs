//! Snapshot system: queries the ECS world and builds a complete
//! `FrameSnapshot`. Read-only — it never modifies the world.

use hecs::World;

use invaders_core::components::*;
use invaders_core::enums::{BossPhase, EntityKind, GamePhase};
use invaders_core::events::AudioCue;
use invaders_core::session::{LevelOutcome, SessionState};
use invaders_core::state::{BossView, EntityView, FrameSnapshot};
use invaders_core::types::Position;

/// Build the frame snapshot from the current world state.
pub fn build(
    world: &World,
    phase: GamePhase,
    session: &SessionState,
    audio_cues: Vec<AudioCue>,
    outcome: Option<LevelOutcome>,
) -> FrameSnapshot {
    let mut entities = Vec::new();
    push_views::<PlayerShip>(world, EntityKind::Player, &mut entities);
    push_invader_views(world, &mut entities);
    push_views::<BossState>(world, EntityKind::Boss, &mut entities);
    push_views::<PlayerShot>(world, EntityKind::PlayerShot, &mut entities);
    push_views::<Hazard>(world, EntityKind::Hazard, &mut entities);
    push_power_up_views(world, &mut entities);
    push_views::<ExtraLifeDrop>(world, EntityKind::ExtraLife, &mut entities);
    push_views::<AsteroidDrift>(world, EntityKind::Asteroid, &mut entities);
    push_views::<Explosion>(world, EntityKind::Explosion, &mut entities);

    FrameSnapshot {
        phase,
        session: session.clone(),
        entities,
        boss: build_boss(world),
        audio_cues,
        outcome,
    }
}

/// Boss health bar, while a boss is on the field.
fn build_boss(world: &World) -> Option<BossView> {
    world
        .query::<&BossState>()
        .iter()
        .next()
        .map(|(_entity, state)| BossView {
            health: state.health,
            max_health: state.max_health,
            shield_active: state.phase == BossPhase::Shielded,
            shield_health: state.shield_health,
        })
}

/// Invader art cycles every four grid rows.
fn push_invader_views(world: &World, out: &mut Vec<EntityView>) {
    for (entity, (invader, pos, body)) in world.query::<(&Invader, &Position, &Body)>().iter() {
        out.push(EntityView {
            id: entity.to_bits().get(),
            kind: EntityKind::Invader,
            x: pos.x,
            y: pos.y,
            width: body.half_w * 2.0,
            height: body.half_h * 2.0,
            rotation: 0.0,
            variant: invader.row % 4,
        });
    }
}

/// Power-up art follows the weapon tier.
fn push_power_up_views(world: &World, out: &mut Vec<EntityView>) {
    for (entity, (drop, pos, body)) in world.query::<(&PowerUpDrop, &Position, &Body)>().iter() {
        let rotation = spin_angle(world, entity);
        out.push(EntityView {
            id: entity.to_bits().get(),
            kind: EntityKind::PowerUp,
            x: pos.x,
            y: pos.y,
            width: body.half_w * 2.0,
            height: body.half_h * 2.0,
            rotation,
            variant: drop.tier as u32,
        });
    }
}

/// Append a view for every entity carrying the category marker `T`.
fn push_views<T: hecs::Component>(world: &World, kind: EntityKind, out: &mut Vec<EntityView>) {
    for (entity, (_tag, pos, body)) in world.query::<(&T, &Position, &Body)>().iter() {
        let rotation = spin_angle(world, entity);
        out.push(EntityView {
            id: entity.to_bits().get(),
            kind,
            x: pos.x,
            y: pos.y,
            width: body.half_w * 2.0,
            height: body.half_h * 2.0,
            rotation,
            variant: 0,
        });
    }
}

fn spin_angle(world: &World, entity: hecs::Entity) -> f64 {
    world
        .get::<&Spin>(entity)
        .map(|spin| spin.angle)
        .unwrap_or(0.0)
}
