//! Boss state machine.
//!
//! Transitions: a boss spawns `Active`, may raise its shield exactly once
//! (`Active -> Shielded -> Active` as the shield rises and is shot down),
//! and ends `Defeated`. Hit arithmetic, enrage, and bounded bounce motion
//! are pure functions over `BossState` and plain inputs.

use glam::DVec2;

use invaders_core::components::BossState;
use invaders_core::constants::*;
use invaders_core::enums::{BossHit, BossPhase, BossTier};

use crate::profiles::get_profile;

/// Build the state for a freshly spawned boss.
pub fn new_boss(tier: BossTier, now_ms: f64) -> BossState {
    let profile = get_profile(tier);
    BossState {
        tier,
        phase: BossPhase::Active,
        health: profile.max_health,
        max_health: profile.max_health,
        speed: profile.speed,
        dir_x: 1.0,
        dir_y: 1.0,
        attack_pattern: 0,
        last_attack_ms: now_ms,
        last_minion_ms: now_ms,
        shield_health: 0,
        shield_spent: false,
    }
}

/// Raise the shield if the conditions are met: final boss only, health
/// below half, shield not previously spent. Returns true when the shield
/// came up on this call.
pub fn maybe_raise_shield(state: &mut BossState) -> bool {
    if state.tier != BossTier::LevelTen
        || state.phase != BossPhase::Active
        || state.shield_spent
        || f64::from(state.health) >= f64::from(state.max_health) * BOSS_SHIELD_TRIGGER_FRACTION
    {
        return false;
    }
    state.phase = BossPhase::Shielded;
    state.shield_health = BOSS_SHIELD_HEALTH;
    state.shield_spent = true;
    true
}

/// Apply one shot landing on the boss.
///
/// While shielded, each hit drains a fixed amount of shield health and the
/// boss takes no damage; the hit that empties the shield drops it. Once
/// unshielded, each hit removes one health, speeds the boss up below the
/// enrage threshold, and the hit that empties health defeats it.
pub fn apply_hit(state: &mut BossState) -> BossHit {
    match state.phase {
        BossPhase::Defeated => BossHit::Defeated,
        BossPhase::Shielded => {
            state.shield_health -= BOSS_SHIELD_ABSORB;
            if state.shield_health <= 0 {
                state.shield_health = 0;
                state.phase = BossPhase::Active;
                BossHit::ShieldDown
            } else {
                BossHit::Absorbed
            }
        }
        BossPhase::Active => {
            state.health -= 1;
            if state.health <= 0 {
                state.health = 0;
                state.phase = BossPhase::Defeated;
                return BossHit::Defeated;
            }
            if f64::from(state.health) < f64::from(state.max_health) * BOSS_ENRAGE_FRACTION {
                state.speed *= BOSS_ENRAGE_FACTOR;
            }
            BossHit::Damaged
        }
    }
}

/// Updated position and bounce directions for one frame of motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionUpdate {
    pub position: DVec2,
    pub dir_x: f64,
    pub dir_y: f64,
}

/// Advance the boss one frame: horizontal bounce across the full field
/// width, vertical bounce within the boss band, independent axes.
pub fn advance_motion(state: &BossState, position: DVec2, half_extent: DVec2, scale: f64) -> MotionUpdate {
    let mut x = position.x + state.speed * state.dir_x * scale;
    let mut dir_x = state.dir_x;
    if x + half_extent.x >= FIELD_WIDTH {
        x = FIELD_WIDTH - half_extent.x;
        dir_x = -1.0;
    } else if x - half_extent.x <= 0.0 {
        x = half_extent.x;
        dir_x = 1.0;
    }

    let mut y = position.y + (state.speed / 2.0) * state.dir_y * scale;
    let mut dir_y = state.dir_y;
    let band_bottom = FIELD_HEIGHT - BOSS_BAND_BOTTOM_MARGIN;
    if y + half_extent.y >= band_bottom {
        y = band_bottom - half_extent.y;
        dir_y = -1.0;
    } else if y - half_extent.y <= BOSS_BAND_TOP {
        y = BOSS_BAND_TOP + half_extent.y;
        dir_y = 1.0;
    }

    MotionUpdate {
        position: DVec2::new(x, y),
        dir_x,
        dir_y,
    }
}
