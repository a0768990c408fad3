//! Per-encounter boss tuning and attack-pattern geometry.

use glam::DVec2;

use invaders_core::constants::*;
use invaders_core::enums::BossTier;

/// Static tuning for one boss encounter.
#[derive(Debug, Clone, Copy)]
pub struct BossProfile {
    pub max_health: i32,
    /// Horizontal speed in pixels per canonical frame.
    pub speed: f64,
    pub width: f64,
    pub height: f64,
    pub has_shield: bool,
    pub spawns_minions: bool,
}

/// Get the profile for a boss tier.
pub fn get_profile(tier: BossTier) -> BossProfile {
    match tier {
        BossTier::LevelFive => BossProfile {
            max_health: 50,
            speed: 3.0,
            width: 100.0,
            height: 80.0,
            has_shield: false,
            spawns_minions: false,
        },
        BossTier::LevelTen => BossProfile {
            max_health: 200,
            speed: 4.0,
            width: 150.0,
            height: 120.0,
            has_shield: true,
            spawns_minions: true,
        },
    }
}

/// One shot of an attack pattern: spawn offset relative to the boss's
/// bottom-center muzzle, plus a delay for staggered patterns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotSpec {
    pub offset: DVec2,
    pub delay_ms: f64,
}

/// Shots for one attack trigger. Patterns rotate round-robin:
/// 0 = radial burst staggered over time, 1 = horizontal line, 2 = cross.
pub fn attack_shots(pattern: u8) -> Vec<ShotSpec> {
    let mut shots = Vec::new();
    match pattern % 3 {
        0 => {
            for i in 0..BOSS_BURST_SHOTS {
                let angle = f64::from(i) / f64::from(BOSS_BURST_SHOTS) * std::f64::consts::TAU;
                shots.push(ShotSpec {
                    offset: DVec2::from_angle(angle) * BOSS_SHOT_SPREAD,
                    delay_ms: f64::from(i) * BOSS_BURST_STAGGER_MS,
                });
            }
        }
        1 => {
            for i in -2..=2 {
                shots.push(ShotSpec {
                    offset: DVec2::new(f64::from(i) * BOSS_SHOT_SPREAD, 0.0),
                    delay_ms: 0.0,
                });
            }
        }
        _ => {
            // Two mirrored diagonals; the center shot is doubled, matching
            // the doubled damage potential at the cross's heart.
            for i in -2..=2 {
                let dy = f64::from(i) * BOSS_SHOT_SPREAD;
                shots.push(ShotSpec {
                    offset: DVec2::new(f64::from(i) * BOSS_SHOT_SPREAD, dy),
                    delay_ms: 0.0,
                });
                shots.push(ShotSpec {
                    offset: DVec2::new(f64::from(-i) * BOSS_SHOT_SPREAD, dy),
                    delay_ms: 0.0,
                });
            }
        }
    }
    shots
}
