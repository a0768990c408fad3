//! Kill-point values and level-clear bonus arithmetic.

use invaders_core::constants::*;
use invaders_core::enums::WaveOrigin;

/// Points awarded for destroying an invader.
///
/// Reinforcement kills scale with level depth; minions score like grid
/// invaders.
pub fn kill_points(origin: WaveOrigin, level: u32) -> u32 {
    match origin {
        WaveOrigin::Initial | WaveOrigin::BossMinion => SCORE_INVADER,
        WaveOrigin::Reinforcement => {
            REINFORCEMENT_SCORE_BASE
                + REINFORCEMENT_SCORE_PER_LEVEL * level.saturating_sub(REINFORCEMENT_MIN_LEVEL)
        }
    }
}

/// Par time for a level in milliseconds.
pub fn level_par_ms(level: u32) -> f64 {
    let index = (level.clamp(1, MAX_LEVEL) - 1) as usize;
    LEVEL_PAR_MS[index]
}

/// Time bonus for clearing a level in `elapsed_ms`.
///
/// Early levels grant a flat base plus a per-second-under-par reward scaled
/// by how early the level is; later levels only reward beating par.
pub fn time_bonus(level: u32, elapsed_ms: f64) -> u32 {
    let par = level_par_ms(level);
    let under_par_secs = if elapsed_ms < par {
        ((par - elapsed_ms) / 1000.0).floor() as u32
    } else {
        0
    };

    if level < REINFORCEMENT_MIN_LEVEL {
        let multiplier = REINFORCEMENT_MIN_LEVEL - level;
        TIME_BONUS_BASE + under_par_secs * TIME_BONUS_PER_SEC * multiplier
    } else {
        under_par_secs * TIME_BONUS_PER_SEC
    }
}

/// Total bonus granted when a level is cleared.
pub fn level_clear_bonus(level: u32, elapsed_ms: f64, lives: u32) -> u32 {
    time_bonus(level, elapsed_ms) + lives * LIFE_BONUS_PER_LIFE
}
