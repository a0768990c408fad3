//! Frame snapshot — the complete visible state sent to the frontend each tick.

use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, GamePhase};
use crate::events::AudioCue;
use crate::session::{LevelOutcome, SessionState};

/// Everything the renderer and HUD need for one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub session: SessionState,
    pub entities: Vec<EntityView>,
    /// Present while a boss is on the field.
    pub boss: Option<BossView>,
    /// Fire-and-forget audio cues since the last snapshot.
    pub audio_cues: Vec<AudioCue>,
    /// Set exactly once, on the tick a level attempt ends.
    pub outcome: Option<LevelOutcome>,
}

/// One drawable entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    /// Stable id for the renderer to track sprites across frames.
    pub id: u64,
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, for spinning entities.
    pub rotation: f64,
    /// Sprite variant within the kind: invader art cycles by grid row,
    /// power-up art follows the tier. 0 for kinds with a single sprite.
    pub variant: u32,
}

/// Boss health bar state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossView {
    pub health: i32,
    pub max_health: i32,
    pub shield_active: bool,
    pub shield_health: i32,
}
