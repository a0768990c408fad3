//! Events emitted by the simulation for frontend audio feedback.
//!
//! Cues are fire-and-forget: the engine never waits on or reads back from
//! the audio layer, and a missing sample must not affect the simulation.

use serde::{Deserialize, Serialize};

/// Audio cues for the frontend sound system, drained into each snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioCue {
    /// Player fired.
    Shoot,
    /// Something was destroyed.
    Explosion,
    /// Something took damage or the player was hit.
    Hit,
    /// Pickup collected.
    PowerUp,
    /// Boss shield raised.
    ShieldUp,
    /// Boss shield depleted.
    ShieldDown,
}
