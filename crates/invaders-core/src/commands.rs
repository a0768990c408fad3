//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next update boundary. Held input
//! is pushed as a `SetInput` command whenever the host's input state changes;
//! the engine keeps the latest value and reads it every tick.

use serde::{Deserialize, Serialize};

use crate::session::SessionState;

/// Held-control state sampled by the host each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// All possible player / scene-flow actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Start a fresh run at level 1 with a default session.
    StartRun,
    /// Resume a persisted session and start its level. The host owns
    /// storage; the engine only receives the plain record.
    LoadSession { state: SessionState },
    /// After a cleared level, move to the next one.
    AdvanceLevel,
    /// Abandon the session and return to the menu.
    ReturnToMenu,
    Pause,
    Resume,
    /// Update the held-control state.
    SetInput { input: InputState },
}
