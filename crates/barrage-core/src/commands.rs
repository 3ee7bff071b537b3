//! Player commands sent from the input adapter to the simulation.
//!
//! Commands are queued and applied at the next tick boundary, so a pause
//! never lands in the middle of a tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player intents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Session control ---
    /// Choose single or two-player mode and start. Only valid before start.
    SelectMode { mode: GameMode },
    /// Pause a running session, or resume a paused one.
    TogglePause,
    /// Abandon the current session, whatever its phase, and return to
    /// `NotStarted` for a fresh mode selection. No-op before a session starts.
    Reset,
    /// Bump the round counter. Rounds have no automatic transition yet.
    AdvanceRound,

    // --- Ship control ---
    /// Replace the held left/right state of a player.
    Steer { player: usize, left: bool, right: bool },
    /// One trigger pull: one projectile from this player.
    Fire { player: usize },
}
