//! Events emitted by the simulation for the host UI.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Something that happened during a tick, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A mode was selected and the session is running.
    SessionStarted { mode: GameMode },
    /// A player projectile destroyed an enemy.
    EnemyDestroyed {
        kind: String,
        score_awarded: u64,
        by_player: usize,
    },
    /// A player lost a life to an enemy or an enemy projectile.
    PlayerHit { player: usize, lives_left: u32 },
    /// A player has no lives left.
    PlayerEliminated { player: usize },
    /// Every player is out of lives. Emitted exactly once per session.
    SessionTerminated { final_score: u64 },
    Paused,
    Resumed,
}
