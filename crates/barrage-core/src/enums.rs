//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Session lifecycle.
///
/// `NotStarted -> Running <-> Paused -> Terminated`, and back to
/// `NotStarted` when the host resets the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a mode selection.
    #[default]
    NotStarted,
    Running,
    Paused,
    /// Every player is out of lives. No further ticks.
    Terminated,
}

/// Number of players in a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Single,
    TwoPlayer,
}

impl GameMode {
    pub fn player_count(self) -> usize {
        match self {
            GameMode::Single => 1,
            GameMode::TwoPlayer => 2,
        }
    }
}

/// Who fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileOwner {
    /// Fired by the player in this slot. Moves up, scores on enemy hits.
    Player(usize),
    /// Fired by an enemy. Moves down, costs a life on player hits.
    Enemy,
}

/// Horizontal drift bias of an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Drift {
    Left,
    Right,
}

impl Drift {
    pub fn sign(self) -> f64 {
        match self {
            Drift::Left => -1.0,
            Drift::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Drift::Left => Drift::Right,
            Drift::Right => Drift::Left,
        }
    }
}
