//! Game state snapshot: the complete visible state handed to the renderer.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Aabb, SimTime};

/// Complete game state produced after each tick that requests a render.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub mode: GameMode,
    pub field: FieldView,
    pub score: u64,
    pub round: u32,
    /// One entry per player slot, eliminated players included.
    pub players: Vec<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    /// Events raised since the previous snapshot.
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FieldView {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub slot: usize,
    pub bounds: Aabb,
    pub lives: u32,
    pub glyph: char,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub kind: String,
    pub bounds: Aabb,
    pub glyph: char,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub owner: ProjectileOwner,
    pub bounds: Aabb,
    pub color: [u8; 3],
}

impl GameStateSnapshot {
    /// Final score if this snapshot carries the terminal event.
    pub fn terminal_score(&self) -> Option<u64> {
        self.events.iter().find_map(|e| match e {
            GameEvent::SessionTerminated { final_score } => Some(*final_score),
            _ => None,
        })
    }
}

impl PlayerView {
    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }
}
