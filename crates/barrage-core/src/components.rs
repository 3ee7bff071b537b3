//! ECS components for hecs entities.
//!
//! Components are plain data structs with no game logic.
//! Game logic lives in systems, not components.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::ArchetypeId;
use crate::enums::*;

/// Top-left corner of the entity's bounding box. Every entity also carries a
/// `types::Size` component for the box extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub DVec2);

/// Insertion order of an entity. Scans that must respect "first match wins"
/// sort by this, since hecs storage order changes as entities are despawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Serial(pub u64);

/// A player ship. Never despawned during a session; at zero lives it is
/// skipped by movement, firing, collision and drawing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// 0-based slot, fixed at session start.
    pub slot: usize,
    /// Horizontal speed (units per tick).
    pub speed: f64,
    pub lives: u32,
    /// Ticks until this player may fire again.
    pub fire_cooldown: u32,
    pub glyph: char,
}

/// Held-key state for a player, updated by `Steer` commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldInput {
    pub left: bool,
    pub right: bool,
}

/// An enemy instance. Speed, score and glyph come from its archetype.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy {
    pub archetype: ArchetypeId,
    pub drift: Drift,
    /// Vertical direction flag. Enemies only ever descend today.
    pub descending: bool,
}

/// A projectile. Travels vertically at a fixed speed until it hits something
/// or leaves the field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: ProjectileOwner,
    /// Vertical speed (units per tick). Direction follows the owner.
    pub speed: f64,
    pub color: [u8; 3],
}

impl HeldInput {
    /// Net horizontal direction: -1, 0 or +1.
    pub fn axis(&self) -> f64 {
        f64::from(u8::from(self.right)) - f64::from(u8::from(self.left))
    }
}

impl Projectile {
    /// Signed per-tick vertical displacement (y grows downward).
    pub fn dy(&self) -> f64 {
        match self.owner {
            ProjectileOwner::Player(_) => -self.speed,
            ProjectileOwner::Enemy => self.speed,
        }
    }
}
