//! Enemy spawning system: introduces at most one enemy per tick.

use glam::DVec2;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use barrage_core::config::{ArchetypeId, ArchetypeTable, GameConfig};
use barrage_core::enums::Drift;

use crate::world_setup;

/// Roll the per-tick spawn chance and, on success, place one enemy of a
/// uniformly chosen archetype just above the visible field.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    archetypes: &ArchetypeTable,
    config: &GameConfig,
    next_serial: &mut u64,
) -> Option<Entity> {
    if archetypes.is_empty() || !rng.gen_bool(config.spawn_probability()) {
        return None;
    }

    let id = ArchetypeId(rng.gen_range(0..archetypes.len()));
    let archetype = &archetypes[id];

    // x in [0, width - w): the box is always fully inside the field horizontally.
    let x = rng.gen::<f64>() * (config.field.width - archetype.size.width);
    // Bottom edge at y = 0: never starts inside the visible field.
    let y = -archetype.size.height;
    let drift = if rng.gen_bool(0.5) {
        Drift::Right
    } else {
        Drift::Left
    };

    debug!(kind = %archetype.kind, x, "enemy spawned");
    Some(world_setup::spawn_enemy(
        world,
        archetypes,
        id,
        DVec2::new(x, y),
        drift,
        next_serial,
    ))
}
