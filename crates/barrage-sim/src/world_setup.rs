//! Entity spawn factories for the simulation world.
//!
//! Creates players, enemies and projectiles with their component bundles.
//! Every entity gets a `Serial` from the engine's counter so scans can
//! recover insertion order.

use glam::DVec2;
use hecs::{Entity, World};

use barrage_core::components::*;
use barrage_core::config::{ArchetypeId, ArchetypeTable, GameConfig};
use barrage_core::enums::*;
use barrage_core::types::Size;

fn next(next_serial: &mut u64) -> Serial {
    let serial = Serial(*next_serial);
    *next_serial += 1;
    serial
}

/// Set up a fresh session: one player per slot of the selected mode.
pub fn setup_session(world: &mut World, config: &GameConfig, mode: GameMode, next_serial: &mut u64) {
    let count = mode.player_count();
    for slot in 0..count {
        spawn_player(world, config, slot, count, next_serial);
    }
}

/// Spawn a player, spread evenly across the bottom of the field.
pub fn spawn_player(
    world: &mut World,
    config: &GameConfig,
    slot: usize,
    player_count: usize,
    next_serial: &mut u64,
) -> Entity {
    let size = config.player.size;
    let column = config.field.width * (slot + 1) as f64 / (player_count + 1) as f64;
    let x = (column - size.width / 2.0).clamp(0.0, config.field.width - size.width);
    let y = config.field.height - config.player.bottom_offset;

    let player = Player {
        slot,
        speed: config.player.speed,
        lives: config.player.starting_lives,
        fire_cooldown: 0,
        glyph: config.player.glyphs[slot % config.player.glyphs.len()],
    };

    world.spawn((
        next(next_serial),
        Position(DVec2::new(x, y)),
        size,
        player,
        HeldInput::default(),
    ))
}

/// Spawn an enemy instance of the given archetype at `position`.
pub fn spawn_enemy(
    world: &mut World,
    archetypes: &ArchetypeTable,
    archetype: ArchetypeId,
    position: DVec2,
    drift: Drift,
    next_serial: &mut u64,
) -> Entity {
    let size = archetypes[archetype].size;
    world.spawn((
        next(next_serial),
        Position(position),
        size,
        Enemy {
            archetype,
            drift,
            descending: true,
        },
    ))
}

/// Spawn a projectile whose box starts at `position`.
pub fn spawn_projectile(
    world: &mut World,
    position: DVec2,
    size: Size,
    projectile: Projectile,
    next_serial: &mut u64,
) -> Entity {
    world.spawn((next(next_serial), Position(position), size, projectile))
}

/// Horizontal start of a projectile centred on a shooter of width `shooter_width`.
pub fn centred_x(shooter_x: f64, shooter_width: f64, projectile_width: f64) -> f64 {
    shooter_x + shooter_width / 2.0 - projectile_width / 2.0
}
