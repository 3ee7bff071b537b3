//! Enemy fire system: enemies shoot downward using their archetype's
//! per-tick fire probability. Only runs when `enemies.fire_enabled` is set.

use glam::DVec2;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use barrage_core::components::{Enemy, Position, Projectile, Serial};
use barrage_core::config::{ArchetypeTable, GameConfig};
use barrage_core::enums::ProjectileOwner;
use barrage_core::types::Size;

use crate::world_setup;

/// Roll every enemy in spawn order and spawn a shot below each one that fires.
/// Returns the number of shots fired.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    archetypes: &ArchetypeTable,
    config: &GameConfig,
    next_serial: &mut u64,
) -> usize {
    let mut shooters: Vec<(Serial, DVec2, Size, f64)> = world
        .query::<(&Serial, &Position, &Size, &Enemy)>()
        .iter()
        .map(|(_, (serial, pos, size, enemy))| {
            (
                *serial,
                pos.0,
                *size,
                archetypes[enemy.archetype].fire_probability,
            )
        })
        .collect();
    shooters.sort_by_key(|s| s.0);

    let shot = config.projectile.size;
    let mut fired = 0;
    for (_, pos, size, probability) in shooters {
        if !rng.gen_bool(probability) {
            continue;
        }
        let origin = DVec2::new(
            world_setup::centred_x(pos.x, size.width, shot.width),
            pos.y + size.height,
        );
        world_setup::spawn_projectile(
            world,
            origin,
            shot,
            Projectile {
                owner: ProjectileOwner::Enemy,
                speed: config.projectile.speed,
                color: config.enemies.projectile_color,
            },
            next_serial,
        );
        fired += 1;
    }
    fired
}
