//! Kinematic integration.
//!
//! Every entity moves by a fixed per-tick displacement; there is no
//! acceleration. The engine calls the three passes separately so enemies
//! advance before the spawner runs and projectiles after it.

use hecs::World;

use barrage_core::components::*;
use barrage_core::config::{ArchetypeTable, FieldConfig};
use barrage_core::types::Size;

/// Move live players by their held input, clamped to the field, and count
/// down their fire cooldowns. Eliminated players stay where they are.
pub fn move_players(world: &mut World, field: &FieldConfig) {
    for (_entity, (pos, size, player, input)) in
        world.query_mut::<(&mut Position, &Size, &mut Player, &HeldInput)>()
    {
        if player.lives == 0 {
            continue;
        }
        player.fire_cooldown = player.fire_cooldown.saturating_sub(1);

        let max_x = (field.width - size.width).max(0.0);
        pos.0.x = (pos.0.x + input.axis() * player.speed).clamp(0.0, max_x);
    }
}

/// Descend every enemy by its archetype speed. With a non-zero
/// `drift_speed` enemies also slide sideways, bouncing off the field edges.
pub fn move_enemies(
    world: &mut World,
    archetypes: &ArchetypeTable,
    field: &FieldConfig,
    drift_speed: f64,
) {
    for (_entity, (pos, size, enemy)) in world.query_mut::<(&mut Position, &Size, &mut Enemy)>() {
        let speed = archetypes[enemy.archetype].speed;
        pos.0.y += if enemy.descending { speed } else { -speed };

        if drift_speed > 0.0 {
            let max_x = (field.width - size.width).max(0.0);
            pos.0.x += enemy.drift.sign() * drift_speed;
            if pos.0.x <= 0.0 || pos.0.x >= max_x {
                pos.0.x = pos.0.x.clamp(0.0, max_x);
                enemy.drift = enemy.drift.reversed();
            }
        }
    }
}

/// Advance projectiles: player shots travel up, enemy shots travel down.
pub fn move_projectiles(world: &mut World) {
    for (_entity, (pos, projectile)) in world.query_mut::<(&mut Position, &Projectile)>() {
        pos.0.y += projectile.dy();
    }
}
