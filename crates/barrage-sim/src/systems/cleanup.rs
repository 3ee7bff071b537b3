//! Cleanup system: removes entities that have left the field, and applies
//! deferred despawns collected by other systems.

use hecs::{Entity, World};
use tracing::warn;

use barrage_core::components::{Enemy, Position, Projectile};
use barrage_core::config::FieldConfig;
use barrage_core::types::Size;

/// Remove projectiles fully outside the field (either edge) and enemies
/// fully below it. Enemies above the field are still arriving and stay.
pub fn run(world: &mut World, field: &FieldConfig, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (pos, size, _projectile)) in world.query_mut::<(&Position, &Size, &Projectile)>() {
        if pos.0.y + size.height < 0.0 || pos.0.y > field.height {
            despawn_buffer.push(entity);
        }
    }

    for (entity, (pos, _enemy)) in world.query_mut::<(&Position, &Enemy)>() {
        if pos.0.y > field.height {
            despawn_buffer.push(entity);
        }
    }

    apply_despawns(world, despawn_buffer);
}

/// Despawn every buffered entity and leave the buffer empty.
///
/// A missing entity means a system marked something twice or despawned it
/// behind the buffer's back: fatal in debug builds, ignored in release.
pub fn apply_despawns(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for entity in despawn_buffer.drain(..) {
        if world.despawn(entity).is_err() {
            warn!(?entity, "despawn of missing entity ignored");
            debug_assert!(false, "despawn of missing entity {entity:?}");
        }
    }
}
