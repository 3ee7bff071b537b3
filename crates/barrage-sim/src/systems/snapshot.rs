//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use barrage_core::components::*;
use barrage_core::config::{ArchetypeTable, FieldConfig};
use barrage_core::enums::*;
use barrage_core::events::GameEvent;
use barrage_core::state::*;
use barrage_core::types::{Aabb, SimTime, Size};

use crate::session::SessionState;

/// Build a complete GameStateSnapshot from the current world state.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    archetypes: &ArchetypeTable,
    field: &FieldConfig,
    time: &SimTime,
    phase: GamePhase,
    mode: GameMode,
    session: &SessionState,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        mode,
        field: FieldView {
            width: field.width,
            height: field.height,
        },
        score: session.score,
        round: session.round,
        players: build_players(world),
        enemies: build_enemies(world, archetypes),
        projectiles: build_projectiles(world),
        events,
    }
}

/// Every player slot in order, eliminated ones included for the lives readout.
fn build_players(world: &World) -> Vec<PlayerView> {
    let mut players: Vec<PlayerView> = world
        .query::<(&Position, &Size, &Player)>()
        .iter()
        .map(|(_, (pos, size, player))| PlayerView {
            slot: player.slot,
            bounds: Aabb::new(pos.0, *size),
            lives: player.lives,
            glyph: player.glyph,
        })
        .collect();

    players.sort_by_key(|p| p.slot);
    players
}

fn build_enemies(world: &World, archetypes: &ArchetypeTable) -> Vec<EnemyView> {
    let mut enemies: Vec<(Serial, EnemyView)> = world
        .query::<(&Serial, &Position, &Size, &Enemy)>()
        .iter()
        .map(|(_, (serial, pos, size, enemy))| {
            let archetype = &archetypes[enemy.archetype];
            (
                *serial,
                EnemyView {
                    kind: archetype.kind.clone(),
                    bounds: Aabb::new(pos.0, *size),
                    glyph: archetype.glyph,
                },
            )
        })
        .collect();

    enemies.sort_by_key(|(serial, _)| *serial);
    enemies.into_iter().map(|(_, view)| view).collect()
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<(Serial, ProjectileView)> = world
        .query::<(&Serial, &Position, &Size, &Projectile)>()
        .iter()
        .map(|(_, (serial, pos, size, projectile))| {
            (
                *serial,
                ProjectileView {
                    owner: projectile.owner,
                    bounds: Aabb::new(pos.0, *size),
                    color: projectile.color,
                },
            )
        })
        .collect();

    projectiles.sort_by_key(|(serial, _)| *serial);
    projectiles.into_iter().map(|(_, view)| view).collect()
}
