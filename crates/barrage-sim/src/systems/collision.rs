//! Collision resolution: player shots against enemies, then players against
//! enemies, then (with enemy fire on) enemy shots against players.
//!
//! Every pass scans an ordered snapshot of the world and only marks what it
//! consumes. Despawns are applied once, after all passes, so nothing is
//! skipped or matched twice while scanning.

use hecs::{Entity, World};
use tracing::debug;

use barrage_core::components::*;
use barrage_core::config::{ArchetypeId, ArchetypeTable};
use barrage_core::enums::ProjectileOwner;
use barrage_core::events::GameEvent;
use barrage_core::types::{Aabb, Size};

use crate::session::{self, SessionState};

use super::cleanup;

/// Outcome of one collision step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollisionResult {
    pub enemies_destroyed: u32,
    pub player_hits: u32,
    /// The termination predicate fired during this step.
    pub terminated: bool,
}

/// An enemy as seen at the start of the step.
struct Target {
    entity: Entity,
    bounds: Aabb,
    archetype: ArchetypeId,
    consumed: bool,
}

/// A projectile as seen at the start of the step.
struct Shot {
    entity: Entity,
    bounds: Aabb,
    owner: ProjectileOwner,
}

pub fn run(
    world: &mut World,
    archetypes: &ArchetypeTable,
    session: &mut SessionState,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) -> CollisionResult {
    despawn_buffer.clear();
    let mut result = CollisionResult::default();

    let mut targets = collect_targets(world);
    let shots = collect_shots(world);

    resolve_shots_vs_enemies(
        &shots,
        &mut targets,
        archetypes,
        session,
        events,
        despawn_buffer,
        &mut result,
    );
    resolve_players_vs_enemies(world, &mut targets, session, events, despawn_buffer, &mut result);
    if !result.terminated {
        resolve_shots_vs_players(world, &shots, session, events, despawn_buffer, &mut result);
    }

    cleanup::apply_despawns(world, despawn_buffer);
    result
}

/// Player projectile × enemy. First overlapping enemy in spawn order wins;
/// at most one enemy per projectile per tick.
fn resolve_shots_vs_enemies(
    shots: &[Shot],
    targets: &mut [Target],
    archetypes: &ArchetypeTable,
    session: &mut SessionState,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
    result: &mut CollisionResult,
) {
    for shot in shots {
        let ProjectileOwner::Player(slot) = shot.owner else {
            continue;
        };
        let Some(target) = targets
            .iter_mut()
            .find(|t| !t.consumed && shot.bounds.overlaps(&t.bounds))
        else {
            continue;
        };

        // Score comes from the matched enemy before anything is removed.
        let archetype = &archetypes[target.archetype];
        let points = archetype.score;

        target.consumed = true;
        despawn_buffer.push(shot.entity);
        despawn_buffer.push(target.entity);
        session.award(points);
        result.enemies_destroyed += 1;

        debug!(kind = %archetype.kind, points, player = slot, "enemy destroyed");
        events.push(GameEvent::EnemyDestroyed {
            kind: archetype.kind.clone(),
            score_awarded: points,
            by_player: slot,
        });
    }
}

/// Player × enemy. Players are checked in slot order, so when two ships
/// overlap the same enemy the first one takes the hit and the enemy is gone.
fn resolve_players_vs_enemies(
    world: &World,
    targets: &mut [Target],
    session: &mut SessionState,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
    result: &mut CollisionResult,
) {
    for (entity, bounds) in collect_live_players(world) {
        for target in targets.iter_mut() {
            if target.consumed || !bounds.overlaps(&target.bounds) {
                continue;
            }
            let Some(lives_left) = take_life(world, entity, events) else {
                break;
            };
            target.consumed = true;
            despawn_buffer.push(target.entity);
            result.player_hits += 1;

            if lives_left == 0 {
                if session::all_eliminated(world) && session.terminate(events) {
                    result.terminated = true;
                    return;
                }
                break;
            }
        }
    }
}

/// Enemy projectile × player. Each shot costs at most one life.
fn resolve_shots_vs_players(
    world: &World,
    shots: &[Shot],
    session: &mut SessionState,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
    result: &mut CollisionResult,
) {
    let players = collect_live_players(world);
    for shot in shots.iter().filter(|s| s.owner == ProjectileOwner::Enemy) {
        for &(entity, bounds) in &players {
            if !shot.bounds.overlaps(&bounds) {
                continue;
            }
            let Some(lives_left) = take_life(world, entity, events) else {
                continue;
            };
            despawn_buffer.push(shot.entity);
            result.player_hits += 1;

            if lives_left == 0 && session::all_eliminated(world) && session.terminate(events) {
                result.terminated = true;
                return;
            }
            break;
        }
    }
}

/// Remove one life from a live player. `None` if the player is already out.
fn take_life(world: &World, entity: Entity, events: &mut Vec<GameEvent>) -> Option<u32> {
    let mut player = world.get::<&mut Player>(entity).ok()?;
    if player.lives == 0 {
        return None;
    }
    player.lives -= 1;

    debug!(player = player.slot, lives_left = player.lives, "player hit");
    events.push(GameEvent::PlayerHit {
        player: player.slot,
        lives_left: player.lives,
    });
    if player.lives == 0 {
        events.push(GameEvent::PlayerEliminated { player: player.slot });
    }
    Some(player.lives)
}

fn collect_targets(world: &World) -> Vec<Target> {
    let mut targets: Vec<(Serial, Target)> = world
        .query::<(&Serial, &Position, &Size, &Enemy)>()
        .iter()
        .map(|(entity, (serial, pos, size, enemy))| {
            (
                *serial,
                Target {
                    entity,
                    bounds: Aabb::new(pos.0, *size),
                    archetype: enemy.archetype,
                    consumed: false,
                },
            )
        })
        .collect();
    targets.sort_by_key(|(serial, _)| *serial);
    targets.into_iter().map(|(_, t)| t).collect()
}

fn collect_shots(world: &World) -> Vec<Shot> {
    let mut shots: Vec<(Serial, Shot)> = world
        .query::<(&Serial, &Position, &Size, &Projectile)>()
        .iter()
        .map(|(entity, (serial, pos, size, projectile))| {
            (
                *serial,
                Shot {
                    entity,
                    bounds: Aabb::new(pos.0, *size),
                    owner: projectile.owner,
                },
            )
        })
        .collect();
    shots.sort_by_key(|(serial, _)| *serial);
    shots.into_iter().map(|(_, s)| s).collect()
}

/// Live players in slot order.
fn collect_live_players(world: &World) -> Vec<(Entity, Aabb)> {
    let mut players: Vec<(usize, Entity, Aabb)> = world
        .query::<(&Position, &Size, &Player)>()
        .iter()
        .filter(|(_, (_, _, player))| player.lives > 0)
        .map(|(entity, (pos, size, player))| (player.slot, entity, Aabb::new(pos.0, *size)))
        .collect();
    players.sort_by_key(|(slot, _, _)| *slot);
    players.into_iter().map(|(_, e, b)| (e, b)).collect()
}
