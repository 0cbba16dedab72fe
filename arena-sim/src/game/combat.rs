//! Combat System
//!
//! Shot issuance, projectile travel and hit detection.
//!
//! Projectiles fired by the controlled character can hit any opponent;
//! projectiles fired by opponents can only hit the controlled character.
//! A projectile that touches a valid target or an obstacle is marked and
//! dropped once at the end of the hit pass, however many things it touched.

use glam::Vec2;
use tracing::trace;

use crate::config::SimConfig;
use crate::game::collision::{in_map, overlaps};
use crate::game::effects;
use crate::game::entity::{Body, EntityId};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::state::{MatchState, ParticleKind, Projectile};

/// Fire one projectile from `shooter` toward `target`.
///
/// Returns the new projectile's id, or None when the shooter is gone or
/// (controlled character only) out of ammo. Stamps `last_shot_at`.
pub fn issue_shot(
    state: &mut MatchState,
    shooter: EntityId,
    target: Vec2,
    now_ms: u64,
    config: &SimConfig,
) -> Option<EntityId> {
    let (origin, damage) = if shooter.is_player() {
        let player = state.player.as_mut()?;
        let ammo = player.ammo.as_mut()?;
        if ammo.current == 0 {
            return None;
        }
        ammo.current -= 1;
        player.last_shot_at = Some(now_ms);
        (player.position(), config.player.projectile_damage)
    } else {
        let bot = state.bots.find_mut(shooter)?;
        bot.last_shot_at = Some(now_ms);
        (bot.position(), config.bots.projectile_damage)
    };

    let aim = target - origin;
    let angle = aim.y.atan2(aim.x);
    let id = state.next_entity_id();

    state.projectiles.push(Projectile {
        body: Body::new(id, origin, config.projectile.size),
        velocity: Vec2::from_angle(angle) * config.projectile.speed,
        owner: shooter,
        damage,
    });
    effects::spawn_muzzle_flash(state, origin, angle, &config.effects);

    let tick = state.tick;
    state.push_event(GameEvent::shot_fired(tick, now_ms, shooter, id, angle));
    trace!(%shooter, projectile = %id, angle, "Shot fired");

    Some(id)
}

/// Move every projectile and mark the ones that left the map.
pub fn advance_projectiles(state: &mut MatchState, dt: f32) {
    for projectile in state.projectiles.iter_mut() {
        projectile.body.position += projectile.velocity * dt;
    }
    let map_size = state.map_size;
    state
        .projectiles
        .mark_where(|p| !in_map(p.body.position, map_size));
}

/// Resolve projectile overlaps against characters and obstacles.
///
/// Every overlapping valid target takes the projectile's damage. Returns
/// the number of projectiles removed.
pub fn resolve_hits(state: &mut MatchState, now_ms: u64, config: &SimConfig) -> usize {
    let tick = state.tick;

    for index in 0..state.projectiles.len() {
        if state.projectiles.is_marked(index) {
            continue;
        }
        let Some(projectile) = state.projectiles.get(index).cloned() else {
            continue;
        };

        // Characters
        let mut hits: Vec<(EntityId, f32)> = Vec::new();
        if projectile.fired_by_player() {
            for bot in state.bots.iter_mut() {
                if overlaps(&projectile.body, &bot.body) {
                    bot.take_damage(projectile.damage, now_ms);
                    hits.push((bot.body.id, bot.health));
                }
            }
        } else if let Some(player) = state.player.as_mut() {
            if overlaps(&projectile.body, &player.body) {
                player.take_damage(projectile.damage, now_ms);
                hits.push((player.body.id, player.health));
            }
        }

        for (target, remaining) in &hits {
            effects::spawn_impact(state, projectile.body.position, ParticleKind::Hit, &config.effects);
            state.push_event(GameEvent::projectile_hit(
                tick,
                now_ms,
                projectile.body.id,
                *target,
                projectile.damage,
                *remaining,
            ));
        }

        // Obstacles
        let blocked: Vec<EntityId> = state
            .obstacles
            .iter()
            .filter(|o| overlaps(&projectile.body, &o.body))
            .map(|o| o.body.id)
            .collect();

        for obstacle in &blocked {
            effects::spawn_impact(state, projectile.body.position, ParticleKind::Ricochet, &config.effects);
            state.push_event(GameEvent::new(
                tick,
                now_ms,
                GameEventData::ProjectileBlocked {
                    projectile: projectile.body.id,
                    obstacle: *obstacle,
                },
            ));
        }

        if !hits.is_empty() || !blocked.is_empty() {
            state.projectiles.mark(index);
        }
    }

    state.projectiles.compact().len()
}
