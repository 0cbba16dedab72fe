//! Motion & Physics
//!
//! Per-character movement for one tick:
//!
//! 1. velocity from intent (held keys or pursuit), dash impulse or base speed
//! 2. push zones add outward force, stacking per zone
//! 3. hazard patches drain health, once per overlapping patch
//! 4. integrate, clamp to the map, revert if the result overlaps an obstacle
//! 5. drop the hit flag once the flash has run out
//!
//! Dash activation is a discrete event handled by [`try_dash`]; the dash
//! ends on its own when the clock passes `dash.ends_at`.

use glam::Vec2;
use tracing::debug;

use crate::config::SimConfig;
use crate::game::collision::{clamp_to_map, hazard_overlap_count, is_blocked, overlapping_zones};
use crate::game::effects;
use crate::game::entity::EntityId;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::{DirectionSet, FrameClock};
use crate::game::population::Population;
use crate::game::state::{
    Character, EnergyZone, Hazard, MatchState, Obstacle, ParticleKind, TerrainPatch,
};

/// Static environment a character moves through.
#[derive(Clone, Copy)]
pub struct Surroundings<'a> {
    /// Blockers
    pub obstacles: &'a Population<Obstacle>,
    /// Push zones
    pub zones: &'a Population<EnergyZone>,
    /// Ground patches
    pub patches: &'a Population<TerrainPatch>,
    /// Theme hazard (patches only hurt when this is set)
    pub hazard: Option<&'a Hazard>,
    /// Side length of the map
    pub map_size: f32,
}

impl<'a> Surroundings<'a> {
    /// Borrow the static parts of a match.
    pub fn new(
        obstacles: &'a Population<Obstacle>,
        zones: &'a Population<EnergyZone>,
        patches: &'a Population<TerrainPatch>,
        hazard: Option<&'a Hazard>,
        map_size: f32,
    ) -> Self {
        Self {
            obstacles,
            zones,
            patches,
            hazard,
            map_size,
        }
    }
}

/// What happened to one character during [`step_character`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionReport {
    /// Where to drop a dash-trail ghost (pre-move position)
    pub trail_at: Option<Vec2>,
    /// Hazard patches that drained health this tick
    pub hazard_hits: usize,
    /// Move was undone because it ended inside an obstacle
    pub reverted: bool,
}

/// Unit vector toward `target`, or zero when already within 2 × own size.
pub fn pursuit_intent(character: &Character, target: Vec2) -> Vec2 {
    let offset = target - character.position();
    let dist = offset.length();
    if dist > character.body.size * 2.0 {
        offset / dist
    } else {
        Vec2::ZERO
    }
}

/// Advance one character by `clock.dt` frame units toward `intent`.
///
/// `intent` must be a unit vector or zero.
pub fn step_character(
    character: &mut Character,
    intent: Vec2,
    env: &Surroundings<'_>,
    clock: &FrameClock,
    config: &SimConfig,
) -> MotionReport {
    let mut report = MotionReport::default();

    // Intent → velocity
    if character.dash.active {
        character.velocity = intent * config.player.dash_force;
        report.trail_at = Some(character.position());
    } else {
        let speed = if character.is_player() {
            config.player.speed
        } else {
            config.bot_speed()
        };
        character.velocity = intent * speed;
    }

    // Push zones stack
    for zone in overlapping_zones(&character.body, env.zones) {
        let away = (character.position() - zone.body.position).normalize_or_zero();
        character.velocity += away * zone.push_force;
    }

    // Hazard drain, once per overlapping patch
    if let Some(hazard) = env.hazard {
        let hits = hazard_overlap_count(&character.body, env.patches);
        for _ in 0..hits {
            character.take_damage(hazard.damage * clock.dt, clock.now_ms);
        }
        report.hazard_hits = hits;
    }

    // Integrate, clamp, roll back on obstacle overlap
    let previous = character.position();
    let moved = previous + character.velocity * clock.dt;
    character.body.position = clamp_to_map(moved, character.body.size, env.map_size);
    if is_blocked(&character.body, env.obstacles) {
        character.body.position = previous;
        report.reverted = true;
    }

    expire_hit_flash(character, clock.now_ms, config.timing.hit_flash_ms);
    report
}

/// Clear the hit flag once more than `flash_ms` has passed since the hit.
pub fn expire_hit_flash(character: &mut Character, now_ms: u64, flash_ms: u64) {
    if !character.is_hit {
        return;
    }
    let expired = match character.hit_at {
        Some(hit_at) => now_ms.saturating_sub(hit_at) > flash_ms,
        None => true,
    };
    if expired {
        character.is_hit = false;
    }
}

// =============================================================================
// DASH
// =============================================================================

/// Start a dash for the controlled character.
///
/// Silent no-op (returns false) when the character is gone, already
/// dashing, or still cooling down.
pub fn try_dash(state: &mut MatchState, clock: &FrameClock, config: &SimConfig) -> bool {
    let now = clock.now_ms;
    let position = match state.player.as_mut() {
        Some(player) if player.can_dash(now) => {
            player.dash.active = true;
            player.dash.last_started_at = Some(now);
            player.dash.ends_at = Some(now + config.player.dash_duration_ms);
            player.position()
        }
        _ => return false,
    };

    effects::spawn_impact(state, position, ParticleKind::DashBurst, &config.effects);
    let tick = state.tick;
    state.push_event(GameEvent::new(
        tick,
        now,
        GameEventData::DashStarted {
            character: EntityId::PLAYER,
            position,
        },
    ));
    debug!(x = position.x, y = position.y, "Dash started");
    true
}

/// End a dash whose time ran out. Returns true if one ended.
pub fn expire_dash(character: &mut Character, now_ms: u64) -> bool {
    if !character.dash.active {
        return false;
    }
    match character.dash.ends_at {
        Some(ends_at) if now_ms < ends_at => false,
        _ => {
            character.dash.active = false;
            character.dash.ends_at = None;
            true
        }
    }
}

// =============================================================================
// CONTROLLED CHARACTER
// =============================================================================

/// Point the controlled character at its aim point.
pub fn face_aim(state: &mut MatchState, aim: Vec2) {
    if let Some(player) = state.player.as_mut() {
        let to_aim = aim - player.position();
        player.facing = to_aim.y.atan2(to_aim.x);
    }
}

/// Move the controlled character from its held keys.
pub fn update_player(state: &mut MatchState, held: DirectionSet, clock: &FrameClock, config: &SimConfig) {
    let tick = state.tick;
    let (report, size, dash_ended) = {
        let env = Surroundings::new(
            &state.obstacles,
            &state.energy_zones,
            &state.terrain_patches,
            state.theme.hazard.as_ref(),
            state.map_size,
        );
        let Some(player) = state.player.as_mut() else {
            return;
        };
        let dash_ended = expire_dash(player, clock.now_ms);
        let report = step_character(player, held.intent(), &env, clock, config);
        (report, player.body.size, dash_ended)
    };

    if dash_ended {
        state.push_event(GameEvent::new(
            tick,
            clock.now_ms,
            GameEventData::DashEnded { character: EntityId::PLAYER },
        ));
        debug!("Dash ended");
    }
    if let Some(at) = report.trail_at {
        effects::spawn_dash_trail(state, at, size, &config.effects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::{Body, EntityId};
    use crate::game::input::Direction;
    use crate::game::state::{HazardKind, ObstacleKind};

    struct World {
        obstacles: Population<Obstacle>,
        zones: Population<EnergyZone>,
        patches: Population<TerrainPatch>,
        hazard: Option<Hazard>,
    }

    impl World {
        fn empty() -> Self {
            Self {
                obstacles: Population::new(),
                zones: Population::new(),
                patches: Population::new(),
                hazard: None,
            }
        }

        fn env(&self) -> Surroundings<'_> {
            Surroundings::new(&self.obstacles, &self.zones, &self.patches, self.hazard.as_ref(), 4000.0)
        }
    }

    fn player_at(x: f32, y: f32) -> Character {
        Character::player(&SimConfig::default(), Vec2::new(x, y))
    }

    fn clock() -> FrameClock {
        FrameClock::new(10_000, 1.0)
    }

    #[test]
    fn test_held_keys_move_at_base_speed() {
        let world = World::empty();
        let mut p = player_at(1000.0, 1000.0);
        let intent = DirectionSet::of(&[Direction::Right]).intent();

        step_character(&mut p, intent, &world.env(), &clock(), &SimConfig::default());
        assert_eq!(p.position(), Vec2::new(1004.0, 1000.0));
    }

    #[test]
    fn test_bot_speed_and_pursuit_threshold() {
        let config = SimConfig::default();
        let world = World::empty();
        let mut bot = Character::bot(EntityId(5), "b", Vec2::new(1000.0, 1000.0), &config);

        let far = pursuit_intent(&bot, Vec2::new(1500.0, 1000.0));
        step_character(&mut bot, far, &world.env(), &clock(), &config);
        assert!((bot.position().x - 1002.6).abs() < 1e-3);

        // Within 2 × size: no pursuit
        let near = pursuit_intent(&bot, bot.position() + Vec2::new(80.0, 0.0));
        assert_eq!(near, Vec2::ZERO);
    }

    #[test]
    fn test_dash_without_keys_stays_put() {
        let world = World::empty();
        let mut p = player_at(1000.0, 1000.0);
        p.dash.active = true;

        let report = step_character(&mut p, Vec2::ZERO, &world.env(), &clock(), &SimConfig::default());
        assert_eq!(p.position(), Vec2::new(1000.0, 1000.0));
        assert_eq!(report.trail_at, Some(Vec2::new(1000.0, 1000.0)));
    }

    #[test]
    fn test_dash_uses_dash_force() {
        let world = World::empty();
        let mut p = player_at(1000.0, 1000.0);
        p.dash.active = true;

        step_character(&mut p, Vec2::X, &world.env(), &clock(), &SimConfig::default());
        assert_eq!(p.position(), Vec2::new(1025.0, 1000.0));
    }

    #[test]
    fn test_clamped_to_map() {
        let world = World::empty();
        let mut p = player_at(21.0, 3979.0);
        let intent = DirectionSet::of(&[Direction::Left, Direction::Down]).intent();

        step_character(&mut p, intent, &world.env(), &FrameClock::new(0, 2.0), &SimConfig::default());
        assert_eq!(p.position(), Vec2::new(20.0, 3980.0));
    }

    #[test]
    fn test_obstacle_reverts_move() {
        let mut world = World::empty();
        world.obstacles.push(Obstacle {
            body: Body::new(EntityId(9), Vec2::new(1050.0, 1000.0), 40.0),
            kind: ObstacleKind::Tree,
        });
        let mut p = player_at(1008.0, 1000.0);

        let report = step_character(&mut p, Vec2::X, &world.env(), &clock(), &SimConfig::default());
        assert!(report.reverted);
        assert_eq!(p.position(), Vec2::new(1008.0, 1000.0));
    }

    #[test]
    fn test_push_zones_stack() {
        let mut world = World::empty();
        for id in [1, 2] {
            world.zones.push(EnergyZone {
                body: Body::new(EntityId(id), Vec2::new(900.0, 1000.0), 300.0),
                push_force: 3.0,
            });
        }
        let mut p = player_at(1000.0, 1000.0);

        step_character(&mut p, Vec2::ZERO, &world.env(), &clock(), &SimConfig::default());
        assert_eq!(p.velocity, Vec2::new(6.0, 0.0));
        assert_eq!(p.position(), Vec2::new(1006.0, 1000.0));
    }

    #[test]
    fn test_hazard_drains_per_patch() {
        let mut world = World::empty();
        world.hazard = Some(Hazard {
            kind: HazardKind::Lava,
            color: "#f56565".into(),
            damage: 0.5,
        });
        for id in [1, 2] {
            world.patches.push(TerrainPatch {
                id: EntityId(id),
                position: Vec2::new(1000.0, 1000.0),
                width: 200.0,
                height: 200.0,
                hazard: Some(HazardKind::Lava),
                tint: 0,
            });
        }
        let mut p = player_at(1000.0, 1000.0);

        let report = step_character(&mut p, Vec2::ZERO, &world.env(), &FrameClock::new(0, 2.0), &SimConfig::default());
        assert_eq!(report.hazard_hits, 2);
        assert_eq!(p.health, 98.0);
        assert!(p.is_hit);
    }

    #[test]
    fn test_hazard_patches_harmless_without_theme_hazard() {
        let mut world = World::empty();
        world.patches.push(TerrainPatch {
            id: EntityId(1),
            position: Vec2::new(1000.0, 1000.0),
            width: 200.0,
            height: 200.0,
            hazard: Some(HazardKind::Lava),
            tint: 0,
        });
        let mut p = player_at(1000.0, 1000.0);

        step_character(&mut p, Vec2::ZERO, &world.env(), &clock(), &SimConfig::default());
        assert_eq!(p.health, 100.0);
    }

    #[test]
    fn test_hit_flash_expiry_is_strict() {
        let mut p = player_at(0.0, 0.0);
        p.take_damage(5.0, 1000);

        expire_hit_flash(&mut p, 1150, 150);
        assert!(p.is_hit);
        expire_hit_flash(&mut p, 1151, 150);
        assert!(!p.is_hit);
    }

    #[test]
    fn test_expire_dash() {
        let mut p = player_at(0.0, 0.0);
        p.dash.active = true;
        p.dash.ends_at = Some(500);

        assert!(!expire_dash(&mut p, 499));
        assert!(expire_dash(&mut p, 500));
        assert!(!p.dash.active);
        assert!(!expire_dash(&mut p, 600));
    }
}
