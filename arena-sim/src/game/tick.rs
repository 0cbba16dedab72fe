//! Simulation Tick
//!
//! One call advances the whole match by `clock.dt` frame units in a fixed
//! order:
//!
//! 1. discrete input (dash, then fire) and facing
//! 2. controlled character motion
//! 3. opponent motion and shooting
//! 4. projectile travel
//! 5. camera
//! 6. projectile hits
//! 7. pickups (only while the controlled character is alive)
//! 8. particle and muzzle-flash decay, including this tick's impacts
//! 9. cleanup: kill feed, eliminations, phase transition

use tracing::{debug, info};

use crate::config::SimConfig;
use crate::game::events::{GameEvent, GameEventData, MatchOutcome};
use crate::game::input::{FrameClock, InputFrame};
use crate::game::state::{KillFeedItem, MatchPhase, MatchState};
use crate::game::{ai, combat, effects, motion, pickup};
use crate::game::entity::EntityId;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Whether the match is over (ended this tick or earlier)
    pub match_ended: bool,
    /// How it ended, if it did
    pub outcome: Option<MatchOutcome>,
}

/// Run one simulation tick.
///
/// # Arguments
///
/// * `state` - The match state (will be mutated)
/// * `input` - Controls sampled for this tick
/// * `clock` - Current time and frame delta
/// * `config` - Simulation tuning
///
/// Once the match is over the only thing a tick still does is retire
/// kill-feed entries whose display time ran out.
pub fn tick(state: &mut MatchState, input: &InputFrame, clock: FrameClock, config: &SimConfig) -> TickResult {
    let mut result = TickResult::default();

    if state.phase.is_terminal() {
        expire_kill_feed(state, clock.now_ms);
        result.match_ended = true;
        result.outcome = outcome_of(state.phase);
        return result;
    }

    // 0. Advance tick counter
    state.tick += 1;
    state.now_ms = clock.now_ms;

    // 1. Discrete input
    apply_input(state, input, &clock, config);

    // 2. Controlled character
    motion::update_player(state, input.held, &clock, config);

    // 3. Opponents
    ai::update_bots(state, &clock, config);

    // 4. Projectile travel
    combat::advance_projectiles(state, clock.dt);

    // 5. Camera
    if let Some(focus) = state.player_position() {
        let viewport = state.viewport;
        state
            .camera
            .follow(focus, viewport, config.timing.camera_smoothing, clock.dt);
    }

    // 6. Hits
    combat::resolve_hits(state, clock.now_ms, config);

    // 7. Pickups
    pickup::collect_pickups(state, clock.now_ms);

    // 8. Effects decay
    effects::decay(state, clock.dt, &config.effects);

    // 9. Cleanup and end conditions
    cleanup(state, clock.now_ms, config);
    effects::compact(state);

    result.events = state.take_events();
    result.match_ended = state.phase.is_terminal();
    result.outcome = outcome_of(state.phase);
    result
}

/// Dash first, then fire. Facing follows the aim point every tick.
fn apply_input(state: &mut MatchState, input: &InputFrame, clock: &FrameClock, config: &SimConfig) {
    if state.player.is_none() {
        return;
    }

    motion::face_aim(state, input.aim);

    if input.dash {
        motion::try_dash(state, clock, config);
    }
    if input.fire {
        combat::issue_shot(state, EntityId::PLAYER, input.aim, clock.now_ms, config);
    }
}

/// Retire kill-feed entries, remove eliminated characters, settle the phase.
fn cleanup(state: &mut MatchState, now_ms: u64, config: &SimConfig) {
    expire_kill_feed(state, now_ms);

    let Some(killer_name) = state.player.as_ref().map(|p| p.name.clone()) else {
        return;
    };
    let tick = state.tick;

    // Opponents at zero health: kill-feed entry first, then removal
    state.bots.mark_where(|bot| !bot.is_alive());
    for victim in state.bots.compact() {
        let id = state.next_entity_id();
        state.kill_feed.push(KillFeedItem {
            id,
            killer_name: killer_name.clone(),
            victim_name: victim.name.clone(),
            created_at: now_ms,
            expires_at: now_ms + config.timing.kill_feed_ms,
        });
        debug!(victim = %victim.name, remaining = state.bots.len(), "Opponent eliminated");
        state.push_event(GameEvent::opponent_eliminated(
            tick,
            now_ms,
            victim.body.id,
            victim.name,
            killer_name.clone(),
        ));
    }

    let player_down = state.player.as_ref().is_some_and(|p| !p.is_alive());
    if player_down {
        state.player = None;
        state.push_event(GameEvent::new(tick, now_ms, GameEventData::PlayerEliminated));
        end_match(state, MatchPhase::GameOver, MatchOutcome::Defeat, now_ms);
    } else if state.bots.is_empty() {
        end_match(state, MatchPhase::Victory, MatchOutcome::Victory, now_ms);
    }
}

fn end_match(state: &mut MatchState, phase: MatchPhase, outcome: MatchOutcome, now_ms: u64) {
    state.phase = phase;
    let tick = state.tick;
    state.push_event(GameEvent::match_ended(tick, now_ms, outcome));
    info!(match_id = %state.match_id, ?outcome, tick, "Match ended");
}

/// Drop kill-feed entries whose display time has run out.
pub fn expire_kill_feed(state: &mut MatchState, now_ms: u64) {
    state.kill_feed.mark_where(|item| now_ms >= item.expires_at);
    state.kill_feed.compact();
}

fn outcome_of(phase: MatchPhase) -> Option<MatchOutcome> {
    match phase {
        MatchPhase::Playing => None,
        MatchPhase::GameOver => Some(MatchOutcome::Defeat),
        MatchPhase::Victory => Some(MatchOutcome::Victory),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    use crate::core::rng::SimRng;
    use crate::game::content::{ContentGenerator, FixedContent, MatchContent};
    use crate::game::entity::{Body, IdAllocator};
    use crate::game::input::Direction;
    use crate::game::state::{Character, ParticleKind, Pickup, PickupKind, Projectile};

    fn state_with(content: MatchContent) -> (MatchState, SimConfig) {
        let config = SimConfig::default();
        let mut ids = IdAllocator::new();
        let content = FixedContent::new(content).generate(&mut ids, &config);
        let state = MatchState::from_content(&config, ids, content, SimRng::new(11), config.arena.viewport);
        (state, config)
    }

    fn with_far_bot() -> MatchContent {
        let mut content = MatchContent::empty();
        content.opponents.push(Character::bot(
            EntityId(0),
            "Far_Away",
            Vec2::new(100.0, 100.0),
            &SimConfig::default(),
        ));
        content
    }

    #[test]
    fn test_player_movement() {
        let (mut state, config) = state_with(with_far_bot());
        let input = InputFrame::idle().holding(&[Direction::Right]);

        tick(&mut state, &input, FrameClock::new(17, 1.0), &config);
        assert_eq!(state.player_position(), Some(Vec2::new(2004.0, 2000.0)));
        assert_eq!(state.tick, 1);
    }

    #[test]
    fn test_no_opponents_is_victory() {
        let (mut state, config) = state_with(MatchContent::empty());
        let result = tick(&mut state, &InputFrame::idle(), FrameClock::new(17, 1.0), &config);

        assert!(result.match_ended);
        assert_eq!(result.outcome, Some(MatchOutcome::Victory));
        assert_eq!(state.phase, MatchPhase::Victory);
    }

    #[test]
    fn test_terminal_phase_halts() {
        let (mut state, config) = state_with(MatchContent::empty());
        tick(&mut state, &InputFrame::idle(), FrameClock::new(17, 1.0), &config);
        let ticks = state.tick;

        let input = InputFrame::idle().holding(&[Direction::Up]).firing();
        let result = tick(&mut state, &input, FrameClock::new(34, 1.0), &config);
        assert!(result.match_ended);
        assert!(result.events.is_empty());
        assert_eq!(state.tick, ticks);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_player_death_is_game_over() {
        let (mut state, config) = state_with(with_far_bot());
        state.player.as_mut().unwrap().health = 0.0;

        let result = tick(&mut state, &InputFrame::idle(), FrameClock::new(17, 1.0), &config);
        assert!(state.player.is_none());
        assert_eq!(state.phase, MatchPhase::GameOver);
        assert_eq!(result.outcome, Some(MatchOutcome::Defeat));
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::PlayerEliminated)));
    }

    #[test]
    fn test_dash_resolves_before_fire() {
        let (mut state, config) = state_with(with_far_bot());
        let input = InputFrame::idle()
            .aiming_at(Vec2::new(2000.0, 0.0))
            .firing()
            .dashing();

        let result = tick(&mut state, &input, FrameClock::new(5000, 1.0), &config);
        let kinds: Vec<_> = result
            .events
            .iter()
            .filter_map(|e| match e.data {
                GameEventData::DashStarted { .. } => Some("dash"),
                GameEventData::ShotFired { .. } => Some("shot"),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec!["dash", "shot"]);

        let player = state.player.as_ref().unwrap();
        assert!(player.dash.active);
        assert!((player.facing + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_kill_feed_expiry() {
        let (mut state, config) = state_with(with_far_bot());
        state.kill_feed.push(KillFeedItem {
            id: EntityId(500),
            killer_name: "You".into(),
            victim_name: "Pixel_Pro".into(),
            created_at: 0,
            expires_at: 5000,
        });

        tick(&mut state, &InputFrame::idle(), FrameClock::new(4999, 1.0), &config);
        assert_eq!(state.kill_feed.len(), 1);
        tick(&mut state, &InputFrame::idle(), FrameClock::new(5000, 1.0), &config);
        assert!(state.kill_feed.is_empty());
    }

    fn stationary_projectile(state: &mut MatchState, owner: EntityId, at: Vec2, damage: f32) {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            body: Body::new(id, at, 8.0),
            velocity: Vec2::ZERO,
            owner,
            damage,
        });
    }

    #[test]
    fn test_impacts_age_on_the_tick_they_spawn() {
        let mut content = MatchContent::empty();
        content.opponents.push(Character::bot(
            EntityId(0),
            "Pixel_Pro",
            Vec2::new(1000.0, 1000.0),
            &SimConfig::default(),
        ));
        let (mut state, config) = state_with(content);
        stationary_projectile(&mut state, EntityId::PLAYER, Vec2::new(1000.0, 1000.0), 10.0);

        let dt = 1.0;
        tick(&mut state, &InputFrame::idle(), FrameClock::new(17, dt), &config);

        assert_eq!(state.bots.as_slice()[0].health, 40.0);
        let lives: Vec<f32> = state
            .particles
            .iter()
            .filter(|p| p.kind == ParticleKind::Hit)
            .map(|p| p.life)
            .collect();
        let expected = config.effects.impact_life - config.effects.decay_per_frame * dt;
        assert_eq!(lives, vec![expected; config.effects.impact_particles]);
    }

    #[test]
    fn test_lethal_hit_beats_health_pickup() {
        let defaults = SimConfig::default();
        let center = defaults.map_center();
        let mut content = with_far_bot();
        content.pickups.push(Pickup {
            body: Body::new(EntityId(0), center, defaults.pickups.size),
            kind: PickupKind::Health,
            value: defaults.pickups.health_value,
        });
        let (mut state, config) = state_with(content);
        state.player.as_mut().unwrap().health = 5.0;
        let shooter = state.bots.as_slice()[0].body.id;
        stationary_projectile(&mut state, shooter, center, 5.0);

        let result = tick(&mut state, &InputFrame::idle(), FrameClock::new(17, 1.0), &config);

        assert_eq!(result.outcome, Some(MatchOutcome::Defeat));
        assert_eq!(state.phase, MatchPhase::GameOver);
        assert!(state.player.is_none());
        assert_eq!(state.pickups.len(), 1);
        assert!(!result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::PickupCollected { .. })));
    }
}
