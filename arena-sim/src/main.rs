//! Arena Sim Runner
//!
//! Plays one match headlessly with a simple autopilot and prints a JSON
//! summary.
//!
//! ```text
//! RUST_LOG=debug          # log filter (default: info)
//! ARENA_CONFIG=arena.json # tuning overrides, see SimConfig
//! ARENA_SEED=7            # content seed
//! ARENA_BOTS=20           # opponent count
//! ARENA_TICKS=20000       # tick cap (default: 36000)
//! ARENA_REALTIME=1        # pace ticks at the nominal frame rate
//! ```

use std::time::{Duration, Instant};

use anyhow::Context;
use glam::Vec2;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use arena_sim::{
    Arena, Direction, DirectionSet, FrameClock, GameEvent, GameEventData, InputFrame, MatchOutcome,
    MatchState, SimConfig, FRAME_RATE, VERSION,
};

const DEFAULT_TICK_CAP: u64 = 36_000;

/// End-of-run report.
#[derive(Debug, Default, Serialize)]
struct Summary {
    match_id: String,
    theme: String,
    outcome: Option<MatchOutcome>,
    ticks: u64,
    sim_time_ms: u64,
    bots_remaining: usize,
    player_health: Option<f32>,
    kills: u32,
    shots_fired: u32,
    hits_taken: u32,
    pickups: u32,
    dashes: u32,
}

impl Summary {
    fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            match &event.data {
                GameEventData::ShotFired { shooter, .. } if shooter.is_player() => self.shots_fired += 1,
                GameEventData::ProjectileHit { target, .. } if target.is_player() => self.hits_taken += 1,
                GameEventData::OpponentEliminated { victim_name, .. } => {
                    self.kills += 1;
                    debug!(victim = %victim_name, "Kill");
                }
                GameEventData::PickupCollected { .. } => self.pickups += 1,
                GameEventData::DashStarted { .. } => self.dashes += 1,
                _ => {}
            }
        }
    }

    fn finish(&mut self, state: &MatchState) {
        self.match_id = state.match_id.to_string();
        self.theme = state.theme.name.clone();
        self.ticks = state.tick;
        self.sim_time_ms = state.now_ms;
        self.bots_remaining = state.bots.len();
        self.player_health = state.player.as_ref().map(|p| p.health);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Arena Sim v{}", VERSION);

    let config = SimConfig::from_env().context("failed to load arena configuration")?;
    let tick_cap = match std::env::var("ARENA_TICKS") {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("ARENA_TICKS must be a tick count, got {raw:?}"))?,
        Err(_) => DEFAULT_TICK_CAP,
    };
    let realtime = std::env::var("ARENA_REALTIME").is_ok_and(|v| v == "1");

    info!(seed = config.seed, bots = config.bots.count, tick_cap, realtime, "Starting run");

    let mut arena = Arena::from_config(config);
    let summary = if realtime {
        run_realtime(&mut arena, tick_cap).await
    } else {
        run_headless(&mut arena, tick_cap)
    };

    info!(outcome = ?summary.outcome, ticks = summary.ticks, kills = summary.kills, "Run finished");
    let json = serde_json::to_string_pretty(&summary).context("failed to encode summary")?;
    println!("{json}");
    Ok(())
}

/// Tick as fast as possible on a synthetic clock.
fn run_headless(arena: &mut Arena, tick_cap: u64) -> Summary {
    let mut summary = Summary::default();
    let mut clock = FrameClock::new(0, 1.0);

    for _ in 0..tick_cap {
        clock = clock.next_frame(&arena.config().timing);
        let input = autopilot(arena.state(), arena.config(), clock.now_ms);
        let result = arena.tick(&input, clock);
        summary.record(&result.events);
        if result.match_ended {
            summary.outcome = result.outcome;
            break;
        }
    }

    summary.finish(arena.state());
    summary
}

/// Tick on a tokio interval, feeding real elapsed time into the clock.
async fn run_realtime(arena: &mut Arena, tick_cap: u64) -> Summary {
    let mut summary = Summary::default();
    let period = Duration::from_micros(1_000_000 / u64::from(FRAME_RATE));
    let mut interval = tokio::time::interval(period);
    let start = Instant::now();
    let mut last_ms = 0u64;

    for _ in 0..tick_cap {
        interval.tick().await;
        let now_ms = start.elapsed().as_millis() as u64;
        let clock = FrameClock::from_elapsed(now_ms, now_ms.saturating_sub(last_ms) as f32, &arena.config().timing);
        last_ms = now_ms;

        let input = autopilot(arena.state(), arena.config(), now_ms);
        let result = arena.tick(&input, clock);
        summary.record(&result.events);
        if result.match_ended {
            summary.outcome = result.outcome;
            break;
        }
    }

    summary.finish(arena.state());
    summary
}

/// Walk toward the nearest opponent, keep some distance, shoot when in
/// range, dash whenever the dash is ready and someone is close.
fn autopilot(state: &MatchState, config: &SimConfig, now_ms: u64) -> InputFrame {
    let Some(player) = state.player.as_ref() else {
        return InputFrame::idle();
    };
    let position = player.position();

    let nearest = state
        .bots
        .iter()
        .map(|b| (b.position(), b.position().distance(position)))
        .min_by(|a, b| a.1.total_cmp(&b.1));
    let Some((target, distance)) = nearest else {
        return InputFrame::idle();
    };

    let mut input = InputFrame::idle().aiming_at(target);
    input.held = steer(target - position, distance, config.bots.shoot_range * 0.5);

    let has_ammo = player.ammo.is_some_and(|a| a.current > 0);
    input.fire = has_ammo && distance < config.bots.shoot_range && state.tick % 8 == 0;
    input.dash = distance < config.bots.shoot_range * 0.3 && player.can_dash(now_ms);
    input
}

/// Close in when far, back off when too close.
fn steer(offset: Vec2, distance: f32, preferred: f32) -> DirectionSet {
    let toward = if distance > preferred { offset } else { -offset };
    let mut held = DirectionSet::EMPTY;
    if toward.x > 1.0 {
        held.insert(Direction::Right);
    } else if toward.x < -1.0 {
        held.insert(Direction::Left);
    }
    if toward.y > 1.0 {
        held.insert(Direction::Down);
    } else if toward.y < -1.0 {
        held.insert(Direction::Up);
    }
    held
}
