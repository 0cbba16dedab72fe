//! Arena Engine
//!
//! Owns the configuration, the content generator and the live match.
//! Callers drive it with [`Arena::tick`] and read it through
//! [`Arena::state`] or [`Arena::snapshot`]; nothing else may mutate the
//! populations.

use glam::Vec2;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::SimConfig;
use crate::core::rng::SimRng;
use crate::game::content::{ContentGenerator, ScatterGenerator};
use crate::game::entity::IdAllocator;
use crate::game::input::{FrameClock, InputFrame};
use crate::game::state::{
    Character, EnergyZone, KillFeedItem, MapTheme, MatchPhase, MatchState, MuzzleFlash, Obstacle,
    Particle, Pickup, Projectile, TerrainPatch,
};
use crate::game::tick::{tick, TickResult};

/// Read-only view of everything a renderer draws.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    /// Match identifier
    pub match_id: Uuid,
    /// Ticks simulated
    pub tick: u64,
    /// Current phase
    pub phase: MatchPhase,
    /// Camera offset
    pub camera: Vec2,
    /// Palette and hazard
    pub theme: &'a MapTheme,
    /// Controlled character, if alive
    pub player: Option<&'a Character>,
    /// Opponents
    pub bots: &'a [Character],
    /// Projectiles in flight
    pub projectiles: &'a [Projectile],
    /// Static blockers
    pub obstacles: &'a [Obstacle],
    /// Pickups
    pub pickups: &'a [Pickup],
    /// Particles
    pub particles: &'a [Particle],
    /// Muzzle flashes
    pub muzzle_flashes: &'a [MuzzleFlash],
    /// Push zones
    pub energy_zones: &'a [EnergyZone],
    /// Ground patches
    pub terrain_patches: &'a [TerrainPatch],
    /// Kill feed
    pub kill_feed: &'a [KillFeedItem],
}

/// The simulation engine for one arena.
pub struct Arena<G: ContentGenerator = ScatterGenerator> {
    config: SimConfig,
    generator: G,
    rng: SimRng,
    viewport: Vec2,
    state: MatchState,
}

impl Arena<ScatterGenerator> {
    /// Engine with random content, seeded from `config.seed`.
    pub fn from_config(config: SimConfig) -> Self {
        let mut root = SimRng::new(config.seed);
        let generator = ScatterGenerator::new(root.next_u64());
        Self::with_rng(config, generator, root)
    }
}

impl<G: ContentGenerator> Arena<G> {
    /// Engine with a custom content generator. The first match starts
    /// immediately.
    pub fn new(config: SimConfig, generator: G) -> Self {
        let rng = SimRng::new(config.seed);
        Self::with_rng(config, generator, rng)
    }

    fn with_rng(config: SimConfig, mut generator: G, mut rng: SimRng) -> Self {
        let viewport = config.arena.viewport;
        let state = fresh_state(&config, &mut generator, &mut rng, viewport);
        log_start(&state);
        Self {
            config,
            generator,
            rng,
            viewport,
            state,
        }
    }

    /// Throw away the current match and start a new one.
    ///
    /// Everything is regenerated, so nothing scheduled in the old match
    /// (dash end, kill-feed expiry) can leak into the new one.
    #[instrument(skip_all, fields(previous = %self.state.match_id))]
    pub fn restart(&mut self) {
        self.state = fresh_state(&self.config, &mut self.generator, &mut self.rng, self.viewport);
        log_start(&self.state);
    }

    /// Advance the match by one tick.
    #[instrument(level = "trace", skip_all, fields(match_id = %self.state.match_id, tick = self.state.tick))]
    pub fn tick(&mut self, input: &InputFrame, clock: FrameClock) -> TickResult {
        tick(&mut self.state, input, clock, &self.config)
    }

    /// Live match state.
    #[inline]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Mutable match state, for tools and test setups.
    #[inline]
    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> MatchPhase {
        self.state.phase
    }

    /// Camera offset.
    #[inline]
    pub fn camera_offset(&self) -> Vec2 {
        self.state.camera.offset
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Tell the camera how big the view is. Applies to this and later matches.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.state.viewport = viewport;
    }

    /// Borrowed view of every population.
    pub fn snapshot(&self) -> Snapshot<'_> {
        let s = &self.state;
        Snapshot {
            match_id: s.match_id,
            tick: s.tick,
            phase: s.phase,
            camera: s.camera.offset,
            theme: &s.theme,
            player: s.player.as_ref(),
            bots: s.bots.as_slice(),
            projectiles: s.projectiles.as_slice(),
            obstacles: s.obstacles.as_slice(),
            pickups: s.pickups.as_slice(),
            particles: s.particles.as_slice(),
            muzzle_flashes: s.muzzle_flashes.as_slice(),
            energy_zones: s.energy_zones.as_slice(),
            terrain_patches: s.terrain_patches.as_slice(),
            kill_feed: s.kill_feed.as_slice(),
        }
    }
}

fn fresh_state<G: ContentGenerator>(
    config: &SimConfig,
    generator: &mut G,
    rng: &mut SimRng,
    viewport: Vec2,
) -> MatchState {
    let mut ids = IdAllocator::new();
    let content = generator.generate(&mut ids, config);
    MatchState::from_content(config, ids, content, rng.fork(), viewport)
}

fn log_start(state: &MatchState) {
    info!(
        match_id = %state.match_id,
        theme = %state.theme.name,
        bots = state.bots.len(),
        obstacles = state.obstacles.len(),
        pickups = state.pickups.len(),
        "Match started"
    );
}
