//! Match State Definitions
//!
//! Entity types and the complete state of one match. Every population is
//! owned here and only mutated by the tick systems.

use glam::Vec2;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::config::SimConfig;
use crate::core::rng::SimRng;
use crate::game::camera::Camera;
use crate::game::content::MatchContent;
use crate::game::entity::{Body, Entity, EntityId, IdAllocator};
use crate::game::events::GameEvent;
use crate::game::population::Population;

// =============================================================================
// CHARACTERS
// =============================================================================

/// Who drives a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterKind {
    /// The single input-driven character
    Player,
    /// AI-driven opponent
    Bot,
}

/// Limited ammunition (controlled character only).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ammo {
    /// Rounds left
    pub current: u32,
    /// Cap for refills
    pub max: u32,
}

/// Dash bookkeeping.
///
/// The dash ends through `ends_at`, checked every tick, instead of a
/// timer callback; a restart throws the whole state away so nothing stale
/// can fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashState {
    /// Currently dashing?
    pub active: bool,
    /// Minimum time between dash starts (ms); 0 means the character can't dash.
    pub cooldown_ms: u64,
    /// When the last dash started
    pub last_started_at: Option<u64>,
    /// When the current dash stops
    pub ends_at: Option<u64>,
}

/// A character: the controlled character or an opponent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Base shape
    pub body: Body,
    /// Controller discriminator
    pub kind: CharacterKind,
    /// Display name
    pub name: String,
    /// Current health, kept in [0, max_health]
    pub health: f32,
    /// Maximum health
    pub max_health: f32,
    /// Velocity derived this tick
    pub velocity: Vec2,
    /// Hit-flash flag
    pub is_hit: bool,
    /// When the hit flag was last raised
    pub hit_at: Option<u64>,
    /// When this character last fired
    pub last_shot_at: Option<u64>,
    /// Facing angle in radians
    pub facing: f32,
    /// Ammo (None = unlimited)
    pub ammo: Option<Ammo>,
    /// Dash state
    pub dash: DashState,
}

impl Character {
    /// The controlled character at `position`, fully healed and loaded.
    pub fn player(config: &SimConfig, position: Vec2) -> Self {
        let tuning = &config.player;
        Self {
            body: Body::new(EntityId::PLAYER, position, tuning.size),
            kind: CharacterKind::Player,
            name: tuning.name.clone(),
            health: tuning.max_health,
            max_health: tuning.max_health,
            velocity: Vec2::ZERO,
            is_hit: false,
            hit_at: None,
            last_shot_at: None,
            facing: 0.0,
            ammo: Some(Ammo {
                current: tuning.initial_ammo,
                max: tuning.max_ammo,
            }),
            dash: DashState {
                cooldown_ms: tuning.dash_cooldown_ms,
                ..DashState::default()
            },
        }
    }

    /// An opponent.
    pub fn bot(id: EntityId, name: impl Into<String>, position: Vec2, config: &SimConfig) -> Self {
        let tuning = &config.bots;
        Self {
            body: Body::new(id, position, tuning.size),
            kind: CharacterKind::Bot,
            name: name.into(),
            health: tuning.max_health,
            max_health: tuning.max_health,
            velocity: Vec2::ZERO,
            is_hit: false,
            hit_at: None,
            last_shot_at: None,
            facing: 0.0,
            ammo: None,
            dash: DashState::default(),
        }
    }

    /// Is this the controlled character?
    #[inline]
    pub fn is_player(&self) -> bool {
        self.kind == CharacterKind::Player
    }

    /// Health above zero?
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Subtract `amount` health (floored at 0) and raise the hit flag.
    pub fn take_damage(&mut self, amount: f32, now_ms: u64) {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        self.is_hit = true;
        self.hit_at = Some(now_ms);
    }

    /// Restore `amount` health, capped at max.
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Refill ammo, capped at max. No-op for unlimited ammo.
    pub fn refill_ammo(&mut self, amount: u32) {
        if let Some(ammo) = self.ammo.as_mut() {
            ammo.current = ammo.current.saturating_add(amount).min(ammo.max);
        }
    }

    /// Health as a fraction of max, for HUD bars.
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            (self.health / self.max_health).clamp(0.0, 1.0)
        }
    }

    /// Check if a dash can start now.
    pub fn can_dash(&self, now_ms: u64) -> bool {
        if self.dash.active || self.dash.cooldown_ms == 0 {
            return false;
        }
        match self.dash.last_started_at {
            Some(started) => now_ms.saturating_sub(started) >= self.dash.cooldown_ms,
            None => true,
        }
    }

    /// Dash cooldown progress in [0, 1]; 1 when ready.
    pub fn dash_cooldown_progress(&self, now_ms: u64) -> f32 {
        match self.dash.last_started_at {
            Some(started) if self.dash.cooldown_ms > 0 => {
                let elapsed = now_ms.saturating_sub(started) as f32;
                (elapsed / self.dash.cooldown_ms as f32).min(1.0)
            }
            _ => 1.0,
        }
    }
}

impl Entity for Character {
    fn id(&self) -> EntityId {
        self.body.id
    }
}

// =============================================================================
// PROJECTILES & STATIC PROPS
// =============================================================================

/// A projectile in flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Base shape
    pub body: Body,
    /// Velocity per frame unit
    pub velocity: Vec2,
    /// Shooter id
    pub owner: EntityId,
    /// Damage on hit
    pub damage: f32,
}

impl Projectile {
    /// Fired by the controlled character (hits bots) or a bot (hits the player)?
    #[inline]
    pub fn fired_by_player(&self) -> bool {
        self.owner.is_player()
    }
}

impl Entity for Projectile {
    fn id(&self) -> EntityId {
        self.body.id
    }
}

/// Obstacle category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Small, round
    Tree,
    /// Large boulder
    Rock,
}

/// Static blocker: stops characters and projectiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Base shape
    pub body: Body,
    /// Category
    pub kind: ObstacleKind,
}

impl Entity for Obstacle {
    fn id(&self) -> EntityId {
        self.body.id
    }
}

/// Pickup category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores health
    Health,
    /// Restores ammo
    Ammo,
}

/// A consumable lying on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    /// Base shape
    pub body: Body,
    /// Category
    pub kind: PickupKind,
    /// Amount restored
    pub value: u32,
}

impl Entity for Pickup {
    fn id(&self) -> EntityId {
        self.body.id
    }
}

/// Push zone: shoves overlapping characters away from its center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnergyZone {
    /// Base shape
    pub body: Body,
    /// Outward speed added per frame unit
    pub push_force: f32,
}

impl Entity for EnergyZone {
    fn id(&self) -> EntityId {
        self.body.id
    }
}

/// Hazard category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    /// Molten floor
    Lava,
}

/// Rectangular ground decoration, optionally hazardous.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainPatch {
    /// Entity id
    pub id: EntityId,
    /// Center position
    pub position: Vec2,
    /// Footprint width
    pub width: f32,
    /// Footprint height
    pub height: f32,
    /// Hazard kind, if this patch hurts
    pub hazard: Option<HazardKind>,
    /// Index into the theme's terrain palette (ignored for hazards)
    pub tint: usize,
}

impl TerrainPatch {
    /// Is this patch flagged hazardous?
    #[inline]
    pub fn is_hazard(&self) -> bool {
        self.hazard.is_some()
    }

    /// Circular stand-in used for overlap tests: the smaller side as diameter.
    #[inline]
    pub fn footprint(&self) -> Body {
        Body::new(self.id, self.position, self.width.min(self.height))
    }
}

impl Entity for TerrainPatch {
    fn id(&self) -> EntityId {
        self.id
    }
}

// =============================================================================
// COSMETICS
// =============================================================================

/// What spawned a particle; the renderer picks colors from this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Projectile struck a character
    Hit,
    /// Projectile struck an obstacle
    Ricochet,
    /// Burst at the start of a dash
    DashBurst,
    /// Ghost left behind each dashing tick
    DashTrail,
}

/// A decaying cosmetic particle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Base shape
    pub body: Body,
    /// Drift velocity
    pub velocity: Vec2,
    /// Remaining lifetime (ms)
    pub life: f32,
    /// Initial lifetime (ms)
    pub max_life: f32,
    /// Origin
    pub kind: ParticleKind,
}

impl Particle {
    /// Opacity ratio in [0, 1].
    pub fn fade(&self) -> f32 {
        fade_ratio(self.life, self.max_life)
    }
}

impl Entity for Particle {
    fn id(&self) -> EntityId {
        self.body.id
    }
}

/// A short flash at a muzzle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MuzzleFlash {
    /// Base shape
    pub body: Body,
    /// Shot direction in radians
    pub angle: f32,
    /// Remaining lifetime (ms)
    pub life: f32,
    /// Initial lifetime (ms)
    pub max_life: f32,
}

impl MuzzleFlash {
    /// Opacity ratio in [0, 1].
    pub fn fade(&self) -> f32 {
        fade_ratio(self.life, self.max_life)
    }
}

impl Entity for MuzzleFlash {
    fn id(&self) -> EntityId {
        self.body.id
    }
}

fn fade_ratio(life: f32, max_life: f32) -> f32 {
    if max_life <= 0.0 {
        0.0
    } else {
        (life / max_life).clamp(0.0, 1.0)
    }
}

/// Kill notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KillFeedItem {
    /// Entity id
    pub id: EntityId,
    /// Eliminator
    pub killer_name: String,
    /// Eliminated opponent
    pub victim_name: String,
    /// Creation time (ms)
    pub created_at: u64,
    /// Removal time (ms)
    pub expires_at: u64,
}

impl Entity for KillFeedItem {
    fn id(&self) -> EntityId {
        self.id
    }
}

// =============================================================================
// THEME
// =============================================================================

/// Environmental hazard of a theme.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    /// Visual kind
    pub kind: HazardKind,
    /// Render color
    pub color: String,
    /// Health lost per frame unit of overlap
    pub damage: f32,
}

/// Palette and optional hazard chosen at setup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapTheme {
    /// Theme name
    pub name: String,
    /// Ground color
    pub background: String,
    /// Terrain patch palette
    pub terrain_colors: Vec<String>,
    /// Tree color
    pub tree_color: String,
    /// Rock color
    pub rock_color: String,
    /// Hazard, if the theme has one
    pub hazard: Option<Hazard>,
}

// =============================================================================
// MATCH STATE
// =============================================================================

/// Current phase of the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Controlled character eliminated
    GameOver,
    /// All opponents eliminated
    Victory,
}

impl MatchPhase {
    /// Terminal phases stop the simulation.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, MatchPhase::Playing)
    }
}

/// Complete state of a match.
#[derive(Clone, Debug)]
pub struct MatchState {
    /// Match identifier (fresh on every restart)
    pub match_id: Uuid,

    /// Ticks simulated so far
    pub tick: u64,

    /// Clock value of the latest tick (ms)
    pub now_ms: u64,

    /// Current phase
    pub phase: MatchPhase,

    /// Palette and hazard
    pub theme: MapTheme,

    /// Side length of the square map
    pub map_size: f32,

    /// Controlled character; None once eliminated
    pub player: Option<Character>,

    /// Opponents
    pub bots: Population<Character>,

    /// Projectiles in flight
    pub projectiles: Population<Projectile>,

    /// Static blockers
    pub obstacles: Population<Obstacle>,

    /// Uncollected pickups
    pub pickups: Population<Pickup>,

    /// Cosmetic particles
    pub particles: Population<Particle>,

    /// Cosmetic muzzle flashes
    pub muzzle_flashes: Population<MuzzleFlash>,

    /// Push zones
    pub energy_zones: Population<EnergyZone>,

    /// Ground patches
    pub terrain_patches: Population<TerrainPatch>,

    /// Kill notifications
    pub kill_feed: Population<KillFeedItem>,

    /// Smoothed view offset
    pub camera: Camera,

    /// Viewport size the camera centers in
    pub viewport: Vec2,

    /// Id source for anything spawned mid-match
    pub ids: IdAllocator,

    /// Effect jitter
    pub rng: SimRng,

    /// Events generated this tick (drained by `take_events`)
    pub pending_events: Vec<GameEvent>,
}

impl MatchState {
    /// Build a fresh match from generated content.
    ///
    /// The controlled character spawns at the map center and the camera
    /// starts centered on it.
    pub fn from_content(
        config: &SimConfig,
        ids: IdAllocator,
        content: MatchContent,
        rng: SimRng,
        viewport: Vec2,
    ) -> Self {
        let player = Character::player(config, config.map_center());
        let camera = Camera::centered_on(player.position(), viewport);

        Self {
            match_id: Uuid::new_v4(),
            tick: 0,
            now_ms: 0,
            phase: MatchPhase::Playing,
            theme: content.theme,
            map_size: config.arena.map_size,
            player: Some(player),
            bots: Population::from(content.opponents),
            projectiles: Population::new(),
            obstacles: Population::from(content.obstacles),
            pickups: Population::from(content.pickups),
            particles: Population::new(),
            muzzle_flashes: Population::new(),
            energy_zones: Population::from(content.energy_zones),
            terrain_patches: Population::from(content.terrain_patches),
            kill_feed: Population::new(),
            camera,
            viewport,
            ids,
            rng,
            pending_events: Vec::new(),
        }
    }

    /// Allocate an id for an entity spawned mid-match.
    #[inline]
    pub fn next_entity_id(&mut self) -> EntityId {
        self.ids.next_id()
    }

    /// Position of the controlled character, if still in play.
    #[inline]
    pub fn player_position(&self) -> Option<Vec2> {
        self.player.as_ref().map(Character::position)
    }

    /// Opponents still in the population.
    #[inline]
    pub fn bots_remaining(&self) -> usize {
        self.bots.len()
    }

    /// Iterate the controlled character (if present) followed by every opponent.
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.player.iter().chain(self.bots.iter())
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================
