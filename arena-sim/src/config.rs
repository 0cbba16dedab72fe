//! Simulation Configuration
//!
//! Every tuning constant of the arena lives here. Defaults reproduce the
//! reference balance; a JSON file and a handful of environment variables
//! can override them.
//!
//! ```text
//! ARENA_CONFIG=path/to/arena.json   # partial JSON, missing keys keep defaults
//! ARENA_SEED=42                     # content + effect RNG seed
//! ARENA_BOTS=10                     # opponent count
//! ```

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for `SimConfig`.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },

    /// Values parsed but make no sense together.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// =============================================================================
// TUNING SECTIONS
// =============================================================================

/// Map and view dimensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    /// Side length of the square map.
    pub map_size: f32,
    /// Default viewport used by the camera until the renderer reports one.
    pub viewport: Vec2,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            map_size: 4000.0,
            viewport: Vec2::new(1280.0, 720.0),
        }
    }
}

/// Frame normalization and timed visual state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    /// Milliseconds that count as one frame unit of `dt`.
    pub frame_ms: f32,
    /// Upper bound on `dt` so a stalled frame can't tunnel entities.
    pub max_frame_delta: f32,
    /// How long the hit flag stays up after damage (ms).
    pub hit_flash_ms: u64,
    /// How long a kill-feed entry stays visible (ms).
    pub kill_feed_ms: u64,
    /// Fraction of the remaining camera distance covered per frame unit.
    pub camera_smoothing: f32,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            frame_ms: 16.67,
            max_frame_delta: 2.0,
            hit_flash_ms: 150,
            kill_feed_ms: 5000,
            camera_smoothing: 0.1,
        }
    }
}

/// The controlled character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Display name (shown as killer in the kill feed).
    pub name: String,
    /// Base speed per frame unit.
    pub speed: f32,
    /// Collision diameter.
    pub size: f32,
    /// Starting and maximum health.
    pub max_health: f32,
    /// Ammo at match start.
    pub initial_ammo: u32,
    /// Ammo cap for pickups.
    pub max_ammo: u32,
    /// Damage dealt by each player projectile.
    pub projectile_damage: f32,
    /// Speed while dashing.
    pub dash_force: f32,
    /// Dash length (ms).
    pub dash_duration_ms: u64,
    /// Minimum time between dash starts (ms).
    pub dash_cooldown_ms: u64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            name: "You".to_string(),
            speed: 4.0,
            size: 40.0,
            max_health: 100.0,
            initial_ammo: 50,
            max_ammo: 100,
            projectile_damage: 10.0,
            dash_force: 25.0,
            dash_duration_ms: 150,
            dash_cooldown_ms: 2000,
        }
    }
}

/// Opponents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotTuning {
    /// Opponents spawned per match.
    pub count: usize,
    /// Collision diameter.
    pub size: f32,
    /// Starting and maximum health.
    pub max_health: f32,
    /// Fraction of the player's speed bots move at.
    pub speed_factor: f32,
    /// Bots only fire when the player is closer than this.
    pub shoot_range: f32,
    /// Minimum time between shots of one bot (ms).
    pub shoot_cooldown_ms: u64,
    /// Damage dealt by each bot projectile.
    pub projectile_damage: f32,
}

impl Default for BotTuning {
    fn default() -> Self {
        Self {
            count: 49,
            size: 40.0,
            max_health: 50.0,
            speed_factor: 0.65,
            shoot_range: 600.0,
            shoot_cooldown_ms: 1500,
            projectile_damage: 5.0,
        }
    }
}

/// Shared projectile shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Travel speed per frame unit.
    pub speed: f32,
    /// Collision diameter.
    pub size: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self { speed: 10.0, size: 8.0 }
    }
}

/// Cosmetic particles and muzzle flashes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    /// Lifetime (ms) lost per frame unit.
    pub decay_per_frame: f32,
    /// Fraction of particle velocity applied per frame unit.
    pub particle_drift: f32,
    /// Particles per impact burst.
    pub impact_particles: usize,
    /// Lifetime of an impact particle (ms).
    pub impact_life: f32,
    /// Impact particle speed range.
    pub impact_speed: (f32, f32),
    /// Impact particle size range.
    pub impact_size: (f32, f32),
    /// Lifetime of a dash trail ghost (ms).
    pub dash_trail_life: f32,
    /// Muzzle flash diameter.
    pub muzzle_flash_size: f32,
    /// Muzzle flash lifetime (ms).
    pub muzzle_flash_life: f32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            decay_per_frame: 16.0,
            particle_drift: 0.5,
            impact_particles: 5,
            impact_life: 200.0,
            impact_speed: (1.0, 4.0),
            impact_size: (2.0, 6.0),
            dash_trail_life: 100.0,
            muzzle_flash_size: 40.0,
            muzzle_flash_life: 50.0,
        }
    }
}

/// Health and ammo pickups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    /// Collision diameter.
    pub size: f32,
    /// Health restored by a health pickup.
    pub health_value: u32,
    /// Ammo restored by an ammo pickup.
    pub ammo_value: u32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            size: 35.0,
            health_value: 25,
            ammo_value: 20,
        }
    }
}

/// Push zones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTuning {
    /// Outward speed added per overlapping zone.
    pub push_force: f32,
    /// Zone diameter range.
    pub size: (f32, f32),
}

impl Default for ZoneTuning {
    fn default() -> Self {
        Self {
            push_force: 3.0,
            size: (150.0, 350.0),
        }
    }
}

/// Procedural placement used by the scatter generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentTuning {
    /// Obstacles per match.
    pub obstacles: usize,
    /// Health pickups per match.
    pub health_pickups: usize,
    /// Ammo pickups per match.
    pub ammo_pickups: usize,
    /// Push zones per match.
    pub energy_zones: usize,
    /// Terrain patches per match.
    pub terrain_patches: usize,
    /// Probability a patch is hazardous on a hazard theme.
    pub hazard_chance: f32,
    /// Keep-out band along the map edge for placement.
    pub spawn_margin: f32,
    /// Rejection-sampling budget per placed entity.
    pub max_placement_attempts: u32,
}

impl Default for ContentTuning {
    fn default() -> Self {
        Self {
            obstacles: 80,
            health_pickups: 20,
            ammo_pickups: 20,
            energy_zones: 5,
            terrain_patches: 40,
            hazard_chance: 0.3,
            spawn_margin: 50.0,
            max_placement_attempts: 1000,
        }
    }
}

// =============================================================================
// SIM CONFIG
// =============================================================================

/// Complete simulation configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for content placement and effect jitter.
    pub seed: u64,
    /// Map and view.
    pub arena: ArenaTuning,
    /// Frame timing and timed visuals.
    pub timing: TimingTuning,
    /// Controlled character.
    pub player: PlayerTuning,
    /// Opponents.
    pub bots: BotTuning,
    /// Projectiles.
    pub projectile: ProjectileTuning,
    /// Particles and muzzle flashes.
    pub effects: EffectTuning,
    /// Pickups.
    pub pickups: PickupTuning,
    /// Push zones.
    pub zones: ZoneTuning,
    /// Procedural placement.
    pub content: ContentTuning,
}

impl SimConfig {
    /// Load a (possibly partial) JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SimConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Build config from `ARENA_CONFIG`, `ARENA_SEED` and `ARENA_BOTS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("ARENA_CONFIG") {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };

        if let Some(seed) = env_parse::<u64>("ARENA_SEED")? {
            config.seed = seed;
        }
        if let Some(count) = env_parse::<usize>("ARENA_BOTS")? {
            config.bots.count = count;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation can't run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !(self.arena.map_size > 0.0) {
            return fail("arena.map_size must be positive");
        }
        if self.player.size <= 0.0 || self.bots.size <= 0.0 || self.projectile.size <= 0.0 {
            return fail("entity sizes must be positive");
        }
        if self.player.size >= self.arena.map_size || self.bots.size >= self.arena.map_size {
            return fail("characters must fit inside the map");
        }
        if self.player.max_health <= 0.0 || self.bots.max_health <= 0.0 {
            return fail("max_health must be positive");
        }
        if self.player.initial_ammo > self.player.max_ammo {
            return fail("player.initial_ammo exceeds player.max_ammo");
        }
        if self.bots.shoot_range <= 0.0 {
            return fail("bots.shoot_range must be positive");
        }
        if self.timing.frame_ms <= 0.0 || self.timing.max_frame_delta <= 0.0 {
            return fail("timing.frame_ms and timing.max_frame_delta must be positive");
        }
        if self.timing.hit_flash_ms == 0 || self.player.dash_duration_ms == 0 {
            return fail("hit flash and dash durations must be non-zero");
        }
        if !(0.0..=1.0).contains(&self.timing.camera_smoothing) {
            return fail("timing.camera_smoothing must be within [0, 1]");
        }
        if self.content.spawn_margin * 2.0 >= self.arena.map_size {
            return fail("content.spawn_margin leaves no room to place anything");
        }
        Ok(())
    }

    /// Speed opponents move at.
    #[inline]
    pub fn bot_speed(&self) -> f32 {
        self.player.speed * self.bots.speed_factor
    }

    /// Center of the map, where the controlled character spawns.
    #[inline]
    pub fn map_center(&self) -> Vec2 {
        Vec2::splat(self.arena.map_size / 2.0)
    }
}

fn env_parse<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key, value }),
        Err(_) => Ok(None),
    }
}
