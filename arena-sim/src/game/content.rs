//! Match Content Generation
//!
//! The engine asks a [`ContentGenerator`] for a fresh map on every restart.
//! [`ScatterGenerator`] rolls a random theme and rejection-samples
//! obstacles, opponents, pickups and push zones so nothing spawns on top
//! of anything else. [`FixedContent`] replays a prepared layout.

use glam::Vec2;
use tracing::warn;

use crate::config::SimConfig;
use crate::core::rng::SimRng;
use crate::game::collision::overlaps;
use crate::game::entity::{Body, EntityId, IdAllocator};
use crate::game::state::{
    Character, EnergyZone, Hazard, HazardKind, MapTheme, Obstacle, ObstacleKind, Pickup,
    PickupKind, TerrainPatch,
};

/// Opponent name roster. Names repeat with a numeric suffix after the first
/// pass (`Pixel_Pro`, ..., `Pixel_Pro1`, ...).
pub const BOT_NAMES: [&str; 10] = [
    "Shadow_Striker",
    "Pixel_Pro",
    "Cyber_Gladiator",
    "Robo_Hunter",
    "Quantum_Leaper",
    "Bot_Bandit",
    "Circuit_Slayer",
    "Data_Demon",
    "Silicon_Samurai",
    "Voltage_Viper",
];

/// Display name of the `index`-th opponent.
pub fn bot_name(index: usize) -> String {
    let base = BOT_NAMES[index % BOT_NAMES.len()];
    match index / BOT_NAMES.len() {
        0 => base.to_string(),
        cycle => format!("{base}{cycle}"),
    }
}

fn theme(name: &str, background: &str, terrain: &[&str], tree: &str, rock: &str, hazard: Option<Hazard>) -> MapTheme {
    MapTheme {
        name: name.to_string(),
        background: background.to_string(),
        terrain_colors: terrain.iter().map(|c| c.to_string()).collect(),
        tree_color: tree.to_string(),
        rock_color: rock.to_string(),
        hazard,
    }
}

/// The five built-in themes. Only Lava has a hazard.
pub fn builtin_themes() -> Vec<MapTheme> {
    vec![
        theme("Island", "#2f855a", &["#68d391", "#48bb78"], "#276749", "#718096", None),
        theme(
            "Lava",
            "#1a202c",
            &[],
            "#2d3748",
            "#1a202c",
            Some(Hazard {
                kind: HazardKind::Lava,
                color: "#f56565".to_string(),
                damage: 0.5,
            }),
        ),
        theme("Desert", "#fbd38d", &["#f6e05e", "#eddea4"], "#2f855a", "#b7791f", None),
        theme("Archipelago", "#4299e1", &["#2f855a", "#38a169"], "#276749", "#a0aec0", None),
        theme("Luxury", "#4a5568", &["#e2e8f0", "#90cdf4"], "#2c5282", "#718096", None),
    ]
}

// =============================================================================
// CONTENT
// =============================================================================

/// Everything a match starts with apart from the controlled character.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchContent {
    /// Palette and optional hazard
    pub theme: MapTheme,
    /// Static blockers
    pub obstacles: Vec<Obstacle>,
    /// Health and ammo pickups
    pub pickups: Vec<Pickup>,
    /// Push zones
    pub energy_zones: Vec<EnergyZone>,
    /// Ground patches
    pub terrain_patches: Vec<TerrainPatch>,
    /// Opponents at their spawn points
    pub opponents: Vec<Character>,
}

impl MatchContent {
    /// Nothing but the first built-in theme.
    pub fn empty() -> Self {
        let theme = builtin_themes().swap_remove(0);
        Self {
            theme,
            obstacles: Vec::new(),
            pickups: Vec::new(),
            energy_zones: Vec::new(),
            terrain_patches: Vec::new(),
            opponents: Vec::new(),
        }
    }

    /// Give every entity a fresh id from `ids`.
    ///
    /// Order: obstacles, opponents, pickups, zones, patches.
    pub fn reassign_ids(&mut self, ids: &mut IdAllocator) {
        for o in &mut self.obstacles {
            o.body.id = ids.next_id();
        }
        for c in &mut self.opponents {
            c.body.id = ids.next_id();
        }
        for p in &mut self.pickups {
            p.body.id = ids.next_id();
        }
        for z in &mut self.energy_zones {
            z.body.id = ids.next_id();
        }
        for t in &mut self.terrain_patches {
            t.id = ids.next_id();
        }
    }
}

/// Produces the content of a new match.
pub trait ContentGenerator {
    /// Build content, taking entity ids from `ids`.
    fn generate(&mut self, ids: &mut IdAllocator, config: &SimConfig) -> MatchContent;
}

impl<G: ContentGenerator + ?Sized> ContentGenerator for Box<G> {
    fn generate(&mut self, ids: &mut IdAllocator, config: &SimConfig) -> MatchContent {
        (**self).generate(ids, config)
    }
}

// =============================================================================
// FIXED CONTENT
// =============================================================================

/// Replays the same layout on every restart, with fresh ids each time.
#[derive(Clone, Debug)]
pub struct FixedContent {
    template: MatchContent,
}

impl FixedContent {
    /// Wrap a prepared layout. Ids in the template are ignored.
    pub fn new(template: MatchContent) -> Self {
        Self { template }
    }
}

impl ContentGenerator for FixedContent {
    fn generate(&mut self, ids: &mut IdAllocator, _config: &SimConfig) -> MatchContent {
        let mut content = self.template.clone();
        content.reassign_ids(ids);
        content
    }
}

// =============================================================================
// SCATTER GENERATOR
// =============================================================================

/// Seeded random layout.
#[derive(Clone, Debug)]
pub struct ScatterGenerator {
    rng: SimRng,
    themes: Vec<MapTheme>,
}

impl ScatterGenerator {
    /// Generator over the built-in themes.
    pub fn new(seed: u64) -> Self {
        Self::with_themes(seed, builtin_themes())
    }

    /// Generator over a custom theme list. An empty list falls back to the
    /// built-ins.
    pub fn with_themes(seed: u64, themes: Vec<MapTheme>) -> Self {
        let themes = if themes.is_empty() { builtin_themes() } else { themes };
        Self {
            rng: SimRng::new(seed),
            themes,
        }
    }

    /// Rejection-sample a center for a body of `size` that overlaps none of
    /// `blockers`. Falls back to the last candidate when the budget runs out.
    fn place(&mut self, size: f32, blockers: &[Body], config: &SimConfig) -> Vec2 {
        let margin = config.content.spawn_margin;
        let max = config.arena.map_size - margin;
        let attempts = config.content.max_placement_attempts.max(1);

        let mut candidate = Body::new(EntityId::default(), Vec2::ZERO, size);
        for _ in 0..attempts {
            candidate.position = self.rng.point_in_square(margin, max);
            if !blockers.iter().any(|b| overlaps(&candidate, b)) {
                return candidate.position;
            }
        }

        warn!(
            size,
            attempts,
            blockers = blockers.len(),
            "No free spot found, placing anyway"
        );
        candidate.position
    }
}

impl ContentGenerator for ScatterGenerator {
    fn generate(&mut self, ids: &mut IdAllocator, config: &SimConfig) -> MatchContent {
        let theme_index = self.rng.next_int(self.themes.len() as u32) as usize;
        let theme = self.themes[theme_index].clone();
        let counts = config.content.clone();

        // The controlled character spawns at the center
        let mut blockers = vec![Body::new(EntityId::PLAYER, config.map_center(), config.player.size)];

        let mut obstacles = Vec::with_capacity(counts.obstacles);
        for _ in 0..counts.obstacles {
            let (kind, size) = if self.rng.chance(0.5) {
                (ObstacleKind::Rock, self.rng.next_range(80.0, 200.0))
            } else {
                (ObstacleKind::Tree, self.rng.next_range(30.0, 70.0))
            };
            let position = self.place(size, &blockers, config);
            let body = Body::new(ids.next_id(), position, size);
            blockers.push(body);
            obstacles.push(Obstacle { body, kind });
        }

        let mut opponents = Vec::with_capacity(config.bots.count);
        for i in 0..config.bots.count {
            let position = self.place(config.bots.size, &blockers, config);
            let bot = Character::bot(ids.next_id(), bot_name(i), position, config);
            blockers.push(bot.body);
            opponents.push(bot);
        }

        let mut pickups = Vec::with_capacity(counts.health_pickups + counts.ammo_pickups);
        let pickup_kinds = std::iter::repeat(PickupKind::Health)
            .take(counts.health_pickups)
            .chain(std::iter::repeat(PickupKind::Ammo).take(counts.ammo_pickups));
        for kind in pickup_kinds {
            let value = match kind {
                PickupKind::Health => config.pickups.health_value,
                PickupKind::Ammo => config.pickups.ammo_value,
            };
            let position = self.place(config.pickups.size, &blockers, config);
            pickups.push(Pickup {
                body: Body::new(ids.next_id(), position, config.pickups.size),
                kind,
                value,
            });
        }

        let mut energy_zones = Vec::with_capacity(counts.energy_zones);
        for _ in 0..counts.energy_zones {
            let size = self.rng.next_range(config.zones.size.0, config.zones.size.1);
            let position = self.place(size, &blockers, config);
            let body = Body::new(ids.next_id(), position, size);
            blockers.push(body);
            energy_zones.push(EnergyZone {
                body,
                push_force: config.zones.push_force,
            });
        }

        // Ground decoration goes anywhere, overlapping is fine
        let hazard_kind = theme.hazard.as_ref().map(|h| h.kind);
        let palette = theme.terrain_colors.len() as u32;
        let mut terrain_patches = Vec::with_capacity(counts.terrain_patches);
        for _ in 0..counts.terrain_patches {
            let hazard = match hazard_kind {
                Some(kind) if self.rng.chance(counts.hazard_chance) => Some(kind),
                _ => None,
            };
            terrain_patches.push(TerrainPatch {
                id: ids.next_id(),
                position: self.rng.point_in_square(0.0, config.arena.map_size),
                width: self.rng.next_range(150.0, 450.0),
                height: self.rng.next_range(150.0, 450.0),
                hazard,
                tint: self.rng.next_int(palette) as usize,
            });
        }

        MatchContent {
            theme,
            obstacles,
            pickups,
            energy_zones,
            terrain_patches,
            opponents,
        }
    }
}
