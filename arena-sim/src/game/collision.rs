//! Collision Detection
//!
//! Circular overlap tests between bodies, plus the population queries the
//! motion and combat systems need.

use glam::Vec2;

use crate::game::entity::Body;
use crate::game::population::Population;
use crate::game::state::{EnergyZone, Obstacle, TerrainPatch};

/// Check if two circles overlap.
///
/// Touching circles do not overlap: the distance must be strictly less
/// than the sum of the radii.
#[inline]
pub fn circles_overlap(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> bool {
    let combined = radius_a + radius_b;
    pos_a.distance_squared(pos_b) < combined * combined
}

/// Check if two bodies overlap, using `size` as the diameter.
#[inline]
pub fn overlaps(a: &Body, b: &Body) -> bool {
    circles_overlap(a.position, a.radius(), b.position, b.radius())
}

/// Index of the first obstacle `body` overlaps, if any.
pub fn first_blocking_obstacle(body: &Body, obstacles: &Population<Obstacle>) -> Option<usize> {
    obstacles.iter().position(|o| overlaps(body, &o.body))
}

/// Does `body` overlap any obstacle?
#[inline]
pub fn is_blocked(body: &Body, obstacles: &Population<Obstacle>) -> bool {
    first_blocking_obstacle(body, obstacles).is_some()
}

/// Every push zone `body` overlaps.
pub fn overlapping_zones<'a>(
    body: &'a Body,
    zones: &'a Population<EnergyZone>,
) -> impl Iterator<Item = &'a EnergyZone> + 'a {
    zones.iter().filter(move |z| overlaps(body, &z.body))
}

/// Number of hazardous patches `body` overlaps.
///
/// Patches are tested as circles whose diameter is the smaller side.
pub fn hazard_overlap_count(body: &Body, patches: &Population<TerrainPatch>) -> usize {
    patches
        .iter()
        .filter(|p| p.is_hazard() && overlaps(body, &p.footprint()))
        .count()
}

/// Clamp a center position so a body of `size` stays inside the map.
#[inline]
pub fn clamp_to_map(position: Vec2, size: f32, map_size: f32) -> Vec2 {
    let half = size * 0.5;
    let max = (map_size - half).max(half);
    position.clamp(Vec2::splat(half), Vec2::splat(max))
}

/// Is `position` strictly inside the open square (0, map_size)²?
///
/// A projectile sitting exactly on an edge counts as gone.
#[inline]
pub fn in_map(position: Vec2, map_size: f32) -> bool {
    let inside = |v: f32| v > 0.0 && v < map_size;
    inside(position.x) && inside(position.y)
}
