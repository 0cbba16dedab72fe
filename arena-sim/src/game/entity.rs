//! Entity Identity and Base Shape
//!
//! Every spatial entity embeds a [`Body`]: id, position and collision
//! diameter. Ids come from one [`IdAllocator`] per match and are never
//! reused; id 0 is reserved for the controlled character.

use std::fmt;

use glam::Vec2;
use serde::{Serialize, Deserialize};

/// Unique entity identifier, monotonic within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    /// The controlled character.
    pub const PLAYER: EntityId = EntityId(0);

    /// Is this the controlled character's id?
    #[inline]
    pub fn is_player(self) -> bool {
        self == Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared base shape of every circular entity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Entity id
    pub id: EntityId,
    /// Center position in map coordinates
    pub position: Vec2,
    /// Collision diameter
    pub size: f32,
}

impl Body {
    /// Create a body.
    #[inline]
    pub const fn new(id: EntityId, position: Vec2, size: f32) -> Self {
        Self { id, position, size }
    }

    /// Half of `size`.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size * 0.5
    }
}

/// Anything stored in a [`Population`](super::population::Population).
pub trait Entity {
    /// Stable id of this entity.
    fn id(&self) -> EntityId;
}

/// Hands out entity ids for one match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Fresh allocator; the first id handed out is 1.
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next id.
    #[inline]
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Id that the next call to `next_id` will return.
    #[inline]
    pub fn peek(&self) -> EntityId {
        EntityId(self.next)
    }
}
