//! Game Events
//!
//! Events generated during a tick, in orchestrator order. Renderers and the
//! runner use them for audio cues and logging; the simulation never reads
//! them back.

use glam::Vec2;
use serde::{Serialize, Deserialize};

use crate::game::entity::EntityId;
use crate::game::state::PickupKind;

/// How a finished match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Every opponent was eliminated
    Victory,
    /// The controlled character was eliminated
    Defeat,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A projectile was spawned
    ShotFired {
        shooter: EntityId,
        projectile: EntityId,
        angle: f32,
    },

    /// A projectile damaged a character
    ProjectileHit {
        projectile: EntityId,
        target: EntityId,
        damage: f32,
        remaining_health: f32,
    },

    /// A projectile struck an obstacle
    ProjectileBlocked {
        projectile: EntityId,
        obstacle: EntityId,
    },

    /// The controlled character consumed a pickup
    PickupCollected {
        pickup: EntityId,
        kind: PickupKind,
        value: u32,
    },

    /// A dash began
    DashStarted {
        character: EntityId,
        position: Vec2,
    },

    /// A dash ran out
    DashEnded {
        character: EntityId,
    },

    /// An opponent reached zero health and was removed
    OpponentEliminated {
        victim: EntityId,
        victim_name: String,
        killer_name: String,
    },

    /// The controlled character reached zero health
    PlayerEliminated,

    /// The match reached a terminal phase
    MatchEnded {
        outcome: MatchOutcome,
        duration_ticks: u64,
    },
}

/// A game event with timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when the event occurred
    pub tick: u64,

    /// Clock value of that tick (ms)
    pub at_ms: u64,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u64, at_ms: u64, data: GameEventData) -> Self {
        Self { tick, at_ms, data }
    }

    /// Entity the event is mostly about, if any.
    pub fn subject(&self) -> Option<EntityId> {
        match &self.data {
            GameEventData::ShotFired { shooter, .. } => Some(*shooter),
            GameEventData::ProjectileHit { target, .. } => Some(*target),
            GameEventData::ProjectileBlocked { projectile, .. } => Some(*projectile),
            GameEventData::PickupCollected { pickup, .. } => Some(*pickup),
            GameEventData::DashStarted { character, .. } => Some(*character),
            GameEventData::DashEnded { character } => Some(*character),
            GameEventData::OpponentEliminated { victim, .. } => Some(*victim),
            GameEventData::PlayerEliminated => Some(EntityId::PLAYER),
            GameEventData::MatchEnded { .. } => None,
        }
    }

    /// Create shot fired event.
    pub fn shot_fired(tick: u64, at_ms: u64, shooter: EntityId, projectile: EntityId, angle: f32) -> Self {
        Self::new(tick, at_ms, GameEventData::ShotFired { shooter, projectile, angle })
    }

    /// Create projectile hit event.
    pub fn projectile_hit(
        tick: u64,
        at_ms: u64,
        projectile: EntityId,
        target: EntityId,
        damage: f32,
        remaining_health: f32,
    ) -> Self {
        Self::new(
            tick,
            at_ms,
            GameEventData::ProjectileHit {
                projectile,
                target,
                damage,
                remaining_health,
            },
        )
    }

    /// Create opponent eliminated event.
    pub fn opponent_eliminated(
        tick: u64,
        at_ms: u64,
        victim: EntityId,
        victim_name: impl Into<String>,
        killer_name: impl Into<String>,
    ) -> Self {
        Self::new(
            tick,
            at_ms,
            GameEventData::OpponentEliminated {
                victim,
                victim_name: victim_name.into(),
                killer_name: killer_name.into(),
            },
        )
    }

    /// Create match ended event.
    pub fn match_ended(tick: u64, at_ms: u64, outcome: MatchOutcome) -> Self {
        Self::new(
            tick,
            at_ms,
            GameEventData::MatchEnded {
                outcome,
                duration_ticks: tick,
            },
        )
    }
}
