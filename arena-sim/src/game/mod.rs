//! Game Logic Module
//!
//! Everything that happens inside a match.
//!
//! ## Module Structure
//!
//! - `entity`: ids and the shared body shape
//! - `population`: mark-then-compact entity containers
//! - `state`: entity types and the match state
//! - `input`: per-tick input and clock value objects
//! - `collision`: overlap tests and queries
//! - `motion`: movement, push zones, hazards, dash
//! - `ai`: opponent pursuit and shooting
//! - `combat`: shots, projectile travel, hits
//! - `effects`: particles and muzzle flashes
//! - `camera`: smoothed follow camera
//! - `pickup`: pickup consumption
//! - `tick`: the per-tick orchestrator and end conditions
//! - `content`: content generators and built-in themes
//! - `engine`: the `Arena` that owns a match
//! - `events`: game events reported by each tick

pub mod entity;
pub mod population;
pub mod state;
pub mod input;
pub mod collision;
pub mod motion;
pub mod ai;
pub mod combat;
pub mod effects;
pub mod camera;
pub mod pickup;
pub mod tick;
pub mod content;
pub mod engine;
pub mod events;

// Re-export key types
pub use camera::Camera;
pub use content::{ContentGenerator, FixedContent, MatchContent, ScatterGenerator};
pub use engine::{Arena, Snapshot};
pub use entity::{Body, EntityId};
pub use events::{GameEvent, GameEventData, MatchOutcome};
pub use input::{Direction, DirectionSet, FrameClock, InputFrame};
pub use population::Population;
pub use state::{Character, MatchPhase, MatchState};
pub use tick::TickResult;
