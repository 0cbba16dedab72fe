//! # Arena Sim
//!
//! Headless simulation engine for a top-down arena shooter: one controlled
//! character against a crowd of AI opponents on a square map with
//! obstacles, push zones, hazard patches and pickups.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ARENA SIM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  config.rs       - SimConfig, JSON / env loading             │
//! │                                                              │
//! │  core/                                                       │
//! │  └── rng.rs      - Seeded Xorshift128+ PRNG                  │
//! │                                                              │
//! │  game/                                                       │
//! │  ├── engine.rs   - Arena: owns the match, restart, snapshot  │
//! │  ├── tick.rs     - Per-tick orchestrator and end conditions  │
//! │  ├── motion.rs   - Movement, push zones, hazards, dash       │
//! │  ├── ai.rs       - Opponent pursuit and shooting             │
//! │  ├── combat.rs   - Shots, projectile travel, hits            │
//! │  ├── effects.rs  - Particles and muzzle flashes              │
//! │  ├── content.rs  - Map themes and content generators         │
//! │  └── ...         - State, populations, collision, input      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Driving a match
//!
//! ```
//! use arena_sim::{Arena, FrameClock, InputFrame, SimConfig};
//!
//! let mut config = SimConfig::default();
//! config.bots.count = 3;
//!
//! let mut arena = Arena::from_config(config);
//! let result = arena.tick(&InputFrame::idle(), FrameClock::new(17, 1.0));
//! assert!(!result.match_ended);
//! ```
//!
//! The engine never reads the wall clock or global input state: each tick
//! receives an explicit [`FrameClock`] and [`InputFrame`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use config::{ConfigError, SimConfig};
pub use crate::core::rng::SimRng;
pub use game::engine::{Arena, Snapshot};
pub use game::events::{GameEvent, GameEventData, MatchOutcome};
pub use game::input::{Direction, DirectionSet, FrameClock, InputFrame};
pub use game::state::{MatchPhase, MatchState};
pub use game::tick::TickResult;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal frame rate the tuning is expressed against (Hz)
pub const FRAME_RATE: u32 = 60;
