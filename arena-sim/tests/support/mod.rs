// Shared setup for the integration tests.
#![allow(dead_code)]

use arena_sim::game::content::{ContentGenerator, FixedContent, MatchContent};
use arena_sim::game::entity::{Body, EntityId};
use arena_sim::game::state::{Character, Obstacle, ObstacleKind};
use arena_sim::{Arena, FrameClock, InputFrame, SimConfig, TickResult};
use glam::Vec2;

/// Where the controlled character spawns with default tuning.
pub const CENTER: Vec2 = Vec2::new(2000.0, 2000.0);

/// Milliseconds per nominal frame, rounded the way `FrameClock::next_frame` does.
pub const FRAME_MS: u64 = 17;

pub fn config() -> SimConfig {
    SimConfig::default()
}

/// Engine replaying `content` on every restart.
pub fn arena_with(content: MatchContent) -> Arena<FixedContent> {
    Arena::new(config(), FixedContent::new(content))
}

pub fn bot(name: &str, position: Vec2) -> Character {
    Character::bot(EntityId(0), name, position, &config())
}

pub fn rock(position: Vec2, size: f32) -> Obstacle {
    Obstacle {
        body: Body::new(EntityId(0), position, size),
        kind: ObstacleKind::Rock,
    }
}

/// Content with the given opponents and nothing else.
pub fn opponents(bots: Vec<Character>) -> MatchContent {
    let mut content = MatchContent::empty();
    content.opponents = bots;
    content
}

/// Drives an arena on a synthetic 17 ms clock.
pub struct Driver<G: ContentGenerator> {
    pub arena: Arena<G>,
    pub now_ms: u64,
}

impl<G: ContentGenerator> Driver<G> {
    pub fn new(arena: Arena<G>) -> Self {
        Self { arena, now_ms: 0 }
    }

    /// One nominal frame.
    pub fn step(&mut self, input: &InputFrame) -> TickResult {
        self.now_ms += FRAME_MS;
        self.arena.tick(input, FrameClock::new(self.now_ms, 1.0))
    }

    /// Jump the clock forward by `ms`, then tick once.
    pub fn step_after(&mut self, ms: u64, input: &InputFrame) -> TickResult {
        self.now_ms += ms;
        self.arena.tick(input, FrameClock::new(self.now_ms, 1.0))
    }

    /// Step idle until `done` holds, at most `limit` times. Returns ticks taken.
    pub fn run_until(&mut self, limit: usize, mut done: impl FnMut(&Arena<G>) -> bool) -> Option<usize> {
        for n in 1..=limit {
            self.step(&InputFrame::idle());
            if done(&self.arena) {
                return Some(n);
            }
        }
        None
    }
}
