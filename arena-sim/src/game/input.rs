//! Input and Clock Value Objects
//!
//! The tick never reads ambient state: the caller hands it one
//! [`InputFrame`] (what the controls say right now) and one [`FrameClock`]
//! (what time it is and how much of it passed).

use glam::Vec2;
use serde::{Serialize, Deserialize};

use crate::config::TimingTuning;

// =============================================================================
// DIRECTIONS
// =============================================================================

/// One of the four movement keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Negative y
    Up = 0x01,
    /// Positive y
    Down = 0x02,
    /// Negative x
    Left = 0x04,
    /// Positive x
    Right = 0x08,
}

/// Set of held movement directions (packed bits).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectionSet(u8);

impl DirectionSet {
    /// Nothing held.
    pub const EMPTY: DirectionSet = DirectionSet(0);

    /// Build a set from a list of directions.
    pub fn of(directions: &[Direction]) -> Self {
        let mut set = Self::EMPTY;
        for d in directions {
            set.insert(*d);
        }
        set
    }

    /// Mark a direction held.
    #[inline]
    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction as u8;
    }

    /// Mark a direction released.
    #[inline]
    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !(direction as u8);
    }

    /// Is `direction` held?
    #[inline]
    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction as u8 != 0
    }

    /// True if nothing is held.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw axis intent, each component in {-1, 0, 1}.
    ///
    /// Opposite keys don't cancel: Down overrides Up and Right overrides Left.
    pub fn axis(self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.contains(Direction::Up) {
            v.y = -1.0;
        }
        if self.contains(Direction::Down) {
            v.y = 1.0;
        }
        if self.contains(Direction::Left) {
            v.x = -1.0;
        }
        if self.contains(Direction::Right) {
            v.x = 1.0;
        }
        v
    }

    /// Unit intent vector, or zero when nothing is held.
    #[inline]
    pub fn intent(self) -> Vec2 {
        self.axis().normalize_or_zero()
    }
}

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Controls sampled once at the start of a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Held movement keys
    pub held: DirectionSet,

    /// Aim point in map coordinates
    pub aim: Vec2,

    /// Fire was pressed since the previous tick
    pub fire: bool,

    /// Dash was pressed since the previous tick
    pub dash: bool,
}

impl InputFrame {
    /// No keys, no actions, aiming at the origin.
    pub const fn idle() -> Self {
        Self {
            held: DirectionSet::EMPTY,
            aim: Vec2::ZERO,
            fire: false,
            dash: false,
        }
    }

    /// Builder: hold these directions.
    pub fn holding(mut self, directions: &[Direction]) -> Self {
        self.held = DirectionSet::of(directions);
        self
    }

    /// Builder: aim at a map point.
    pub fn aiming_at(mut self, aim: Vec2) -> Self {
        self.aim = aim;
        self
    }

    /// Builder: press fire this tick.
    pub fn firing(mut self) -> Self {
        self.fire = true;
        self
    }

    /// Builder: press dash this tick.
    pub fn dashing(mut self) -> Self {
        self.dash = true;
        self
    }

    /// Any movement key held?
    #[inline]
    pub fn has_movement(&self) -> bool {
        !self.held.is_empty()
    }
}

// =============================================================================
// CLOCK
// =============================================================================

/// Time of the current tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    /// Current time in ms (monotonic, caller-defined epoch)
    pub now_ms: u64,

    /// Elapsed time in frame units (1.0 = one nominal frame)
    pub dt: f32,
}

impl FrameClock {
    /// Clock with an explicit frame delta.
    pub const fn new(now_ms: u64, dt: f32) -> Self {
        Self { now_ms, dt }
    }

    /// Normalize a wall-clock gap into frame units.
    ///
    /// `dt = min(max_frame_delta, elapsed_ms / frame_ms)`; negative gaps
    /// collapse to zero.
    pub fn from_elapsed(now_ms: u64, elapsed_ms: f32, timing: &TimingTuning) -> Self {
        let dt = (elapsed_ms.max(0.0) / timing.frame_ms).min(timing.max_frame_delta);
        Self { now_ms, dt }
    }

    /// Clock advanced by exactly one nominal frame.
    pub fn next_frame(self, timing: &TimingTuning) -> Self {
        let now_ms = self.now_ms + timing.frame_ms.round() as u64;
        Self { now_ms, dt: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_set_flags() {
        let mut set = DirectionSet::of(&[Direction::Up, Direction::Left]);
        assert!(set.contains(Direction::Up));
        assert!(!set.contains(Direction::Down));

        set.remove(Direction::Up);
        assert!(!set.contains(Direction::Up));
        assert!(set.contains(Direction::Left));
        assert!(!set.is_empty());
    }

    #[test]
    fn test_diagonal_intent_is_normalized() {
        let intent = DirectionSet::of(&[Direction::Down, Direction::Right]).intent();
        assert!((intent.length() - 1.0).abs() < 1e-6);
        assert!(intent.x > 0.0 && intent.y > 0.0);
    }

    #[test]
    fn test_opposite_keys_later_wins() {
        let v = DirectionSet::of(&[Direction::Up, Direction::Down]).axis();
        assert_eq!(v, Vec2::new(0.0, 1.0));

        let h = DirectionSet::of(&[Direction::Right, Direction::Left]).axis();
        assert_eq!(h, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_empty_intent_is_zero() {
        assert_eq!(DirectionSet::EMPTY.intent(), Vec2::ZERO);
        assert!(!InputFrame::idle().has_movement());
    }

    #[test]
    fn test_input_builders() {
        let input = InputFrame::idle()
            .holding(&[Direction::Left])
            .aiming_at(Vec2::new(3.0, 4.0))
            .firing()
            .dashing();
        assert!(input.has_movement());
        assert!(input.fire && input.dash);
        assert_eq!(input.aim, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_clock_from_elapsed() {
        let timing = TimingTuning::default();

        let normal = FrameClock::from_elapsed(1000, 16.67, &timing);
        assert!((normal.dt - 1.0).abs() < 1e-4);

        // A long stall is capped
        let stalled = FrameClock::from_elapsed(5000, 1000.0, &timing);
        assert_eq!(stalled.dt, 2.0);

        let backwards = FrameClock::from_elapsed(5000, -3.0, &timing);
        assert_eq!(backwards.dt, 0.0);
    }

    #[test]
    fn test_clock_next_frame() {
        let timing = TimingTuning::default();
        let next = FrameClock::new(100, 0.5).next_frame(&timing);
        assert_eq!(next.now_ms, 117);
        assert_eq!(next.dt, 1.0);
    }
}
