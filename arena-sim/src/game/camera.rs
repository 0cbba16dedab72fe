//! Camera Follower
//!
//! Offset that the renderer adds to map coordinates. It eases toward
//! centering the controlled character in the viewport.

use glam::Vec2;
use serde::{Serialize, Deserialize};

/// Smoothed view offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Translation applied to map coordinates
    pub offset: Vec2,
}

impl Camera {
    /// Offset that puts `focus` in the middle of `viewport`.
    #[inline]
    pub fn target_for(focus: Vec2, viewport: Vec2) -> Vec2 {
        -focus + viewport * 0.5
    }

    /// Camera already centered on `focus`.
    pub fn centered_on(focus: Vec2, viewport: Vec2) -> Self {
        Self {
            offset: Self::target_for(focus, viewport),
        }
    }

    /// Cover `smoothing × dt` of the remaining distance to the target.
    pub fn follow(&mut self, focus: Vec2, viewport: Vec2, smoothing: f32, dt: f32) {
        let target = Self::target_for(focus, viewport);
        self.offset += (target - self.offset) * smoothing * dt;
    }
}
