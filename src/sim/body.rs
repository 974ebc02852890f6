//! Kinematic body: position, size and velocity shared by every simulated entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::MAX_FALL_ACCEL;
use crate::error::SimError;

/// Position/size/velocity state (units are pixels and pixels per tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
}

impl KinematicBody {
    /// Create a body at rest. Width and height must be positive.
    pub fn new(pos: Vec2, size: Vec2) -> Result<Self, SimError> {
        SimError::require_positive("body.width", size.x)?;
        SimError::require_positive("body.height", size.y)?;
        Ok(Self {
            pos,
            size,
            vel: Vec2::ZERO,
        })
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Vertical speed gained this tick after `fall_ticks` ticks of falling.
    ///
    /// Ramps linearly with fall time but never exceeds `MAX_FALL_ACCEL`.
    #[inline]
    pub fn fall_accel(fall_ticks: u32, ticks_per_second: u32, gravity: f32) -> f32 {
        ((fall_ticks as f32 / ticks_per_second as f32) * gravity).min(MAX_FALL_ACCEL)
    }

    /// Apply gravity, then move by the current velocity
    pub fn integrate(&mut self, fall_ticks: u32, ticks_per_second: u32, gravity: f32) {
        self.vel.y += Self::fall_accel(fall_ticks, ticks_per_second, gravity);
        self.pos += self.vel;
    }

    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    /// Snap so the bottom edge sits at `y`
    #[inline]
    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }

    /// Snap so the top edge sits at `y`
    #[inline]
    pub fn set_top(&mut self, y: f32) {
        self.pos.y = y;
    }
}
