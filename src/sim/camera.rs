//! Side-scrolling camera
//!
//! The view stays put while the actor moves around the middle of the screen.
//! Once the actor is within a trigger margin of an edge and still heading
//! toward it, the offset follows by the actor's own velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use crate::settings::SimConfig;

/// World-space offset of the viewport's top-left corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraOffset {
    pub x: f32,
    pub y: f32,
}

impl CameraOffset {
    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Scroll policy derived from the settings
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollController {
    pub viewport: Vec2,
    pub margin_x: f32,
    pub margin_y: f32,
    /// Track the vertical axis too (dual-axis levels)
    pub vertical: bool,
    /// Optional [min, max] for the horizontal offset
    pub clamp_x: Option<[f32; 2]>,
}

impl ScrollController {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            viewport: Vec2::new(config.viewport_width, config.viewport_height),
            margin_x: config.scroll_margin_x,
            margin_y: config.scroll_margin_y,
            vertical: config.vertical_scroll,
            clamp_x: config.scroll_clamp_x,
        }
    }

    /// Recompute the offset from the actor's position and velocity
    pub fn update(&self, offset: &mut CameraOffset, actor: &Actor) {
        let rect = actor.rect();
        let vel = actor.vel();

        let near_right = rect.right() - offset.x >= self.viewport.x - self.margin_x;
        let near_left = rect.left() - offset.x <= self.margin_x;
        if (near_right && vel.x > 0.0) || (near_left && vel.x < 0.0) {
            offset.x += vel.x;
        }
        if let Some([min, max]) = self.clamp_x {
            offset.x = offset.x.clamp(min, max);
        }

        if self.vertical {
            let near_bottom = rect.bottom() - offset.y >= self.viewport.y - self.margin_y;
            let near_top = rect.top() - offset.y <= self.margin_y;
            if (near_bottom && vel.y > 0.0) || (near_top && vel.y < 0.0) {
                offset.y += vel.y;
            }
        }
    }
}
