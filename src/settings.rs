//! Simulation settings
//!
//! Everything tunable about the core lives here. Loaded from JSON by the host
//! and validated once before a session starts.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Timing ===
    /// Ticks per second; also scales gravity ramp-up and hit duration
    pub ticks_per_second: u32,
    /// Ticks each sprite frame is held
    pub animation_delay: u32,
    /// Ticks each hazard frame is held
    pub hazard_frame_hold: u32,
    /// Hit flash length (seconds)
    pub hit_duration_secs: u32,

    // === Physics ===
    /// Gravity unit
    pub gravity: f32,
    /// Jump impulse in gravity units
    pub jump_impulse: f32,
    /// Base horizontal speed (units per tick)
    pub player_speed: f32,
    /// Player hitbox (width, height)
    pub actor_size: [f32; 2],

    // === Camera ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Horizontal scroll-trigger margin
    pub scroll_margin_x: f32,
    /// Vertical scroll-trigger margin
    pub scroll_margin_y: f32,
    /// Track the actor vertically as well (dual-axis levels)
    pub vertical_scroll: bool,
    /// Optional [min, max] bounds for the horizontal offset
    pub scroll_clamp_x: Option<[f32; 2]>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: TICKS_PER_SECOND,
            animation_delay: ANIMATION_DELAY,
            hazard_frame_hold: ANIMATION_DELAY,
            hit_duration_secs: HIT_DURATION_SECS,

            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            player_speed: PLAYER_SPEED,
            actor_size: [PLAYER_WIDTH, PLAYER_HEIGHT],

            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            scroll_margin_x: SCROLL_MARGIN_X,
            scroll_margin_y: SCROLL_MARGIN_Y,
            vertical_scroll: true,
            scroll_clamp_x: None,
        }
    }
}

impl SimConfig {
    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject zero/negative sizes, speeds and rates
    pub fn validate(&self) -> Result<(), SimError> {
        let positive_int = |field: &'static str, value: u32| {
            if value == 0 {
                Err(SimError::InvalidConfiguration {
                    field,
                    reason: "must be at least 1".to_string(),
                })
            } else {
                Ok(())
            }
        };
        positive_int("ticks_per_second", self.ticks_per_second)?;
        positive_int("animation_delay", self.animation_delay)?;
        positive_int("hazard_frame_hold", self.hazard_frame_hold)?;
        if self.hit_duration_secs.checked_mul(self.ticks_per_second).is_none() {
            return Err(SimError::InvalidConfiguration {
                field: "hit_duration_secs",
                reason: format!(
                    "{} s at {} ticks/s overflows the tick counter",
                    self.hit_duration_secs, self.ticks_per_second
                ),
            });
        }

        SimError::require_positive("gravity", self.gravity)?;
        SimError::require_positive("jump_impulse", self.jump_impulse)?;
        SimError::require_positive("player_speed", self.player_speed)?;
        SimError::require_positive("actor_size.width", self.actor_size[0])?;
        SimError::require_positive("actor_size.height", self.actor_size[1])?;
        SimError::require_positive("viewport_width", self.viewport_width)?;
        SimError::require_positive("viewport_height", self.viewport_height)?;

        if self.scroll_margin_x < 0.0 || self.scroll_margin_y < 0.0 {
            return Err(SimError::InvalidConfiguration {
                field: "scroll_margin",
                reason: "margins cannot be negative".to_string(),
            });
        }
        if let Some([min, max]) = self.scroll_clamp_x {
            if min > max {
                return Err(SimError::InvalidConfiguration {
                    field: "scroll_clamp_x",
                    reason: format!("min {min} exceeds max {max}"),
                });
            }
        }
        Ok(())
    }

    /// Hit flash length in ticks
    pub fn hit_duration_ticks(&self) -> u32 {
        self.hit_duration_secs.saturating_mul(self.ticks_per_second)
    }
}
