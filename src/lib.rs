//! Mango Masters - a side-scrolling platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, interactions, camera)
//! - `level`: Level definitions and the reference layout
//! - `session`: Session context, frame pacing, snapshots
//! - `host`: Interfaces to the asset/input/presentation layer
//! - `pilot`: Seeded demo input for headless runs
//! - `settings`: Data-driven tuning

pub mod error;
pub mod host;
pub mod level;
pub mod pilot;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use session::Session;
pub use settings::SimConfig;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Maximum ticks run per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Gravity unit; vertical speed grows by at most 1 unit per tick regardless
    pub const GRAVITY: f32 = 1.0;
    /// Vertical velocity growth cap per tick
    pub const MAX_FALL_ACCEL: f32 = 1.0;
    /// Jump impulse in gravity units (vy = -JUMP_IMPULSE * gravity)
    pub const JUMP_IMPULSE: f32 = 8.0;
    /// Jumps allowed before landing (double jump)
    pub const MAX_JUMPS: u8 = 2;

    /// Base horizontal walking speed (units per tick)
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;

    /// Ticks each sprite frame is held
    pub const ANIMATION_DELAY: u32 = 3;
    /// Hit flash length in seconds
    pub const HIT_DURATION_SECS: u32 = 2;

    /// Viewport
    pub const VIEWPORT_WIDTH: f32 = 1000.0;
    pub const VIEWPORT_HEIGHT: f32 = 800.0;
    /// Scroll-trigger margins
    pub const SCROLL_MARGIN_X: f32 = 200.0;
    pub const SCROLL_MARGIN_Y: f32 = 200.0;

    /// Reference level geometry
    pub const BLOCK_SIZE: f32 = 96.0;
    pub const MANGO_SIZE: f32 = 70.0;
    pub const FIRE_WIDTH: f32 = 16.0;
    pub const FIRE_HEIGHT: f32 = 32.0;
}

/// Axis-aligned rectangle in world space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}
