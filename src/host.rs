//! Host-facing interfaces
//!
//! The simulation never touches pixels, windows or key codes. A host supplies
//! assets and input through these traits and receives a read-only view of
//! every committed frame.

use glam::Vec2;

use crate::error::SimError;
use crate::sim::{
    Actor, ActorAnim, AnimationState, CameraOffset, HazardState, Shape, TickInput, World,
};

/// Which kind of entity a shape is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeClass {
    Actor,
    Block,
    Hazard,
    Collectible,
}

/// Resolves frame-sequence lengths and collision shapes
pub trait AssetSource {
    /// Number of frames in the actor sequence for `key`
    fn actor_frames(&self, key: ActorAnim) -> Option<usize>;

    /// Number of frames in the hazard sequence for `state`
    fn hazard_frames(&self, state: HazardState) -> Option<usize>;

    /// Collision shape for an entity of `class` drawn at `size`
    fn shape(&self, class: ShapeClass, size: Vec2) -> Option<Shape>;

    /// Like `shape`, but a missing shape is a setup error
    fn require_shape(&self, class: ShapeClass, size: Vec2) -> Result<Shape, SimError> {
        self.shape(class, size)
            .ok_or_else(|| SimError::missing(format!("{class:?} shape at {}x{}", size.x, size.y)))
    }
}

/// Produces one input snapshot per tick
pub trait InputSource {
    fn poll(&mut self, tick: u64) -> TickInput;
}

/// Everything a presenter needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub tick: u64,
    pub actor: &'a Actor,
    pub world: &'a World,
    pub camera: CameraOffset,
}

/// Receives each committed frame
pub trait FrameSink {
    fn commit(&mut self, frame: &FrameView<'_>);
}

/// Discards every frame (headless runs)
#[derive(Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn commit(&mut self, _frame: &FrameView<'_>) {}
}

/// Replays a fixed input script, then idles
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: Vec<TickInput>,
}

impl ScriptedInput {
    pub fn new(script: Vec<TickInput>) -> Self {
        Self { script }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, tick: u64) -> TickInput {
        usize::try_from(tick)
            .ok()
            .and_then(|i| self.script.get(i).copied())
            .unwrap_or_default()
    }
}

/// Rectangle-only assets with the stock character's frame counts
#[derive(Debug, Clone)]
pub struct BoxAssets {
    /// Hazard "on" sequence length
    pub fire_on_frames: usize,
    pub fire_off_frames: usize,
}

impl Default for BoxAssets {
    fn default() -> Self {
        Self {
            fire_on_frames: 3,
            fire_off_frames: 1,
        }
    }
}

impl AssetSource for BoxAssets {
    fn actor_frames(&self, key: ActorAnim) -> Option<usize> {
        Some(match key.state {
            AnimationState::Idle => 11,
            AnimationState::Run => 12,
            AnimationState::Jump => 1,
            AnimationState::DoubleJump => 6,
            AnimationState::Fall => 1,
            AnimationState::Hit => 7,
        })
    }

    fn hazard_frames(&self, state: HazardState) -> Option<usize> {
        let frames = match state {
            HazardState::On => self.fire_on_frames,
            HazardState::Off => self.fire_off_frames,
        };
        (frames > 0).then_some(frames)
    }

    fn shape(&self, _class: ShapeClass, _size: Vec2) -> Option<Shape> {
        Some(Shape::Rect)
    }
}
