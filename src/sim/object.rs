//! World objects: solid blocks, hazards and collectibles
//!
//! Every object shares the same capability record (id, rectangle, shape);
//! the variant-specific state lives in `ObjectKind` and is matched on by the
//! interaction dispatcher.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::animation::{AnimationKey, AnimationTable};
use super::shape::{Shape, overlaps};
use crate::Rect;
use crate::error::SimError;

/// Stable identity while an object is present in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Hazard on/off state; each has its own looping frame sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HazardState {
    #[default]
    Off,
    On,
}

impl AnimationKey for HazardState {
    const ALL: &'static [Self] = &[HazardState::Off, HazardState::On];

    fn index(self) -> usize {
        self as usize
    }
}

/// Animated damage trap ("fire")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub state: HazardState,
    pub animation_count: u32,
    pub frame: usize,
}

impl Hazard {
    #[inline]
    pub fn is_on(&self) -> bool {
        self.state == HazardState::On
    }

    /// Switch state; changing the active sequence restarts it
    pub fn set_state(&mut self, state: HazardState) {
        if self.state != state {
            self.state = state;
            self.animation_count = 0;
        }
    }

    pub fn on(&mut self) {
        self.set_state(HazardState::On);
    }

    pub fn off(&mut self) {
        self.set_state(HazardState::Off);
    }

    /// Restart the current sequence from its first frame
    pub fn reset_animation(&mut self) {
        self.animation_count = 0;
        self.frame = 0;
    }

    pub fn toggle(&mut self) {
        let next = match self.state {
            HazardState::On => HazardState::Off,
            HazardState::Off => HazardState::On,
        };
        self.set_state(next);
    }

    /// Advance one tick, wrapping at the end of the sequence
    pub fn advance(&mut self, table: &AnimationTable<HazardState>, hold: u32) {
        let hold = hold.max(1);
        self.frame = table.frame_index(self.state, self.animation_count, hold);
        self.animation_count += 1;
        if (self.animation_count / hold) as usize >= table.len(self.state) {
            self.animation_count = 0;
        }
    }
}

/// Variant-specific state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Static terrain. `spent` once destroyed: still present, no longer solid.
    Block { spent: bool },
    Hazard(Hazard),
    /// Mango: removed and scored on touch
    Collectible,
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Block { .. } => "block",
            ObjectKind::Hazard(_) => "fire",
            ObjectKind::Collectible => "mango",
        }
    }
}

/// A drawable, collidable entity in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: ObjectId,
    pub rect: Rect,
    pub shape: Shape,
    pub kind: ObjectKind,
}

impl WorldObject {
    pub fn block(id: ObjectId, pos: Vec2, size: f32, shape: Shape) -> Self {
        Self {
            id,
            rect: Rect {
                pos,
                size: Vec2::splat(size),
            },
            shape,
            kind: ObjectKind::Block { spent: false },
        }
    }

    pub fn hazard(id: ObjectId, pos: Vec2, size: Vec2, shape: Shape) -> Self {
        Self {
            id,
            rect: Rect { pos, size },
            shape,
            kind: ObjectKind::Hazard(Hazard::default()),
        }
    }

    pub fn collectible(id: ObjectId, pos: Vec2, size: Vec2, shape: Shape) -> Self {
        Self {
            id,
            rect: Rect { pos, size },
            shape,
            kind: ObjectKind::Collectible,
        }
    }

    #[inline]
    pub fn is_collidable(&self) -> bool {
        self.shape.is_collidable()
    }

    /// Shape-accurate overlap with the actor at its current position
    #[inline]
    pub fn overlaps_actor(&self, actor: &Actor) -> bool {
        overlaps(&self.shape, &self.rect, &actor.shape, &actor.rect())
    }

    /// Top-left corner
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.rect.pos
    }

    pub fn move_to(&mut self, pos: Vec2) {
        self.rect.pos = pos;
    }

    /// Resize with a freshly resolved shape; a spent block becomes solid again
    pub fn resize(&mut self, size: Vec2, shape: Shape) {
        self.rect.size = size;
        self.shape = shape;
        if let ObjectKind::Block { spent } = &mut self.kind {
            *spent = false;
        }
    }

    /// Make a block passable. It stays in the world as a spent marker.
    pub fn destroy(&mut self) {
        self.shape.make_passable(&self.rect);
        if let ObjectKind::Block { spent } = &mut self.kind {
            *spent = true;
        }
    }

    /// Actor is standing on or above this object, within its horizontal span
    pub fn is_above(&self, actor: &Actor) -> bool {
        let a = actor.rect();
        a.bottom() <= self.rect.top() && a.right() > self.rect.left() && a.left() < self.rect.right()
    }

    pub fn hazard_mut(&mut self) -> Option<&mut Hazard> {
        match &mut self.kind {
            ObjectKind::Hazard(h) => Some(h),
            _ => None,
        }
    }

    /// Geometry and shape a restored object must have
    pub fn validate(&self) -> Result<(), SimError> {
        let size = self.rect.size;
        if !(size.x > 0.0 && size.y > 0.0) || !size.is_finite() || !self.rect.pos.is_finite() {
            return Err(SimError::ImpossibleState(format!(
                "{} {:?} has rect {:?}",
                self.kind.name(),
                self.id,
                self.rect
            )));
        }
        self.shape.validate()
    }

    /// Hit the actor if this is a lit hazard touching it
    pub fn damage(&self, actor: &mut Actor) -> bool {
        match &self.kind {
            ObjectKind::Hazard(h) if h.is_on() && self.overlaps_actor(actor) => {
                actor.make_hit();
                true
            }
            _ => false,
        }
    }
}
