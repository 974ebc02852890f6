//! The player: kinematic body plus movement/animation state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::{AnimationKey, AnimationTable};
use super::body::KinematicBody;
use super::shape::Shape;
use crate::Rect;
use crate::consts::MAX_JUMPS;
use crate::error::SimError;
use crate::settings::SimConfig;

/// Direction the sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Left,
    Right,
}

/// Movement/animation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Run,
    Jump,
    DoubleJump,
    Fall,
    Hit,
}

impl AnimationState {
    pub const ALL: [AnimationState; 6] = [
        AnimationState::Idle,
        AnimationState::Run,
        AnimationState::Jump,
        AnimationState::DoubleJump,
        AnimationState::Fall,
        AnimationState::Hit,
    ];
}

/// Sprite-sequence key: one sequence per (state, facing) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorAnim {
    pub state: AnimationState,
    pub facing: Facing,
}

const fn anim(state: AnimationState, facing: Facing) -> ActorAnim {
    ActorAnim { state, facing }
}

impl AnimationKey for ActorAnim {
    const ALL: &'static [Self] = &[
        anim(AnimationState::Idle, Facing::Left),
        anim(AnimationState::Idle, Facing::Right),
        anim(AnimationState::Run, Facing::Left),
        anim(AnimationState::Run, Facing::Right),
        anim(AnimationState::Jump, Facing::Left),
        anim(AnimationState::Jump, Facing::Right),
        anim(AnimationState::DoubleJump, Facing::Left),
        anim(AnimationState::DoubleJump, Facing::Right),
        anim(AnimationState::Fall, Facing::Left),
        anim(AnimationState::Fall, Facing::Right),
        anim(AnimationState::Hit, Facing::Left),
        anim(AnimationState::Hit, Facing::Right),
    ];

    fn index(self) -> usize {
        self.state as usize * 2 + self.facing as usize
    }
}

/// The player entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub body: KinematicBody,
    pub shape: Shape,
    pub facing: Facing,
    pub animation: AnimationState,
    /// Ticks since the current sprite sequence (re)started
    pub animation_count: u32,
    /// Current frame within the sequence (for the host)
    pub frame: usize,
    /// Jumps since the last landing (0..=2)
    pub jump_count: u8,
    /// Ticks since the last landing or first jump
    pub fall_ticks: u32,
    /// Ticks the hit flash has been showing
    pub hit_ticks: u32,
    pub is_hit: bool,
    /// Mangoes collected
    pub score: u32,
}

impl Actor {
    /// Create the player at `spawn` (top-left) with the given hitbox
    pub fn new(spawn: Vec2, size: Vec2) -> Result<Self, SimError> {
        Ok(Self {
            body: KinematicBody::new(spawn, size)?,
            shape: Shape::Rect,
            facing: Facing::default(),
            animation: AnimationState::Idle,
            animation_count: 0,
            frame: 0,
            jump_count: 0,
            fall_ticks: 0,
            hit_ticks: 0,
            is_hit: false,
            score: 0,
        })
    }

    /// Use a per-pixel shape instead of the bounding box
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Put the actor back at `spawn` with every counter cleared
    pub fn respawn(&mut self, spawn: Vec2) {
        self.body.pos = spawn;
        self.body.vel = Vec2::ZERO;
        self.facing = Facing::default();
        self.animation = AnimationState::Idle;
        self.animation_count = 0;
        self.frame = 0;
        self.jump_count = 0;
        self.fall_ticks = 0;
        self.hit_ticks = 0;
        self.is_hit = false;
        self.score = 0;
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.body.vel
    }

    /// Start a jump (or double jump). Returns false once both jumps are spent.
    pub fn jump(&mut self, gravity: f32, impulse: f32) -> bool {
        if self.jump_count >= MAX_JUMPS {
            return false;
        }
        self.body.vel.y = -gravity * impulse;
        self.animation_count = 0;
        self.jump_count += 1;
        if self.jump_count == 1 {
            self.fall_ticks = 0;
        }
        true
    }

    pub fn move_left(&mut self, speed: f32) {
        self.body.vel.x = -speed;
        self.face(Facing::Left);
    }

    pub fn move_right(&mut self, speed: f32) {
        self.body.vel.x = speed;
        self.face(Facing::Right);
    }

    /// Turning around restarts the sprite cycle
    fn face(&mut self, facing: Facing) {
        if self.facing != facing {
            self.facing = facing;
            self.animation_count = 0;
        }
    }

    /// Touched down on top of something. The only place jumps are refunded.
    pub fn landed(&mut self) {
        self.fall_ticks = 0;
        self.body.vel.y = 0.0;
        self.jump_count = 0;
    }

    /// Bumped into something from below: bounce back by inverting vy
    pub fn hit_head(&mut self) {
        self.body.vel.y = -self.body.vel.y;
    }

    pub fn make_hit(&mut self) {
        self.is_hit = true;
    }

    /// Gravity + movement, then the per-tick counters
    pub fn step_physics(&mut self, config: &SimConfig) {
        self.body
            .integrate(self.fall_ticks, config.ticks_per_second, config.gravity);

        if self.is_hit {
            self.hit_ticks = self.hit_ticks.saturating_add(1);
        }
        if self.hit_ticks > config.hit_duration_ticks() {
            self.is_hit = false;
            self.hit_ticks = 0;
        }

        self.fall_ticks = self.fall_ticks.saturating_add(1);
    }

    /// Which sequence the current motion calls for
    pub fn resolve_animation(&self, gravity: f32) -> AnimationState {
        let vel = self.body.vel;
        if self.is_hit {
            AnimationState::Hit
        } else if vel.y < 0.0 && self.jump_count == 1 {
            AnimationState::Jump
        } else if vel.y < 0.0 && self.jump_count == 2 {
            AnimationState::DoubleJump
        } else if vel.y > gravity * 2.0 {
            AnimationState::Fall
        } else if vel.x != 0.0 {
            AnimationState::Run
        } else {
            AnimationState::Idle
        }
    }

    /// Pick the sequence and frame for this tick and advance the counter
    pub fn animate(&mut self, table: &AnimationTable<ActorAnim>, config: &SimConfig) {
        self.animation = self.resolve_animation(config.gravity);
        let key = ActorAnim {
            state: self.animation,
            facing: self.facing,
        };
        self.frame = table.frame_index(key, self.animation_count, config.animation_delay);
        self.animation_count = self.animation_count.wrapping_add(1);
    }

    /// Check a restored actor against the invariants the simulation keeps
    pub fn validate(&self) -> Result<(), SimError> {
        if self.jump_count > MAX_JUMPS {
            return Err(SimError::ImpossibleState(format!(
                "jump_count {} exceeds {}",
                self.jump_count, MAX_JUMPS
            )));
        }
        if !(self.body.size.x > 0.0 && self.body.size.y > 0.0) || !self.body.size.is_finite() {
            return Err(SimError::ImpossibleState(format!(
                "actor size {:?} is not positive",
                self.body.size
            )));
        }
        if !self.body.pos.is_finite() || !self.body.vel.is_finite() {
            return Err(SimError::ImpossibleState(format!(
                "actor at {:?} moving {:?} is not finite",
                self.body.pos, self.body.vel
            )));
        }
        self.shape.validate()?;
        if !self.is_hit && self.hit_ticks != 0 {
            return Err(SimError::ImpossibleState(
                "hit timer running without a hit".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        Actor::new(Vec2::new(100.0, 100.0), Vec2::splat(50.0)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let a = actor();
        assert_eq!(a.facing, Facing::Left);
        assert_eq!(a.jump_count, 0);
        assert_eq!(a.score, 0);
        assert_eq!(a.vel(), Vec2::ZERO);
    }

    #[test]
    fn test_jump_sets_impulse_and_counts() {
        let mut a = actor();
        a.fall_ticks = 40;
        a.animation_count = 7;
        assert!(a.jump(1.0, 8.0));
        assert_eq!(a.vel().y, -8.0);
        assert_eq!(a.jump_count, 1);
        assert_eq!(a.fall_ticks, 0);
        assert_eq!(a.animation_count, 0);

        // Second jump keeps the fall timer running
        a.fall_ticks = 12;
        assert!(a.jump(1.0, 8.0));
        assert_eq!(a.jump_count, 2);
        assert_eq!(a.fall_ticks, 12);
    }

    #[test]
    fn test_double_jump_ceiling() {
        let mut a = actor();
        assert!(a.jump(1.0, 8.0));
        assert!(a.jump(1.0, 8.0));
        a.body.vel.y = 3.0;
        assert!(!a.jump(1.0, 8.0));
        assert_eq!(a.jump_count, 2);
        assert_eq!(a.vel().y, 3.0);
    }

    #[test]
    fn test_only_landing_refunds_jumps() {
        let mut a = actor();
        a.jump(1.0, 8.0);
        a.jump(1.0, 8.0);
        // Falling for a long time does not refund anything
        let config = SimConfig::default();
        for _ in 0..200 {
            a.step_physics(&config);
        }
        assert_eq!(a.jump_count, 2);

        a.landed();
        assert_eq!(a.jump_count, 0);
        assert_eq!(a.vel().y, 0.0);
        assert_eq!(a.fall_ticks, 0);
    }

    #[test]
    fn test_hit_head_inverts() {
        let mut a = actor();
        a.body.vel.y = -8.0;
        a.hit_head();
        assert_eq!(a.vel().y, 8.0);
    }

    #[test]
    fn test_facing_flip_resets_counter() {
        let mut a = actor();
        a.animation_count = 9;
        a.move_left(5.0);
        // Already facing left: no reset
        assert_eq!(a.animation_count, 9);
        assert_eq!(a.vel().x, -5.0);

        a.move_right(5.0);
        assert_eq!(a.facing, Facing::Right);
        assert_eq!(a.animation_count, 0);
        assert_eq!(a.vel().x, 5.0);
    }

    #[test]
    fn test_hit_flash_expires() {
        let config = SimConfig::default();
        let mut a = actor();
        a.make_hit();
        for _ in 0..config.hit_duration_ticks() {
            a.step_physics(&config);
            assert!(a.is_hit);
        }
        a.step_physics(&config);
        assert!(!a.is_hit);
        assert_eq!(a.hit_ticks, 0);
    }

    #[test]
    fn test_animation_priority() {
        let mut a = actor();
        assert_eq!(a.resolve_animation(1.0), AnimationState::Idle);

        a.body.vel.x = 5.0;
        assert_eq!(a.resolve_animation(1.0), AnimationState::Run);

        a.body.vel.y = 2.5;
        assert_eq!(a.resolve_animation(1.0), AnimationState::Fall);

        a.jump(1.0, 8.0);
        assert_eq!(a.resolve_animation(1.0), AnimationState::Jump);
        a.jump(1.0, 8.0);
        assert_eq!(a.resolve_animation(1.0), AnimationState::DoubleJump);

        a.make_hit();
        assert_eq!(a.resolve_animation(1.0), AnimationState::Hit);
    }

    #[test]
    fn test_animate_cycles_frames() {
        let config = SimConfig::default();
        let table = AnimationTable::<ActorAnim>::uniform(4);
        let mut a = actor();
        let frames: Vec<usize> = (0..15)
            .map(|_| {
                a.animate(&table, &config);
                a.frame
            })
            .collect();
        assert_eq!(frames, vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 0, 0, 0]);
    }

    #[test]
    fn test_anim_keys_are_dense() {
        let mut seen: Vec<usize> = ActorAnim::ALL.iter().map(|k| k.index()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_respawn_is_field_reset() {
        let mut a = actor();
        a.jump(1.0, 8.0);
        a.score = 3;
        a.make_hit();
        a.respawn(Vec2::new(5.0, 6.0));
        assert_eq!(a, Actor::new(Vec2::new(5.0, 6.0), Vec2::splat(50.0)).unwrap());
    }

    #[test]
    fn test_validate_rejects_broken_body() {
        let mut a = actor();
        a.body.pos.x = f32::NAN;
        assert!(matches!(a.validate(), Err(SimError::ImpossibleState(_))));

        let a = actor().with_shape(Shape::Mask(
            serde_json::from_str(r#"{"width":50,"height":50,"bits":[true],"opaque":1}"#).unwrap(),
        ));
        assert!(matches!(a.validate(), Err(SimError::ImpossibleState(_))));
    }

    #[test]
    fn test_validate_rejects_triple_jump() {
        let mut a = actor();
        a.jump_count = 3;
        assert!(matches!(a.validate(), Err(SimError::ImpossibleState(_))));
    }
}
