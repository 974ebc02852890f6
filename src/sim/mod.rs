//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (world insertion order)
//! - No rendering, audio or platform dependencies

pub mod actor;
pub mod animation;
pub mod body;
pub mod camera;
pub mod collision;
pub mod interaction;
pub mod object;
pub mod shape;
pub mod state;
pub mod tick;
pub mod world;

pub use actor::{Actor, ActorAnim, AnimationState, Facing};
pub use animation::{AnimationKey, AnimationTable};
pub use body::KinematicBody;
pub use camera::{CameraOffset, ScrollController};
pub use collision::{CollisionReport, HorizontalProbe, VerticalContact};
pub use interaction::Interaction;
pub use object::{Hazard, HazardState, ObjectId, ObjectKind, WorldObject};
pub use shape::{OpacityMask, Shape};
pub use state::{SimContext, SimState};
pub use tick::{TickInput, TickReport, tick};
pub use world::World;
