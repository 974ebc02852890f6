//! Simulation state and the fixed context it runs in
//!
//! `SimState` is everything a tick mutates and everything a snapshot must
//! carry. `SimContext` is built once per session and never changes.

use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorAnim};
use super::animation::AnimationTable;
use super::camera::{CameraOffset, ScrollController};
use super::object::HazardState;
use super::world::World;
use crate::error::SimError;
use crate::settings::SimConfig;

/// Mutable per-session state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub actor: Actor,
    pub world: World,
    pub camera: CameraOffset,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl SimState {
    pub fn new(actor: Actor, world: World) -> Self {
        Self {
            actor,
            world,
            camera: CameraOffset::default(),
            time_ticks: 0,
        }
    }

    /// Invariants a restored state must satisfy
    pub fn validate(&self) -> Result<(), SimError> {
        self.actor.validate()?;
        if !self.world.check_ids() {
            return Err(SimError::ImpossibleState(
                "world object ids are duplicated or ahead of the allocator".to_string(),
            ));
        }
        self.world.validate_objects()?;
        if !self.camera.as_vec2().is_finite() {
            return Err(SimError::ImpossibleState(format!(
                "camera offset {:?} is not finite",
                self.camera
            )));
        }
        Ok(())
    }
}

/// Read-only inputs to every tick
#[derive(Debug, Clone)]
pub struct SimContext {
    pub config: SimConfig,
    pub actor_anims: AnimationTable<ActorAnim>,
    pub hazard_anims: AnimationTable<HazardState>,
    pub scroll: ScrollController,
}

impl SimContext {
    pub fn new(
        config: SimConfig,
        actor_anims: AnimationTable<ActorAnim>,
        hazard_anims: AnimationTable<HazardState>,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let scroll = ScrollController::from_config(&config);
        Ok(Self {
            config,
            actor_anims,
            hazard_anims,
            scroll,
        })
    }
}
