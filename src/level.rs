//! Level definitions
//!
//! A `LevelDefinition` is plain constructor parameters in draw order. `Level`
//! resolves every shape once through the host's `AssetSource` and keeps the
//! built world as a template, so resetting never goes back to the assets.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BLOCK_SIZE, FIRE_HEIGHT, FIRE_WIDTH, MANGO_SIZE, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::error::SimError;
use crate::host::{AssetSource, ShapeClass};
use crate::sim::{Actor, CameraOffset, ObjectId, SimState, World, WorldObject};

/// Constructor parameters for one world object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectDef {
    /// Square terrain block
    Block { x: f32, y: f32, size: f32 },
    /// Fire trap, optionally already burning
    Hazard {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        lit: bool,
    },
    /// Mango
    Collectible {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

impl ObjectDef {
    fn class(&self) -> ShapeClass {
        match self {
            ObjectDef::Block { .. } => ShapeClass::Block,
            ObjectDef::Hazard { .. } => ShapeClass::Hazard,
            ObjectDef::Collectible { .. } => ShapeClass::Collectible,
        }
    }

    fn size(&self) -> Vec2 {
        match *self {
            ObjectDef::Block { size, .. } => Vec2::splat(size),
            ObjectDef::Hazard { width, height, .. } | ObjectDef::Collectible { width, height, .. } => {
                Vec2::new(width, height)
            }
        }
    }

    /// Resolve the shape and add the object to `world`
    pub fn spawn(&self, world: &mut World, assets: &dyn AssetSource) -> Result<ObjectId, SimError> {
        let size = self.size();
        SimError::require_positive("object.width", size.x)?;
        SimError::require_positive("object.height", size.y)?;
        let shape = assets.require_shape(self.class(), size)?;

        let id = match *self {
            ObjectDef::Block { x, y, size } => {
                world.add(|id| WorldObject::block(id, Vec2::new(x, y), size, shape))
            }
            ObjectDef::Hazard { x, y, lit, .. } => {
                let id = world.add(|id| WorldObject::hazard(id, Vec2::new(x, y), size, shape));
                if lit {
                    if let Some(hazard) = world.get_mut(id).and_then(|o| o.hazard_mut()) {
                        hazard.on();
                    }
                }
                id
            }
            ObjectDef::Collectible { x, y, .. } => {
                world.add(|id| WorldObject::collectible(id, Vec2::new(x, y), size, shape))
            }
        };
        Ok(id)
    }
}

/// Static description of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Reaching past this x completes the level
    pub width: f32,
    pub height: f32,
    /// Actor spawn (top-left)
    pub spawn: [f32; 2],
    /// Objects in draw order
    pub objects: Vec<ObjectDef>,
}

impl LevelDefinition {
    /// The stock level: a long floor, two raised blocks, a burning fire and
    /// four mangoes.
    pub fn reference(width: f32, height: f32, block: f32) -> Self {
        let mut objects = Vec::new();

        let first = (-width / block).floor() as i32;
        let last = (2.0 * width / block).floor() as i32;
        for i in first..last {
            objects.push(ObjectDef::Block {
                x: i as f32 * block,
                y: height - block,
                size: block,
            });
        }
        objects.push(ObjectDef::Block {
            x: 0.0,
            y: height - block * 2.0,
            size: block,
        });
        objects.push(ObjectDef::Block {
            x: block * 3.0,
            y: height - block * 4.0,
            size: block,
        });

        objects.push(ObjectDef::Hazard {
            x: 100.0,
            y: height - block - 64.0,
            width: FIRE_WIDTH,
            height: FIRE_HEIGHT,
            lit: true,
        });

        for (x, lift) in [(250.0, 50.0), (500.0, 100.0), (800.0, 150.0), (1200.0, 80.0)] {
            objects.push(ObjectDef::Collectible {
                x,
                y: height - block - lift,
                width: MANGO_SIZE,
                height: MANGO_SIZE,
            });
        }

        Self {
            width,
            height,
            spawn: [100.0, 100.0],
            objects,
        }
    }
}

impl Default for LevelDefinition {
    fn default() -> Self {
        Self::reference(VIEWPORT_WIDTH, VIEWPORT_HEIGHT, BLOCK_SIZE)
    }
}

/// A built level: resolved template world plus the player's spawn
#[derive(Debug, Clone)]
pub struct Level {
    def: LevelDefinition,
    template: World,
    actor_size: Vec2,
    actor: Actor,
}

impl Level {
    /// Resolve every object and the actor's shape through `assets`
    pub fn build(
        def: LevelDefinition,
        assets: &dyn AssetSource,
        actor_size: Vec2,
    ) -> Result<Self, SimError> {
        let mut template = World::new();
        for obj in &def.objects {
            obj.spawn(&mut template, assets)?;
        }

        let spawn = Vec2::from(def.spawn);
        let shape = assets.require_shape(ShapeClass::Actor, actor_size)?;
        let actor = Actor::new(spawn, actor_size)?.with_shape(shape);

        log::info!(
            "Level built: {} objects, width {}, spawn ({}, {})",
            template.len(),
            def.width,
            spawn.x,
            spawn.y
        );
        Ok(Self {
            def,
            template,
            actor_size,
            actor,
        })
    }

    pub fn definition(&self) -> &LevelDefinition {
        &self.def
    }

    /// A fresh player at the spawn point
    pub fn create_player(&self) -> Actor {
        self.actor.clone()
    }

    /// The level's objects as built
    pub fn objects(&self) -> &World {
        &self.template
    }

    /// Fresh simulation state for a new run
    pub fn initial_state(&self) -> SimState {
        SimState::new(self.create_player(), self.template.clone())
    }

    /// Rebuild the world and put the player back at spawn
    pub fn reset(&self, state: &mut SimState) {
        state.world = self.template.clone();
        state.actor.respawn(Vec2::from(self.def.spawn));
        state.camera = CameraOffset::default();
        log::info!("Level reset at tick {}", state.time_ticks);
    }

    /// The player has run past the end of the level
    pub fn is_complete(&self, actor: &Actor) -> bool {
        actor.rect().left() > self.def.width
    }

    /// Add an object to a running world; it is gone again after `reset`
    pub fn add_object(
        &self,
        world: &mut World,
        def: &ObjectDef,
        assets: &dyn AssetSource,
    ) -> Result<ObjectId, SimError> {
        def.spawn(world, assets)
    }

    pub fn actor_size(&self) -> Vec2 {
        self.actor_size
    }
}
