//! The level's object collection
//!
//! Insertion order is draw order (back to front). Lookups and removal go by
//! `ObjectId`, never by index, so pickups mid-iteration cannot shift identity.

use serde::{Deserialize, Serialize};

use super::animation::AnimationTable;
use super::object::{HazardState, ObjectId, WorldObject};
use crate::error::SimError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    objects: Vec<WorldObject>,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a fresh id and append the object built for it
    pub fn add<F>(&mut self, build: F) -> ObjectId
    where
        F: FnOnce(ObjectId) -> WorldObject,
    {
        let id = ObjectId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.objects.push(build(id));
        id
    }

    /// Remove by identity, keeping the order of everything else
    pub fn remove(&mut self, id: ObjectId) -> Option<WorldObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    pub fn get(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut WorldObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Objects in draw order
    pub fn iter(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut WorldObject> {
        self.objects.iter_mut()
    }

    /// Objects that can currently be touched
    pub fn collidable(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.iter().filter(|o| o.is_collidable())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Advance every hazard's frame loop by one tick
    pub fn advance_hazards(&mut self, table: &AnimationTable<HazardState>, hold: u32) {
        for obj in self.objects.iter_mut() {
            if let Some(hazard) = obj.hazard_mut() {
                hazard.advance(table, hold);
            }
        }
    }

    /// Every object's geometry and shape (restored snapshots)
    pub(crate) fn validate_objects(&self) -> Result<(), SimError> {
        self.objects.iter().try_for_each(WorldObject::validate)
    }

    /// Ids are unique and below the allocator (restored snapshots)
    pub(crate) fn check_ids(&self) -> bool {
        let mut ids: Vec<u32> = self.objects.iter().map(|o| o.id.0).collect();
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        ids.len() == count && ids.last().is_none_or(|&max| max < self.next_id)
    }
}
