//! Gameplay effects of the objects the resolver touched

use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::collision::CollisionReport;
use super::object::{ObjectId, ObjectKind};
use super::world::World;

/// Something that happened to the actor this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interaction {
    /// A lit hazard touched the actor
    Hit(ObjectId),
    /// A collectible was picked up and removed
    Collected(ObjectId),
}

/// Apply the effect of every touched object, each at most once per tick.
///
/// An object seen by both the horizontal probe and the vertical pass is
/// handled once, so a mango can never score twice or be removed twice.
pub fn dispatch(report: &CollisionReport, actor: &mut Actor, world: &mut World) -> Vec<Interaction> {
    let mut handled: Vec<ObjectId> = Vec::new();
    let mut events = Vec::new();

    for id in report.touched() {
        if handled.contains(&id) {
            continue;
        }
        handled.push(id);

        let collect = match world.get(id).map(|obj| &obj.kind) {
            Some(ObjectKind::Hazard(hazard)) if hazard.is_on() => false,
            Some(ObjectKind::Collectible) => true,
            _ => continue,
        };

        if collect {
            world.remove(id);
            actor.score += 1;
            log::debug!("Mango collected! Score: {}", actor.score);
            events.push(Interaction::Collected(id));
        } else {
            if !actor.is_hit {
                log::debug!("Hit by fire {:?}", id);
            }
            actor.make_hit();
            events.push(Interaction::Hit(id));
        }
    }
    events
}
