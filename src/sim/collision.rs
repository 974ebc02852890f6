//! Axis-separated collision resolution
//!
//! Run once per tick on the already-integrated actor, always in this order:
//! 1. horizontal probe: speculative sweep at double step on each side, nothing committed
//! 2. horizontal input: walk only toward sides the probe found clear
//! 3. vertical resolve: snap out of every overlap, landing or bumping the head
//!
//! Resolving both axes at once lets the actor slip through block corners.

use glam::Vec2;

use super::actor::Actor;
use super::object::{ObjectId, WorldObject};
use super::tick::TickInput;
use super::world::World;
use crate::Rect;

/// Slack for float error when deciding an object was sunk into from above
const CONTACT_EPSILON: f32 = 0.01;

/// Result of the non-committing horizontal sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HorizontalProbe {
    /// First object hit when displaced left
    pub left: Option<ObjectId>,
    /// First object hit when displaced right
    pub right: Option<ObjectId>,
}

impl HorizontalProbe {
    #[inline]
    pub fn blocked_left(&self) -> bool {
        self.left.is_some()
    }

    #[inline]
    pub fn blocked_right(&self) -> bool {
        self.right.is_some()
    }
}

/// How the vertical pass touched an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalContact {
    /// Descending: actor snapped onto the object's top
    Landed,
    /// Ascending: actor snapped under the object's bottom, vy inverted
    HeadBump,
    /// Overlapping with no vertical motion; nothing corrected
    Touch,
}

/// Everything the resolver touched this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    pub probe: HorizontalProbe,
    /// Every vertical overlap, in world order
    pub vertical: Vec<(ObjectId, VerticalContact)>,
}

impl CollisionReport {
    /// Probe hits followed by vertical contacts; may repeat an id
    pub fn touched(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.probe
            .left
            .into_iter()
            .chain(self.probe.right)
            .chain(self.vertical.iter().map(|&(id, _)| id))
    }
}

/// Whether the actor's integration this tick carried it down into `obj`.
///
/// Sinking into a floor by a fraction of a pixel is the vertical pass's
/// business; counting it as a wall would pin a resting actor in place.
fn sunk_into_from_above(actor_rect: &Rect, fall: f32, obj: &WorldObject) -> bool {
    obj.rect.top() >= actor_rect.bottom() - fall.max(0.0) - CONTACT_EPSILON
}

/// First collidable object the actor would overlap if displaced by `dx`
fn probe_side(actor: &Actor, world: &World, dx: f32) -> Option<ObjectId> {
    let rect = actor.rect();
    let shifted = Rect {
        pos: rect.pos + Vec2::new(dx, 0.0),
        size: rect.size,
    };
    let fall = actor.vel().y;
    world
        .collidable()
        .filter(|obj| !sunk_into_from_above(&rect, fall, obj))
        .find(|obj| super::shape::overlaps(&obj.shape, &obj.rect, &actor.shape, &shifted))
        .map(|obj| obj.id)
}

/// Step 1: sweep `2 * speed` to each side without moving the actor
pub fn horizontal_probe(actor: &Actor, world: &World, speed: f32) -> HorizontalProbe {
    HorizontalProbe {
        left: probe_side(actor, world, -2.0 * speed),
        right: probe_side(actor, world, 2.0 * speed),
    }
}

/// Step 2: horizontal velocity for this tick. Right wins if both are held.
pub fn apply_horizontal_input(
    actor: &mut Actor,
    probe: &HorizontalProbe,
    input: &TickInput,
    speed: f32,
) {
    actor.body.vel.x = 0.0;
    if input.left && !probe.blocked_left() {
        actor.move_left(speed);
    }
    if input.right && !probe.blocked_right() {
        actor.move_right(speed);
    }
}

/// Step 3: correct every overlap at the integrated position.
///
/// The direction is sampled once, before any correction, and every overlap
/// is processed in world order. Two stacked overlaps both snap (the last one
/// wins) and both run their reaction, so two head bumps in one tick invert vy
/// twice.
pub fn resolve_vertical(actor: &mut Actor, world: &World) -> Vec<(ObjectId, VerticalContact)> {
    let dy = actor.vel().y;
    let mut contacts = Vec::new();

    for obj in world.collidable() {
        if !obj.overlaps_actor(actor) {
            continue;
        }
        let contact = if dy > 0.0 {
            actor.body.set_bottom(obj.rect.top());
            actor.landed();
            VerticalContact::Landed
        } else if dy < 0.0 {
            actor.body.set_top(obj.rect.bottom());
            actor.hit_head();
            VerticalContact::HeadBump
        } else {
            VerticalContact::Touch
        };
        contacts.push((obj.id, contact));
    }
    contacts
}

/// Steps 1-3 in order
pub fn resolve(actor: &mut Actor, world: &World, input: &TickInput, speed: f32) -> CollisionReport {
    let probe = horizontal_probe(actor, world, speed);
    apply_horizontal_input(actor, &probe, input, speed);
    let vertical = resolve_vertical(actor, world);
    CollisionReport { probe, vertical }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::Shape;
    use proptest::prelude::*;

    const SPEED: f32 = 5.0;

    fn actor_at(x: f32, y: f32) -> Actor {
        Actor::new(Vec2::new(x, y), Vec2::splat(50.0)).unwrap()
    }

    fn world_with_blocks(blocks: &[(f32, f32, f32)]) -> (World, Vec<ObjectId>) {
        let mut world = World::new();
        let ids = blocks
            .iter()
            .map(|&(x, y, size)| {
                world.add(|id| WorldObject::block(id, Vec2::new(x, y), size, Shape::Rect))
            })
            .collect();
        (world, ids)
    }

    #[test]
    fn test_resting_actor_is_not_blocked_by_floor() {
        // Floor of two blocks, actor sunk a fraction of a pixel into it
        let (world, _) = world_with_blocks(&[(0.0, 468.0, 96.0), (96.0, 468.0, 96.0)]);
        let mut actor = actor_at(70.0, 418.0);
        actor.fall_ticks = 1;
        actor.body.integrate(actor.fall_ticks, 60, 1.0);
        assert!(actor.rect().bottom() > 468.0);

        let probe = horizontal_probe(&actor, &world, SPEED);
        assert_eq!(probe, HorizontalProbe::default());

        // Snapping onto the first block clears the overlap with the second
        let contacts = resolve_vertical(&mut actor, &world);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].1, VerticalContact::Landed);
        assert_eq!(actor.body.pos.y, 418.0);
        assert_eq!(actor.vel().y, 0.0);
    }

    #[test]
    fn test_wall_blocks_double_step() {
        let (world, ids) = world_with_blocks(&[(200.0, 400.0, 96.0)]);
        // Right edge at 195: a single step would not reach, double step does
        let actor = actor_at(145.0, 420.0);
        let probe = horizontal_probe(&actor, &world, SPEED);
        assert_eq!(probe.right, Some(ids[0]));
        assert!(!probe.blocked_left());
    }

    #[test]
    fn test_ledge_passed_this_tick_is_left_to_vertical_pass() {
        // Pillar top at 400; the actor's feet went from 395 to 405 this tick
        let (world, ids) = world_with_blocks(&[(158.0, 400.0, 96.0)]);
        let mut actor = actor_at(100.0, 355.0);
        actor.body.vel.y = 10.0;

        let shifted = Rect {
            pos: actor.rect().pos + Vec2::new(2.0 * SPEED, 0.0),
            size: actor.rect().size,
        };
        assert!(shifted.intersects(&world.get(ids[0]).unwrap().rect));
        assert_eq!(horizontal_probe(&actor, &world, SPEED).right, None);

        // Feet already below the top before integrating: a wall
        let mut actor = actor_at(100.0, 390.0);
        actor.body.vel.y = 10.0;
        assert_eq!(horizontal_probe(&actor, &world, SPEED).right, Some(ids[0]));
    }

    #[test]
    fn test_blocked_input_leaves_velocity_zero() {
        let (world, _) = world_with_blocks(&[(200.0, 400.0, 96.0)]);
        let mut actor = actor_at(145.0, 420.0);
        actor.body.vel.x = 5.0;
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        let report = resolve(&mut actor, &world, &input, SPEED);
        assert!(report.probe.blocked_right());
        assert_eq!(actor.vel().x, 0.0);
        assert_eq!(actor.body.pos.x, 145.0);

        let input = TickInput {
            left: true,
            ..Default::default()
        };
        resolve(&mut actor, &world, &input, SPEED);
        assert_eq!(actor.vel().x, -SPEED);
    }

    #[test]
    fn test_both_directions_held_goes_right() {
        let world = World::new();
        let mut actor = actor_at(0.0, 0.0);
        let input = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        resolve(&mut actor, &world, &input, SPEED);
        assert_eq!(actor.vel().x, SPEED);
    }

    #[test]
    fn test_landing_resets_jumps() {
        let (world, ids) = world_with_blocks(&[(0.0, 468.0, 96.0)]);
        let mut actor = actor_at(20.0, 430.0);
        actor.jump(1.0, 8.0);
        actor.jump(1.0, 8.0);
        actor.body.vel.y = 6.0;
        actor.fall_ticks = 30;

        let contacts = resolve_vertical(&mut actor, &world);
        assert_eq!(contacts, vec![(ids[0], VerticalContact::Landed)]);
        assert_eq!(actor.rect().bottom(), 468.0);
        assert_eq!(actor.jump_count, 0);
        assert_eq!(actor.vel().y, 0.0);
        assert_eq!(actor.fall_ticks, 0);
    }

    #[test]
    fn test_head_bump_inverts_velocity() {
        let (world, ids) = world_with_blocks(&[(0.0, 0.0, 96.0)]);
        let mut actor = actor_at(20.0, 90.0);
        actor.jump(1.0, 8.0);
        assert_eq!(actor.vel().y, -8.0);

        let contacts = resolve_vertical(&mut actor, &world);
        assert_eq!(contacts, vec![(ids[0], VerticalContact::HeadBump)]);
        assert_eq!(actor.rect().top(), 96.0);
        assert_eq!(actor.vel().y, 8.0);
        assert_eq!(actor.jump_count, 1);
    }

    #[test]
    fn test_stacked_overlaps_all_processed_last_snap_wins() {
        // Two overlapping platforms at different heights, both under the actor
        let (world, ids) = world_with_blocks(&[(0.0, 470.0, 96.0), (0.0, 460.0, 96.0)]);
        let mut actor = actor_at(20.0, 425.0);
        actor.body.vel.y = 4.0;

        let contacts = resolve_vertical(&mut actor, &world);
        assert_eq!(
            contacts,
            vec![(ids[0], VerticalContact::Landed), (ids[1], VerticalContact::Landed)]
        );
        assert_eq!(actor.rect().bottom(), 460.0);
    }

    #[test]
    fn test_double_head_bump_cancels_out() {
        let (world, _) = world_with_blocks(&[(0.0, 0.0, 96.0), (40.0, 0.0, 90.0)]);
        let mut actor = actor_at(20.0, 85.0);
        actor.body.vel.y = -8.0;

        let contacts = resolve_vertical(&mut actor, &world);
        // After the first snap (top = 96) the second block (bottom 90) no longer overlaps
        assert_eq!(contacts.len(), 1);
        assert_eq!(actor.vel().y, 8.0);

        let (world, _) = world_with_blocks(&[(0.0, 0.0, 96.0), (40.0, 0.0, 100.0)]);
        let mut actor = actor_at(20.0, 85.0);
        actor.body.vel.y = -8.0;
        let contacts = resolve_vertical(&mut actor, &world);
        assert_eq!(contacts.len(), 2);
        assert_eq!(actor.rect().top(), 100.0);
        assert_eq!(actor.vel().y, -8.0);
    }

    #[test]
    fn test_destroyed_block_is_ignored() {
        let (mut world, ids) = world_with_blocks(&[(0.0, 468.0, 96.0)]);
        world.get_mut(ids[0]).unwrap().destroy();
        let mut actor = actor_at(20.0, 430.0);
        actor.body.vel.y = 6.0;
        assert!(resolve_vertical(&mut actor, &world).is_empty());
        assert_eq!(actor.vel().y, 6.0);
    }

    #[test]
    fn test_touched_lists_horizontal_then_vertical() {
        let report = CollisionReport {
            probe: HorizontalProbe {
                left: None,
                right: Some(ObjectId(4)),
            },
            vertical: vec![
                (ObjectId(4), VerticalContact::Touch),
                (ObjectId(7), VerticalContact::Landed),
            ],
        };
        let ids: Vec<ObjectId> = report.touched().collect();
        assert_eq!(ids, vec![ObjectId(4), ObjectId(4), ObjectId(7)]);
    }

    proptest! {
        #[test]
        fn prop_probe_never_moves_actor(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
        ) {
            let (world, _) = world_with_blocks(&[(0.0, 0.0, 96.0), (120.0, 60.0, 96.0)]);
            let mut actor = actor_at(x, y);
            actor.body.vel = Vec2::new(vx, vy);
            let before = actor.clone();

            let _ = horizontal_probe(&actor, &world, SPEED);
            prop_assert_eq!(actor.body.pos.x.to_bits(), before.body.pos.x.to_bits());
            prop_assert_eq!(actor.body.pos.y.to_bits(), before.body.pos.y.to_bits());
            prop_assert_eq!(actor, before);
        }
    }
}
