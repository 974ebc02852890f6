//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one frame. The order inside a
//! tick is load-bearing:
//! jump input → integrate → horizontal probe → apply input → vertical
//! resolve → dispatch → animate → scroll.

use super::collision::{self, CollisionReport};
use super::interaction::{self, Interaction};
use super::state::{SimContext, SimState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left held
    pub left: bool,
    /// Right held
    pub right: bool,
    /// Jump pressed this tick (edge, not level)
    pub jump: bool,
    /// Host wants the session to end
    pub quit: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// A jump (or double jump) started this tick
    pub jumped: bool,
    pub collisions: CollisionReport,
    pub interactions: Vec<Interaction>,
}

/// Advance the simulation by one fixed step
pub fn tick(state: &mut SimState, ctx: &SimContext, input: &TickInput) -> TickReport {
    let config = &ctx.config;
    let actor = &mut state.actor;

    // Jump is an input event, applied before physics
    let jumped = input.jump && actor.jump(config.gravity, config.jump_impulse);
    if jumped {
        log::debug!("Jump {} at tick {}", actor.jump_count, state.time_ticks);
    }

    actor.step_physics(config);

    let collisions = collision::resolve(actor, &state.world, input, config.player_speed);
    let interactions = interaction::dispatch(&collisions, actor, &mut state.world);

    actor.animate(&ctx.actor_anims, config);
    state
        .world
        .advance_hazards(&ctx.hazard_anims, config.hazard_frame_hold);

    ctx.scroll.update(&mut state.camera, &state.actor);
    state.time_ticks += 1;

    TickReport {
        jumped,
        collisions,
        interactions,
    }
}
