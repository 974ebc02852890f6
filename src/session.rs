//! Session context
//!
//! Owns everything a running game needs: the immutable tick context, the
//! built level and the mutable simulation state. Created once at startup,
//! passed explicitly to the host loop, dropped on exit.

use std::time::{Duration, Instant};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_SUBSTEPS;
use crate::error::SimError;
use crate::host::{AssetSource, FrameSink, FrameView, InputSource};
use crate::level::{Level, LevelDefinition};
use crate::settings::SimConfig;
use crate::sim::{
    self, ActorAnim, AnimationTable, HazardState, SimContext, SimState, TickInput, TickReport,
};

/// Snapshot format version
const SNAPSHOT_VERSION: u32 = 1;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Running,
    /// The actor ran past the end of the level
    Complete,
    /// The host asked to stop
    Quit,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    phase: SessionPhase,
    state: SimState,
}

/// Converts wall-clock time into a number of fixed ticks to run
#[derive(Debug)]
pub struct FramePacer {
    dt: Duration,
    accumulator: Duration,
    last: Instant,
}

impl FramePacer {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            dt: Duration::from_secs(1) / ticks_per_second.max(1),
            accumulator: Duration::ZERO,
            last: Instant::now(),
        }
    }

    #[inline]
    pub fn dt(&self) -> Duration {
        self.dt
    }

    /// Add elapsed time; returns the ticks now due, at most `MAX_SUBSTEPS`.
    /// Any backlog beyond that is dropped.
    pub fn accumulate(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let due = self.accumulator.as_nanos() / self.dt.as_nanos();
        let steps = due.min(MAX_SUBSTEPS as u128) as u32;
        if due > MAX_SUBSTEPS as u128 {
            log::warn!("Falling behind: dropping {} ticks", due - MAX_SUBSTEPS as u128);
            self.accumulator = Duration::ZERO;
        } else {
            self.accumulator -= self.dt * steps;
        }
        steps
    }

    /// Sleep until at least one tick is due and return how many are
    pub fn wait(&mut self) -> u32 {
        loop {
            let now = Instant::now();
            let steps = self.accumulate(now - self.last);
            self.last = now;
            if steps > 0 {
                return steps;
            }
            std::thread::sleep(self.dt.saturating_sub(self.accumulator));
        }
    }
}

/// A running game
#[derive(Debug)]
pub struct Session {
    ctx: SimContext,
    level: Level,
    state: SimState,
    phase: SessionPhase,
}

impl Session {
    /// Validate the config, resolve every asset and build the level.
    /// Any missing resource fails here, before the first tick.
    pub fn new(
        config: SimConfig,
        def: LevelDefinition,
        assets: &dyn AssetSource,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let actor_anims = AnimationTable::<ActorAnim>::build(|key| assets.actor_frames(key))?;
        let hazard_anims = AnimationTable::<HazardState>::build(|state| assets.hazard_frames(state))?;
        let actor_size = Vec2::from(config.actor_size);
        let ctx = SimContext::new(config, actor_anims, hazard_anims)?;
        let level = Level::build(def, assets, actor_size)?;
        let state = level.initial_state();

        log::info!(
            "Session started at {} ticks/s with {} objects",
            ctx.config.ticks_per_second,
            state.world.len()
        );
        Ok(Self {
            ctx,
            level,
            state,
            phase: SessionPhase::Running,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.ctx.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Run one tick. Returns `None` once the session has stopped.
    pub fn step(&mut self, input: &TickInput) -> Option<TickReport> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        if input.quit {
            log::info!("Quit requested at tick {}", self.state.time_ticks);
            self.phase = SessionPhase::Quit;
            return None;
        }

        let report = sim::tick(&mut self.state, &self.ctx, input);

        if self.level.is_complete(&self.state.actor) {
            log::info!(
                "Level complete at tick {} with score {}",
                self.state.time_ticks,
                self.state.actor.score
            );
            self.phase = SessionPhase::Complete;
        }
        Some(report)
    }

    /// Read-only view of the current frame
    pub fn frame(&self) -> FrameView<'_> {
        FrameView {
            tick: self.state.time_ticks,
            actor: &self.state.actor,
            world: &self.state.world,
            camera: self.state.camera,
        }
    }

    /// Drive the session until it stops or `max_ticks` have run.
    ///
    /// With `realtime` the loop is paced to the configured tick rate and
    /// commits one frame per batch of ticks; otherwise it commits after
    /// every tick and never sleeps. Returns the number of ticks run.
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        sink: &mut dyn FrameSink,
        max_ticks: u64,
        realtime: bool,
    ) -> u64 {
        let mut pacer = realtime.then(|| FramePacer::new(self.ctx.config.ticks_per_second));
        let mut ran = 0;

        while self.phase == SessionPhase::Running && ran < max_ticks {
            let steps = pacer.as_mut().map_or(1, FramePacer::wait);
            for _ in 0..steps {
                if ran >= max_ticks {
                    break;
                }
                let polled = input.poll(self.state.time_ticks);
                if self.step(&polled).is_none() {
                    break;
                }
                ran += 1;
            }
            sink.commit(&self.frame());
        }

        log::info!(
            "Session stopped after {} ticks ({:?}), score {}",
            ran,
            self.phase,
            self.state.actor.score
        );
        ran
    }

    /// Rebuild the level and start over
    pub fn reset(&mut self) {
        self.level.reset(&mut self.state);
        self.phase = SessionPhase::Running;
    }

    /// Serialize the mutable state
    pub fn snapshot(&self) -> Result<String, SimError> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            phase: self.phase,
            state: self.state.clone(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Replace the mutable state with a snapshot. On error the session is
    /// left untouched.
    pub fn restore(&mut self, json: &str) -> Result<(), SimError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SimError::ImpossibleState(format!(
                "snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        snapshot.state.validate()?;

        self.state = snapshot.state;
        self.phase = snapshot.phase;
        log::info!("Restored snapshot at tick {}", self.state.time_ticks);
        Ok(())
    }
}
