//! Mango Masters headless runner
//!
//! Builds the reference level with rectangle-only assets and drives it with
//! either a seeded demo pilot or idle input.

use std::path::PathBuf;

use clap::Parser;

use mango_masters::host::{BoxAssets, InputSource, NullSink, ScriptedInput};
use mango_masters::level::LevelDefinition;
use mango_masters::pilot::DemoPilot;
use mango_masters::{Session, SimConfig, SimError};

/// Run the Mango Masters simulation without a window
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seed for the demo pilot; without one the player stands still
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Pace ticks to wall-clock time instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Write a snapshot of the final state here
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

fn main() -> Result<(), SimError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => SimConfig::default(),
    };
    let def = LevelDefinition::reference(
        config.viewport_width,
        config.viewport_height,
        mango_masters::consts::BLOCK_SIZE,
    );

    log::info!("Mango Masters (headless) starting...");
    let mut session = Session::new(config, def, &BoxAssets::default())?;

    let mut input: Box<dyn InputSource> = match cli.seed {
        Some(seed) => {
            log::info!("Demo pilot seeded with {seed}");
            Box::new(DemoPilot::new(seed))
        }
        None => Box::new(ScriptedInput::default()),
    };
    session.run(input.as_mut(), &mut NullSink, cli.ticks, cli.realtime);

    let state = session.state();
    log::info!(
        "Final: tick {}, score {}, position ({:.1}, {:.1}), camera ({:.1}, {:.1}), {} objects left",
        state.time_ticks,
        state.actor.score,
        state.actor.body.pos.x,
        state.actor.body.pos.y,
        state.camera.x,
        state.camera.y,
        state.world.len()
    );

    if let Some(path) = &cli.save {
        std::fs::write(path, session.snapshot()?)?;
        log::info!("Snapshot written to {}", path.display());
    }
    Ok(())
}
