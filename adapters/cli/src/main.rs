#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Tower Defense session in the terminal.

mod driver;
mod terminal;

use std::{
    io,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Result;
use clap::Parser;
use tower_defense_rendering::RenderingBackend;
use tower_defense_system_autopilot as autopilot;
use tower_defense_world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    driver::{Driver, Settings},
    terminal::TerminalBackend,
};

#[derive(Parser, Debug)]
#[command(name = "tower-defense")]
#[command(about = "Terminal tower defense driven by a simulated player")]
struct Args {
    /// Simulation ticks per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    tick_rate: u32,

    /// Seed for the simulated player, derived from the clock when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames even if the game is not over
    #[arg(long)]
    max_frames: Option<u64>,

    /// Skip drawing and sleeping, advancing by the nominal tick each frame
    #[arg(long)]
    headless: bool,

    /// Disable the simulated player
    #[arg(long)]
    no_autopilot: bool,
}

/// Entry point for the Tower Defense command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(clock_seed);
    info!(seed, tick_rate = args.tick_rate, headless = args.headless, "starting session");

    let settings = Settings {
        tick_rate: args.tick_rate,
        max_frames: args.max_frames,
        autopilot: (!args.no_autopilot).then(|| autopilot::Config::new(seed)),
    };
    let mut driver = Driver::new(World::new(), settings);

    let outcome = if args.headless {
        driver.run(None)?
    } else {
        let mut terminal = TerminalBackend::new()?;
        let backend: &mut dyn RenderingBackend = &mut terminal;
        driver.run(Some(backend))?
    };

    info!(
        frames = outcome.frames,
        kills = outcome.stats.enemies_killed,
        escaped = outcome.stats.enemies_escaped,
        shots = outcome.stats.shots_fired,
        "session finished"
    );
    println!("{}", outcome.summary());
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
