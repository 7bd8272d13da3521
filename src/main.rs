//! Headless runner for the feltcraft simulation.
//!
//! Plays a short scripted session (walk, jump, build, save, load) and logs
//! the resulting state.
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use feltcraft::presentation::LogSink;
use feltcraft::{
    init_logging, load_world, save_world, AimRay, FileStore, GameWorld, InputSnapshot,
    MemoryStore, SaveStore, Tuning,
};
use glam::DVec3;
use log::info;

/// Headless felt voxel world simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,
    /// Seed for world population
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// TOML tuning file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory for save files; saves stay in memory when omitted
    #[arg(long)]
    save_dir: Option<PathBuf>,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Input for tick `index` of the scripted session.
fn scripted_input(index: u32, ticks: u32) -> InputSnapshot {
    let phase = index * 8 / ticks.max(1);
    match phase {
        0 | 1 => InputSnapshot::movement(0.0, -1.0),
        2 => InputSnapshot {
            jump: true,
            ..InputSnapshot::movement(1.0, 0.0)
        },
        3 => InputSnapshot {
            toggle_build_mode: index * 8 % ticks.max(1) < 8,
            ..InputSnapshot::default()
        },
        4 => InputSnapshot {
            place_block: true,
            aim: Some(AimRay {
                origin: DVec3::new(0.0, 5.0, 0.0),
                direction: DVec3::new(0.3, -1.0, -0.2),
            }),
            ..InputSnapshot::default()
        },
        5 => InputSnapshot {
            attack: true,
            rotate_left: true,
            ..InputSnapshot::default()
        },
        _ => InputSnapshot::movement(-0.5, 0.5),
    }
}

fn run(args: &Args, store: &mut dyn SaveStore) -> Result<()> {
    ensure!(args.dt.is_finite() && args.dt > 0.0, "--dt must be positive");
    let tuning = match &args.config {
        Some(path) => Tuning::from_path(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };

    let mut world = GameWorld::new(tuning);
    world.populate(args.seed);
    let mut sink = LogSink;

    for index in 0..args.ticks {
        world.tick(args.dt, &scripted_input(index, args.ticks));
        world.publish(&mut sink);
    }

    save_world(&world, store).context("saving world")?;
    let saved = world.actor().position;
    world.reset_actor();
    load_world(&mut world, store).context("loading world")?;
    ensure!(
        world.actor().position == saved,
        "restored position {} differs from saved {saved}",
        world.actor().position
    );

    let frame = world.frame();
    info!(
        "after {} ticks: player at {} ({:?}), {} blocks, {} entities",
        frame.tick,
        frame.player.position,
        frame.vertical,
        world.block_count(),
        frame.entities.len()
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match &args.save_dir {
        Some(dir) => run(&args, &mut FileStore::new(dir)),
        None => run(&args, &mut MemoryStore::new()),
    }
}
