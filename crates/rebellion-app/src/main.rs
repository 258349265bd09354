//! Rebellion runner: plays the simulation headless and reports the outcome.
//!
//! Usage:
//!   cargo run -p rebellion-app -- --seconds 90
//!   RUST_LOG=debug cargo run -p rebellion-app -- --content data --save-dir saves --slot run1
//!   cargo run -p rebellion-app -- --save-dir saves --slot run1 --resume --buy extra_gun
//!   cargo run -p rebellion-app -- --save-dir saves --list-saves

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rebellion_app::game_loop::{spawn_game_loop, LoopOptions, Pacing};
use rebellion_app::loader::{load_config, load_content};
use rebellion_app::persistence::{self, SaveFile};
use rebellion_app::pilot::{create_pilot, PilotKind};
use rebellion_app::state::parse_upgrade;
use rebellion_core::constants::TICK_RATE;
use rebellion_sim::upgrades::Upgrade;
use rebellion_sim::SimulationEngine;

#[derive(Parser)]
#[command(name = "rebellion")]
#[command(about = "Fly the Minmatar Rebellion campaign without a renderer")]
struct Args {
    /// JSON simulation config (seed, playfield, loadout)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding enemies.json, powerups.json and stages.json
    #[arg(long)]
    content: Option<PathBuf>,

    /// Override the config seed
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,

    #[arg(long, value_enum, default_value = "auto")]
    pilot: PilotKind,

    /// Pace frames against the wall clock
    #[arg(long)]
    realtime: bool,

    /// Directory for save slots
    #[arg(long)]
    save_dir: Option<PathBuf>,

    #[arg(long, default_value = "autosave")]
    slot: String,

    /// Continue from the save slot instead of starting fresh
    #[arg(long)]
    resume: bool,

    /// Upgrades to buy before flying (extra_gun, rocket_rack, armor_plating, ammo:<type>)
    #[arg(long = "buy", value_parser = parse_upgrade)]
    buy: Vec<Upgrade>,

    /// Print the final render view as JSON
    #[arg(long)]
    print_view: bool,

    /// List the saves in --save-dir, newest first, and exit
    #[arg(long)]
    list_saves: bool,

    /// Delete a save slot from --save-dir and exit
    #[arg(long)]
    delete_slot: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list_saves || args.delete_slot.is_some() {
        let dir = args
            .save_dir
            .as_deref()
            .context("save slot management needs --save-dir")?;
        if let Some(slot) = &args.delete_slot {
            persistence::delete_save(dir, slot)?;
            log::info!("deleted slot {slot}");
        }
        if args.list_saves {
            println!("{}", serde_json::to_string_pretty(&persistence::list_saves(dir))?);
        }
        return Ok(());
    }

    let mut config = load_config(args.config.as_deref())?;
    let content = load_content(args.content.as_deref())?;

    let resumed = if args.resume {
        let dir = args
            .save_dir
            .as_deref()
            .context("--resume needs --save-dir")?;
        let save = persistence::load_from_file(dir, &args.slot)?;
        config.seed = save.seed;
        Some(save)
    } else {
        None
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let seed = config.seed;

    let mut engine = SimulationEngine::new(config, content);
    if let Some(save) = &resumed {
        engine.apply_snapshot(&save.snapshot);
    }
    for upgrade in &args.buy {
        match engine.purchase_upgrade(*upgrade) {
            Ok(cost) => log::info!("bought {upgrade:?} for {cost} refugees"),
            Err(err) => log::warn!("could not buy {upgrade:?}: {err}"),
        }
    }

    let max_frames = (args.seconds.max(0.0) * TICK_RATE as f64).round() as u64;
    let handle = spawn_game_loop(
        engine,
        LoopOptions {
            pacing: if args.realtime {
                Pacing::RealTime
            } else {
                Pacing::Unpaced
            },
            max_frames: Some(max_frames),
            pilot: Some(create_pilot(args.pilot)),
        },
    )?;
    let (engine, summary) = handle.wait()?;

    if let Some(dir) = args.save_dir.as_deref() {
        persistence::save_to_file(
            dir,
            &SaveFile {
                slot_name: args.slot.clone(),
                seed,
                timestamp: persistence::now_timestamp(),
                snapshot: engine.save_snapshot(),
            },
        )?;
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    if args.print_view {
        println!("{}", serde_json::to_string_pretty(&engine.view())?);
    }
    Ok(())
}
