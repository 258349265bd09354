//! State shared between the runner and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use rebellion_core::enums::{AmmoType, RunStatus};
use rebellion_core::input::InputIntent;
use rebellion_core::state::{SaveSnapshot, WorldView};
use rebellion_sim::upgrades::Upgrade;
use rebellion_sim::SimulationEngine;

/// Latest render view, written by the loop thread after every batch of steps.
pub type SharedView = Arc<Mutex<Option<WorldView>>>;

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// Hold this input until the next one arrives. Ignored while a pilot flies.
    Input(InputIntent),
    /// Spend refugees on an upgrade.
    Purchase(Upgrade),
    /// Reply with the current save snapshot.
    Save(mpsc::Sender<SaveSnapshot>),
    /// Replace the run with a saved one.
    Load(SaveSnapshot),
    /// Stop the loop and hand the engine back.
    Shutdown,
}

/// End-of-run report printed by the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub frames: u64,
    pub elapsed_secs: f64,
    pub status: RunStatus,
    pub score: u64,
    pub refugees: u32,
    pub stage_index: usize,
    pub wave_index: usize,
}

impl RunSummary {
    pub fn from_engine(engine: &SimulationEngine, frames: u64) -> Self {
        let player = engine.player();
        let scheduler = engine.scheduler();
        Self {
            frames,
            elapsed_secs: engine.time().elapsed_secs,
            status: engine.status(),
            score: player.score,
            refugees: player.refugees,
            stage_index: scheduler.stage_index,
            wave_index: scheduler.wave_index,
        }
    }
}

/// Parse an upgrade name as typed on the command line: `extra_gun`,
/// `rocket_rack`, `armor_plating`, or `ammo:<emp|phased_plasma|fusion>`.
pub fn parse_upgrade(text: &str) -> Result<Upgrade, String> {
    let text = text.trim().to_ascii_lowercase().replace('-', "_");
    if let Some(ammo) = text.strip_prefix("ammo:") {
        let ammo = match ammo {
            "sabot" => AmmoType::Sabot,
            "emp" => AmmoType::Emp,
            "phased_plasma" => AmmoType::PhasedPlasma,
            "fusion" => AmmoType::Fusion,
            other => return Err(format!("unknown ammo type '{other}'")),
        };
        return Ok(Upgrade::UnlockAmmo(ammo));
    }
    match text.as_str() {
        "extra_gun" => Ok(Upgrade::ExtraGun),
        "rocket_rack" => Ok(Upgrade::RocketRack),
        "armor_plating" => Ok(Upgrade::ArmorPlating),
        other => Err(format!("unknown upgrade '{other}'")),
    }
}
