//! Save snapshot extraction and application.
//!
//! The snapshot is flat run state: player stats, currency and score, and the
//! scheduler position. Loading rebuilds the player and restarts the
//! scheduler at the saved wave; entities in flight are not saved.

use rebellion_core::components::{HealthLayer, PlayerShip};
use rebellion_core::constants::MAX_GUN_COUNT;
use rebellion_core::content::ContentLibrary;
use rebellion_core::enums::AmmoType;
use rebellion_core::state::SaveSnapshot;
use rebellion_core::types::Playfield;

use crate::engine::PlayerLoadout;
use crate::systems::wave_scheduler::WaveScheduler;
use crate::world_setup;

/// Flatten the run state for the persistence layer.
pub fn extract(player: &PlayerShip, scheduler: &WaveScheduler) -> SaveSnapshot {
    SaveSnapshot {
        score: player.score,
        refugees: player.refugees,
        unlocked_ammo: player.unlocked_ammo.clone(),
        selected_ammo: player.ammo,
        rockets: player.rockets,
        max_rockets: player.max_rockets,
        gun_count: player.gun_count,
        health: player.health,
        stage_index: scheduler.stage_index,
        wave_index: scheduler.wave_index,
    }
}

/// Rebuild the player and scheduler from a snapshot. Out-of-range values
/// are clamped into what the loadout and content allow.
pub fn restore(
    snapshot: &SaveSnapshot,
    loadout: &PlayerLoadout,
    playfield: &Playfield,
    content: &ContentLibrary,
) -> (PlayerShip, WaveScheduler) {
    let mut player = world_setup::new_player(loadout, playfield);
    player.score = snapshot.score;
    player.refugees = snapshot.refugees;

    let mut unlocked = vec![AmmoType::Sabot];
    for ammo in &snapshot.unlocked_ammo {
        if !unlocked.contains(ammo) {
            unlocked.push(*ammo);
        }
    }
    player.ammo = if unlocked.contains(&snapshot.selected_ammo) {
        snapshot.selected_ammo
    } else {
        log::warn!(
            "saved ammo {:?} is not unlocked, falling back to {:?}",
            snapshot.selected_ammo,
            AmmoType::Sabot
        );
        AmmoType::Sabot
    };
    player.unlocked_ammo = unlocked;

    player.max_rockets = snapshot.max_rockets;
    player.rockets = snapshot.rockets.min(snapshot.max_rockets);
    player.gun_count = snapshot.gun_count.clamp(1, MAX_GUN_COUNT);

    let health = &snapshot.health;
    player.health.shield = restore_layer(&health.shield, player.health.shield.max);
    player.health.armor = restore_layer(&health.armor, player.health.armor.max);
    player.health.hull = restore_layer(&health.hull, player.health.hull.max);
    if player.health.hull.current <= 0.0 {
        log::warn!("saved hull is empty, restored to full");
        player.health.hull.current = player.health.hull.max;
    }

    let last_stage = content.stages.len().saturating_sub(1);
    let stage = snapshot.stage_index.min(last_stage);
    let wave_count = content.stage(stage).map_or(0, |s| s.waves.len());
    let wave = if stage == snapshot.stage_index {
        snapshot.wave_index.min(wave_count)
    } else {
        0
    };
    if stage != snapshot.stage_index || wave != snapshot.wave_index {
        log::warn!(
            "saved position stage {} wave {} out of range, using stage {stage} wave {wave}",
            snapshot.stage_index,
            snapshot.wave_index
        );
    }

    (player, WaveScheduler::starting_at(stage, wave))
}

fn restore_layer(saved: &HealthLayer, fallback_max: f64) -> HealthLayer {
    let max = if saved.max.is_finite() && saved.max >= 0.0 {
        saved.max
    } else {
        fallback_max
    };
    let current = if saved.current.is_finite() {
        saved.current.clamp(0.0, max)
    } else {
        max
    };
    HealthLayer { current, max }
}
