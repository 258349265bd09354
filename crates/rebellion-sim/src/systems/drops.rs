//! Drop-table rolls and pickup effects.

use rand::Rng;

use rebellion_core::components::{PlayerShip, PowerUp};
use rebellion_core::content::DropEntry;
use rebellion_core::enums::PowerUpKind;

/// Roll a drop table once. Entries are cumulative slices of `[0, 1)`;
/// whatever the entries leave uncovered is "no drop".
pub fn roll_drop<R: Rng>(rng: &mut R, table: &[DropEntry]) -> Option<PowerUpKind> {
    if table.is_empty() {
        return None;
    }
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for entry in table {
        cumulative += entry.chance;
        if roll < cumulative {
            return Some(entry.kind);
        }
    }
    None
}

/// Apply a collected pickup to the player.
pub fn apply_pickup(player: &mut PlayerShip, powerup: &PowerUp) {
    let magnitude = powerup.magnitude.max(0.0);
    match powerup.kind {
        PowerUpKind::Repair => {
            // Hull first, any excess patches armor.
            let hull = &mut player.health.hull;
            let hull_gain = magnitude.min(hull.max - hull.current).max(0.0);
            hull.current += hull_gain;
            let armor = &mut player.health.armor;
            armor.current = (armor.current + magnitude - hull_gain).min(armor.max);
        }
        PowerUpKind::ShieldBoost => {
            let shield = &mut player.health.shield;
            shield.current = (shield.current + magnitude).min(shield.max);
        }
        PowerUpKind::RocketAmmo => {
            let gained = magnitude.round() as u32;
            player.rockets = player.rockets.saturating_add(gained).min(player.max_rockets);
        }
        PowerUpKind::Overdrive => {
            player.overdrive_secs = player.overdrive_secs.max(powerup.duration_secs);
        }
        PowerUpKind::Refugee => {
            player.refugees = player.refugees.saturating_add(magnitude.round() as u32);
        }
    }
}
