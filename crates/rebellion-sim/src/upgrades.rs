//! Upgrade shop paid for with rescued refugees.
//!
//! Ammo types unlock once play has reached a given stage. Ship upgrades
//! have escalating per-level costs and a level cap.

use std::fmt;

use serde::{Deserialize, Serialize};

use rebellion_core::components::PlayerShip;
use rebellion_core::constants::MAX_GUN_COUNT;
use rebellion_core::enums::AmmoType;

use crate::engine::PlayerLoadout;

/// Rockets added to the rack per level.
pub const ROCKET_RACK_STEP: u32 = 5;
/// Armor hit points added per plating level.
pub const ARMOR_PLATING_STEP: f64 = 20.0;
/// Level cap for any ship upgrade. Extra guns stop earlier, at `MAX_GUN_COUNT`.
pub const MAX_UPGRADE_LEVEL: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "upgrade", content = "ammo")]
pub enum Upgrade {
    UnlockAmmo(AmmoType),
    ExtraGun,
    RocketRack,
    ArmorPlating,
}

/// Why a purchase was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum UpgradeError {
    AlreadyOwned,
    MaxLevel,
    StageLocked { required: usize, current: usize },
    InsufficientRefugees { cost: u32, available: u32 },
}

impl fmt::Display for UpgradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyOwned => write!(f, "already owned"),
            Self::MaxLevel => write!(f, "already at maximum level"),
            Self::StageLocked { required, current } => {
                write!(f, "requires stage {required}, currently at stage {current}")
            }
            Self::InsufficientRefugees { cost, available } => {
                write!(f, "insufficient refugees: have {available}, need {cost}")
            }
        }
    }
}

impl std::error::Error for UpgradeError {}

/// Unlock requirements for an ammo type: (minimum stage index, cost).
pub fn unlock_gate(ammo: AmmoType) -> (usize, u32) {
    match ammo {
        AmmoType::Sabot => (0, 0),
        AmmoType::Emp => (0, 20),
        AmmoType::PhasedPlasma => (1, 35),
        AmmoType::Fusion => (2, 50),
    }
}

/// Cost of the next level of a ship upgrade. None when already maxed.
pub fn upgrade_cost(upgrade: Upgrade, current_level: u32) -> Option<u32> {
    if current_level >= MAX_UPGRADE_LEVEL {
        return None;
    }
    let table: &[u32] = match upgrade {
        Upgrade::UnlockAmmo(_) => return None,
        Upgrade::ExtraGun => &[60, 120],
        Upgrade::RocketRack => &[15, 30, 45],
        Upgrade::ArmorPlating => &[25, 50, 75],
    };
    table.get(current_level as usize).copied()
}

/// Current level of a ship upgrade, read back from the player's stats
/// against the starting loadout.
pub fn current_level(player: &PlayerShip, upgrade: Upgrade, base: &PlayerLoadout) -> u32 {
    match upgrade {
        Upgrade::UnlockAmmo(ammo) => u32::from(player.unlocked_ammo.contains(&ammo)),
        Upgrade::ExtraGun => player.gun_count.saturating_sub(1),
        Upgrade::RocketRack => player.max_rockets.saturating_sub(base.max_rockets) / ROCKET_RACK_STEP,
        Upgrade::ArmorPlating => {
            ((player.health.armor.max - base.max_armor).max(0.0) / ARMOR_PLATING_STEP).floor() as u32
        }
    }
}

/// Buy an upgrade. Returns the refugees spent.
pub fn purchase(
    player: &mut PlayerShip,
    upgrade: Upgrade,
    stage_index: usize,
    base: &PlayerLoadout,
) -> Result<u32, UpgradeError> {
    let cost = match upgrade {
        Upgrade::UnlockAmmo(ammo) => {
            if player.unlocked_ammo.contains(&ammo) {
                return Err(UpgradeError::AlreadyOwned);
            }
            let (required, cost) = unlock_gate(ammo);
            if stage_index < required {
                return Err(UpgradeError::StageLocked {
                    required,
                    current: stage_index,
                });
            }
            cost
        }
        Upgrade::ExtraGun if player.gun_count >= MAX_GUN_COUNT => {
            return Err(UpgradeError::MaxLevel);
        }
        _ => {
            let level = current_level(player, upgrade, base);
            upgrade_cost(upgrade, level).ok_or(UpgradeError::MaxLevel)?
        }
    };

    if player.refugees < cost {
        return Err(UpgradeError::InsufficientRefugees {
            cost,
            available: player.refugees,
        });
    }
    player.refugees -= cost;

    match upgrade {
        Upgrade::UnlockAmmo(ammo) => player.unlocked_ammo.push(ammo),
        Upgrade::ExtraGun => player.gun_count += 1,
        Upgrade::RocketRack => player.max_rockets += ROCKET_RACK_STEP,
        Upgrade::ArmorPlating => {
            player.health.armor.max += ARMOR_PLATING_STEP;
            player.health.armor.current += ARMOR_PLATING_STEP;
        }
    }

    log::info!("purchased {upgrade:?} for {cost} refugees");
    Ok(cost)
}
