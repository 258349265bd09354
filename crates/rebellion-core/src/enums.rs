//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Entity lifecycle tag. PendingRemoval entities are purged at end of frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    #[default]
    Active,
    PendingRemoval,
}

/// Selectable autocannon ammunition. Each type trades effectiveness against
/// shields for effectiveness against armor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmmoType {
    /// Balanced, always available.
    #[default]
    Sabot,
    /// Electromagnetic pulse: strips shields, glances off armor.
    Emp,
    /// Phased plasma: slightly favours shields.
    PhasedPlasma,
    /// Fusion: cracks armor, weak against shields.
    Fusion,
}

impl AmmoType {
    /// Canonical cycling order.
    pub const ALL: [AmmoType; 4] = [
        AmmoType::Sabot,
        AmmoType::Emp,
        AmmoType::PhasedPlasma,
        AmmoType::Fusion,
    ];
}

/// Damage type carried by a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageType {
    /// Player autocannon round of the given ammo type.
    Ammo(AmmoType),
    /// Player rocket.
    Rocket,
    /// Any enemy weapon.
    Hostile,
}

/// Enemy movement pattern, selected from content or by the AI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    #[default]
    Linear,
    Sine,
    Zigzag,
    Swoop,
    Flank,
    Orbit,
}

/// Enemy AI state. Ordered: an enemy only ever moves forward through these.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AiState {
    #[default]
    Spawned,
    Entering,
    Combat,
    Exiting,
    Despawned,
}

/// Combat sub-state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatStance {
    #[default]
    Attack,
    Evade,
    Flank,
}

/// Pickup effect type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Restores hull, then armor.
    Repair,
    /// Adds rockets to the rack.
    RocketAmmo,
    /// Temporary speed boost.
    Overdrive,
    /// Restores shield.
    ShieldBoost,
    /// Rescued refugees (upgrade currency).
    Refugee,
}

/// Where a wave entry places its spawns along the top edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPattern {
    /// Spread evenly across the width.
    #[default]
    Line,
    Center,
    Left,
    Right,
    /// V shape centred on the playfield.
    Wedge,
    /// Uniformly random x (seeded).
    Random,
}

/// Overall run status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    #[default]
    Active,
    /// Player hull reached zero.
    Defeated,
    /// Every stage cleared.
    Victorious,
}
