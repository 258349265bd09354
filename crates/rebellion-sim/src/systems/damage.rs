//! Layered damage: shield, then armor, then hull.
//!
//! Damage is carried between layers in raw units. Each layer converts raw
//! damage to hit points with its effectiveness multiplier, absorbs what it
//! can, and passes the unabsorbed raw remainder on.

use rebellion_core::components::{Health, HealthLayer};
use rebellion_core::enums::{AmmoType, DamageType};
use rebellion_core::events::DamageLayer;

/// Effectiveness of a damage type against each layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multipliers {
    pub shield: f64,
    pub armor: f64,
    pub hull: f64,
}

impl Multipliers {
    pub const NEUTRAL: Multipliers = Multipliers {
        shield: 1.0,
        armor: 1.0,
        hull: 1.0,
    };
}

/// Fixed ammo effectiveness table. Hull always takes full damage.
pub fn effectiveness(damage_type: DamageType) -> Multipliers {
    let (shield, armor) = match damage_type {
        DamageType::Ammo(AmmoType::Sabot) => (1.0, 1.0),
        DamageType::Ammo(AmmoType::Emp) => (1.5, 0.5),
        DamageType::Ammo(AmmoType::PhasedPlasma) => (1.2, 0.8),
        DamageType::Ammo(AmmoType::Fusion) => (0.5, 1.5),
        DamageType::Rocket | DamageType::Hostile => (1.0, 1.0),
    };
    Multipliers {
        shield,
        armor,
        hull: 1.0,
    }
}

/// Hit points removed from each layer by one hit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageReport {
    pub shield: f64,
    pub armor: f64,
    pub hull: f64,
    /// Raw damage left over once the hull was empty.
    pub overflow: f64,
}

impl DamageReport {
    /// Total hit points removed across all layers.
    pub fn total(&self) -> f64 {
        self.shield + self.armor + self.hull
    }

    /// Deepest layer that lost hit points, if any did.
    pub fn deepest_layer(&self) -> Option<DamageLayer> {
        if self.hull > 0.0 {
            Some(DamageLayer::Hull)
        } else if self.armor > 0.0 {
            Some(DamageLayer::Armor)
        } else if self.shield > 0.0 {
            Some(DamageLayer::Shield)
        } else {
            None
        }
    }
}

/// Apply `amount` raw damage through the layer chain. Layers never go
/// negative. Non-finite or negative amounts deal nothing.
pub fn apply_layered(health: &mut Health, amount: f64, multipliers: Multipliers) -> DamageReport {
    let mut remaining = if amount.is_finite() { amount.max(0.0) } else { 0.0 };

    let shield = absorb(&mut health.shield, &mut remaining, multipliers.shield);
    let armor = absorb(&mut health.armor, &mut remaining, multipliers.armor);
    let hull = absorb(&mut health.hull, &mut remaining, multipliers.hull);

    DamageReport {
        shield,
        armor,
        hull,
        overflow: remaining,
    }
}

fn absorb(layer: &mut HealthLayer, remaining: &mut f64, multiplier: f64) -> f64 {
    layer.current = layer.current.max(0.0);
    if *remaining <= 0.0 || multiplier <= 0.0 {
        return 0.0;
    }
    let absorbed = (*remaining * multiplier).min(layer.current);
    layer.current -= absorbed;
    *remaining = (*remaining - absorbed / multiplier).max(0.0);
    absorbed
}
