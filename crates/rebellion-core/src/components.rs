//! ECS components for hecs entities, plus the player record.
//!
//! Components are plain data structs with no game logic.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::content::DropEntry;
use crate::enums::*;
use crate::types::{Hitbox, Position, Velocity};

/// One health layer (shield, armor or hull).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthLayer {
    pub current: f64,
    pub max: f64,
}

impl HealthLayer {
    pub fn full(max: f64) -> Self {
        Self { current: max, max }
    }
}

/// Three-layer health. Damage drains shield, then armor, then hull.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub shield: HealthLayer,
    pub armor: HealthLayer,
    pub hull: HealthLayer,
}

impl Health {
    pub fn full(shield: f64, armor: f64, hull: f64) -> Self {
        Self {
            shield: HealthLayer::full(shield),
            armor: HealthLayer::full(armor),
            hull: HealthLayer::full(hull),
        }
    }

    /// Remaining fraction of total health across all layers (0.0 - 1.0).
    pub fn fraction(&self) -> f64 {
        let max = self.shield.max + self.armor.max + self.hull.max;
        if max <= 0.0 {
            return 0.0;
        }
        (self.shield.current + self.armor.current + self.hull.current) / max
    }

    pub fn is_destroyed(&self) -> bool {
        self.hull.current <= 0.0
    }
}

/// Marks an enemy entity and carries its reward data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Content definition this enemy was built from.
    pub definition_id: String,
    /// Score awarded on death (already difficulty-scaled).
    pub score_value: u64,
    /// Drop table rolled on death.
    pub drop_table: Vec<DropEntry>,
    /// Serial of the wave (or boss encounter) that spawned it.
    pub wave_serial: u32,
}

/// Per-pattern movement state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PatternState {
    #[default]
    Linear,
    Sine {
        /// Centre line the perpendicular offset is measured from.
        centre_x: f64,
        /// Phase in radians, kept in `[0, TAU)`.
        phase: f64,
    },
    Zigzag {
        /// Lateral direction, +1.0 or -1.0.
        direction: f64,
        /// Seconds since the last flip.
        timer: f64,
    },
    Swoop {
        /// Dive target captured when the dive began.
        target: Position,
        elapsed: f64,
        finished: bool,
    },
    Flank {
        /// Side of the player to take up, +1.0 (right) or -1.0 (left).
        side: f64,
        /// Seconds until the side is switched.
        switch_timer: f64,
    },
    Orbit {
        /// Angular position around the player (radians).
        angle: f64,
    },
}

/// AI state for an enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBrain {
    pub state: AiState,
    pub stance: CombatStance,
    pub pattern: MovementPattern,
    pub pattern_state: PatternState,
    /// Seconds spent in the current AI state.
    pub state_elapsed: f64,
    /// On-screen point the enemy flies to while entering.
    pub anchor: Position,
    /// Cruise speed from the definition (px/s).
    pub speed: f64,
    /// Whether this type switches to zigzag when badly damaged.
    pub evades_when_damaged: bool,
    /// Flank side rolled at spawn, +1.0 (right) or -1.0 (left).
    pub flank_side: f64,
}

/// Enemy weapon state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyWeapon {
    /// Seconds until the weapon may fire again. Fire permitted at <= 0.
    pub cooldown: f64,
    /// Base seconds between shots.
    pub interval: f64,
    pub projectile_speed: f64,
    pub projectile_damage: f64,
    /// Simulation time of the last shot.
    pub last_fired_secs: Option<f64>,
}

/// Marks a stage boss. Phase never decreases.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Boss {
    pub phase: u8,
}

/// Projectile payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub damage: f64,
    pub damage_type: DamageType,
    /// Seconds of flight left.
    pub remaining_secs: f64,
}

/// Marks a projectile fired by the player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerShot;

/// Marks a projectile fired by an enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyShot;

/// A pickup drifting in the playfield.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Amount restored/granted.
    pub magnitude: f64,
    /// Effect duration for timed effects (s).
    pub duration_secs: f64,
    /// Seconds until the pickup expires adrift.
    pub remaining_secs: f64,
}

/// The player ship. Held by the engine directly, not in the ECS world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShip {
    pub position: Position,
    pub velocity: Velocity,
    pub hitbox: Hitbox,
    pub health: Health,
    pub rockets: u32,
    pub max_rockets: u32,
    pub ammo: AmmoType,
    /// Unlocked ammo types, in cycling order. Always contains `ammo`.
    pub unlocked_ammo: Vec<AmmoType>,
    pub score: u64,
    pub refugees: u32,
    /// Seconds until the autocannons may fire. Fire permitted at <= 0.
    pub primary_cooldown: f64,
    /// Seconds until a rocket may be launched. Fire permitted at <= 0.
    pub secondary_cooldown: f64,
    /// Number of autocannons fitted (spread volley when > 1).
    pub gun_count: u32,
    /// Remaining overdrive (speed boost) time.
    pub overdrive_secs: f64,
    pub base_speed: f64,
}
