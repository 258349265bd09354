//! Read-only views for the renderer and the flat snapshot for persistence.

use serde::{Deserialize, Serialize};

use crate::components::Health;
use crate::enums::*;
use crate::types::{Hitbox, Position, SimTime, Velocity};

/// Everything the renderer needs for one frame. Built on demand; owns its data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldView {
    pub time: SimTime,
    pub status: RunStatus,
    pub stage_index: usize,
    pub wave_index: usize,
    pub boss_active: bool,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub player_projectiles: Vec<ProjectileView>,
    pub enemy_projectiles: Vec<ProjectileView>,
    pub powerups: Vec<PowerUpView>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub hitbox: Hitbox,
    pub health: Health,
    pub rockets: u32,
    pub ammo: AmmoType,
    pub score: u64,
    pub refugees: u32,
    pub overdrive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub definition_id: String,
    pub position: Position,
    pub hitbox: Hitbox,
    pub health: Health,
    pub state: AiState,
    pub stance: CombatStance,
    pub pattern: MovementPattern,
    pub boss_phase: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Position,
    pub velocity: Velocity,
    pub hitbox: Hitbox,
    pub damage_type: DamageType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpView {
    pub position: Position,
    pub hitbox: Hitbox,
    pub kind: PowerUpKind,
    pub remaining_secs: f64,
}

/// Flat run state handed to the persistence layer, and accepted back on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSnapshot {
    pub score: u64,
    pub refugees: u32,
    pub unlocked_ammo: Vec<AmmoType>,
    pub selected_ammo: AmmoType,
    pub rockets: u32,
    pub max_rockets: u32,
    pub gun_count: u32,
    pub health: Health,
    pub stage_index: usize,
    pub wave_index: usize,
}
