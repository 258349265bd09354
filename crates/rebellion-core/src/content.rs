//! Content definitions: enemy stats, power-up effects, stage/wave composition.
//!
//! The simulation treats a [`ContentLibrary`] as an immutable, pre-validated
//! lookup table. Malformed content is rejected here, at load time, and never
//! reaches the frame step.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ENEMY_SHOT_DAMAGE, DEFAULT_ENEMY_SHOT_SPEED, DEFAULT_WAVE_DURATION_SECS,
    POWERUP_TTL_SECS,
};
use crate::enums::{MovementPattern, PowerUpKind, SpawnPattern};

/// One weighted entry of a drop table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropEntry {
    pub kind: PowerUpKind,
    /// Probability (0.0 - 1.0) that this entry is the one dropped.
    pub chance: f64,
}

/// Enemy type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub id: String,
    pub max_shield: f64,
    pub max_armor: f64,
    pub max_hull: f64,
    /// Cruise speed (px/s).
    pub speed: f64,
    /// Milliseconds between shots. Zero means the type carries no weapon.
    pub fire_rate_ms: u64,
    pub score_value: u64,
    pub size_w: f64,
    pub size_h: f64,
    pub behavior_pattern: MovementPattern,
    #[serde(default)]
    pub drop_table: Vec<DropEntry>,
    /// Switch to evasive zigzag when badly damaged.
    #[serde(default)]
    pub evades_when_damaged: bool,
    #[serde(default = "default_shot_speed")]
    pub projectile_speed: f64,
    #[serde(default = "default_shot_damage")]
    pub projectile_damage: f64,
}

/// Effect parameters for a power-up kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpDefinition {
    pub kind: PowerUpKind,
    pub magnitude: f64,
    #[serde(default)]
    pub duration_secs: f64,
    #[serde(default = "default_ttl")]
    pub ttl_secs: f64,
}

/// One line of a wave: `count` enemies of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveEntry {
    pub definition_id: String,
    pub count: u32,
    #[serde(default)]
    pub spawn_pattern: SpawnPattern,
    /// Fixed spacing between this entry's spawns. When absent the entry is
    /// spread evenly across the wave duration with the other unspaced entries.
    #[serde(default)]
    pub interval_secs: Option<f64>,
    /// Offset of this entry's first spawn when `interval_secs` is set.
    #[serde(default)]
    pub delay_secs: f64,
}

/// Pickups released directly by the wave (industrial cargo).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CargoDrop {
    pub kind: PowerUpKind,
    pub count: u32,
    #[serde(default)]
    pub delay_secs: f64,
}

/// A timed wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveDefinition {
    #[serde(default)]
    pub enemies: Vec<WaveEntry>,
    #[serde(default)]
    pub cargo: Vec<CargoDrop>,
    #[serde(default = "default_wave_duration")]
    pub duration_secs: f64,
}

/// A stage: waves followed by an optional boss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDefinition {
    pub name: String,
    pub waves: Vec<WaveDefinition>,
    #[serde(default)]
    pub boss: Option<String>,
    /// Multiplier applied to spawned enemies' health and score.
    pub scaling: f64,
}

/// All content the simulation needs, keyed for lookup.
#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    pub enemies: HashMap<String, EnemyDefinition>,
    pub powerups: HashMap<PowerUpKind, PowerUpDefinition>,
    pub stages: Vec<StageDefinition>,
}

/// Content rejected at load time.
#[derive(Debug)]
pub enum ContentError {
    Json {
        document: &'static str,
        source: serde_json::Error,
    },
    DuplicateEnemy(String),
    InvalidStat {
        id: String,
        stat: &'static str,
        value: f64,
    },
    DropTableOverflow {
        id: String,
        total: f64,
    },
    UnknownEnemy {
        stage: usize,
        id: String,
    },
    MissingPowerUp(PowerUpKind),
    InvalidStage {
        stage: usize,
        reason: &'static str,
    },
    EmptyCampaign,
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { document, source } => write!(f, "malformed {document}: {source}"),
            Self::DuplicateEnemy(id) => write!(f, "enemy id defined twice: {id}"),
            Self::InvalidStat { id, stat, value } => {
                write!(f, "enemy {id}: invalid {stat} ({value})")
            }
            Self::DropTableOverflow { id, total } => {
                write!(f, "enemy {id}: drop chances sum to {total:.3} (> 1.0)")
            }
            Self::UnknownEnemy { stage, id } => {
                write!(f, "stage {stage}: unknown enemy definition {id}")
            }
            Self::MissingPowerUp(kind) => write!(f, "no definition for power-up {kind:?}"),
            Self::InvalidStage { stage, reason } => write!(f, "stage {stage}: {reason}"),
            Self::EmptyCampaign => write!(f, "content defines no stages"),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ContentLibrary {
    /// Build a library from already-parsed records and validate it.
    pub fn new(
        enemies: Vec<EnemyDefinition>,
        powerups: Vec<PowerUpDefinition>,
        stages: Vec<StageDefinition>,
    ) -> Result<Self, ContentError> {
        let mut by_id = HashMap::with_capacity(enemies.len());
        for def in enemies {
            if by_id.contains_key(&def.id) {
                return Err(ContentError::DuplicateEnemy(def.id));
            }
            by_id.insert(def.id.clone(), def);
        }
        let library = Self {
            enemies: by_id,
            powerups: powerups.into_iter().map(|p| (p.kind, p)).collect(),
            stages,
        };
        library.validate()?;
        Ok(library)
    }

    /// Parse the three JSON documents (enemy list, power-up list, stage list).
    pub fn from_json_parts(
        enemies_json: &str,
        powerups_json: &str,
        stages_json: &str,
    ) -> Result<Self, ContentError> {
        let enemies: Vec<EnemyDefinition> =
            serde_json::from_str(enemies_json).map_err(|source| ContentError::Json {
                document: "enemies",
                source,
            })?;
        let powerups: Vec<PowerUpDefinition> =
            serde_json::from_str(powerups_json).map_err(|source| ContentError::Json {
                document: "powerups",
                source,
            })?;
        let stages: Vec<StageDefinition> =
            serde_json::from_str(stages_json).map_err(|source| ContentError::Json {
                document: "stages",
                source,
            })?;
        Self::new(enemies, powerups, stages)
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyDefinition> {
        self.enemies.get(id)
    }

    pub fn powerup(&self, kind: PowerUpKind) -> Option<&PowerUpDefinition> {
        self.powerups.get(&kind)
    }

    pub fn stage(&self, index: usize) -> Option<&StageDefinition> {
        self.stages.get(index)
    }

    /// Check every invariant the simulation relies on.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.stages.is_empty() {
            return Err(ContentError::EmptyCampaign);
        }

        let mut ids: Vec<&String> = self.enemies.keys().collect();
        ids.sort();
        for id in ids {
            validate_enemy(&self.enemies[id])?;
            for entry in &self.enemies[id].drop_table {
                self.require_powerup(entry.kind)?;
            }
        }

        for (stage_idx, stage) in self.stages.iter().enumerate() {
            if !(stage.scaling.is_finite() && stage.scaling > 0.0) {
                return Err(ContentError::InvalidStage {
                    stage: stage_idx,
                    reason: "scaling must be a positive number",
                });
            }
            if stage.waves.is_empty() && stage.boss.is_none() {
                return Err(ContentError::InvalidStage {
                    stage: stage_idx,
                    reason: "stage has neither waves nor a boss",
                });
            }
            if let Some(boss) = &stage.boss {
                self.require_enemy(stage_idx, boss)?;
            }
            for wave in &stage.waves {
                if !(wave.duration_secs.is_finite() && wave.duration_secs >= 0.0) {
                    return Err(ContentError::InvalidStage {
                        stage: stage_idx,
                        reason: "wave duration must be non-negative",
                    });
                }
                for entry in &wave.enemies {
                    self.require_enemy(stage_idx, &entry.definition_id)?;
                    let spacing_ok = entry.interval_secs.is_none_or(|s| s.is_finite() && s >= 0.0);
                    if !spacing_ok || !(entry.delay_secs.is_finite() && entry.delay_secs >= 0.0) {
                        return Err(ContentError::InvalidStage {
                            stage: stage_idx,
                            reason: "wave entry timing must be non-negative",
                        });
                    }
                }
                for cargo in &wave.cargo {
                    self.require_powerup(cargo.kind)?;
                }
            }
        }
        Ok(())
    }

    fn require_enemy(&self, stage: usize, id: &str) -> Result<(), ContentError> {
        if self.enemies.contains_key(id) {
            Ok(())
        } else {
            Err(ContentError::UnknownEnemy {
                stage,
                id: id.to_string(),
            })
        }
    }

    fn require_powerup(&self, kind: PowerUpKind) -> Result<(), ContentError> {
        if self.powerups.contains_key(&kind) {
            Ok(())
        } else {
            Err(ContentError::MissingPowerUp(kind))
        }
    }
}

fn validate_enemy(def: &EnemyDefinition) -> Result<(), ContentError> {
    let non_negative = [
        ("max_shield", def.max_shield),
        ("max_armor", def.max_armor),
        ("projectile_damage", def.projectile_damage),
    ];
    for (stat, value) in non_negative {
        if !(value.is_finite() && value >= 0.0) {
            return Err(invalid(def, stat, value));
        }
    }

    let positive = [
        ("max_hull", def.max_hull),
        ("speed", def.speed),
        ("size_w", def.size_w),
        ("size_h", def.size_h),
        ("projectile_speed", def.projectile_speed),
    ];
    for (stat, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(invalid(def, stat, value));
        }
    }

    let mut total = 0.0;
    for entry in &def.drop_table {
        if !(entry.chance.is_finite() && (0.0..=1.0).contains(&entry.chance)) {
            return Err(invalid(def, "drop chance", entry.chance));
        }
        total += entry.chance;
    }
    if total > 1.0 + 1e-9 {
        return Err(ContentError::DropTableOverflow {
            id: def.id.clone(),
            total,
        });
    }
    Ok(())
}

fn invalid(def: &EnemyDefinition, stat: &'static str, value: f64) -> ContentError {
    ContentError::InvalidStat {
        id: def.id.clone(),
        stat,
        value,
    }
}

fn default_shot_speed() -> f64 {
    DEFAULT_ENEMY_SHOT_SPEED
}

fn default_shot_damage() -> f64 {
    DEFAULT_ENEMY_SHOT_DAMAGE
}

fn default_ttl() -> f64 {
    POWERUP_TTL_SECS
}

fn default_wave_duration() -> f64 {
    DEFAULT_WAVE_DURATION_SECS
}
