//! Events emitted by the simulation for audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Fire-and-forget audio cues. The presentation layer decides how to play them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioCue {
    /// Autocannon volley.
    PlayerFire { ammo: AmmoType },
    /// Rocket launched.
    RocketLaunch,
    /// Ammo switched.
    AmmoCycled { ammo: AmmoType },
    /// An enemy fired.
    EnemyFire,
    /// Player hit; `layer` is the deepest layer that took damage.
    PlayerHit { layer: DamageLayer },
    /// An enemy took a hit and survived.
    EnemyHit,
    /// An enemy was destroyed.
    EnemyDestroyed { boss: bool },
    /// A pickup was collected.
    PowerUpCollected { kind: PowerUpKind },
    /// A new wave began.
    WaveStart { stage: usize, wave: usize },
    /// The stage boss has arrived.
    BossWarning,
    /// A stage was cleared.
    StageClear { stage: usize },
    /// The player ship was destroyed.
    PlayerDestroyed,
}

/// Health layer identifier for hit feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageLayer {
    Shield,
    Armor,
    Hull,
}

/// Summary of one frame step for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    /// Score gained this frame.
    pub score_delta: u64,
    /// Audio cues, in emission order.
    pub events: Vec<AudioCue>,
    /// The player ship was destroyed (this frame or earlier).
    pub run_ended: bool,
    /// Play moved to a new stage this frame.
    pub stage_changed: bool,
    /// Play moved to a new wave this frame.
    pub wave_changed: bool,
    /// The final stage was cleared this frame.
    pub campaign_complete: bool,
}
