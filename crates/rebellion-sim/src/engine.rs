//! Simulation engine: the frame driver.
//!
//! `SimulationEngine` owns the hecs ECS world, the player ship and the wave
//! scheduler, runs all systems in a fixed order each frame, and produces
//! `FrameResult`s and `WorldView`s. Completely headless, enabling
//! deterministic testing.

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use rebellion_core::components::{EnemyWeapon, PlayerShip};
use rebellion_core::constants::*;
use rebellion_core::content::ContentLibrary;
use rebellion_core::enums::{AmmoType, RunStatus};
use rebellion_core::events::{AudioCue, FrameResult};
use rebellion_core::input::InputIntent;
use rebellion_core::state::{SaveSnapshot, WorldView};
use rebellion_core::types::{Playfield, SimTime};

use crate::systems;
use crate::systems::enemy_ai::AiFrame;
use crate::systems::wave_scheduler::WaveScheduler;
use crate::upgrades::{self, Upgrade, UpgradeError};
use crate::world_setup;

/// Starting stats for the player ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerLoadout {
    pub max_shield: f64,
    pub max_armor: f64,
    pub max_hull: f64,
    pub rockets: u32,
    pub max_rockets: u32,
    pub ammo: AmmoType,
    pub gun_count: u32,
    /// Base movement speed (px/s).
    pub speed: f64,
}

impl Default for PlayerLoadout {
    fn default() -> Self {
        Self {
            max_shield: PLAYER_MAX_SHIELD,
            max_armor: PLAYER_MAX_ARMOR,
            max_hull: PLAYER_MAX_HULL,
            rockets: PLAYER_START_ROCKETS,
            max_rockets: PLAYER_MAX_ROCKETS,
            ammo: AmmoType::Sabot,
            gun_count: 1,
            speed: PLAYER_SPEED,
        }
    }
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and inputs = same run.
    pub seed: u64,
    pub playfield: Playfield,
    /// Largest dt a single step integrates.
    pub max_frame_dt: f64,
    pub loadout: PlayerLoadout,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            playfield: Playfield::default(),
            max_frame_dt: MAX_FRAME_DT,
            loadout: PlayerLoadout::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all run state.
pub struct SimulationEngine {
    world: World,
    content: ContentLibrary,
    playfield: Playfield,
    max_frame_dt: f64,
    loadout: PlayerLoadout,
    time: SimTime,
    status: RunStatus,
    rng: ChaCha8Rng,
    player: PlayerShip,
    scheduler: WaveScheduler,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<AudioCue>,
}

impl SimulationEngine {
    /// Create a new engine at the start of the campaign. `content` is
    /// assumed validated.
    pub fn new(config: SimConfig, content: ContentLibrary) -> Self {
        let max_frame_dt = if config.max_frame_dt.is_finite() && config.max_frame_dt > 0.0 {
            config.max_frame_dt
        } else {
            MAX_FRAME_DT
        };
        Self {
            world: World::new(),
            player: world_setup::new_player(&config.loadout, &config.playfield),
            content,
            playfield: config.playfield,
            max_frame_dt,
            loadout: config.loadout,
            time: SimTime::default(),
            status: RunStatus::Active,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            scheduler: WaveScheduler::default(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Advance the world by one frame.
    pub fn step(&mut self, dt: f64, intent: InputIntent) -> FrameResult {
        if !dt.is_finite() || dt <= 0.0 {
            self.clamp_due_timers();
            return FrameResult {
                run_ended: self.status == RunStatus::Defeated,
                ..FrameResult::default()
            };
        }

        if self.status != RunStatus::Active {
            return FrameResult {
                run_ended: self.status == RunStatus::Defeated,
                ..FrameResult::default()
            };
        }

        let dt = dt.min(self.max_frame_dt);
        let intent = intent.clamped();
        let mut result = FrameResult::default();

        // 1. Player input, cooldowns, player fire
        systems::player_control::run(
            &mut self.world,
            &mut self.player,
            &intent,
            dt,
            &self.playfield,
            &mut self.events,
        );
        // 2. Enemy AI (movement, state, enemy fire)
        let frame = AiFrame {
            player: self.player.position,
            playfield: self.playfield,
            retreat_serial: self.scheduler.retreat_serial(),
            time_secs: self.time.elapsed_secs,
            dt,
        };
        systems::enemy_ai::run(&mut self.world, &frame, &mut self.rng, &mut self.events);
        // 3. Projectile and pickup integration, expiry
        systems::movement::run(&mut self.world, dt, &self.playfield);
        // 4. Collision and damage
        let collision = systems::collision::run(
            &mut self.world,
            &mut self.player,
            &self.content,
            &mut self.rng,
            &mut self.events,
        );
        result.score_delta = collision.score_delta;
        if collision.player_destroyed {
            self.status = RunStatus::Defeated;
            result.run_ended = true;
        }
        // 5. Scheduler
        if self.status == RunStatus::Active {
            let outcome = systems::wave_scheduler::run(
                &mut self.scheduler,
                &mut self.world,
                &self.content,
                &mut self.rng,
                &self.playfield,
                dt,
                &mut self.events,
            );
            result.wave_changed = outcome.wave_changed;
            result.stage_changed = outcome.stage_changed;
            if outcome.campaign_complete {
                self.status = RunStatus::Victorious;
                result.campaign_complete = true;
            }
        }
        // 6. Purge PendingRemoval
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);

        self.time.advance(dt);
        result.events = std::mem::take(&mut self.events);
        result
    }

    /// Build a read-only view of the current world for rendering.
    pub fn view(&self) -> WorldView {
        systems::snapshot::build_view(
            &self.world,
            &self.player,
            &self.time,
            self.status,
            &self.scheduler,
        )
    }

    /// Flat run state for the persistence layer.
    pub fn save_snapshot(&self) -> SaveSnapshot {
        systems::persistence::extract(&self.player, &self.scheduler)
    }

    /// Load a saved run: clears the world, rebuilds the player and restarts
    /// the scheduler at the saved stage and wave.
    pub fn apply_snapshot(&mut self, snapshot: &SaveSnapshot) {
        let (player, scheduler) = systems::persistence::restore(
            snapshot,
            &self.loadout,
            &self.playfield,
            &self.content,
        );
        self.world.clear();
        self.events.clear();
        self.player = player;
        self.scheduler = scheduler;
        self.status = RunStatus::Active;
        log::info!(
            "snapshot applied: stage {} wave {}",
            self.scheduler.stage_index,
            self.scheduler.wave_index
        );
    }

    /// Spend refugees on an upgrade. Returns the cost paid.
    pub fn purchase_upgrade(&mut self, upgrade: Upgrade) -> Result<u32, UpgradeError> {
        upgrades::purchase(
            &mut self.player,
            upgrade,
            self.scheduler.stage_index,
            &self.loadout,
        )
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn player(&self) -> &PlayerShip {
        &self.player
    }

    pub fn scheduler(&self) -> &WaveScheduler {
        &self.scheduler
    }

    pub fn content(&self) -> &ContentLibrary {
        &self.content
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut PlayerShip {
        &mut self.player
    }

    #[cfg(test)]
    pub fn scheduler_mut(&mut self) -> &mut WaveScheduler {
        &mut self.scheduler
    }

    /// Zero-length frames only settle timers that are already due.
    fn clamp_due_timers(&mut self) {
        self.player.primary_cooldown = self.player.primary_cooldown.max(0.0);
        self.player.secondary_cooldown = self.player.secondary_cooldown.max(0.0);
        self.player.overdrive_secs = self.player.overdrive_secs.max(0.0);
        for (_entity, weapon) in self.world.query_mut::<&mut EnemyWeapon>() {
            weapon.cooldown = weapon.cooldown.max(0.0);
        }
    }
}
