//! Wave/stage scheduler: turns stage definitions into timed spawns.
//!
//! At wave start the wave definition is expanded into a spawn queue ordered
//! by time offset. Each frame the wave timer advances and every queued spawn
//! whose offset has been reached (`timer >= offset`) is emitted. A wave is
//! complete once its queue is empty and none of its enemies is still active.
//! After the last wave the stage boss is spawned, and the stage clears when
//! the boss dies.

use std::collections::VecDeque;

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rebellion_core::components::Enemy;
use rebellion_core::constants::*;
use rebellion_core::content::{ContentLibrary, StageDefinition, WaveDefinition};
use rebellion_core::enums::{Lifecycle, PowerUpKind, SpawnPattern};
use rebellion_core::events::AudioCue;
use rebellion_core::types::{Playfield, Position};

use crate::world_setup::{self, EnemySpawn};

/// What a queued spawn creates.
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnKind {
    Enemy { definition_id: String },
    Cargo { kind: PowerUpKind },
}

/// One entry of the spawn queue.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedSpawn {
    /// Seconds after wave start.
    pub offset: f64,
    pub kind: SpawnKind,
    pub position: Position,
    pub anchor: Position,
}

/// Scheduler progress through the campaign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// Nothing started yet; the next tick opens the current wave.
    #[default]
    Idle,
    Wave,
    Boss,
    Complete,
}

/// Transition flags raised by one scheduler tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerOutcome {
    pub wave_changed: bool,
    pub stage_changed: bool,
    pub campaign_complete: bool,
}

/// Scheduler state.
#[derive(Debug, Clone, Default)]
pub struct WaveScheduler {
    pub stage_index: usize,
    /// Wave within the stage. Equal to the wave count while the boss is up.
    pub wave_index: usize,
    pub wave_timer: f64,
    pub queue: VecDeque<QueuedSpawn>,
    /// Serial stamped on every enemy of the current wave or boss encounter.
    pub wave_serial: u32,
    pub phase: SchedulerPhase,
    /// Survivors of the current wave have been ordered off the field.
    pub retreat_ordered: bool,
}

/// Mutable simulation state the scheduler acts on.
pub struct SchedulerContext<'a> {
    pub world: &'a mut World,
    pub rng: &'a mut ChaCha8Rng,
    pub events: &'a mut Vec<AudioCue>,
    pub outcome: SchedulerOutcome,
}

impl WaveScheduler {
    /// Scheduler that will open `wave` of `stage` on its next tick.
    pub fn starting_at(stage: usize, wave: usize) -> Self {
        Self {
            stage_index: stage,
            wave_index: wave,
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SchedulerPhase::Complete
    }

    pub fn boss_active(&self) -> bool {
        self.phase == SchedulerPhase::Boss
    }

    /// Wave serial whose survivors must exit, if a retreat has been ordered.
    pub fn retreat_serial(&self) -> Option<u32> {
        (self.phase == SchedulerPhase::Wave && self.retreat_ordered).then_some(self.wave_serial)
    }

    fn open_wave(&mut self, content: &ContentLibrary, playfield: &Playfield, ctx: &mut SchedulerContext) {
        let Some(stage) = content.stage(self.stage_index) else {
            self.finish_campaign(ctx);
            return;
        };

        match stage.waves.get(self.wave_index) {
            Some(wave) => {
                self.wave_serial += 1;
                self.wave_timer = 0.0;
                self.retreat_ordered = false;
                self.queue = build_queue(wave, playfield, ctx.rng);
                self.phase = SchedulerPhase::Wave;
                log::info!(
                    "stage {} ({}) wave {}: {} spawns queued",
                    self.stage_index,
                    stage.name,
                    self.wave_index,
                    self.queue.len()
                );
                ctx.events.push(AudioCue::WaveStart {
                    stage: self.stage_index,
                    wave: self.wave_index,
                });
                ctx.outcome.wave_changed = true;
            }
            None => self.open_boss(content, playfield, ctx),
        }
    }

    fn open_boss(&mut self, content: &ContentLibrary, playfield: &Playfield, ctx: &mut SchedulerContext) {
        let Some(stage) = content.stage(self.stage_index) else {
            self.finish_campaign(ctx);
            return;
        };
        self.wave_index = stage.waves.len();
        self.queue.clear();
        self.retreat_ordered = false;

        let boss_def = stage.boss.as_deref().and_then(|id| {
            let def = content.enemy(id);
            if def.is_none() {
                log::warn!("stage {}: unknown boss definition {id}, skipped", self.stage_index);
            }
            def
        });

        let Some(def) = boss_def else {
            self.clear_stage(content, playfield, ctx);
            return;
        };

        self.wave_serial += 1;
        self.wave_timer = 0.0;
        self.phase = SchedulerPhase::Boss;
        let centre_x = playfield.width * 0.5;
        world_setup::spawn_enemy(
            ctx.world,
            ctx.rng,
            def,
            &EnemySpawn {
                position: Position::new(centre_x, -SPAWN_ALTITUDE),
                anchor: Position::new(centre_x, ANCHOR_MIN_Y),
                scaling: difficulty_factor(&content.stages, self.stage_index, self.wave_index),
                wave_serial: self.wave_serial,
                boss: true,
            },
        );
        log::info!("stage {}: boss {} arrives", self.stage_index, def.id);
        ctx.events.push(AudioCue::BossWarning);
    }

    fn clear_stage(&mut self, content: &ContentLibrary, playfield: &Playfield, ctx: &mut SchedulerContext) {
        log::info!("stage {} cleared", self.stage_index);
        ctx.events.push(AudioCue::StageClear {
            stage: self.stage_index,
        });

        if self.stage_index + 1 >= content.stages.len() {
            self.finish_campaign(ctx);
            return;
        }

        self.stage_index += 1;
        self.wave_index = 0;
        ctx.outcome.stage_changed = true;
        self.open_wave(content, playfield, ctx);
    }

    fn finish_campaign(&mut self, ctx: &mut SchedulerContext) {
        if self.phase != SchedulerPhase::Complete {
            log::info!("campaign complete");
            self.phase = SchedulerPhase::Complete;
            self.queue.clear();
            ctx.outcome.campaign_complete = true;
        }
    }

    fn emit_due(&mut self, content: &ContentLibrary, ctx: &mut SchedulerContext) {
        let scaling = difficulty_factor(&content.stages, self.stage_index, self.wave_index);
        while self
            .queue
            .front()
            .is_some_and(|spawn| self.wave_timer >= spawn.offset)
        {
            let Some(spawn) = self.queue.pop_front() else {
                break;
            };
            match &spawn.kind {
                SpawnKind::Enemy { definition_id } => match content.enemy(definition_id) {
                    Some(def) => {
                        world_setup::spawn_enemy(
                            ctx.world,
                            ctx.rng,
                            def,
                            &EnemySpawn {
                                position: spawn.position,
                                anchor: spawn.anchor,
                                scaling,
                                wave_serial: self.wave_serial,
                                boss: false,
                            },
                        );
                    }
                    None => {
                        log::warn!("unknown enemy definition {definition_id}, spawn dropped");
                    }
                },
                SpawnKind::Cargo { kind } => match content.powerup(*kind) {
                    Some(def) => {
                        world_setup::spawn_powerup(ctx.world, def, spawn.position);
                    }
                    None => log::warn!("no definition for cargo {kind:?}, spawn dropped"),
                },
            }
        }
    }
}

/// Advance the scheduler by one frame.
pub fn run(
    scheduler: &mut WaveScheduler,
    world: &mut World,
    content: &ContentLibrary,
    rng: &mut ChaCha8Rng,
    playfield: &Playfield,
    dt: f64,
    events: &mut Vec<AudioCue>,
) -> SchedulerOutcome {
    let mut ctx = SchedulerContext {
        world,
        rng,
        events,
        outcome: SchedulerOutcome::default(),
    };

    if scheduler.phase == SchedulerPhase::Idle {
        scheduler.open_wave(content, playfield, &mut ctx);
    }

    scheduler.wave_timer += dt;

    match scheduler.phase {
        SchedulerPhase::Idle | SchedulerPhase::Complete => {}
        SchedulerPhase::Wave => {
            scheduler.emit_due(content, &mut ctx);

            if let Some(wave) = content
                .stage(scheduler.stage_index)
                .and_then(|stage| stage.waves.get(scheduler.wave_index))
            {
                if !scheduler.retreat_ordered
                    && scheduler.queue.is_empty()
                    && scheduler.wave_timer >= wave.duration_secs + WAVE_RETREAT_GRACE_SECS
                {
                    log::info!("wave {} overran, survivors retreat", scheduler.wave_index);
                    scheduler.retreat_ordered = true;
                }
            }

            if scheduler.queue.is_empty() && !serial_alive(ctx.world, scheduler.wave_serial) {
                scheduler.wave_index += 1;
                scheduler.open_wave(content, playfield, &mut ctx);
            }
        }
        SchedulerPhase::Boss => {
            if !serial_alive(ctx.world, scheduler.wave_serial) {
                scheduler.clear_stage(content, playfield, &mut ctx);
            }
        }
    }

    ctx.outcome
}

/// Any active enemy carries `serial`.
pub fn serial_alive(world: &World, serial: u32) -> bool {
    world
        .query::<(&Enemy, &Lifecycle)>()
        .iter()
        .any(|(_, (enemy, lifecycle))| {
            enemy.wave_serial == serial && *lifecycle == Lifecycle::Active
        })
}

/// Difficulty factor for a wave: the highest stage scaling reached so far,
/// times a per-wave step. Non-decreasing in stage for a fixed wave.
pub fn difficulty_factor(stages: &[StageDefinition], stage: usize, wave: usize) -> f64 {
    let base = stages
        .iter()
        .take(stage.saturating_add(1))
        .map(|s| s.scaling)
        .filter(|s| s.is_finite() && *s > 0.0)
        .fold(0.0, f64::max);
    let base = if base > 0.0 { base } else { 1.0 };
    base * (1.0 + WAVE_SCALING_STEP * wave as f64)
}

/// Expand a wave definition into its ordered spawn queue.
///
/// Entries with `interval_secs` spawn at `delay + k * interval`. The rest
/// share the wave duration evenly in definition order. Cargo drops are
/// released at their delay. Ties keep definition order.
pub fn build_queue(
    wave: &WaveDefinition,
    playfield: &Playfield,
    rng: &mut ChaCha8Rng,
) -> VecDeque<QueuedSpawn> {
    let spread_total: u32 = wave
        .enemies
        .iter()
        .filter(|entry| entry.interval_secs.is_none())
        .map(|entry| entry.count)
        .sum();

    let anchor_right = (playfield.width - SPAWN_SIDE_INSET).max(SPAWN_SIDE_INSET);
    let mut spawns = Vec::new();
    let mut spread_index = 0u32;

    for entry in &wave.enemies {
        for k in 0..entry.count {
            let offset = match entry.interval_secs {
                Some(interval) => entry.delay_secs + interval * k as f64,
                None => {
                    let offset = wave.duration_secs * spread_index as f64 / spread_total as f64;
                    spread_index += 1;
                    offset
                }
            };
            let position = spawn_position(entry.spawn_pattern, k, entry.count, playfield, rng);
            let anchor = Position::new(
                position.x.clamp(SPAWN_SIDE_INSET, anchor_right),
                rng.gen_range(ANCHOR_MIN_Y..=ANCHOR_MAX_Y),
            );
            spawns.push(QueuedSpawn {
                offset,
                kind: SpawnKind::Enemy {
                    definition_id: entry.definition_id.clone(),
                },
                position,
                anchor,
            });
        }
    }

    for cargo in &wave.cargo {
        for k in 0..cargo.count {
            let mut position = spawn_position(SpawnPattern::Line, k, cargo.count, playfield, rng);
            position.y = -POWERUP_HEIGHT;
            spawns.push(QueuedSpawn {
                offset: cargo.delay_secs,
                kind: SpawnKind::Cargo { kind: cargo.kind },
                position,
                anchor: position,
            });
        }
    }

    // Stable: equal offsets keep definition order.
    spawns.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    spawns.into()
}

/// Off-screen spawn point for member `index` of a group of `count`.
pub fn spawn_position(
    pattern: SpawnPattern,
    index: u32,
    count: u32,
    playfield: &Playfield,
    rng: &mut ChaCha8Rng,
) -> Position {
    let left = SPAWN_SIDE_INSET;
    let right = (playfield.width - SPAWN_SIDE_INSET).max(left);
    let centre = playfield.width * 0.5;
    let y = -SPAWN_ALTITUDE;

    match pattern {
        SpawnPattern::Line => {
            let t = (index + 1) as f64 / (count + 1) as f64;
            Position::new(left + (right - left) * t, y)
        }
        SpawnPattern::Center => Position::new(centre, y),
        SpawnPattern::Left => Position::new(left, y),
        SpawnPattern::Right => Position::new(right, y),
        SpawnPattern::Wedge => {
            let slot = index as f64 - (count.saturating_sub(1)) as f64 * 0.5;
            Position::new(
                (centre + slot * WEDGE_SPACING).clamp(left, right),
                y - slot.abs() * WEDGE_SPACING * 0.5,
            )
        }
        SpawnPattern::Random => Position::new(rng.gen_range(left..=right), y),
    }
}

const WEDGE_SPACING: f64 = 48.0;
