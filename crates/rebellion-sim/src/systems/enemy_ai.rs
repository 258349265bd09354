//! Enemy AI system: runs the enemy FSM for every active enemy each frame.
//!
//! Calls the FSM from rebellion-ai to move enemies and advance their state,
//! then decides firing. Shots are collected in a buffer and spawned after
//! the query ends.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use rebellion_core::components::{Boss, Enemy, EnemyBrain, EnemyWeapon, Health};
use rebellion_core::enums::{AiState, Lifecycle};
use rebellion_core::events::AudioCue;
use rebellion_core::types::{Playfield, Position, Velocity};

use rebellion_ai::fsm::{evaluate, EnemyContext};
use rebellion_ai::profiles::{
    boss_fire_factor, get_profile, in_envelope, jittered_interval, should_fire,
};

/// Per-frame inputs shared by every enemy.
pub struct AiFrame {
    pub player: Position,
    pub playfield: Playfield,
    /// Wave serial whose survivors have been ordered to exit.
    pub retreat_serial: Option<u32>,
    pub time_secs: f64,
    pub dt: f64,
}

/// Run the enemy AI system.
pub fn run(
    world: &mut World,
    frame: &AiFrame,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<AudioCue>,
) {
    let mut shots: Vec<(Position, Velocity, f64)> = Vec::new();

    for (entity, (enemy, brain, pos, vel, health, lifecycle, weapon, boss)) in world
        .query_mut::<(
            &Enemy,
            &mut EnemyBrain,
            &mut Position,
            &mut Velocity,
            &Health,
            &mut Lifecycle,
            &mut EnemyWeapon,
            Option<&mut Boss>,
        )>()
    {
        if *lifecycle != Lifecycle::Active {
            continue;
        }

        let ctx = EnemyContext {
            state: brain.state,
            stance: brain.stance,
            pattern: brain.pattern,
            pattern_state: brain.pattern_state,
            state_elapsed: brain.state_elapsed,
            position: *pos,
            anchor: brain.anchor,
            speed: brain.speed,
            health_fraction: health.fraction(),
            evades_when_damaged: brain.evades_when_damaged,
            boss_phase: boss.as_ref().map(|b| b.phase),
            flank_side: brain.flank_side,
            player: frame.player,
            playfield: frame.playfield,
            retreat: frame.retreat_serial == Some(enemy.wave_serial),
            dt: frame.dt,
        };

        let update = evaluate(&ctx);
        if update.state_changed {
            log::trace!(
                "enemy {:?} ({}) {:?} -> {:?}",
                entity,
                enemy.definition_id,
                brain.state,
                update.state
            );
        }

        brain.state = update.state;
        brain.stance = update.stance;
        brain.pattern = update.pattern;
        brain.pattern_state = update.pattern_state;
        brain.state_elapsed = update.state_elapsed;
        *pos = update.position;
        *vel = update.velocity;
        if let (Some(boss), Some(phase)) = (boss, update.boss_phase) {
            if phase != boss.phase {
                log::debug!("boss {} entered phase {}", enemy.definition_id, phase);
                boss.phase = phase;
            }
        }

        if update.state == AiState::Despawned {
            *lifecycle = Lifecycle::PendingRemoval;
            continue;
        }

        weapon.cooldown = (weapon.cooldown - frame.dt).max(0.0);
        if !update.can_fire() || weapon.interval <= 0.0 {
            continue;
        }

        let profile = get_profile(update.pattern);
        if should_fire(weapon.cooldown, in_envelope(&profile, *pos, frame.player)) {
            let aim = (frame.player.as_vec() - pos.as_vec())
                .try_normalize()
                .unwrap_or(glam::DVec2::Y);
            shots.push((
                *pos,
                Velocity::from(aim * weapon.projectile_speed),
                weapon.projectile_damage,
            ));
            let factor = update.boss_phase.map_or(1.0, boss_fire_factor);
            weapon.cooldown = jittered_interval(rng, weapon.interval * factor);
            weapon.last_fired_secs = Some(frame.time_secs);
            events.push(AudioCue::EnemyFire);
        }
    }

    for (position, velocity, damage) in shots {
        crate::world_setup::spawn_enemy_shot(world, position, velocity, damage);
    }
}
