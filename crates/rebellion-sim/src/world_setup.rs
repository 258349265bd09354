//! Entity spawn factories for the simulation world.
//!
//! Creates the player record and enemy, projectile and pickup entities with
//! their component bundles.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rebellion_core::components::*;
use rebellion_core::constants::*;
use rebellion_core::content::{EnemyDefinition, PowerUpDefinition};
use rebellion_core::enums::*;
use rebellion_core::types::{Hitbox, Playfield, Position, Velocity};

use rebellion_ai::profiles::{get_profile, jittered_interval};

use crate::engine::PlayerLoadout;

/// Where the player ship starts a run: centred, near the bottom edge.
pub fn player_start_position(playfield: &Playfield) -> Position {
    Position::new(playfield.width * 0.5, playfield.height - PLAYER_HEIGHT * 2.0)
}

/// Build a fresh player ship from a loadout.
pub fn new_player(loadout: &PlayerLoadout, playfield: &Playfield) -> PlayerShip {
    let mut unlocked_ammo = vec![AmmoType::Sabot];
    if !unlocked_ammo.contains(&loadout.ammo) {
        unlocked_ammo.push(loadout.ammo);
    }

    PlayerShip {
        position: player_start_position(playfield),
        velocity: Velocity::default(),
        hitbox: Hitbox::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        health: Health::full(loadout.max_shield, loadout.max_armor, loadout.max_hull),
        rockets: loadout.rockets.min(loadout.max_rockets),
        max_rockets: loadout.max_rockets,
        ammo: loadout.ammo,
        unlocked_ammo,
        score: 0,
        refugees: 0,
        primary_cooldown: 0.0,
        secondary_cooldown: 0.0,
        gun_count: loadout.gun_count.clamp(1, MAX_GUN_COUNT),
        overdrive_secs: 0.0,
        base_speed: loadout.speed,
    }
}

/// Placement and scaling for one enemy spawn.
#[derive(Debug, Clone, Copy)]
pub struct EnemySpawn {
    pub position: Position,
    pub anchor: Position,
    /// Difficulty factor applied to health layers and score.
    pub scaling: f64,
    pub wave_serial: u32,
    pub boss: bool,
}

/// Spawn an enemy from its definition.
pub fn spawn_enemy(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    def: &EnemyDefinition,
    spawn: &EnemySpawn,
) -> Entity {
    let scaling = spawn.scaling.max(0.0);
    let enemy = Enemy {
        definition_id: def.id.clone(),
        score_value: (def.score_value as f64 * scaling).round() as u64,
        drop_table: def.drop_table.clone(),
        wave_serial: spawn.wave_serial,
    };

    let brain = EnemyBrain {
        state: AiState::Spawned,
        stance: get_profile(def.behavior_pattern).stance,
        pattern: def.behavior_pattern,
        pattern_state: PatternState::default(),
        state_elapsed: 0.0,
        anchor: spawn.anchor,
        speed: def.speed,
        evades_when_damaged: def.evades_when_damaged,
        flank_side: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
    };

    let interval = def.fire_rate_ms as f64 / 1000.0;
    let weapon = EnemyWeapon {
        cooldown: jittered_interval(rng, interval),
        interval,
        projectile_speed: def.projectile_speed,
        projectile_damage: def.projectile_damage,
        last_fired_secs: None,
    };

    let entity = world.spawn((
        enemy,
        spawn.position,
        Velocity::default(),
        Hitbox::new(def.size_w, def.size_h),
        Health::full(
            def.max_shield * scaling,
            def.max_armor * scaling,
            def.max_hull * scaling,
        ),
        Lifecycle::Active,
        brain,
        weapon,
    ));

    if spawn.boss {
        let _ = world.insert_one(entity, Boss::default());
    }

    entity
}

/// Spawn a player autocannon round or rocket.
pub fn spawn_player_shot(
    world: &mut World,
    position: Position,
    velocity: Velocity,
    projectile: Projectile,
    hitbox: Hitbox,
) -> Entity {
    world.spawn((
        PlayerShot,
        projectile,
        position,
        velocity,
        hitbox,
        Lifecycle::Active,
    ))
}

/// Spawn an enemy projectile.
pub fn spawn_enemy_shot(
    world: &mut World,
    position: Position,
    velocity: Velocity,
    damage: f64,
) -> Entity {
    world.spawn((
        EnemyShot,
        Projectile {
            damage,
            damage_type: DamageType::Hostile,
            remaining_secs: ENEMY_SHOT_LIFETIME,
        },
        position,
        velocity,
        Hitbox::new(ENEMY_SHOT_WIDTH, ENEMY_SHOT_HEIGHT),
        Lifecycle::Active,
    ))
}

/// Spawn a pickup drifting down the playfield.
pub fn spawn_powerup(world: &mut World, def: &PowerUpDefinition, position: Position) -> Entity {
    world.spawn((
        PowerUp {
            kind: def.kind,
            magnitude: def.magnitude,
            duration_secs: def.duration_secs,
            remaining_secs: def.ttl_secs,
        },
        position,
        Velocity::new(0.0, POWERUP_DRIFT_SPEED),
        Hitbox::new(POWERUP_WIDTH, POWERUP_HEIGHT),
        Lifecycle::Active,
    ))
}
