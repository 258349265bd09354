//! Tests for the frame driver, collision and damage, the wave scheduler,
//! persistence and upgrades.

use hecs::{Entity, World};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rebellion_core::components::*;
use rebellion_core::constants::*;
use rebellion_core::content::{ContentLibrary, StageDefinition, WaveDefinition, WaveEntry};
use rebellion_core::enums::*;
use rebellion_core::events::{AudioCue, DamageLayer, FrameResult};
use rebellion_core::input::InputIntent;
use rebellion_core::types::{Hitbox, Playfield, Position, Velocity};

use rebellion_ai::patterns::init_state;

use crate::engine::{PlayerLoadout, SimConfig, SimulationEngine};
use crate::scenario::default_content;
use crate::systems::damage::{apply_layered, effectiveness, Multipliers};
use crate::systems::drops::{apply_pickup, roll_drop};
use crate::systems::wave_scheduler::{build_queue, difficulty_factor, SchedulerPhase};
use crate::systems::{collision, wave_scheduler};
use crate::upgrades::{Upgrade, UpgradeError};
use crate::world_setup::{self, EnemySpawn};

const ENEMIES: &str = r#"[
    { "id": "drone", "max_shield": 0, "max_armor": 0, "max_hull": 5,
      "speed": 50, "fire_rate_ms": 0, "score_value": 100,
      "size_w": 32, "size_h": 32, "behavior_pattern": "linear" },
    { "id": "gunship", "max_shield": 0, "max_armor": 0, "max_hull": 100,
      "speed": 50, "fire_rate_ms": 500, "score_value": 50,
      "size_w": 32, "size_h": 32, "behavior_pattern": "linear" },
    { "id": "hauler", "max_shield": 0, "max_armor": 0, "max_hull": 5,
      "speed": 40, "fire_rate_ms": 0, "score_value": 10,
      "size_w": 48, "size_h": 64, "behavior_pattern": "linear",
      "drop_table": [{ "kind": "refugee", "chance": 1.0 }] },
    { "id": "flanker", "max_shield": 10, "max_armor": 10, "max_hull": 10,
      "speed": 80, "fire_rate_ms": 500, "score_value": 75,
      "size_w": 32, "size_h": 32, "behavior_pattern": "flank" }
]"#;

const POWERUPS: &str = r#"[
    { "kind": "repair", "magnitude": 30 },
    { "kind": "rocket_ammo", "magnitude": 5 },
    { "kind": "overdrive", "magnitude": 0, "duration_secs": 5 },
    { "kind": "shield_boost", "magnitude": 40 },
    { "kind": "refugee", "magnitude": 5 }
]"#;

/// A wave whose only spawn is far in the future, so the field stays quiet.
const QUIET_STAGES: &str = r#"[{ "name": "quiet", "scaling": 1.0, "waves": [
    { "duration_secs": 1000, "enemies": [
        { "definition_id": "drone", "count": 1, "interval_secs": 1, "delay_secs": 1000 }
    ] }
] }]"#;

fn library(stages: &str) -> ContentLibrary {
    ContentLibrary::from_json_parts(ENEMIES, POWERUPS, stages).unwrap()
}

fn engine_with(stages: &str, config: SimConfig) -> SimulationEngine {
    SimulationEngine::new(config, library(stages))
}

fn count_enemies(engine: &SimulationEngine) -> usize {
    engine.world().query::<&Enemy>().iter().count()
}

fn enemy_entities(world: &World) -> Vec<Entity> {
    let mut entities: Vec<Entity> = world.query::<&Enemy>().iter().map(|(e, _)| e).collect();
    entities.sort_by_key(|e| e.id());
    entities
}

fn spawn_in_combat(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    content: &ContentLibrary,
    id: &str,
    position: Position,
) -> Entity {
    let def = content.enemy(id).unwrap();
    let entity = world_setup::spawn_enemy(
        world,
        rng,
        def,
        &EnemySpawn {
            position,
            anchor: position,
            scaling: 1.0,
            wave_serial: 999,
            boss: false,
        },
    );
    {
        let mut brain = world.get::<&mut EnemyBrain>(entity).unwrap();
        let pattern = brain.pattern;
        brain.state = AiState::Combat;
        brain.pattern_state = init_state(pattern, position, Position::new(300.0, 720.0), 1.0);
    }
    entity
}

fn spawn_test_shot(world: &mut World, position: Position, damage: f64, ammo: AmmoType) -> Entity {
    world_setup::spawn_player_shot(
        world,
        position,
        Velocity::default(),
        Projectile {
            damage,
            damage_type: DamageType::Ammo(ammo),
            remaining_secs: 1.0,
        },
        Hitbox::new(PRIMARY_WIDTH, PRIMARY_HEIGHT),
    )
}

fn count_cues(result: &FrameResult, pred: impl Fn(&AudioCue) -> bool) -> usize {
    result.events.iter().filter(|cue| pred(cue)).count()
}

fn layered(shield: f64, armor: f64, hull: f64, maxes: (f64, f64, f64)) -> Health {
    Health {
        shield: HealthLayer {
            current: shield,
            max: maxes.0,
        },
        armor: HealthLayer {
            current: armor,
            max: maxes.1,
        },
        hull: HealthLayer {
            current: hull,
            max: maxes.2,
        },
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let content = default_content().unwrap();
    let mut engine_a = SimulationEngine::new(SimConfig::default(), content.clone());
    let mut engine_b = SimulationEngine::new(SimConfig::default(), content);

    for i in 0..600 {
        let intent = InputIntent {
            move_x: (i as f64 * 0.05).sin(),
            fire: true,
            alt_fire: i % 90 == 0,
            ..Default::default()
        };
        let result_a = engine_a.step(DT, intent);
        let result_b = engine_b.step(DT, intent);
        assert_eq!(result_a, result_b, "frame results diverged at step {i}");
    }
    assert_eq!(engine_a.view(), engine_b.view());
}

#[test]
fn test_determinism_different_seeds() {
    let content = default_content().unwrap();
    let mut engine_a = SimulationEngine::new(
        SimConfig {
            seed: 111,
            ..Default::default()
        },
        content.clone(),
    );
    let mut engine_b = SimulationEngine::new(
        SimConfig {
            seed: 222,
            ..Default::default()
        },
        content,
    );

    let mut diverged = false;
    for _ in 0..300 {
        engine_a.step(DT, InputIntent::default());
        engine_b.step(DT, InputIntent::default());
        if engine_a.view() != engine_b.view() {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "different seeds should roll different anchors");
}

#[test]
fn test_default_content_is_valid() {
    let content = default_content().unwrap();
    assert_eq!(content.stages.len(), 3);
    for stage in &content.stages {
        let boss = stage.boss.as_deref().unwrap();
        assert!(content.enemy(boss).is_some());
    }
    let scalings: Vec<f64> = content.stages.iter().map(|s| s.scaling).collect();
    assert!(scalings.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_sim_config_json() {
    let config: SimConfig = serde_json::from_str(r#"{ "seed": 7, "loadout": { "rockets": 3 } }"#).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.loadout.rockets, 3);
    assert_eq!(config.loadout.max_rockets, PLAYER_MAX_ROCKETS);
    assert_eq!(config.playfield, Playfield::default());
    assert_eq!(config.max_frame_dt, MAX_FRAME_DT);
}

// ---- Layered damage ----

#[test]
fn test_damage_carries_past_empty_armor() {
    let mut health = layered(10.0, 0.0, 20.0, (10.0, 50.0, 20.0));
    let report = apply_layered(&mut health, 15.0, Multipliers::NEUTRAL);
    assert_eq!(health.shield.current, 0.0);
    assert_eq!(health.armor.current, 0.0);
    assert_eq!(health.hull.current, 15.0);
    assert_eq!(report.shield, 10.0);
    assert_eq!(report.armor, 0.0);
    assert_eq!(report.hull, 5.0);
    assert_eq!(report.overflow, 0.0);
    assert_eq!(report.deepest_layer(), Some(DamageLayer::Hull));
}

#[test]
fn test_damage_overflow_past_hull() {
    let mut health = layered(0.0, 0.0, 5.0, (10.0, 10.0, 10.0));
    let report = apply_layered(&mut health, 12.0, Multipliers::NEUTRAL);
    assert_eq!(health.hull.current, 0.0);
    assert!(health.is_destroyed());
    assert_eq!(report.overflow, 7.0);
}

#[test]
fn test_effectiveness_table() {
    let sabot = effectiveness(DamageType::Ammo(AmmoType::Sabot));
    assert_eq!((sabot.shield, sabot.armor), (1.0, 1.0));
    let emp = effectiveness(DamageType::Ammo(AmmoType::Emp));
    assert!(emp.shield > 1.0 && emp.armor < 1.0);
    let fusion = effectiveness(DamageType::Ammo(AmmoType::Fusion));
    assert!(fusion.shield < 1.0 && fusion.armor > 1.0);
    let plasma = effectiveness(DamageType::Ammo(AmmoType::PhasedPlasma));
    assert!(plasma.shield > plasma.armor);
    for damage_type in [DamageType::Rocket, DamageType::Hostile] {
        assert_eq!(effectiveness(damage_type), Multipliers::NEUTRAL);
    }
    for ammo in AmmoType::ALL {
        assert_eq!(effectiveness(DamageType::Ammo(ammo)).hull, 1.0);
    }
}

#[test]
fn test_emp_strips_shield_and_glances_off_armor() {
    let mut health = layered(100.0, 100.0, 100.0, (100.0, 100.0, 100.0));
    let emp = effectiveness(DamageType::Ammo(AmmoType::Emp));
    apply_layered(&mut health, 10.0, emp);
    assert_eq!(health.shield.current, 85.0);

    // 10/1.5 raw empties the shield; the remainder hits armor at 0.5x.
    let mut health = layered(10.0, 100.0, 100.0, (100.0, 100.0, 100.0));
    let report = apply_layered(&mut health, 20.0, emp);
    assert_eq!(report.shield, 10.0);
    let raw_left = 20.0 - 10.0 / 1.5;
    assert!((report.armor - raw_left * 0.5).abs() < 1e-9);
    assert_eq!(health.hull.current, 100.0);
}

#[test]
fn test_invalid_damage_amount_is_ignored() {
    let mut health = layered(5.0, 5.0, 5.0, (5.0, 5.0, 5.0));
    let before = health;
    apply_layered(&mut health, -10.0, Multipliers::NEUTRAL);
    apply_layered(&mut health, f64::NAN, Multipliers::NEUTRAL);
    assert_eq!(health, before);
}

proptest! {
    #[test]
    fn prop_layers_never_negative_and_damage_conserved(
        shield in 0.0f64..200.0,
        armor in 0.0f64..200.0,
        hull in 0.0f64..200.0,
        amount in 0.0f64..500.0,
        damage_index in 0usize..6,
    ) {
        let damage_type = [
            DamageType::Ammo(AmmoType::Sabot),
            DamageType::Ammo(AmmoType::Emp),
            DamageType::Ammo(AmmoType::PhasedPlasma),
            DamageType::Ammo(AmmoType::Fusion),
            DamageType::Rocket,
            DamageType::Hostile,
        ][damage_index];
        let m = effectiveness(damage_type);
        let mut health = layered(shield, armor, hull, (200.0, 200.0, 200.0));
        let report = apply_layered(&mut health, amount, m);

        prop_assert!(health.shield.current >= 0.0);
        prop_assert!(health.armor.current >= 0.0);
        prop_assert!(health.hull.current >= 0.0);

        // Every raw unit is either absorbed by some layer or left over.
        let raw = report.shield / m.shield + report.armor / m.armor + report.hull / m.hull + report.overflow;
        prop_assert!((raw - amount).abs() < 1e-6, "raw {} vs amount {}", raw, amount);

        // Hit points removed match what the layers lost.
        prop_assert!((shield - health.shield.current - report.shield).abs() < 1e-9);
        prop_assert!((armor - health.armor.current - report.armor).abs() < 1e-9);
        prop_assert!((hull - health.hull.current - report.hull).abs() < 1e-9);

        // Overflow only once every layer is empty.
        if report.overflow > 1e-9 {
            prop_assert!(health.shield.current < 1e-9);
            prop_assert!(health.armor.current < 1e-9);
            prop_assert!(health.hull.current < 1e-9);
        }
    }
}

// ---- Collision ----

#[test]
fn test_two_shots_on_dying_enemy_score_once() {
    let content = library(QUIET_STAGES);
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut player = world_setup::new_player(&PlayerLoadout::default(), &Playfield::default());
    let mut events = Vec::new();

    let target = spawn_in_combat(&mut world, &mut rng, &content, "drone", Position::new(300.0, 300.0));
    let first = spawn_test_shot(&mut world, Position::new(300.0, 300.0), 10.0, AmmoType::Sabot);
    let second = spawn_test_shot(&mut world, Position::new(300.0, 300.0), 10.0, AmmoType::Sabot);

    let outcome = collision::run(&mut world, &mut player, &content, &mut rng, &mut events);

    assert_eq!(outcome.score_delta, 100, "score awarded exactly once");
    assert_eq!(player.score, 100);
    assert_eq!(*world.get::<&Lifecycle>(target).unwrap(), Lifecycle::PendingRemoval);
    assert_eq!(world.get::<&EnemyBrain>(target).unwrap().state, AiState::Despawned);
    assert_eq!(*world.get::<&Lifecycle>(first).unwrap(), Lifecycle::PendingRemoval);
    assert_eq!(
        *world.get::<&Lifecycle>(second).unwrap(),
        Lifecycle::Active,
        "second shot finds no active target"
    );
    let destroyed = events
        .iter()
        .filter(|cue| matches!(cue, AudioCue::EnemyDestroyed { .. }))
        .count();
    assert_eq!(destroyed, 1);
}

#[test]
fn test_one_shot_damages_one_of_two_overlapping_enemies() {
    let content = library(QUIET_STAGES);
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut player = world_setup::new_player(&PlayerLoadout::default(), &Playfield::default());
    let mut events = Vec::new();

    let a = spawn_in_combat(&mut world, &mut rng, &content, "gunship", Position::new(300.0, 300.0));
    let b = spawn_in_combat(&mut world, &mut rng, &content, "gunship", Position::new(305.0, 300.0));
    spawn_test_shot(&mut world, Position::new(302.0, 300.0), 10.0, AmmoType::Sabot);

    collision::run(&mut world, &mut player, &content, &mut rng, &mut events);

    let hull_a = world.get::<&Health>(a).unwrap().hull.current;
    let hull_b = world.get::<&Health>(b).unwrap().hull.current;
    assert_eq!(hull_a + hull_b, 190.0, "exactly one enemy took the hit");
    assert_eq!(events, vec![AudioCue::EnemyHit]);
}

#[test]
fn test_kill_rolls_drop_table() {
    let content = library(QUIET_STAGES);
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut player = world_setup::new_player(&PlayerLoadout::default(), &Playfield::default());
    let mut events = Vec::new();

    spawn_in_combat(&mut world, &mut rng, &content, "hauler", Position::new(100.0, 200.0));
    spawn_test_shot(&mut world, Position::new(100.0, 200.0), 10.0, AmmoType::Sabot);
    collision::run(&mut world, &mut player, &content, &mut rng, &mut events);

    let drops: Vec<PowerUp> = world.query::<&PowerUp>().iter().map(|(_, p)| *p).collect();
    assert_eq!(drops.len(), 1);
    assert_eq!(drops[0].kind, PowerUpKind::Refugee);
    assert_eq!(drops[0].magnitude, 5.0);
}

#[test]
fn test_enemy_shot_damages_player_without_ammo_modifier() {
    let content = library(QUIET_STAGES);
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut player = world_setup::new_player(&PlayerLoadout::default(), &Playfield::default());
    let mut events = Vec::new();

    let shot = world_setup::spawn_enemy_shot(&mut world, player.position, Velocity::default(), 30.0);
    let outcome = collision::run(&mut world, &mut player, &content, &mut rng, &mut events);

    assert!(!outcome.player_destroyed);
    assert_eq!(player.health.shield.current, PLAYER_MAX_SHIELD - 30.0);
    assert_eq!(*world.get::<&Lifecycle>(shot).unwrap(), Lifecycle::PendingRemoval);
    assert_eq!(
        events,
        vec![AudioCue::PlayerHit {
            layer: DamageLayer::Shield
        }]
    );
}

#[test]
fn test_player_collects_overlapping_pickup() {
    let content = library(QUIET_STAGES);
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut player = world_setup::new_player(&PlayerLoadout::default(), &Playfield::default());
    let mut events = Vec::new();

    let def = content.powerup(PowerUpKind::Refugee).unwrap();
    let pickup = world_setup::spawn_powerup(&mut world, def, player.position);
    world_setup::spawn_powerup(&mut world, def, Position::new(20.0, 20.0));
    collision::run(&mut world, &mut player, &content, &mut rng, &mut events);

    assert_eq!(player.refugees, 5);
    assert_eq!(*world.get::<&Lifecycle>(pickup).unwrap(), Lifecycle::PendingRemoval);
    assert_eq!(
        events,
        vec![AudioCue::PowerUpCollected {
            kind: PowerUpKind::Refugee
        }]
    );
}

proptest! {
    #[test]
    fn prop_projectile_damages_at_most_one_enemy(
        shots in 1usize..6,
        enemies in 1usize..6,
        jitter in prop::collection::vec(-8.0f64..8.0, 12),
    ) {
        let content = library(QUIET_STAGES);
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut player = world_setup::new_player(&PlayerLoadout::default(), &Playfield::default());
        let mut events = Vec::new();

        let targets: Vec<Entity> = (0..enemies)
            .map(|i| spawn_in_combat(
                &mut world, &mut rng, &content, "gunship",
                Position::new(300.0 + jitter[i], 300.0),
            ))
            .collect();
        for i in 0..shots {
            spawn_test_shot(&mut world, Position::new(300.0 + jitter[6 + i], 300.0), 10.0, AmmoType::Sabot);
        }

        collision::run(&mut world, &mut player, &content, &mut rng, &mut events);

        let total_damage: f64 = targets
            .iter()
            .map(|&e| 100.0 - world.get::<&Health>(e).unwrap().hull.current)
            .sum();
        prop_assert!((total_damage - 10.0 * shots as f64).abs() < 1e-9);
        let spent = world
            .query::<(&PlayerShot, &Lifecycle)>()
            .iter()
            .filter(|(_, (_, l))| **l == Lifecycle::PendingRemoval)
            .count();
        prop_assert_eq!(spent, shots);
    }
}

// ---- Drops and pickups ----

#[test]
fn test_roll_drop_certain_and_empty() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let certain = [rebellion_core::content::DropEntry {
        kind: PowerUpKind::Repair,
        chance: 1.0,
    }];
    for _ in 0..100 {
        assert_eq!(roll_drop(&mut rng, &certain), Some(PowerUpKind::Repair));
        assert_eq!(roll_drop(&mut rng, &[]), None);
    }
}

#[test]
fn test_roll_drop_respects_weights() {
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let table = [
        rebellion_core::content::DropEntry {
            kind: PowerUpKind::Repair,
            chance: 0.25,
        },
        rebellion_core::content::DropEntry {
            kind: PowerUpKind::Refugee,
            chance: 0.25,
        },
    ];
    let rolls = 20_000;
    let drops = (0..rolls).filter(|_| roll_drop(&mut rng, &table).is_some()).count();
    let rate = drops as f64 / rolls as f64;
    assert!((rate - 0.5).abs() < 0.03, "drop rate {rate}");
}

#[test]
fn test_pickup_effects() {
    let mut player = world_setup::new_player(&PlayerLoadout::default(), &Playfield::default());
    let pickup = |kind, magnitude, duration_secs| PowerUp {
        kind,
        magnitude,
        duration_secs,
        remaining_secs: 5.0,
    };

    player.health.hull.current = 90.0;
    player.health.armor.current = 50.0;
    apply_pickup(&mut player, &pickup(PowerUpKind::Repair, 30.0, 0.0));
    assert_eq!(player.health.hull.current, 100.0);
    assert_eq!(player.health.armor.current, 70.0, "excess repair patches armor");

    player.health.shield.current = 90.0;
    apply_pickup(&mut player, &pickup(PowerUpKind::ShieldBoost, 40.0, 0.0));
    assert_eq!(player.health.shield.current, PLAYER_MAX_SHIELD);

    player.rockets = PLAYER_MAX_ROCKETS - 2;
    apply_pickup(&mut player, &pickup(PowerUpKind::RocketAmmo, 5.0, 0.0));
    assert_eq!(player.rockets, PLAYER_MAX_ROCKETS);

    player.overdrive_secs = 2.0;
    apply_pickup(&mut player, &pickup(PowerUpKind::Overdrive, 0.0, 5.0));
    assert_eq!(player.overdrive_secs, 5.0);

    apply_pickup(&mut player, &pickup(PowerUpKind::Refugee, 5.0, 0.0));
    assert_eq!(player.refugees, 5);
}

// ---- Player control ----

#[test]
fn test_fire_spawns_spread_volley_then_cools_down() {
    let mut engine = engine_with(QUIET_STAGES, SimConfig::default());
    engine.player_mut().gun_count = 3;
    let fire = InputIntent {
        fire: true,
        ..Default::default()
    };

    let result = engine.step(DT, fire);
    assert_eq!(
        count_cues(&result, |c| matches!(c, AudioCue::PlayerFire { .. })),
        1
    );
    let view = engine.view();
    assert_eq!(view.player_projectiles.len(), 3);
    let xs: Vec<f64> = view.player_projectiles.iter().map(|p| p.velocity.x).collect();
    assert!(xs[0] < 0.0 && xs[1].abs() < 1e-9 && xs[2] > 0.0);
    assert!(view.player_projectiles.iter().all(|p| p.velocity.y < 0.0));

    let result = engine.step(DT, fire);
    assert!(result.events.is_empty(), "still cooling down");
    assert_eq!(engine.view().player_projectiles.len(), 3);
}

#[test]
fn test_rocket_launch_consumes_rocket() {
    let mut engine = engine_with(QUIET_STAGES, SimConfig::default());
    let result = engine.step(
        DT,
        InputIntent {
            alt_fire: true,
            ..Default::default()
        },
    );
    assert!(result.events.contains(&AudioCue::RocketLaunch));
    assert_eq!(engine.player().rockets, PLAYER_START_ROCKETS - 1);

    engine.player_mut().rockets = 0;
    engine.player_mut().secondary_cooldown = 0.0;
    let result = engine.step(
        DT,
        InputIntent {
            alt_fire: true,
            ..Default::default()
        },
    );
    assert!(!result.events.contains(&AudioCue::RocketLaunch));
}

#[test]
fn test_cycle_ammo_through_unlocked() {
    let mut engine = engine_with(QUIET_STAGES, SimConfig::default());
    let cycle = InputIntent {
        cycle_ammo: true,
        ..Default::default()
    };

    let result = engine.step(DT, cycle);
    assert_eq!(
        count_cues(&result, |c| matches!(c, AudioCue::AmmoCycled { .. })),
        0
    );
    assert_eq!(engine.player().ammo, AmmoType::Sabot);

    engine.player_mut().unlocked_ammo.push(AmmoType::Emp);
    let result = engine.step(DT, cycle);
    assert!(result.events.contains(&AudioCue::AmmoCycled { ammo: AmmoType::Emp }));
    engine.step(DT, cycle);
    assert_eq!(engine.player().ammo, AmmoType::Sabot);
}

#[test]
fn test_player_movement_clamped_and_overdrive() {
    let mut engine = engine_with(QUIET_STAGES, SimConfig::default());
    let start_x = engine.player().position.x;
    engine.step(
        0.1,
        InputIntent {
            move_x: 1.0,
            ..Default::default()
        },
    );
    let normal = engine.player().position.x - start_x;
    assert!((normal - PLAYER_SPEED * 0.1).abs() < 1e-9);

    engine.player_mut().overdrive_secs = 5.0;
    let before = engine.player().position.x;
    engine.step(
        0.1,
        InputIntent {
            move_x: -1.0,
            ..Default::default()
        },
    );
    let boosted = before - engine.player().position.x;
    assert!((boosted - PLAYER_SPEED * OVERDRIVE_SPEED_FACTOR * 0.1).abs() < 1e-9);

    for _ in 0..100 {
        engine.step(
            0.1,
            InputIntent {
                move_x: -5.0,
                move_y: 5.0,
                ..Default::default()
            },
        );
    }
    let pos = engine.player().position;
    assert_eq!(pos.x, PLAYER_WIDTH * 0.5);
    assert_eq!(pos.y, PLAYFIELD_HEIGHT - PLAYER_HEIGHT * 0.5);
}

// ---- Enemy fire ----

#[test]
fn test_enemy_fires_at_player_in_combat() {
    let mut engine = engine_with(QUIET_STAGES, SimConfig::default());
    let content = engine.content().clone();
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let gunship = spawn_in_combat(engine.world_mut(), &mut rng, &content, "gunship", Position::new(300.0, 400.0));
    engine.world_mut().get::<&mut EnemyWeapon>(gunship).unwrap().cooldown = 0.0;

    let result = engine.step(DT, InputIntent::default());
    assert_eq!(count_cues(&result, |c| *c == AudioCue::EnemyFire), 1);

    let view = engine.view();
    assert_eq!(view.enemy_projectiles.len(), 1);
    let shot = &view.enemy_projectiles[0];
    assert_eq!(shot.damage_type, DamageType::Hostile);
    assert!(shot.velocity.y > 0.0, "aimed down at the player");

    let weapon = *engine.world().get::<&EnemyWeapon>(gunship).unwrap();
    assert!(weapon.cooldown >= 0.5 * (1.0 - FIRE_JITTER_FRACTION) - 1e-9);
    assert!(weapon.last_fired_secs.is_some());
}

#[test]
fn test_flank_enemy_holds_fire_when_player_behind() {
    let mut engine = engine_with(QUIET_STAGES, SimConfig::default());
    let content = engine.content().clone();
    let mut rng = ChaCha8Rng::seed_from_u64(22);
    let player_y = engine.player().position.y;
    let flanker = spawn_in_combat(
        engine.world_mut(),
        &mut rng,
        &content,
        "flanker",
        Position::new(300.0, player_y + 50.0),
    );
    engine.world_mut().get::<&mut EnemyWeapon>(flanker).unwrap().cooldown = 0.0;

    let result = engine.step(DT, InputIntent::default());
    assert_eq!(count_cues(&result, |c| *c == AudioCue::EnemyFire), 0);
}

#[test]
fn test_unarmed_enemy_never_fires() {
    let mut engine = engine_with(QUIET_STAGES, SimConfig::default());
    let content = engine.content().clone();
    let mut rng = ChaCha8Rng::seed_from_u64(23);
    spawn_in_combat(engine.world_mut(), &mut rng, &content, "drone", Position::new(300.0, 300.0));
    for _ in 0..120 {
        let result = engine.step(DT, InputIntent::default());
        assert_eq!(count_cues(&result, |c| *c == AudioCue::EnemyFire), 0);
    }
}

// ---- Wave scheduler ----

#[test]
fn test_spawn_offsets_fire_when_timer_reaches_offset() {
    let stages = r#"[{ "name": "t", "scaling": 1.0, "waves": [
        { "duration_secs": 6, "enemies": [
            { "definition_id": "drone", "count": 3, "interval_secs": 2 }
        ] },
        { "enemies": [{ "definition_id": "drone", "count": 1 }] }
    ] }]"#;
    let mut engine = engine_with(
        stages,
        SimConfig {
            max_frame_dt: 1.0,
            ..Default::default()
        },
    );

    // Offsets 0, 2, 4 with dt = 1: spawns on steps 1, 2 and 4 (timer >= offset).
    let mut counts = Vec::new();
    for _ in 0..6 {
        engine.step(1.0, InputIntent::default());
        counts.push(count_enemies(&engine));
    }
    assert_eq!(counts, vec![1, 2, 2, 3, 3, 3]);
    assert!(engine.scheduler().queue.is_empty());
    assert_eq!(engine.scheduler().wave_index, 0, "enemies still active");
}

#[test]
fn test_build_queue_offsets_and_stable_order() {
    let wave = WaveDefinition {
        enemies: vec![
            WaveEntry {
                definition_id: "a".into(),
                count: 3,
                spawn_pattern: SpawnPattern::Line,
                interval_secs: None,
                delay_secs: 0.0,
            },
            WaveEntry {
                definition_id: "b".into(),
                count: 2,
                spawn_pattern: SpawnPattern::Center,
                interval_secs: Some(2.0),
                delay_secs: 2.0,
            },
        ],
        cargo: Vec::new(),
        duration_secs: 6.0,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let queue = build_queue(&wave, &Playfield::default(), &mut rng);

    let order: Vec<(f64, String)> = queue
        .iter()
        .map(|s| match &s.kind {
            wave_scheduler::SpawnKind::Enemy { definition_id } => (s.offset, definition_id.clone()),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        order,
        vec![
            (0.0, "a".to_string()),
            (2.0, "a".to_string()),
            (2.0, "b".to_string()),
            (4.0, "a".to_string()),
            (4.0, "b".to_string()),
        ]
    );
    for spawn in &queue {
        assert!(spawn.position.y < 0.0, "spawns start above the playfield");
        assert!((ANCHOR_MIN_Y..=ANCHOR_MAX_Y).contains(&spawn.anchor.y));
    }
}

#[test]
fn test_wave_waits_for_stragglers() {
    let stages = r#"[{ "name": "t", "scaling": 1.0, "waves": [
        { "duration_secs": 1, "enemies": [{ "definition_id": "drone", "count": 1 }] },
        { "duration_secs": 1, "enemies": [{ "definition_id": "drone", "count": 1 }] }
    ] }]"#;
    let mut engine = engine_with(stages, SimConfig::default());

    let first = engine.step(0.1, InputIntent::default());
    assert!(first.wave_changed);
    assert!(first.events.contains(&AudioCue::WaveStart { stage: 0, wave: 0 }));
    assert_eq!(count_enemies(&engine), 1);

    for _ in 0..20 {
        let result = engine.step(0.1, InputIntent::default());
        assert!(!result.wave_changed);
        assert_eq!(engine.scheduler().wave_index, 0);
    }

    let straggler = enemy_entities(engine.world())[0];
    engine.world_mut().despawn(straggler).unwrap();
    let result = engine.step(0.1, InputIntent::default());
    assert!(result.wave_changed);
    assert!(result.events.contains(&AudioCue::WaveStart { stage: 0, wave: 1 }));
    assert_eq!(engine.scheduler().wave_index, 1);
}

#[test]
fn test_zero_enemy_wave_completes_on_first_tick() {
    let stages = r#"[{ "name": "t", "scaling": 1.0, "waves": [
        { "enemies": [] },
        { "enemies": [{ "definition_id": "drone", "count": 2 }] }
    ] }]"#;
    let mut engine = engine_with(stages, SimConfig::default());
    let result = engine.step(DT, InputIntent::default());
    assert_eq!(engine.scheduler().wave_index, 1);
    assert!(result.events.contains(&AudioCue::WaveStart { stage: 0, wave: 0 }));
    assert!(result.events.contains(&AudioCue::WaveStart { stage: 0, wave: 1 }));
}

#[test]
fn test_boss_gates_stage_clear_and_campaign_end() {
    let stages = r#"[{ "name": "t", "scaling": 1.0, "boss": "gunship", "waves": [] }]"#;
    let mut engine = engine_with(stages, SimConfig::default());

    let result = engine.step(DT, InputIntent::default());
    assert!(result.events.contains(&AudioCue::BossWarning));
    let view = engine.view();
    assert!(view.boss_active);
    assert_eq!(view.enemies.len(), 1);
    assert_eq!(view.enemies[0].boss_phase, Some(0));

    for _ in 0..30 {
        let result = engine.step(DT, InputIntent::default());
        assert!(!result.campaign_complete);
    }

    let boss = enemy_entities(engine.world())[0];
    engine.world_mut().despawn(boss).unwrap();
    let result = engine.step(DT, InputIntent::default());
    assert!(result.events.contains(&AudioCue::StageClear { stage: 0 }));
    assert!(result.campaign_complete);
    assert_eq!(engine.status(), RunStatus::Victorious);
    assert_eq!(engine.scheduler().phase, SchedulerPhase::Complete);

    let after = engine.step(DT, InputIntent::default());
    assert_eq!(after, FrameResult::default());
}

#[test]
fn test_stage_advance_sets_stage_changed() {
    let stages = r#"[
        { "name": "one", "scaling": 1.0, "waves": [{ "enemies": [] }] },
        { "name": "two", "scaling": 1.5, "waves": [{ "enemies": [{ "definition_id": "drone", "count": 1 }] }] }
    ]"#;
    let mut engine = engine_with(stages, SimConfig::default());
    let result = engine.step(DT, InputIntent::default());
    assert!(result.stage_changed);
    assert!(result.events.contains(&AudioCue::StageClear { stage: 0 }));
    assert!(result.events.contains(&AudioCue::WaveStart { stage: 1, wave: 0 }));
    assert_eq!(engine.scheduler().stage_index, 1);

    engine.step(DT, InputIntent::default());
    let view = engine.view();
    assert_eq!(view.enemies.len(), 1);
    assert_eq!(view.enemies[0].health.hull.max, 5.0 * 1.5, "stage scaling applied");
}

#[test]
fn test_wave_scaling_applies_to_health_and_score() {
    let stages = r#"[{ "name": "t", "scaling": 2.0, "waves": [
        { "enemies": [] },
        { "enemies": [{ "definition_id": "gunship", "count": 1 }] }
    ] }]"#;
    let mut engine = engine_with(stages, SimConfig::default());
    engine.step(DT, InputIntent::default());
    engine.step(DT, InputIntent::default());

    let factor = 2.0 * (1.0 + WAVE_SCALING_STEP);
    let entity = enemy_entities(engine.world())[0];
    let health = *engine.world().get::<&Health>(entity).unwrap();
    assert!((health.hull.max - 100.0 * factor).abs() < 1e-9);
    let enemy = engine.world().get::<&Enemy>(entity).unwrap();
    assert_eq!(enemy.score_value, (50.0 * factor).round() as u64);
    let brain = engine.world().get::<&EnemyBrain>(entity).unwrap();
    assert_eq!(brain.speed, 50.0, "speed is never scaled");
}

#[test]
fn test_unknown_definition_is_dropped() {
    let mut content = library(QUIET_STAGES);
    content.stages = vec![StageDefinition {
        name: "broken".into(),
        waves: vec![
            WaveDefinition {
                enemies: vec![WaveEntry {
                    definition_id: "ghost".into(),
                    count: 2,
                    spawn_pattern: SpawnPattern::Line,
                    interval_secs: None,
                    delay_secs: 0.0,
                }],
                cargo: Vec::new(),
                duration_secs: 0.0,
            },
            WaveDefinition {
                enemies: vec![WaveEntry {
                    definition_id: "drone".into(),
                    count: 1,
                    spawn_pattern: SpawnPattern::Center,
                    interval_secs: None,
                    delay_secs: 0.0,
                }],
                cargo: Vec::new(),
                duration_secs: 0.0,
            },
        ],
        boss: None,
        scaling: 1.0,
    }];
    let mut engine = SimulationEngine::new(SimConfig::default(), content);

    let result = engine.step(DT, InputIntent::default());
    assert_eq!(count_enemies(&engine), 0);
    assert!(result.events.contains(&AudioCue::WaveStart { stage: 0, wave: 1 }));
}

#[test]
fn test_retreat_after_wave_overruns() {
    let stages = r#"[{ "name": "t", "scaling": 1.0, "waves": [
        { "duration_secs": 0, "enemies": [{ "definition_id": "drone", "count": 1 }] },
        { "enemies": [] }
    ] }]"#;
    let mut engine = engine_with(stages, SimConfig::default());
    engine.step(DT, InputIntent::default());
    assert_eq!(engine.scheduler().retreat_serial(), None);

    engine.scheduler_mut().wave_timer = WAVE_RETREAT_GRACE_SECS + 1.0;
    engine.step(DT, InputIntent::default());
    assert!(engine.scheduler().retreat_serial().is_some());

    engine.step(DT, InputIntent::default());
    assert_eq!(engine.view().enemies[0].state, AiState::Exiting);
}

#[test]
fn test_cargo_released_by_wave() {
    let stages = r#"[{ "name": "t", "scaling": 1.0, "waves": [
        { "duration_secs": 1000, "enemies": [
            { "definition_id": "drone", "count": 1, "interval_secs": 1, "delay_secs": 1000 }
        ], "cargo": [{ "kind": "rocket_ammo", "count": 2, "delay_secs": 0.5 }] }
    ] }]"#;
    let mut engine = engine_with(stages, SimConfig::default());
    engine.step(0.25, InputIntent::default());
    assert!(engine.view().powerups.is_empty());
    engine.step(0.25, InputIntent::default());
    let view = engine.view();
    assert_eq!(view.powerups.len(), 2);
    assert!(view.powerups.iter().all(|p| p.kind == PowerUpKind::RocketAmmo));
}

proptest! {
    #[test]
    fn prop_difficulty_non_decreasing_across_stages(
        scalings in prop::collection::vec(0.1f64..5.0, 1..8),
        wave in 0usize..10,
    ) {
        let stages: Vec<StageDefinition> = scalings
            .iter()
            .map(|&scaling| StageDefinition {
                name: String::new(),
                waves: Vec::new(),
                boss: None,
                scaling,
            })
            .collect();
        for stage in 1..stages.len() {
            prop_assert!(
                difficulty_factor(&stages, stage, wave) >= difficulty_factor(&stages, stage - 1, wave)
            );
        }
        for stage in 0..stages.len() {
            prop_assert!(
                difficulty_factor(&stages, stage, wave + 1) >= difficulty_factor(&stages, stage, wave)
            );
        }
    }

    #[test]
    fn prop_wave_never_advances_with_live_enemies(
        waves in prop::collection::vec(
            (0u32..4, prop::option::of(0.0f64..2.0), 0.0f64..3.0),
            1..4,
        ),
        kills in prop::collection::vec(any::<bool>(), 60),
    ) {
        let stage = StageDefinition {
            name: "p".into(),
            waves: waves
                .iter()
                .map(|&(count, interval_secs, duration_secs)| WaveDefinition {
                    enemies: vec![WaveEntry {
                        definition_id: "drone".into(),
                        count,
                        spawn_pattern: SpawnPattern::Line,
                        interval_secs,
                        delay_secs: 0.0,
                    }],
                    cargo: Vec::new(),
                    duration_secs,
                })
                .collect(),
            boss: None,
            scaling: 1.0,
        };
        let mut content = library(QUIET_STAGES);
        content.stages = vec![stage];
        let mut engine = SimulationEngine::new(SimConfig::default(), content);

        for kill in kills {
            if kill {
                if let Some(&victim) = enemy_entities(engine.world()).first() {
                    let _ = engine.world_mut().despawn(victim);
                }
            }
            engine.step(0.25, InputIntent::default());

            let serial = engine.scheduler().wave_serial;
            let stale = engine
                .world()
                .query::<(&Enemy, &Lifecycle)>()
                .iter()
                .any(|(_, (enemy, lifecycle))| {
                    enemy.wave_serial < serial && *lifecycle == Lifecycle::Active
                });
            prop_assert!(!stale, "advanced past a wave with active enemies");
        }
    }
}

// ---- Frame driver ----

#[test]
fn test_zero_dt_changes_nothing() {
    let mut engine = SimulationEngine::new(SimConfig::default(), default_content().unwrap());
    for _ in 0..120 {
        engine.step(
            DT,
            InputIntent {
                fire: true,
                ..Default::default()
            },
        );
    }
    let view = engine.view();
    let snapshot = engine.save_snapshot();

    for dt in [0.0, -1.0, f64::NAN] {
        let result = engine.step(dt, InputIntent::default());
        assert_eq!(result, FrameResult::default());
        assert_eq!(engine.view(), view);
        assert_eq!(engine.save_snapshot(), snapshot);
    }
}

#[test]
fn test_large_dt_is_capped() {
    let mut engine = engine_with(QUIET_STAGES, SimConfig::default());
    engine.step(10.0, InputIntent::default());
    assert!((engine.time().elapsed_secs - MAX_FRAME_DT).abs() < 1e-12);
}

#[test]
fn test_narrow_playfield_spawns_without_panicking() {
    let stages = r#"[{ "name": "narrow", "scaling": 1.0, "waves": [
        { "duration_secs": 30, "enemies": [
            { "definition_id": "drone", "count": 3, "spawn_pattern": "wedge",
              "interval_secs": 0.2, "delay_secs": 0 },
            { "definition_id": "flanker", "count": 2 }
        ] }
    ] }]"#;
    let config = SimConfig {
        playfield: Playfield::new(100.0, 400.0),
        ..SimConfig::default()
    };
    let mut engine = engine_with(stages, config);
    for _ in 0..120 {
        engine.step(DT, InputIntent::default());
    }
    assert!(count_enemies(&engine) > 0);

    let world = engine.world();
    let mut query = world.query::<&EnemyBrain>();
    for (_, brain) in query.iter() {
        assert_eq!(brain.anchor.x, SPAWN_SIDE_INSET);
    }
}

#[test]
fn test_flanker_in_narrow_playfield() {
    let config = SimConfig {
        playfield: Playfield::new(100.0, 400.0),
        ..SimConfig::default()
    };
    let mut engine = engine_with(QUIET_STAGES, config);
    let content = engine.content().clone();
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let flanker = spawn_in_combat(
        engine.world_mut(),
        &mut rng,
        &content,
        "flanker",
        Position::new(50.0, 100.0),
    );
    for _ in 0..60 {
        engine.step(DT, InputIntent::default());
    }
    if let Ok(position) = engine.world().get::<&Position>(flanker) {
        assert!(position.x.is_finite());
    };
}

#[test]
fn test_player_death_ends_run() {
    let mut engine = engine_with(QUIET_STAGES, SimConfig::default());
    {
        let player = engine.player_mut();
        player.health.shield.current = 0.0;
        player.health.armor.current = 0.0;
        player.health.hull.current = 1.0;
    }
    let position = engine.player().position;
    world_setup::spawn_enemy_shot(engine.world_mut(), position, Velocity::default(), 50.0);

    let result = engine.step(DT, InputIntent::default());
    assert!(result.run_ended);
    assert!(result.events.contains(&AudioCue::PlayerDestroyed));
    assert_eq!(engine.status(), RunStatus::Defeated);
    assert_eq!(engine.player().health.hull.current, 0.0);

    let after = engine.step(DT, InputIntent::default());
    assert!(after.run_ended);
    assert!(after.events.is_empty());
}

#[test]
fn test_pending_removal_purged_each_frame() {
    let mut engine = engine_with(QUIET_STAGES, SimConfig::default());
    engine.step(
        DT,
        InputIntent {
            fire: true,
            ..Default::default()
        },
    );
    assert_eq!(engine.world().query::<&PlayerShot>().iter().count(), 1);

    // Autocannon rounds expire after their lifetime.
    let steps = (PRIMARY_LIFETIME / DT).ceil() as usize + 1;
    for _ in 0..steps {
        engine.step(DT, InputIntent::default());
    }
    assert_eq!(engine.world().query::<&PlayerShot>().iter().count(), 0);
}

#[test]
fn test_autopilot_clears_first_wave() {
    let mut engine = SimulationEngine::new(SimConfig::default(), default_content().unwrap());
    engine.player_mut().health.hull = HealthLayer::full(1.0e9);
    let mut total_score = 0;
    let mut waves_seen = 0;
    for i in 0..(60 * 90) {
        let target_x = engine
            .view()
            .enemies
            .first()
            .map_or(300.0, |e| e.position.x);
        let intent = InputIntent {
            move_x: ((target_x - engine.player().position.x) / 50.0).clamp(-1.0, 1.0),
            fire: true,
            alt_fire: i % 30 == 0,
            ..Default::default()
        };
        let result = engine.step(DT, intent);
        total_score += result.score_delta;
        if result.wave_changed {
            waves_seen += 1;
        }
        if result.run_ended {
            break;
        }
    }
    assert!(total_score > 0);
    assert!(waves_seen >= 2, "scheduler progressed past the first wave");
    assert_eq!(engine.player().score, total_score);
}

// ---- Persistence ----

#[test]
fn test_snapshot_round_trip_through_apply() {
    let mut engine = engine_with(QUIET_STAGES, SimConfig::default());
    {
        let player = engine.player_mut();
        player.refugees = 200;
        player.score = 4321;
        player.health.hull.current = 55.0;
    }
    engine.purchase_upgrade(Upgrade::ExtraGun).unwrap();
    engine.purchase_upgrade(Upgrade::UnlockAmmo(AmmoType::Emp)).unwrap();
    let snapshot = engine.save_snapshot();

    let json = serde_json::to_string(&snapshot).unwrap();
    let restored_snapshot = serde_json::from_str(&json).unwrap();

    let mut other = engine_with(QUIET_STAGES, SimConfig::default());
    other.apply_snapshot(&restored_snapshot);
    assert_eq!(other.save_snapshot(), snapshot);
    assert_eq!(other.player().gun_count, 2);
    assert!(other.player().unlocked_ammo.contains(&AmmoType::Emp));
}

#[test]
fn test_apply_snapshot_clamps_and_restarts_scheduler() {
    let stages = r#"[
        { "name": "one", "scaling": 1.0, "waves": [{ "enemies": [{ "definition_id": "drone", "count": 1 }] }] },
        { "name": "two", "scaling": 1.0, "boss": "gunship", "waves": [{ "enemies": [{ "definition_id": "drone", "count": 1 }] }] }
    ]"#;
    let mut engine = engine_with(stages, SimConfig::default());
    for _ in 0..10 {
        engine.step(DT, InputIntent::default());
    }
    assert!(count_enemies(&engine) > 0);

    let mut snapshot = engine.save_snapshot();
    snapshot.stage_index = 1;
    snapshot.wave_index = 1;
    snapshot.selected_ammo = AmmoType::Fusion;
    snapshot.rockets = 99;
    snapshot.gun_count = 12;
    engine.apply_snapshot(&snapshot);

    assert_eq!(count_enemies(&engine), 0, "world cleared");
    assert_eq!(engine.player().ammo, AmmoType::Sabot);
    assert_eq!(engine.player().rockets, snapshot.max_rockets);
    assert_eq!(engine.player().gun_count, MAX_GUN_COUNT);

    // Wave 1 of stage 1 is past the last wave: the boss comes next.
    let result = engine.step(DT, InputIntent::default());
    assert!(result.events.contains(&AudioCue::BossWarning));
    assert_eq!(engine.scheduler().stage_index, 1);

    snapshot.stage_index = 40;
    engine.apply_snapshot(&snapshot);
    assert_eq!(engine.scheduler().stage_index, 1);
    assert_eq!(engine.scheduler().wave_index, 0);
}

// ---- Upgrades ----

#[test]
fn test_upgrade_costs_and_caps() {
    let mut engine = engine_with(QUIET_STAGES, SimConfig::default());
    assert_eq!(
        engine.purchase_upgrade(Upgrade::ExtraGun),
        Err(UpgradeError::InsufficientRefugees {
            cost: 60,
            available: 0
        })
    );

    engine.player_mut().refugees = 1000;
    assert_eq!(engine.purchase_upgrade(Upgrade::ExtraGun), Ok(60));
    assert_eq!(engine.purchase_upgrade(Upgrade::ExtraGun), Ok(120));
    assert_eq!(engine.purchase_upgrade(Upgrade::ExtraGun), Err(UpgradeError::MaxLevel));
    assert_eq!(engine.player().gun_count, MAX_GUN_COUNT);

    assert_eq!(engine.purchase_upgrade(Upgrade::ArmorPlating), Ok(25));
    assert_eq!(engine.purchase_upgrade(Upgrade::ArmorPlating), Ok(50));
    assert_eq!(engine.purchase_upgrade(Upgrade::ArmorPlating), Ok(75));
    assert_eq!(engine.purchase_upgrade(Upgrade::ArmorPlating), Err(UpgradeError::MaxLevel));
    assert_eq!(engine.player().health.armor.max, PLAYER_MAX_ARMOR + 60.0);

    assert_eq!(engine.purchase_upgrade(Upgrade::RocketRack), Ok(15));
    assert_eq!(engine.player().max_rockets, PLAYER_MAX_ROCKETS + 5);
    assert_eq!(engine.player().refugees, 1000 - 60 - 120 - 25 - 50 - 75 - 15);
}

#[test]
fn test_ammo_unlock_gates() {
    let mut engine = engine_with(QUIET_STAGES, SimConfig::default());
    engine.player_mut().refugees = 500;
    assert_eq!(
        engine.purchase_upgrade(Upgrade::UnlockAmmo(AmmoType::Sabot)),
        Err(UpgradeError::AlreadyOwned)
    );
    assert_eq!(
        engine.purchase_upgrade(Upgrade::UnlockAmmo(AmmoType::PhasedPlasma)),
        Err(UpgradeError::StageLocked {
            required: 1,
            current: 0
        })
    );
    assert_eq!(engine.purchase_upgrade(Upgrade::UnlockAmmo(AmmoType::Emp)), Ok(20));
    assert_eq!(
        engine.player().unlocked_ammo,
        vec![AmmoType::Sabot, AmmoType::Emp]
    );
}
