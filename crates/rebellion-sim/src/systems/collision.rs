//! Collision and damage resolution.
//!
//! Three passes in fixed order, all axis-aligned bounding-box tests:
//! player shots against enemies, enemy shots against the player, and the
//! player against pickups. A projectile resolves against at most one target.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use rebellion_core::components::*;
use rebellion_core::content::ContentLibrary;
use rebellion_core::enums::{AiState, Lifecycle};
use rebellion_core::events::AudioCue;
use rebellion_core::types::{Aabb, Hitbox, Position};

use crate::systems::damage::{apply_layered, effectiveness, Multipliers};
use crate::systems::drops::{apply_pickup, roll_drop};
use crate::world_setup;

/// What collision resolution changed this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionOutcome {
    pub score_delta: u64,
    pub player_destroyed: bool,
}

/// Run all three collision passes.
pub fn run(
    world: &mut World,
    player: &mut PlayerShip,
    content: &ContentLibrary,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<AudioCue>,
) -> CollisionOutcome {
    let score_delta = player_shots_vs_enemies(world, content, rng, events);
    player.score = player.score.saturating_add(score_delta);

    let player_destroyed = enemy_shots_vs_player(world, player, events);
    if !player_destroyed {
        player_vs_powerups(world, player, events);
    }

    CollisionOutcome {
        score_delta,
        player_destroyed,
    }
}

fn player_shots_vs_enemies(
    world: &mut World,
    content: &ContentLibrary,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<AudioCue>,
) -> u64 {
    let shots = collect_active::<PlayerShot>(world);
    let targets = collect_active::<Enemy>(world);
    let mut score_delta = 0;

    for (shot, shot_box) in shots {
        let Some(projectile) = world.get::<&Projectile>(shot).ok().map(|p| *p) else {
            continue;
        };

        for &(target, target_box) in &targets {
            if !is_active(world, target) || !shot_box.overlaps(&target_box) {
                continue;
            }

            mark_pending(world, shot);
            let destroyed = match world.get::<&mut Health>(target) {
                Ok(mut health) => {
                    apply_layered(&mut health, projectile.damage, effectiveness(projectile.damage_type));
                    health.is_destroyed()
                }
                Err(_) => false,
            };

            if destroyed {
                score_delta += destroy_enemy(world, target, content, rng, events);
            } else {
                events.push(AudioCue::EnemyHit);
            }
            break;
        }
    }

    score_delta
}

/// Mark a dead enemy for removal, roll its drop table, and return its score.
fn destroy_enemy(
    world: &mut World,
    target: Entity,
    content: &ContentLibrary,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<AudioCue>,
) -> u64 {
    mark_pending(world, target);
    if let Ok(mut brain) = world.get::<&mut EnemyBrain>(target) {
        brain.state = AiState::Despawned;
    }

    let is_boss = world.get::<&Boss>(target).is_ok();
    let position = world
        .get::<&Position>(target)
        .map(|p| *p)
        .unwrap_or_default();
    let (score, drop) = match world.get::<&Enemy>(target) {
        Ok(enemy) => {
            log::debug!("enemy {} destroyed (+{})", enemy.definition_id, enemy.score_value);
            (enemy.score_value, roll_drop(rng, &enemy.drop_table))
        }
        Err(_) => (0, None),
    };

    events.push(AudioCue::EnemyDestroyed { boss: is_boss });

    if let Some(def) = drop.and_then(|kind| content.powerup(kind)) {
        world_setup::spawn_powerup(world, def, position);
    }

    score
}

/// Returns true if the player was destroyed.
fn enemy_shots_vs_player(
    world: &mut World,
    player: &mut PlayerShip,
    events: &mut Vec<AudioCue>,
) -> bool {
    let player_box = player.hitbox.at(&player.position);
    let shots = collect_active::<EnemyShot>(world);

    for (shot, shot_box) in shots {
        if !shot_box.overlaps(&player_box) {
            continue;
        }
        let Some(projectile) = world.get::<&Projectile>(shot).ok().map(|p| *p) else {
            continue;
        };
        mark_pending(world, shot);

        let report = apply_layered(&mut player.health, projectile.damage, Multipliers::NEUTRAL);
        if let Some(layer) = report.deepest_layer() {
            events.push(AudioCue::PlayerHit { layer });
        }

        if player.health.is_destroyed() {
            log::info!("player destroyed, final score {}", player.score);
            events.push(AudioCue::PlayerDestroyed);
            return true;
        }
    }

    false
}

fn player_vs_powerups(world: &mut World, player: &mut PlayerShip, events: &mut Vec<AudioCue>) {
    let player_box = player.hitbox.at(&player.position);
    let mut collected = Vec::new();

    for (entity, (powerup, pos, hitbox, lifecycle)) in
        world.query_mut::<(&PowerUp, &Position, &Hitbox, &mut Lifecycle)>()
    {
        if *lifecycle == Lifecycle::Active && hitbox.at(pos).overlaps(&player_box) {
            *lifecycle = Lifecycle::PendingRemoval;
            collected.push((entity, *powerup));
        }
    }

    for (_entity, powerup) in collected {
        apply_pickup(player, &powerup);
        events.push(AudioCue::PowerUpCollected { kind: powerup.kind });
    }
}

/// Active entities carrying marker `T`, with their boxes, in query order.
fn collect_active<T: hecs::Component>(world: &World) -> Vec<(Entity, Aabb)> {
    world
        .query::<(&T, &Position, &Hitbox, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, _, _, lifecycle))| **lifecycle == Lifecycle::Active)
        .map(|(entity, (_, pos, hitbox, _))| (entity, hitbox.at(pos)))
        .collect()
}

fn is_active(world: &World, entity: Entity) -> bool {
    world
        .get::<&Lifecycle>(entity)
        .map(|lifecycle| *lifecycle == Lifecycle::Active)
        .unwrap_or(false)
}

fn mark_pending(world: &mut World, entity: Entity) {
    if let Ok(mut lifecycle) = world.get::<&mut Lifecycle>(entity) {
        *lifecycle = Lifecycle::PendingRemoval;
    }
}
