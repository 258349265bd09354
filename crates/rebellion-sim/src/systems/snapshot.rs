//! Snapshot system: queries the ECS world and builds a `WorldView`.
//!
//! This system is read-only; it never modifies the world. Entities pending
//! removal are left out. Each list is ordered by entity id.

use hecs::{Entity, World};

use rebellion_core::components::*;
use rebellion_core::enums::{Lifecycle, RunStatus};
use rebellion_core::state::*;
use rebellion_core::types::{Hitbox, Position, SimTime, Velocity};

use crate::systems::wave_scheduler::WaveScheduler;

/// Build a complete render view from the current state.
pub fn build_view(
    world: &World,
    player: &PlayerShip,
    time: &SimTime,
    status: RunStatus,
    scheduler: &WaveScheduler,
) -> WorldView {
    WorldView {
        time: *time,
        status,
        stage_index: scheduler.stage_index,
        wave_index: scheduler.wave_index,
        boss_active: scheduler.boss_active(),
        player: build_player(player),
        enemies: build_enemies(world),
        player_projectiles: build_projectiles::<PlayerShot>(world),
        enemy_projectiles: build_projectiles::<EnemyShot>(world),
        powerups: build_powerups(world),
    }
}

fn build_player(player: &PlayerShip) -> PlayerView {
    PlayerView {
        position: player.position,
        hitbox: player.hitbox,
        health: player.health,
        rockets: player.rockets,
        ammo: player.ammo,
        score: player.score,
        refugees: player.refugees,
        overdrive: player.overdrive_secs > 0.0,
    }
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<(Entity, EnemyView)> = world
        .query::<(
            &Enemy,
            &EnemyBrain,
            &Position,
            &Hitbox,
            &Health,
            &Lifecycle,
            Option<&Boss>,
        )>()
        .iter()
        .filter(|(_, (_, _, _, _, _, lifecycle, _))| **lifecycle == Lifecycle::Active)
        .map(|(entity, (enemy, brain, pos, hitbox, health, _, boss))| {
            (
                entity,
                EnemyView {
                    definition_id: enemy.definition_id.clone(),
                    position: *pos,
                    hitbox: *hitbox,
                    health: *health,
                    state: brain.state,
                    stance: brain.stance,
                    pattern: brain.pattern,
                    boss_phase: boss.map(|b| b.phase),
                },
            )
        })
        .collect();

    enemies.sort_by_key(|(entity, _)| entity.id());
    enemies.into_iter().map(|(_, view)| view).collect()
}

fn build_projectiles<T: hecs::Component>(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<(Entity, ProjectileView)> = world
        .query::<(&T, &Projectile, &Position, &Velocity, &Hitbox, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, _, _, _, _, lifecycle))| **lifecycle == Lifecycle::Active)
        .map(|(entity, (_, projectile, pos, vel, hitbox, _))| {
            (
                entity,
                ProjectileView {
                    position: *pos,
                    velocity: *vel,
                    hitbox: *hitbox,
                    damage_type: projectile.damage_type,
                },
            )
        })
        .collect();

    projectiles.sort_by_key(|(entity, _)| entity.id());
    projectiles.into_iter().map(|(_, view)| view).collect()
}

fn build_powerups(world: &World) -> Vec<PowerUpView> {
    let mut powerups: Vec<(Entity, PowerUpView)> = world
        .query::<(&PowerUp, &Position, &Hitbox, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, _, _, lifecycle))| **lifecycle == Lifecycle::Active)
        .map(|(entity, (powerup, pos, hitbox, _))| {
            (
                entity,
                PowerUpView {
                    position: *pos,
                    hitbox: *hitbox,
                    kind: powerup.kind,
                    remaining_secs: powerup.remaining_secs,
                },
            )
        })
        .collect();

    powerups.sort_by_key(|(entity, _)| entity.id());
    powerups.into_iter().map(|(_, view)| view).collect()
}
