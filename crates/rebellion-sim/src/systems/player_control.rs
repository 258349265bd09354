//! Player control system: applies the frame's input intent to the ship.
//!
//! Handles ammo cycling, movement, cooldown timers, the autocannon volley
//! (spread when extra guns are fitted) and rocket launches.

use glam::DVec2;
use hecs::World;

use rebellion_core::components::{PlayerShip, Projectile};
use rebellion_core::constants::*;
use rebellion_core::enums::DamageType;
use rebellion_core::events::AudioCue;
use rebellion_core::input::InputIntent;
use rebellion_core::types::{Hitbox, Playfield, Position, Velocity};

use crate::world_setup;

/// Run player control for one frame. `intent` must already be clamped.
pub fn run(
    world: &mut World,
    player: &mut PlayerShip,
    intent: &InputIntent,
    dt: f64,
    playfield: &Playfield,
    events: &mut Vec<AudioCue>,
) {
    if intent.cycle_ammo {
        cycle_ammo(player, events);
    }

    move_ship(player, intent, dt, playfield);

    player.overdrive_secs = (player.overdrive_secs - dt).max(0.0);
    player.primary_cooldown = (player.primary_cooldown - dt).max(0.0);
    player.secondary_cooldown = (player.secondary_cooldown - dt).max(0.0);

    if intent.fire && player.primary_cooldown <= 0.0 {
        fire_volley(world, player);
        player.primary_cooldown = PRIMARY_FIRE_INTERVAL;
        events.push(AudioCue::PlayerFire { ammo: player.ammo });
    }

    if intent.alt_fire && player.secondary_cooldown <= 0.0 && player.rockets > 0 {
        launch_rocket(world, player);
        player.rockets -= 1;
        player.secondary_cooldown = ROCKET_FIRE_INTERVAL;
        events.push(AudioCue::RocketLaunch);
    }
}

/// Switch to the next unlocked ammo type.
pub fn cycle_ammo(player: &mut PlayerShip, events: &mut Vec<AudioCue>) {
    if player.unlocked_ammo.len() < 2 {
        return;
    }
    let current = player
        .unlocked_ammo
        .iter()
        .position(|&ammo| ammo == player.ammo)
        .unwrap_or(0);
    let next = (current + 1) % player.unlocked_ammo.len();
    player.ammo = player.unlocked_ammo[next];
    events.push(AudioCue::AmmoCycled { ammo: player.ammo });
}

fn move_ship(player: &mut PlayerShip, intent: &InputIntent, dt: f64, playfield: &Playfield) {
    let speed = if player.overdrive_secs > 0.0 {
        player.base_speed * OVERDRIVE_SPEED_FACTOR
    } else {
        player.base_speed
    };

    let mut direction = DVec2::new(intent.move_x, intent.move_y);
    if direction.length_squared() > 1.0 {
        direction = direction.normalize();
    }
    player.velocity = Velocity::from(direction * speed);
    player.position.integrate(&player.velocity, dt);

    let half_w = player.hitbox.width * 0.5;
    let half_h = player.hitbox.height * 0.5;
    player.position.x = player.position.x.clamp(half_w, (playfield.width - half_w).max(half_w));
    player.position.y = player.position.y.clamp(half_h, (playfield.height - half_h).max(half_h));
}

fn fire_volley(world: &mut World, player: &PlayerShip) {
    let muzzle = Position::new(player.position.x, player.position.y - player.hitbox.height * 0.5);
    let guns = player.gun_count.max(1);
    let centre = (guns - 1) as f64 * 0.5;

    for gun in 0..guns {
        let angle = (gun as f64 - centre) * GUN_SPREAD_ANGLE;
        // Straight up is -y.
        let velocity = Velocity::new(angle.sin() * PRIMARY_SPEED, -angle.cos() * PRIMARY_SPEED);
        world_setup::spawn_player_shot(
            world,
            muzzle,
            velocity,
            Projectile {
                damage: PRIMARY_DAMAGE,
                damage_type: DamageType::Ammo(player.ammo),
                remaining_secs: PRIMARY_LIFETIME,
            },
            Hitbox::new(PRIMARY_WIDTH, PRIMARY_HEIGHT),
        );
    }
}

fn launch_rocket(world: &mut World, player: &PlayerShip) {
    let muzzle = Position::new(player.position.x, player.position.y - player.hitbox.height * 0.5);
    world_setup::spawn_player_shot(
        world,
        muzzle,
        Velocity::new(0.0, -ROCKET_SPEED),
        Projectile {
            damage: ROCKET_DAMAGE,
            damage_type: DamageType::Rocket,
            remaining_secs: ROCKET_LIFETIME,
        },
        Hitbox::new(ROCKET_WIDTH, ROCKET_HEIGHT),
    );
}
