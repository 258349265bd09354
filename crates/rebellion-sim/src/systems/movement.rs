//! Kinematic integration for projectiles and pickups.
//!
//! Updates Position from Velocity: position += velocity * dt, counts down
//! lifetimes, and marks anything expired or out of bounds for removal.
//! Enemies are moved by the AI system instead.

use hecs::World;

use rebellion_core::components::{PowerUp, Projectile};
use rebellion_core::constants::PROJECTILE_BOUNDS_MARGIN;
use rebellion_core::enums::Lifecycle;
use rebellion_core::types::{Playfield, Position, Velocity};

/// Run integration and expiry for all projectiles and pickups.
pub fn run(world: &mut World, dt: f64, playfield: &Playfield) {
    for (_entity, (pos, vel, projectile, lifecycle)) in
        world.query_mut::<(&mut Position, &Velocity, &mut Projectile, &mut Lifecycle)>()
    {
        if *lifecycle != Lifecycle::Active {
            continue;
        }
        pos.integrate(vel, dt);
        projectile.remaining_secs = (projectile.remaining_secs - dt).max(0.0);
        if projectile.remaining_secs <= 0.0 || !playfield.contains(pos, PROJECTILE_BOUNDS_MARGIN)
        {
            *lifecycle = Lifecycle::PendingRemoval;
        }
    }

    for (_entity, (pos, vel, powerup, lifecycle)) in
        world.query_mut::<(&mut Position, &Velocity, &mut PowerUp, &mut Lifecycle)>()
    {
        if *lifecycle != Lifecycle::Active {
            continue;
        }
        pos.integrate(vel, dt);
        powerup.remaining_secs = (powerup.remaining_secs - dt).max(0.0);
        if powerup.remaining_secs <= 0.0 || !playfield.contains(pos, PROJECTILE_BOUNDS_MARGIN) {
            *lifecycle = Lifecycle::PendingRemoval;
        }
    }
}
