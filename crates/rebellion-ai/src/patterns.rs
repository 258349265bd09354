//! Movement pattern library.
//!
//! Each pattern is a pure function of (position, dt, pattern state, player
//! position) returning the new position and updated state. Screen space:
//! "forward" for enemies is +y (down the screen).

use std::f64::consts::TAU;

use glam::DVec2;

use rebellion_core::components::PatternState;
use rebellion_core::constants::*;
use rebellion_core::enums::MovementPattern;
use rebellion_core::types::{Playfield, Position, Velocity};

/// Result of advancing a pattern by one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternStep {
    pub position: Position,
    pub velocity: Velocity,
    pub state: PatternState,
    /// The pattern has run its course (swoop pulled out of its dive).
    pub finished: bool,
}

/// Build the initial pattern state when an enemy starts its combat run.
pub fn init_state(
    pattern: MovementPattern,
    position: Position,
    player: Position,
    side: f64,
) -> PatternState {
    match pattern {
        MovementPattern::Linear => PatternState::Linear,
        MovementPattern::Sine => PatternState::Sine {
            centre_x: position.x,
            phase: 0.0,
        },
        MovementPattern::Zigzag => PatternState::Zigzag {
            direction: side.signum(),
            timer: 0.0,
        },
        MovementPattern::Swoop => PatternState::Swoop {
            target: Position::new(player.x, player.y - SWOOP_TARGET_LEAD),
            elapsed: 0.0,
            finished: false,
        },
        MovementPattern::Flank => PatternState::Flank {
            side: side.signum(),
            switch_timer: FLANK_SWITCH_SECS,
        },
        MovementPattern::Orbit => {
            let offset = position.as_vec() - player.as_vec();
            PatternState::Orbit {
                angle: offset.y.atan2(offset.x).rem_euclid(TAU),
            }
        }
    }
}

/// Advance whichever pattern `state` belongs to.
pub fn advance(
    position: Position,
    dt: f64,
    state: PatternState,
    player: Position,
    speed: f64,
    playfield: &Playfield,
) -> PatternStep {
    let (new_position, new_state, finished) = match state {
        PatternState::Linear => (linear(position, Velocity::new(0.0, speed), dt), state, false),
        PatternState::Sine { centre_x, phase } => {
            let (pos, phase) = sine_wave(
                position,
                dt,
                centre_x,
                phase,
                speed,
                SINE_AMPLITUDE,
                SINE_FREQUENCY,
            );
            (pos, PatternState::Sine { centre_x, phase }, false)
        }
        PatternState::Zigzag { direction, timer } => {
            let (pos, direction, timer) = zigzag(
                position,
                dt,
                direction,
                timer,
                speed,
                ZIGZAG_INTERVAL_SECS,
                playfield,
            );
            (pos, PatternState::Zigzag { direction, timer }, false)
        }
        PatternState::Swoop {
            target,
            elapsed,
            finished,
        } => {
            let (pos, elapsed, finished) = swoop(position, dt, target, elapsed, finished, speed);
            (
                pos,
                PatternState::Swoop {
                    target,
                    elapsed,
                    finished,
                },
                finished,
            )
        }
        PatternState::Flank { side, switch_timer } => {
            let (pos, side, switch_timer) =
                flank(position, dt, side, switch_timer, player, speed, playfield);
            (pos, PatternState::Flank { side, switch_timer }, false)
        }
        PatternState::Orbit { angle } => {
            let (pos, angle) = orbit(
                position,
                dt,
                angle,
                player,
                ORBIT_RADIUS,
                ORBIT_ANGULAR_SPEED,
                ORBIT_RADIAL_GAIN,
            );
            (pos, PatternState::Orbit { angle }, false)
        }
    };

    PatternStep {
        position: new_position,
        velocity: velocity_between(position, new_position, dt),
        state: new_state,
        finished,
    }
}

/// Constant velocity, no player tracking.
pub fn linear(position: Position, velocity: Velocity, dt: f64) -> Position {
    let mut pos = position;
    pos.integrate(&velocity, dt);
    pos
}

/// Forward advance at `speed`; x follows `centre_x + amplitude * sin(phase)`.
/// Returns the new position and the phase wrapped into `[0, TAU)`.
pub fn sine_wave(
    position: Position,
    dt: f64,
    centre_x: f64,
    phase: f64,
    speed: f64,
    amplitude: f64,
    frequency: f64,
) -> (Position, f64) {
    let phase = (phase + frequency * dt).rem_euclid(TAU);
    let pos = Position::new(
        centre_x + amplitude * phase.sin(),
        position.y + speed * dt,
    );
    (pos, phase)
}

/// Forward advance with a lateral direction that flips every `interval`
/// seconds. Also flips when the side inset is reached.
pub fn zigzag(
    position: Position,
    dt: f64,
    direction: f64,
    timer: f64,
    speed: f64,
    interval: f64,
    playfield: &Playfield,
) -> (Position, f64, f64) {
    let mut direction = if direction == 0.0 { 1.0 } else { direction.signum() };
    let mut timer = timer + dt;
    if interval > 0.0 && timer >= interval {
        let flips = (timer / interval).floor();
        timer = timer.rem_euclid(interval);
        if flips % 2.0 == 1.0 {
            direction = -direction;
        }
    }

    let lateral = speed * ZIGZAG_LATERAL_FACTOR;
    let mut pos = Position::new(
        position.x + direction * lateral * dt,
        position.y + speed * dt,
    );

    if pos.x < SPAWN_SIDE_INSET && direction < 0.0 {
        pos.x = SPAWN_SIDE_INSET;
        direction = 1.0;
        timer = 0.0;
    } else if pos.x > playfield.width - SPAWN_SIDE_INSET && direction > 0.0 {
        pos.x = playfield.width - SPAWN_SIDE_INSET;
        direction = -1.0;
        timer = 0.0;
    }

    (pos, direction, timer)
}

/// Dive toward `target` at elevated speed. The dive ends when the target is
/// reached or passed, or after the dive timeout.
pub fn swoop(
    position: Position,
    dt: f64,
    target: Position,
    elapsed: f64,
    finished: bool,
    speed: f64,
) -> (Position, f64, bool) {
    if finished {
        return (position, elapsed, true);
    }

    let elapsed = elapsed + dt;
    let dive_speed = speed * SWOOP_SPEED_FACTOR;
    let to_target = target.as_vec() - position.as_vec();
    let distance = to_target.length();
    let step = dive_speed * dt;

    if distance <= step {
        return (target, elapsed, true);
    }

    let pos = Position::from(position.as_vec() + to_target / distance * step);
    let passed = pos.y >= target.y;
    let timed_out = elapsed >= SWOOP_DIVE_TIMEOUT_SECS;
    (pos, elapsed, passed || timed_out)
}

/// Steer laterally toward a point beside the player while advancing slowly.
/// The side is switched every `FLANK_SWITCH_SECS`.
pub fn flank(
    position: Position,
    dt: f64,
    side: f64,
    switch_timer: f64,
    player: Position,
    speed: f64,
    playfield: &Playfield,
) -> (Position, f64, f64) {
    let mut side = if side == 0.0 { 1.0 } else { side.signum() };
    let mut switch_timer = switch_timer - dt;
    if switch_timer <= 0.0 {
        let flips = (-switch_timer / FLANK_SWITCH_SECS).floor() + 1.0;
        if flips % 2.0 == 1.0 {
            side = -side;
        }
        switch_timer = switch_timer.rem_euclid(FLANK_SWITCH_SECS);
        if switch_timer == 0.0 {
            switch_timer = FLANK_SWITCH_SECS;
        }
    }

    let right = (playfield.width - SPAWN_SIDE_INSET).max(SPAWN_SIDE_INSET);
    let target_x = (player.x + side * FLANK_OFFSET).clamp(SPAWN_SIDE_INSET, right);
    let max_step = speed * FLANK_LATERAL_FACTOR * dt;
    let dx = (target_x - position.x).clamp(-max_step, max_step);

    let pos = Position::new(
        position.x + dx,
        position.y + speed * FLANK_FORWARD_FACTOR * dt,
    );
    (pos, side, switch_timer)
}

/// Circle the player at constant angular speed. The radial error is closed
/// proportionally (`gain` per second) rather than snapped.
pub fn orbit(
    position: Position,
    dt: f64,
    angle: f64,
    player: Position,
    radius: f64,
    angular_speed: f64,
    gain: f64,
) -> (Position, f64) {
    let angle = (angle + angular_speed * dt).rem_euclid(TAU);
    let current_radius = position.as_vec().distance(player.as_vec());
    let correction = (gain * dt).clamp(0.0, 1.0);
    let new_radius = current_radius + (radius - current_radius) * correction;
    let offset = DVec2::new(angle.cos(), angle.sin()) * new_radius;
    (Position::from(player.as_vec() + offset), angle)
}

/// Move straight toward `anchor` without overshooting. Returns the new
/// position and whether the anchor is within the arrival distance.
pub fn approach(position: Position, anchor: Position, speed: f64, dt: f64) -> (Position, bool) {
    let to_anchor = anchor.as_vec() - position.as_vec();
    let distance = to_anchor.length();
    let step = speed * dt;
    let pos = if distance <= step || distance == 0.0 {
        anchor
    } else {
        Position::from(position.as_vec() + to_anchor / distance * step)
    };
    let arrived = pos.distance_to(&anchor) <= ENTER_ARRIVAL_DISTANCE;
    (pos, arrived)
}

/// Velocity carrying an entity straight away from the playfield centre.
pub fn exit_velocity(position: Position, playfield: &Playfield, speed: f64) -> Velocity {
    let away = position.as_vec() - playfield.centre().as_vec();
    let direction = away.try_normalize().unwrap_or(DVec2::NEG_Y);
    Velocity::from(direction * speed)
}

/// Keep a position inside the playfield grown by `margin`.
pub fn clamp_to_playfield(position: Position, playfield: &Playfield, margin: f64) -> Position {
    playfield.clamp(position, margin)
}

fn velocity_between(from: Position, to: Position, dt: f64) -> Velocity {
    if dt > 0.0 {
        Velocity::from((to.as_vec() - from.as_vec()) / dt)
    } else {
        Velocity::default()
    }
}
