//! Enemy behaviour finite state machine.
//!
//! Pure functions that compute state transitions and movement for enemy
//! entities: Spawned -> Entering -> Combat -> Exiting -> Despawned. States
//! only ever move forward. No ECS dependency; operates on plain data.

use rebellion_core::components::PatternState;
use rebellion_core::constants::*;
use rebellion_core::enums::{AiState, CombatStance, MovementPattern};
use rebellion_core::types::{Playfield, Position, Velocity};

use crate::patterns::{advance, approach, exit_velocity, init_state};
use crate::profiles::{boss_phase_behavior, boss_phase_for, get_profile};

/// Input to the enemy FSM for a single entity.
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext {
    pub state: AiState,
    pub stance: CombatStance,
    pub pattern: MovementPattern,
    pub pattern_state: PatternState,
    pub state_elapsed: f64,
    pub position: Position,
    pub anchor: Position,
    pub speed: f64,
    /// Remaining health fraction across all layers.
    pub health_fraction: f64,
    pub evades_when_damaged: bool,
    /// Current phase for bosses, None for regular enemies.
    pub boss_phase: Option<u8>,
    pub flank_side: f64,
    pub player: Position,
    pub playfield: Playfield,
    /// The scheduler has ordered survivors off the field.
    pub retreat: bool,
    pub dt: f64,
}

/// Output from the enemy FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyUpdate {
    pub state: AiState,
    pub stance: CombatStance,
    pub pattern: MovementPattern,
    pub pattern_state: PatternState,
    pub state_elapsed: f64,
    pub position: Position,
    pub velocity: Velocity,
    pub boss_phase: Option<u8>,
    pub state_changed: bool,
}

impl EnemyUpdate {
    fn hold(ctx: &EnemyContext) -> Self {
        Self {
            state: ctx.state,
            stance: ctx.stance,
            pattern: ctx.pattern,
            pattern_state: ctx.pattern_state,
            state_elapsed: ctx.state_elapsed + ctx.dt,
            position: ctx.position,
            velocity: Velocity::default(),
            boss_phase: ctx.boss_phase,
            state_changed: false,
        }
    }

    /// Whether the weapon may be considered this tick.
    pub fn can_fire(&self) -> bool {
        self.state == AiState::Combat
    }
}

/// Evaluate the FSM for one enemy. Returns the updated state and movement.
pub fn evaluate(ctx: &EnemyContext) -> EnemyUpdate {
    match ctx.state {
        AiState::Spawned => {
            // Entering begins on the spawn tick.
            let entering = EnemyContext {
                state: AiState::Entering,
                state_elapsed: 0.0,
                ..*ctx
            };
            let mut update = evaluate_entering(&entering);
            update.state_changed = true;
            update
        }
        AiState::Entering => evaluate_entering(ctx),
        AiState::Combat => evaluate_combat(ctx),
        AiState::Exiting => evaluate_exiting(ctx),
        AiState::Despawned => EnemyUpdate::hold(ctx),
    }
}

fn evaluate_entering(ctx: &EnemyContext) -> EnemyUpdate {
    if ctx.retreat && ctx.boss_phase.is_none() {
        return begin_exit(ctx);
    }

    let (moved, arrived) = approach(ctx.position, ctx.anchor, ctx.speed, ctx.dt);
    let position = ctx.playfield.clamp(moved, ENTER_CLAMP_MARGIN);
    let elapsed = ctx.state_elapsed + ctx.dt;

    if arrived || elapsed >= ENTER_TIMEOUT_SECS {
        let profile = get_profile(ctx.pattern);
        return EnemyUpdate {
            state: AiState::Combat,
            stance: profile.stance,
            pattern: ctx.pattern,
            pattern_state: init_state(ctx.pattern, position, ctx.player, ctx.flank_side),
            state_elapsed: 0.0,
            position,
            velocity: velocity_between(ctx.position, position, ctx.dt),
            boss_phase: ctx.boss_phase,
            state_changed: true,
        };
    }

    EnemyUpdate {
        position,
        velocity: velocity_between(ctx.position, position, ctx.dt),
        state_elapsed: elapsed,
        ..EnemyUpdate::hold(ctx)
    }
}

fn evaluate_combat(ctx: &EnemyContext) -> EnemyUpdate {
    let is_boss = ctx.boss_phase.is_some();
    if ctx.retreat && !is_boss {
        return begin_exit(ctx);
    }

    let mut stance = ctx.stance;
    let mut pattern = ctx.pattern;
    let mut pattern_state = ctx.pattern_state;
    let mut boss_phase = ctx.boss_phase;

    if let Some(current) = ctx.boss_phase {
        let next = boss_phase_for(ctx.health_fraction, current);
        if next > current {
            let (new_pattern, new_stance) = boss_phase_behavior(next, ctx.pattern);
            pattern = new_pattern;
            stance = new_stance;
            pattern_state = init_state(pattern, ctx.position, ctx.player, ctx.flank_side);
            boss_phase = Some(next);
        }
    } else if ctx.evades_when_damaged
        && stance != CombatStance::Evade
        && ctx.health_fraction < EVADE_HEALTH_FRACTION
        && matches!(pattern, MovementPattern::Linear | MovementPattern::Sine)
    {
        pattern = MovementPattern::Zigzag;
        stance = CombatStance::Evade;
        pattern_state = init_state(pattern, ctx.position, ctx.player, ctx.flank_side);
    }

    let step = advance(
        ctx.position,
        ctx.dt,
        pattern_state,
        ctx.player,
        ctx.speed,
        &ctx.playfield,
    );
    let mut position = step.position;
    let mut pattern_state = step.state;

    if is_boss {
        position = ctx.playfield.clamp(position, 0.0);
        if step.finished {
            // Bosses keep diving.
            pattern_state = init_state(pattern, position, ctx.player, ctx.flank_side);
        }
    } else if pattern == MovementPattern::Orbit {
        position = ctx.playfield.clamp(position, 0.0);
    }

    let update = EnemyUpdate {
        state: AiState::Combat,
        stance,
        pattern,
        pattern_state,
        state_elapsed: ctx.state_elapsed + ctx.dt,
        position,
        velocity: velocity_between(ctx.position, position, ctx.dt),
        boss_phase,
        state_changed: false,
    };

    if !is_boss && (step.finished || left_playfield(&position, &ctx.playfield)) {
        return EnemyUpdate {
            state: AiState::Exiting,
            state_elapsed: 0.0,
            state_changed: true,
            ..update
        };
    }

    update
}

fn evaluate_exiting(ctx: &EnemyContext) -> EnemyUpdate {
    let velocity = exit_velocity(ctx.position, &ctx.playfield, ctx.speed.max(1.0));
    let mut position = ctx.position;
    position.integrate(&velocity, ctx.dt);

    let update = EnemyUpdate {
        position,
        velocity,
        ..EnemyUpdate::hold(ctx)
    };

    if !ctx.playfield.contains(&position, DESPAWN_MARGIN) {
        return EnemyUpdate {
            state: AiState::Despawned,
            state_elapsed: 0.0,
            state_changed: true,
            ..update
        };
    }

    update
}

fn begin_exit(ctx: &EnemyContext) -> EnemyUpdate {
    let exiting = EnemyContext {
        state: AiState::Exiting,
        state_elapsed: 0.0,
        ..*ctx
    };
    let mut update = evaluate_exiting(&exiting);
    update.state_changed = true;
    update
}

/// Past the bottom edge or either side. Leaving over the top is how
/// entering enemies arrive, so it does not count.
fn left_playfield(position: &Position, playfield: &Playfield) -> bool {
    position.y > playfield.height || position.x < 0.0 || position.x > playfield.width
}

fn velocity_between(from: Position, to: Position, dt: f64) -> Velocity {
    if dt > 0.0 {
        Velocity::new((to.x - from.x) / dt, (to.y - from.y) / dt)
    } else {
        Velocity::default()
    }
}
