//! Pattern-specific firing envelopes and boss phase profiles.
//!
//! Consolidates the per-pattern parameters the enemy FSM and the weapon
//! system consult.

use rand::Rng;

use rebellion_core::constants::*;
use rebellion_core::enums::{CombatStance, MovementPattern};
use rebellion_core::types::Position;

/// Firing and stance profile for a movement pattern.
pub struct PatternProfile {
    /// Maximum distance to the player at which the enemy will fire (px).
    pub firing_range: f64,
    /// Forward half-angle the player must be inside, None for omnidirectional.
    pub forward_half_angle: Option<f64>,
    /// Stance taken when the combat run starts.
    pub stance: CombatStance,
}

/// Get the profile for a given movement pattern.
pub fn get_profile(pattern: MovementPattern) -> PatternProfile {
    match pattern {
        MovementPattern::Linear | MovementPattern::Sine | MovementPattern::Zigzag => {
            PatternProfile {
                firing_range: DEFAULT_FIRING_RANGE,
                forward_half_angle: None,
                stance: CombatStance::Attack,
            }
        }
        MovementPattern::Swoop => PatternProfile {
            firing_range: DEFAULT_FIRING_RANGE * 0.6,
            forward_half_angle: None,
            stance: CombatStance::Attack,
        },
        MovementPattern::Flank => PatternProfile {
            firing_range: DEFAULT_FIRING_RANGE,
            forward_half_angle: Some(FLANK_FIRING_HALF_ANGLE),
            stance: CombatStance::Flank,
        },
        MovementPattern::Orbit => PatternProfile {
            firing_range: ORBIT_RADIUS * 1.5,
            forward_half_angle: None,
            stance: CombatStance::Attack,
        },
    }
}

/// Whether the player sits inside the pattern's firing envelope.
pub fn in_envelope(profile: &PatternProfile, enemy: Position, player: Position) -> bool {
    let to_player = player.as_vec() - enemy.as_vec();
    let distance = to_player.length();
    if distance > profile.firing_range {
        return false;
    }
    match profile.forward_half_angle {
        None => true,
        Some(_) if distance == 0.0 => true,
        // Forward is +y.
        Some(half_angle) => (to_player.y / distance).clamp(-1.0, 1.0).acos() <= half_angle,
    }
}

/// Fire when the cooldown has elapsed and the player is in the envelope.
pub fn should_fire(cooldown: f64, in_envelope: bool) -> bool {
    cooldown <= 0.0 && in_envelope
}

/// Base interval with ±`FIRE_JITTER_FRACTION` uniform jitter.
pub fn jittered_interval<R: Rng>(rng: &mut R, base: f64) -> f64 {
    if base <= 0.0 {
        return 0.0;
    }
    let jitter = rng.gen_range(-FIRE_JITTER_FRACTION..=FIRE_JITTER_FRACTION);
    base * (1.0 + jitter)
}

/// Boss phase for a health fraction. Never lower than `current`.
pub fn boss_phase_for(health_fraction: f64, current: u8) -> u8 {
    let reached = BOSS_PHASE_THRESHOLDS
        .iter()
        .filter(|&&threshold| health_fraction <= threshold)
        .count() as u8;
    reached.max(current)
}

/// Movement pattern and stance a boss adopts on entering `phase`.
/// Phase 0 keeps the definition pattern.
pub fn boss_phase_behavior(phase: u8, base: MovementPattern) -> (MovementPattern, CombatStance) {
    match phase {
        0 => (base, get_profile(base).stance),
        1 => (MovementPattern::Sine, CombatStance::Attack),
        _ => (MovementPattern::Zigzag, CombatStance::Evade),
    }
}

/// Fire-interval multiplier for a boss phase.
pub fn boss_fire_factor(phase: u8) -> f64 {
    let index = (phase as usize).min(BOSS_PHASE_FIRE_FACTOR.len() - 1);
    BOSS_PHASE_FIRE_FACTOR[index]
}
