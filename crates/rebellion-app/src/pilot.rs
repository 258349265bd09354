//! Scripted pilots that fly the ship from the render view.

use clap::ValueEnum;

use rebellion_core::enums::AiState;
use rebellion_core::input::InputIntent;
use rebellion_core::state::WorldView;

/// Incoming shots closer than this (vertically) are dodged.
const DODGE_LOOKAHEAD: f64 = 140.0;
/// Half-width of the lane a shot must be in to count as incoming.
const DODGE_HALF_WIDTH: f64 = 26.0;
/// No steering when the target is this close horizontally.
const TRACK_DEADZONE: f64 = 6.0;
/// Frames between rocket launches at a boss.
const ROCKET_PERIOD: u64 = 30;

pub trait Pilot {
    fn id(&self) -> &'static str;

    /// Input for the next frame, given the view after the previous one.
    fn next_intent(&mut self, view: &WorldView) -> InputIntent;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PilotKind {
    /// Track and shoot the nearest enemy, dodge incoming fire.
    Auto,
    /// Never touch the controls.
    Passive,
}

pub fn create_pilot(kind: PilotKind) -> Box<dyn Pilot + Send> {
    match kind {
        PilotKind::Auto => Box::new(Autopilot::default()),
        PilotKind::Passive => Box::new(Passive),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Passive;

impl Pilot for Passive {
    fn id(&self) -> &'static str {
        "passive"
    }

    fn next_intent(&mut self, _view: &WorldView) -> InputIntent {
        InputIntent::default()
    }
}

/// Lines up under the lowest enemy on the field and fires continuously.
/// Sidesteps any enemy shot about to land. Rockets are saved for bosses.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    frame: u64,
}

impl Pilot for Autopilot {
    fn id(&self) -> &'static str {
        "auto"
    }

    fn next_intent(&mut self, view: &WorldView) -> InputIntent {
        self.frame += 1;
        let player = view.player.position;

        let incoming = view
            .enemy_projectiles
            .iter()
            .filter(|shot| {
                let gap = player.y - shot.position.y;
                shot.velocity.y > 0.0
                    && gap > 0.0
                    && gap < DODGE_LOOKAHEAD
                    && (shot.position.x - player.x).abs() < DODGE_HALF_WIDTH
            })
            .min_by(|a, b| b.position.y.total_cmp(&a.position.y));

        let targets = view
            .enemies
            .iter()
            .filter(|enemy| matches!(enemy.state, AiState::Entering | AiState::Combat));
        let target = targets.max_by(|a, b| a.position.y.total_cmp(&b.position.y));

        let move_x = match (incoming, target) {
            (Some(shot), _) => {
                if shot.position.x >= player.x {
                    -1.0
                } else {
                    1.0
                }
            }
            (None, Some(enemy)) => {
                let dx = enemy.position.x - player.x;
                if dx.abs() < TRACK_DEADZONE {
                    0.0
                } else {
                    dx.signum()
                }
            }
            (None, None) => 0.0,
        };

        InputIntent {
            move_x,
            move_y: 0.0,
            fire: target.is_some(),
            alt_fire: view.boss_active && self.frame % ROCKET_PERIOD == 0,
            cycle_ammo: false,
        }
    }
}
