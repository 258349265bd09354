//! Normalized per-frame input supplied by the input layer.

use serde::{Deserialize, Serialize};

/// What the player wants to do this frame. Raw devices never reach the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputIntent {
    /// Horizontal movement, -1.0 (left) to 1.0 (right).
    pub move_x: f64,
    /// Vertical movement, -1.0 (up) to 1.0 (down).
    pub move_y: f64,
    /// Fire autocannons.
    pub fire: bool,
    /// Launch a rocket.
    pub alt_fire: bool,
    /// Switch to the next unlocked ammo type.
    pub cycle_ammo: bool,
}

impl InputIntent {
    /// Movement axes clamped into `[-1, 1]`; non-finite values read as 0.
    pub fn clamped(&self) -> Self {
        let axis = |v: f64| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Self {
            move_x: axis(self.move_x),
            move_y: axis(self.move_y),
            ..*self
        }
    }

    pub fn is_idle(&self) -> bool {
        self.move_x == 0.0
            && self.move_y == 0.0
            && !self.fire
            && !self.alt_fire
            && !self.cycle_ammo
    }
}
