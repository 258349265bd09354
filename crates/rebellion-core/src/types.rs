//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

/// 2D position in screen space (pixels). x = right, y = down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in screen space (px/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Collision extents, centred on the owning entity's position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

/// The visible play area. Origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f64,
    pub height: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of non-empty steps taken.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_vec().distance(other.as_vec())
    }

    /// Advance by `vel * dt`.
    pub fn integrate(&mut self, vel: &Velocity, dt: f64) {
        self.x += vel.x * dt;
        self.y += vel.y * dt;
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn speed(&self) -> f64 {
        self.as_vec().length()
    }
}

impl From<DVec2> for Velocity {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl Hitbox {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// World-space box for an entity at `pos`.
    pub fn at(&self, pos: &Position) -> Aabb {
        let half = DVec2::new(self.width * 0.5, self.height * 0.5);
        let centre = pos.as_vec();
        Aabb {
            min: centre - half,
            max: centre + half,
        }
    }
}

impl Aabb {
    /// Rectangle overlap. Touching edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn centre(&self) -> Position {
        Position::new(self.width * 0.5, self.height * 0.5)
    }

    /// True if `pos` lies inside the playfield grown by `margin` on every side.
    pub fn contains(&self, pos: &Position, margin: f64) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }

    /// Clamp `pos` into the playfield grown by `margin` on every side.
    pub fn clamp(&self, pos: Position, margin: f64) -> Position {
        Position::new(
            pos.x.clamp(-margin, (self.width + margin).max(-margin)),
            pos.y.clamp(-margin, (self.height + margin).max(-margin)),
        )
    }
}

impl SimTime {
    /// Advance by one step of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
