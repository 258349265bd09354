//! Simulation engine for Rebellion.
//!
//! Owns the hecs ECS world, runs systems once per frame in a fixed order,
//! and produces frame results and render views for the presentation layer.

pub mod engine;
pub mod scenario;
pub mod systems;
pub mod upgrades;
pub mod world_setup;

pub use engine::{PlayerLoadout, SimConfig, SimulationEngine};
pub use rebellion_core as core;

#[cfg(test)]
mod tests;
