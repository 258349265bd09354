//! Rebellion headless runner.
//!
//! Wires config and content loading, the game loop thread, scripted pilots
//! and save files around the simulation crates.

pub mod game_loop;
pub mod loader;
pub mod persistence;
pub mod pilot;
pub mod state;

pub use rebellion_core as core;
