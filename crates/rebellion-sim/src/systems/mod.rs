//! ECS systems that operate on the simulation world each frame.
//!
//! Systems are plain functions that take `&mut World` (or `&World` for
//! read-only). They do not own state; entity state lives in components and
//! run-level state lives in the engine.

pub mod cleanup;
pub mod collision;
pub mod damage;
pub mod drops;
pub mod enemy_ai;
pub mod movement;
pub mod persistence;
pub mod player_control;
pub mod snapshot;
pub mod wave_scheduler;
