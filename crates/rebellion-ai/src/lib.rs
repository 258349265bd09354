//! Enemy AI for Rebellion.
//!
//! Implements the movement pattern library, pattern-specific firing
//! envelopes, and the enemy behaviour state machine. Everything here is a
//! pure function over plain data; the simulation crate owns the entities.

pub mod fsm;
pub mod patterns;
pub mod profiles;

pub use rebellion_core as core;
