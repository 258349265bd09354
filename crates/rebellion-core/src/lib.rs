//! Core types and definitions for the Rebellion simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, content definitions, input intent, frame results, render
//! views, the persistence snapshot, and tuning constants.
//! It performs no I/O and has no dependency on any runtime framework.

pub mod components;
pub mod constants;
pub mod content;
pub mod enums;
pub mod events;
pub mod input;
pub mod state;
pub mod types;
