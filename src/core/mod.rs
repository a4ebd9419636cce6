//! Core game state types and simulation logic.
//!
//! Re-exports:
//! - `map`: grid map of cell codes with eager validation
//! - `entity`: entity, player and sprite state
//! - `movement`: time-corrected movement with axis-separated collision
//! - `input`: key event handling and the default bindings

pub mod entity;
pub mod input;
pub mod map;
pub mod movement;
