//! BARRAGE terminal application.
//!
//! This crate wires the simulation engine to a crossterm terminal: a fixed
//! rate loop thread owns the engine and the renderer, and the input adapter
//! turns key events into player commands sent over a channel.

pub mod game_loop;
pub mod input;
pub mod render;
pub mod state;

pub use barrage_core as core;
