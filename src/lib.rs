//! Snake Arcade - a terminal Snake game with three rule variants
//!
//! This library provides:
//! - Core game logic (game module): pure state + step function, no I/O
//! - Keyboard input mapping (input module)
//! - TUI rendering (render module)
//! - Session metrics (metrics module)
//! - The interactive runner (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
