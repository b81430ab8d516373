//! Core game logic for the Snake variants
//!
//! Everything in here is free of I/O and rendering dependencies: a game is a
//! [`GameState`] value advanced one tick at a time by [`GameEngine::step`],
//! so any scheduler can drive it, including tests stepping manually.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Axis, Direction};
pub use config::{GameConfig, GameVariant};
pub use engine::{GameEngine, StepResult};
pub use state::{BonusFood, CollisionType, GameState, Position, Snake};
