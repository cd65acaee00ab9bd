//! Core game logic module for Snake
//!
//! This module contains the whole simulation without any I/O or rendering
//! dependencies: the snake, the board items, scoring and the movement clock.
//! Hosts drive it through [`GameSession`] and read back a [`GameSnapshot`].

pub mod action;
pub mod config;
pub mod power_up;
pub mod session;
pub mod snapshot;
pub mod state;

// Re-export commonly used types
pub use action::{Control, Direction};
pub use config::{Difficulty, GameConfig, FPS, GRID_COUNT};
pub use power_up::{PowerUp, PowerUpKind};
pub use session::GameSession;
pub use snapshot::{GameSnapshot, SessionState};
pub use state::{Position, Snake};
