//! Power Snake - a terminal snake game with power-ups
//!
//! This library provides:
//! - Core simulation (game module): snake, session state machine, scoring,
//!   power-ups and the time-based movement cadence
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - In-process play statistics (metrics module)
//! - The interactive terminal host (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
