use serde::Serialize;

use super::config::Difficulty;
use super::power_up::{PowerUp, PowerUpKind};
use super::state::Position;

/// Coarse phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// Waiting for a difficulty
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Read-only view of a session handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub state: SessionState,
    /// Snake segments, head first
    pub snake: Vec<Position>,
    pub food: Position,
    pub power_up: Option<PowerUp>,
    pub score: u32,
    pub level: u32,
    pub difficulty: Option<Difficulty>,
    /// Cells per second
    pub speed: f64,
    pub active_power_up: Option<PowerUpKind>,
    pub paused: bool,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }

    pub fn difficulty_label(&self) -> &'static str {
        self.difficulty.map(|d| d.label()).unwrap_or("-")
    }

    pub fn active_power_up_label(&self) -> Option<&'static str> {
        self.active_power_up.map(|kind| kind.label())
    }
}
