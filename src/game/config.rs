use serde::{Deserialize, Serialize};
use std::fmt;

use super::power_up::PowerUpKind;

/// Logical window edge in pixels the board was designed around
pub const WINDOW_SIZE: u32 = 800;
/// Edge of one cell in pixels
pub const CELL_SIZE: u32 = 20;
/// Number of cells along each axis of the square, wrapping grid
pub const GRID_COUNT: i32 = (WINDOW_SIZE / CELL_SIZE) as i32;
/// Render frames per second driven by the host
pub const FPS: u32 = 60;

/// Score needed per level step
pub const POINTS_PER_LEVEL: u32 = 5;
/// A power-up appears each time the score reaches a multiple of this
pub const POWER_UP_SCORE_INTERVAL: u32 = 5;

/// Level bonus added per level on non-beginner tiers
const LEVEL_SPEED_STEP: f64 = 0.5;
/// Upper bound on the level bonus
const MAX_LEVEL_BONUS: f64 = 8.0;
/// Speed never drops below this many cells per second
pub const MIN_SPEED: f64 = 1.0;

/// Difficulty preset, chosen once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Recommended,
    Expert,
}

impl Difficulty {
    /// Menu order
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Recommended,
        Difficulty::Expert,
    ];

    /// Base speed in cells per second
    pub fn base_speed(&self) -> f64 {
        match self {
            Difficulty::Beginner => 5.0,
            Difficulty::Recommended => 8.0,
            Difficulty::Expert => 12.0,
        }
    }

    /// Extra speed earned by levelling up
    pub fn level_bonus(&self, level: u32) -> f64 {
        match self {
            Difficulty::Beginner => 0.0,
            _ => (level as f64 * LEVEL_SPEED_STEP).min(MAX_LEVEL_BONUS),
        }
    }

    /// Power-ups that may spawn at this tier
    pub fn power_up_pool(&self) -> &'static [PowerUpKind] {
        match self {
            Difficulty::Beginner => &[PowerUpKind::HalfSpeed, PowerUpKind::DoubleGrowth],
            _ => &PowerUpKind::ALL,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Recommended => "Recommended",
            Difficulty::Expert => "Expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Render frames per second
    pub fps: u32,
    /// Skip the menu and start at this difficulty
    pub difficulty: Option<Difficulty>,
    /// Seed for food and power-up placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fps: FPS,
            difficulty: None,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a configuration that starts straight at the given difficulty
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty: Some(difficulty),
            ..Default::default()
        }
    }

    /// Deterministic configuration for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Frame period derived from `fps`, never zero
    pub fn frame_millis(&self) -> u64 {
        (1000 / self.fps.max(1) as u64).max(1)
    }
}
