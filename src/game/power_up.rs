use serde::{Deserialize, Serialize};
use std::fmt;

use super::state::Position;

/// Temporary modifier collected by moving onto its cell.
///
/// The effect lasts until the next score increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Speed multiplier 0.5
    HalfSpeed,
    /// Speed multiplier 2.0
    DoubleSpeed,
    /// Next food is worth two points
    DoubleGrowth,
    /// Direction controls are inverted
    Confusion,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::DoubleSpeed,
        PowerUpKind::Confusion,
        PowerUpKind::HalfSpeed,
        PowerUpKind::DoubleGrowth,
    ];

    /// Text shown in the HUD while the effect is active
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::HalfSpeed => "Half Speed",
            PowerUpKind::DoubleSpeed => "Double Speed",
            PowerUpKind::DoubleGrowth => "x2",
            PowerUpKind::Confusion => "Confusion",
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A power-up waiting on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub position: Position,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, position: Position) -> Self {
        Self { kind, position }
    }
}
