use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::config::GRID_COUNT;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Centre cell of the grid
    pub fn center() -> Self {
        Self::new(GRID_COUNT / 2, GRID_COUNT / 2)
    }

    /// Move position by delta, wrapping around the grid edges
    pub fn wrapped_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: (self.x + dx).rem_euclid(GRID_COUNT),
            y: (self.y + dy).rem_euclid(GRID_COUNT),
        }
    }

    /// Move position one cell in a direction, wrapping around the grid edges
    pub fn stepped(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.wrapped_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Heading used by the last advance
    pub direction: Direction,
    /// Heading applied on the next advance
    pub next_direction: Direction,
    /// Keep the tail on the next advance
    pub grow: bool,
    pub double_growth: bool,
    /// Controls are inverted while set
    pub confused: bool,
    pub speed_mult: f64,
}

impl Snake {
    /// Single-segment snake at the grid centre, heading right
    pub fn new() -> Self {
        Self::at(Position::center())
    }

    /// Single-segment snake at `head`, heading right
    pub fn at(head: Position) -> Self {
        Self {
            body: vec![head],
            direction: Direction::Right,
            next_direction: Direction::Right,
            grow: false,
            double_growth: false,
            confused: false,
            speed_mult: 1.0,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if any segment, head included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Move one cell along the pending heading
    pub fn advance(&mut self) {
        assert!(!self.body.is_empty(), "cannot advance a snake without segments");

        self.direction = self.next_direction;
        let new_head = self.head().stepped(self.direction);
        self.body.insert(0, new_head);

        if !self.grow {
            self.body.pop();
        }
        self.grow = false;
    }

    /// True when the head overlaps another segment
    pub fn collided_with_self(&self) -> bool {
        self.body_segments().contains(&self.head())
    }

    /// Queue a heading change for the next advance.
    ///
    /// Confusion inverts `direction` first. A request to reverse onto the
    /// current heading is ignored.
    pub fn set_heading(&mut self, direction: Direction) {
        let direction = if self.confused {
            direction.reversed()
        } else {
            direction
        };

        if !self.direction.is_opposite(direction) {
            self.next_direction = direction;
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}
