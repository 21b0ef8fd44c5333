//! Compass classification of the head orientation angle, used by the measurement log.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label written for angles outside `[0, 360]`
pub const DIRECTION_ERROR: &str = "Error";

/// One of eight 45° sectors, centred on the axes and diagonals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    LeftDown,
    Down,
    RightDown,
    Right,
    RightUp,
    Up,
    LeftUp,
}

impl Direction {
    /// Classify `theta` in degrees; `None` outside `[0, 360]` or for NaN
    #[must_use]
    pub fn from_theta(theta: f64) -> Option<Self> {
        if !(0.0..=360.0).contains(&theta) {
            return None;
        }
        let direction = if !(22.5..337.5).contains(&theta) {
            Self::Left
        } else if theta < 67.5 {
            Self::LeftDown
        } else if theta < 112.5 {
            Self::Down
        } else if theta < 157.5 {
            Self::RightDown
        } else if theta < 202.5 {
            Self::Right
        } else if theta < 247.5 {
            Self::RightUp
        } else if theta < 292.5 {
            Self::Up
        } else {
            Self::LeftUp
        };
        Some(direction)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::LeftDown => "LeftDown",
            Self::Down => "Down",
            Self::RightDown => "RightDown",
            Self::Right => "Right",
            Self::RightUp => "RightUp",
            Self::Up => "Up",
            Self::LeftUp => "LeftUp",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction label for the CSV log, `"Error"` when out of range
#[must_use]
pub fn classify(theta: f64) -> &'static str {
    Direction::from_theta(theta).map_or(DIRECTION_ERROR, Direction::as_str)
}
