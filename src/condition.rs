//! Experimental display conditions.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Which computed signal drives the visible window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Condition {
    /// Fixed size and position, voice-based border
    #[default]
    Baseline,
    /// Fixed size and position, head-orientation border alpha
    FrameChange,
    /// Smoothed size
    SizeChange,
    /// Size snapped to MIN or MAX
    SizeChangeDiscrete,
    /// Position offset by head orientation
    PositionChange,
    /// Smoothed size plus position offset
    PositionAndSizeChange,
}

impl Condition {
    /// All conditions in id order
    pub const ALL: [Self; 6] = [
        Self::Baseline,
        Self::FrameChange,
        Self::SizeChange,
        Self::SizeChangeDiscrete,
        Self::PositionChange,
        Self::PositionAndSizeChange,
    ];

    /// Map a condition id (1..=6); anything else behaves as Baseline
    #[must_use]
    pub fn from_id(id: i64) -> Self {
        Self::try_from_id(id).unwrap_or_else(|| {
            warn!("Unknown condition id {id}, using Baseline");
            Self::Baseline
        })
    }

    /// Strict id mapping
    #[must_use]
    pub const fn try_from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::Baseline),
            2 => Some(Self::FrameChange),
            3 => Some(Self::SizeChange),
            4 => Some(Self::SizeChangeDiscrete),
            5 => Some(Self::PositionChange),
            6 => Some(Self::PositionAndSizeChange),
            _ => None,
        }
    }

    /// Numeric id used in logs and file names
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Baseline => 1,
            Self::FrameChange => 2,
            Self::SizeChange => 3,
            Self::SizeChangeDiscrete => 4,
            Self::PositionChange => 5,
            Self::PositionAndSizeChange => 6,
        }
    }

    /// Display name shown to the experimenter
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Baseline => "Baseline",
            Self::FrameChange => "FrameChange",
            Self::SizeChange => "SizeChange",
            Self::SizeChangeDiscrete => "SizeChange_Discrete",
            Self::PositionChange => "PositionChange",
            Self::PositionAndSizeChange => "PositionAndSizeChange",
        }
    }

    /// Display name for a raw id; empty for ids outside 1..=6
    #[must_use]
    pub const fn name_for_id(id: i64) -> &'static str {
        match Self::try_from_id(id) {
            Some(condition) => condition.name(),
            None => "",
        }
    }

    /// Window size follows head orientation
    #[must_use]
    pub const fn drives_size(self) -> bool {
        matches!(
            self,
            Self::SizeChange | Self::SizeChangeDiscrete | Self::PositionAndSizeChange
        )
    }

    /// Window position follows head orientation
    #[must_use]
    pub const fn drives_position(self) -> bool {
        matches!(self, Self::PositionChange | Self::PositionAndSizeChange)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Condition {
    type Err = Error;

    /// Accepts an id (`"4"`) or a name (`"SizeChange_Discrete"`, case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<i64>() {
            return Self::try_from_id(id)
                .ok_or_else(|| Error::InvalidInput(format!("Condition id out of range: {id}")));
        }
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown condition: {s}")))
    }
}
