//! Per-frame window record exchanged with remote participants.
//!
//! Field names on the wire match the data channel payload of the existing
//! conferencing client, so the record can be decoded by either side.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    constants::{BORDER_GREEN, DEFAULT_LEFT_DIFF, DEFAULT_TOP_DIFF, UNKNOWN_PARTICIPANT_ID},
    Error, Result,
};

/// Gaze state inferred from the unsmoothed window width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GazeStatus {
    #[serde(rename = "mutual gaze")]
    MutualGaze,
    #[serde(rename = "gaze aversion")]
    GazeAversion,
    #[default]
    #[serde(rename = "")]
    Neutral,
}

impl GazeStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MutualGaze => "mutual gaze",
            Self::GazeAversion => "gaze aversion",
            Self::Neutral => "",
        }
    }
}

impl fmt::Display for GazeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RGB border colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl BorderColor {
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl Default for BorderColor {
    fn default() -> Self {
        let (red, green, blue) = BORDER_GREEN;
        Self::new(red, green, blue)
    }
}

/// Window geometry and passthrough signals for one participant and frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowGeometry {
    #[serde(rename = "ID")]
    pub participant_id: i64,
    pub top_diff: f64,
    pub left_diff: f64,
    pub width: f64,
    pub height: f64,
    pub border_red: u8,
    pub border_green: u8,
    pub border_blue: u8,
    pub border_alpha: f64,
    pub border_alpha_value_based_voice: f64,
    pub theta: f64,
    pub width_in_case_of_change: f64,
    pub height_in_case_of_change: f64,
    pub is_speaking: bool,
    pub transcript: String,
    pub gaze_status: GazeStatus,
}

impl WindowGeometry {
    /// Placeholder record shown before the first frame is processed
    #[must_use]
    pub fn initial(participant_id: i64, width: f64, height: f64) -> Self {
        let border = BorderColor::default();
        Self {
            participant_id,
            top_diff: DEFAULT_TOP_DIFF,
            left_diff: DEFAULT_LEFT_DIFF,
            width,
            height,
            border_red: border.red,
            border_green: border.green,
            border_blue: border.blue,
            border_alpha: 0.0,
            border_alpha_value_based_voice: 0.0,
            theta: 0.0,
            width_in_case_of_change: 0.0,
            height_in_case_of_change: 0.0,
            is_speaking: false,
            transcript: String::new(),
            gaze_status: GazeStatus::Neutral,
        }
    }

    /// Border colour of this record
    #[must_use]
    pub const fn border_color(&self) -> BorderColor {
        BorderColor::new(self.border_red, self.border_green, self.border_blue)
    }

    /// Encode as a data channel message
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be represented in JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::from)
    }

    /// Decode a data channel message
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a valid window record.
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(Error::from)
    }
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self::initial(UNKNOWN_PARTICIPANT_ID, 0.0, 0.0)
    }
}
