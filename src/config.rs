//! Configuration management for the gaze window application

use crate::{
    condition::Condition,
    constants::{MOVING_AVERAGE_FRAME, MOVING_AVERAGE_TRIM_SLACK},
    filters::{create_filter, GeometrySmoother},
    geometry::GeometryParams,
    layout::ScreenSize,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Viewport used for layout bounds
    pub screen: ScreenSize,

    /// Smoothing of width, height and border alpha
    pub smoothing: SmoothingConfig,

    /// Orientation to geometry mapping
    pub geometry: GeometryParams,

    /// Participant and experiment settings
    pub session: SessionConfig,
}

/// Smoothing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter type, `moving_average` or `none`
    pub filter: String,

    /// Moving average window size
    pub window: usize,

    /// Extra samples kept before the history is trimmed
    pub trim_slack: usize,
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Local participant id
    pub participant_id: i64,

    /// Condition id (1-6)
    pub condition: i64,

    /// Directory for measurement logs
    pub output_dir: PathBuf,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            filter: "moving_average".to_string(),
            window: MOVING_AVERAGE_FRAME,
            trim_slack: MOVING_AVERAGE_TRIM_SLACK,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            participant_id: 1,
            condition: 1,
            output_dir: PathBuf::from("."),
        }
    }
}

impl SessionConfig {
    /// Condition for the configured id; unknown ids fall back to Baseline
    #[must_use]
    pub fn condition(&self) -> Condition {
        Condition::from_id(self.condition)
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Create the per-participant smoother from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the filter type is unknown.
    pub fn create_smoother(&self) -> Result<GeometrySmoother> {
        // Same name normalisation as `create_filter`; a `:N` suffix overrides `window`
        let spec = self.smoothing.filter.to_lowercase();
        let (name, param) = spec
            .split_once(':')
            .map_or((spec.as_str(), None), |(name, param)| (name, Some(param)));

        if !matches!(name, "moving_average" | "movingaverage") {
            return GeometrySmoother::from_spec(&self.smoothing.filter);
        }

        let window = match param {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| Error::ConfigError(format!("Invalid window size: {raw}")))?,
            None => self.smoothing.window,
        };
        if window == 0 {
            return Err(Error::ConfigError(
                "Moving average window size must be greater than 0".to_string(),
            ));
        }
        Ok(GeometrySmoother::moving_average_with_slack(
            window,
            self.smoothing.trim_slack,
        ))
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        // Validate screen
        if !(self.screen.width > 0.0 && self.screen.height > 0.0) {
            return Err(Error::ConfigError("Screen size must be positive".to_string()));
        }
        if !(self.screen.min_ratio > 0.0 && self.screen.min_ratio < 1.0) {
            return Err(Error::ConfigError(
                "Minimum window ratio must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Validate smoothing
        if self.smoothing.window == 0 {
            return Err(Error::ConfigError(
                "Moving average window size must be greater than 0".to_string(),
            ));
        }
        create_filter(&self.smoothing.filter)
            .map_err(|e| Error::ConfigError(format!("Invalid smoothing filter: {e}")))?;

        // Validate geometry
        let geometry = &self.geometry;
        if geometry.rate_scale <= 0.0 {
            return Err(Error::ConfigError("Rate scale must be greater than 0".to_string()));
        }
        if geometry.border_alpha_min > geometry.border_alpha_max {
            return Err(Error::ConfigError(
                "Border alpha minimum must not exceed the maximum".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&geometry.border_alpha_threshold) {
            return Err(Error::ConfigError(
                "Border alpha threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..0.5).contains(&geometry.gaze_margin) {
            return Err(Error::ConfigError(
                "Gaze margin must be at least 0.0 and below 0.5".to_string(),
            ));
        }

        // Validate session
        if Condition::try_from_id(self.session.condition).is_none() {
            return Err(Error::ConfigError(format!(
                "Condition must be between 1 and 6, got {}",
                self.session.condition
            )));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Gaze Window Configuration

# Viewport in pixels; minimum window size is min_ratio of it
screen:
  width: 1280.0
  height: 720.0
  min_ratio: 0.8

# Smoothing of width, height and border alpha
smoothing:
  filter: "moving_average"
  window: 10
  trim_slack: 3

# Orientation to geometry mapping
geometry:
  distance_rate_move: 10000.0
  rate_scale: 150.0
  border_alpha_min: 0.0
  border_alpha_max: 1.0
  border_alpha_threshold: 0.015
  gaze_margin: 0.1

# Session
session:
  participant_id: 1
  condition: 1
  output_dir: "."
"#;
