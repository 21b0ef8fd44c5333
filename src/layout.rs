//! Window size bounds for the gallery layout.
//!
//! With any remote participant present the gallery has two columns, so the
//! width bounds are halved. Height bounds are divided by the row count,
//! `1 + floor(remote_count / 2)`.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, WINDOW_MIN_RATIO};

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
    /// Ratio of the minimum window size to the viewport size
    pub min_ratio: f64,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
            min_ratio: WINDOW_MIN_RATIO,
        }
    }
}

impl ScreenSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            min_ratio: WINDOW_MIN_RATIO,
        }
    }

    /// Bounds for the local window given the number of remote participants
    #[must_use]
    pub fn bounds(&self, remote_count: usize) -> LayoutBounds {
        LayoutBounds::new(
            self.width,
            self.width * self.min_ratio,
            self.height,
            self.height * self.min_ratio,
            remote_count,
        )
    }
}

/// Effective MIN/MAX/default window sizes for one layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBounds {
    pub width_max: f64,
    pub width_min: f64,
    pub height_max: f64,
    pub height_min: f64,
}

impl LayoutBounds {
    /// Scale full-screen bounds for `remote_count` remote participants
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Participant counts are small
    pub fn new(width_max: f64, width_min: f64, height_max: f64, height_min: f64, remote_count: usize) -> Self {
        let columns = if remote_count == 0 { 1.0 } else { 2.0 };
        let rows = (1 + remote_count / 2) as f64;
        Self {
            width_max: width_max / columns,
            width_min: width_min / columns,
            height_max: height_max / rows,
            height_min: height_min / rows,
        }
    }

    /// Size used when the condition does not drive the width
    #[must_use]
    pub fn default_width(&self) -> f64 {
        (self.width_max + self.width_min) / 2.0
    }

    /// Size used when the condition does not drive the height
    #[must_use]
    pub fn default_height(&self) -> f64 {
        (self.height_max + self.height_min) / 2.0
    }

    #[must_use]
    pub fn width_span(&self) -> f64 {
        self.width_max - self.width_min
    }

    #[must_use]
    pub fn height_span(&self) -> f64 {
        self.height_max - self.height_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solo_layout() {
        let bounds = ScreenSize::new(1000.0, 500.0).bounds(0);
        assert_eq!(bounds.width_max, 1000.0);
        assert_eq!(bounds.width_min, 800.0);
        assert_eq!(bounds.height_max, 500.0);
        assert_eq!(bounds.height_min, 400.0);
        assert_eq!(bounds.default_width(), 900.0);
        assert_eq!(bounds.default_height(), 450.0);
    }

    #[test]
    fn test_gallery_layout() {
        let screen = ScreenSize::new(1000.0, 600.0);

        let one = screen.bounds(1);
        assert_eq!(one.width_max, 500.0);
        assert_eq!(one.width_min, 400.0);
        assert_eq!(one.height_max, 600.0);

        let two = screen.bounds(2);
        assert_eq!(two.width_max, 500.0);
        assert_eq!(two.height_max, 300.0);
        assert_eq!(two.height_min, 240.0);

        let five = screen.bounds(5);
        assert_eq!(five.height_max, 200.0);
        assert_eq!(five.default_width(), 450.0);
    }
}
