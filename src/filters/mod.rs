//! Signal filtering for the window geometry signals.
//!
//! Width, height and border alpha are smoothed independently. Each tracked
//! participant owns its own [`GeometrySmoother`]; sharing one across
//! participants would mix their signals.

/// Moving average filter with ramp-up and batch trimming
pub mod moving_average;

use crate::{
    constants::{MOVING_AVERAGE_FRAME, MOVING_AVERAGE_TRIM_SLACK},
    Error, Result,
};
use moving_average::MovingAverageFilter;

/// Trait for all scalar signal filters
pub trait SignalFilter: Send + Sync {
    /// Feed one sample and return the filtered value
    fn apply(&mut self, value: f64) -> f64;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl SignalFilter for NoFilter {
    fn apply(&mut self, value: f64) -> f64 {
        value
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a filter from a spec such as `"none"`, `"moving_average"` or `"moving_average:10"`
///
/// # Errors
///
/// Returns `Error::FilterError` for unknown names or invalid parameters.
pub fn create_filter(spec: &str) -> Result<Box<dyn SignalFilter>> {
    let lowered = spec.to_lowercase();
    let mut parts = lowered.split(':');
    let name = parts.next().unwrap_or_default();
    let param = parts.next();
    if parts.next().is_some() {
        return Err(Error::FilterError(format!("Too many parameters in filter spec: {spec}")));
    }

    match name {
        "none" | "nofilter" => {
            if param.is_some() {
                return Err(Error::FilterError("NoFilter takes no parameters".to_string()));
            }
            Ok(Box::new(NoFilter))
        }
        "moving_average" | "movingaverage" => {
            let window = match param {
                Some(raw) => raw
                    .parse::<usize>()
                    .map_err(|_| Error::FilterError(format!("Invalid window size: {raw}")))?,
                None => MOVING_AVERAGE_FRAME,
            };
            if window == 0 {
                return Err(Error::FilterError("Window size must be greater than 0".to_string()));
            }
            Ok(Box::new(MovingAverageFilter::new(window)))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {spec}"))),
    }
}

/// Smoothed window signals for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedSignals {
    pub width: f64,
    pub height: f64,
    pub border_alpha: f64,
}

/// Three independent smoothing histories: width, height and border alpha
pub struct GeometrySmoother {
    width: Box<dyn SignalFilter>,
    height: Box<dyn SignalFilter>,
    border_alpha: Box<dyn SignalFilter>,
}

impl Default for GeometrySmoother {
    fn default() -> Self {
        Self::moving_average(MOVING_AVERAGE_FRAME)
    }
}

impl std::fmt::Debug for GeometrySmoother {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometrySmoother")
            .field("filter", &self.width.name())
            .finish()
    }
}

impl GeometrySmoother {
    /// Moving-average smoother over `window_size` frames
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    #[must_use]
    pub fn moving_average(window_size: usize) -> Self {
        Self::moving_average_with_slack(window_size, MOVING_AVERAGE_TRIM_SLACK)
    }

    /// Moving-average smoother with a custom trim slack
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    #[must_use]
    pub fn moving_average_with_slack(window_size: usize, trim_slack: usize) -> Self {
        let filter = MovingAverageFilter::with_trim_slack(window_size, trim_slack);
        Self::from_filters(Box::new(filter.clone()), Box::new(filter.clone()), Box::new(filter))
    }

    /// Assemble a smoother from one filter per channel
    #[must_use]
    pub fn from_filters(
        width: Box<dyn SignalFilter>,
        height: Box<dyn SignalFilter>,
        border_alpha: Box<dyn SignalFilter>,
    ) -> Self {
        Self {
            width,
            height,
            border_alpha,
        }
    }

    /// Build a smoother whose three channels use the given filter spec
    ///
    /// # Errors
    ///
    /// Returns an error if the filter spec is invalid.
    pub fn from_spec(spec: &str) -> Result<Self> {
        Ok(Self::from_filters(
            create_filter(spec)?,
            create_filter(spec)?,
            create_filter(spec)?,
        ))
    }

    /// Push raw values through their histories
    pub fn apply(&mut self, width: f64, height: f64, border_alpha: f64) -> SmoothedSignals {
        SmoothedSignals {
            width: self.width.apply(width),
            height: self.height.apply(height),
            border_alpha: self.border_alpha.apply(border_alpha),
        }
    }

    /// Clear all three histories
    pub fn reset(&mut self) {
        self.width.reset();
        self.height.reset();
        self.border_alpha.reset();
    }

    /// Name of the underlying filter
    #[must_use]
    pub fn name(&self) -> &str {
        self.width.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filter() {
        let mut filter = NoFilter;
        assert_eq!(filter.apply(10.0), 10.0);
        assert_eq!(filter.apply(-3.5), -3.5);
    }

    #[test]
    fn test_create_filter() {
        assert!(create_filter("none").is_ok());
        assert!(create_filter("moving_average").is_ok());
        assert!(create_filter("MovingAverage:4").is_ok());
        assert!(create_filter("moving_average:0").is_err());
        assert!(create_filter("moving_average:abc").is_err());
        assert!(create_filter("moving_average:3:1").is_err());
        assert!(create_filter("none:3").is_err());
        assert!(create_filter("kalman").is_err());
    }

    #[test]
    fn test_smoother_channels_are_independent() {
        let mut smoother = GeometrySmoother::moving_average(2);
        let first = smoother.apply(100.0, 50.0, 1.0);
        assert_eq!(first, SmoothedSignals { width: 100.0, height: 50.0, border_alpha: 1.0 });

        let second = smoother.apply(200.0, 50.0, 0.0);
        assert_eq!(second.width, 150.0);
        assert_eq!(second.height, 50.0);
        assert_eq!(second.border_alpha, 0.5);
    }

    #[test]
    fn test_smoother_reset() {
        let mut smoother = GeometrySmoother::default();
        smoother.apply(100.0, 100.0, 1.0);
        smoother.reset();
        let after = smoother.apply(10.0, 20.0, 0.0);
        assert_eq!(after, SmoothedSignals { width: 10.0, height: 20.0, border_alpha: 0.0 });
    }

    #[test]
    fn test_smoother_from_spec() {
        let mut smoother = GeometrySmoother::from_spec("none").unwrap();
        assert_eq!(smoother.name(), "NoFilter");
        smoother.apply(1.0, 1.0, 1.0);
        assert_eq!(smoother.apply(5.0, 6.0, 0.2).width, 5.0);
        assert!(GeometrySmoother::from_spec("bogus").is_err());
    }
}
