use std::collections::VecDeque;

use super::SignalFilter;
use crate::{
    constants::{MOVING_AVERAGE_FRAME, MOVING_AVERAGE_TRIM_SLACK},
    utils::average,
};

/// Moving average with a ramp-up phase and batch trimming.
///
/// Until `window` samples have been seen the output is the mean of everything
/// pushed so far. From then on it is the mean of the last `window` samples.
/// History is allowed to grow to `window + trim_slack + 1` entries; a push
/// beyond `window + trim_slack` drops exactly one oldest sample.
#[derive(Debug, Clone)]
pub struct MovingAverageFilter {
    window_size: usize,
    trim_slack: usize,
    history: VecDeque<f64>,
}

impl Default for MovingAverageFilter {
    fn default() -> Self {
        Self::new(MOVING_AVERAGE_FRAME)
    }
}

impl MovingAverageFilter {
    /// Create a filter averaging over `window_size` samples
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        Self::with_trim_slack(window_size, MOVING_AVERAGE_TRIM_SLACK)
    }

    /// Create a filter with a custom trim slack
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    #[must_use]
    pub fn with_trim_slack(window_size: usize, trim_slack: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            window_size,
            trim_slack,
            history: VecDeque::with_capacity(window_size + trim_slack + 1),
        }
    }

    /// Averaging window length
    #[must_use]
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of samples currently retained
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// True before the first sample
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Push a sample and return the smoothed value
    pub fn push(&mut self, value: f64) -> f64 {
        self.history.push_back(value);

        let len = self.history.len();
        if len < self.window_size {
            return average(self.history.make_contiguous(), 0, len - 1);
        }

        if len > self.window_size + self.trim_slack {
            self.history.pop_front();
        }
        let len = self.history.len();
        average(self.history.make_contiguous(), len - self.window_size, len - 1)
    }
}

impl SignalFilter for MovingAverageFilter {
    fn apply(&mut self, value: f64) -> f64 {
        self.push(value)
    }

    fn reset(&mut self) {
        self.history.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}
