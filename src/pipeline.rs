//! Per-participant frame pipeline: landmarks in, window record out.

use log::debug;

use crate::{
    geometry::{FrameSignals, GeometryEngine},
    orientation::{Landmark, OrientationEstimator},
    window_state::WindowGeometry,
};

/// Orientation estimator and geometry engine for one tracked participant
#[derive(Debug)]
pub struct GazeWindowPipeline {
    estimator: OrientationEstimator,
    engine: GeometryEngine,
    latest: Option<WindowGeometry>,
    frames_processed: u64,
    frames_skipped: u64,
}

impl GazeWindowPipeline {
    #[must_use]
    pub const fn new(estimator: OrientationEstimator, engine: GeometryEngine) -> Self {
        Self {
            estimator,
            engine,
            latest: None,
            frames_processed: 0,
            frames_skipped: 0,
        }
    }

    /// Process one landmark frame.
    ///
    /// Returns `None` when the frame is skipped; the smoothing history and
    /// the latest record are then left untouched.
    pub fn process_frame(&mut self, landmarks: &[Landmark], signals: &FrameSignals) -> Option<WindowGeometry> {
        let Some(orientation) = self.estimator.estimate(landmarks) else {
            self.frames_skipped += 1;
            debug!("Frame skipped ({} so far)", self.frames_skipped);
            return None;
        };

        let geometry = self.engine.compute(&orientation, signals);
        self.frames_processed += 1;
        self.latest = Some(geometry.clone());
        Some(geometry)
    }

    /// Last record produced, if any frame has been processed
    #[must_use]
    pub const fn latest(&self) -> Option<&WindowGeometry> {
        self.latest.as_ref()
    }

    #[must_use]
    pub const fn engine(&self) -> &GeometryEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GeometryEngine {
        &mut self.engine
    }

    #[must_use]
    pub const fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    #[must_use]
    pub const fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }

    /// Forget smoothing history and the latest record
    pub fn reset(&mut self) {
        self.engine.reset();
        self.latest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{condition::Condition, layout::ScreenSize};

    fn pipeline() -> GazeWindowPipeline {
        GazeWindowPipeline::new(
            OrientationEstimator::default(),
            GeometryEngine::with_defaults(1, ScreenSize::new(1000.0, 500.0)),
        )
    }

    fn turned_frame(dx: f64) -> Vec<Landmark> {
        vec![Landmark::new(0.5 - dx, 0.5), Landmark::new(0.5 + dx, 0.5)]
    }

    #[test]
    fn test_skipped_frame_leaves_state() {
        let mut pipeline = pipeline();
        let signals = FrameSignals::new(Condition::SizeChange, 0);

        assert!(pipeline.process_frame(&[], &signals).is_none());
        assert!(pipeline.latest().is_none());

        let first = pipeline.process_frame(&turned_frame(0.0), &signals).unwrap();
        assert!(pipeline.process_frame(&[Landmark::new(0.5, 0.5)], &signals).is_none());
        assert_eq!(pipeline.latest(), Some(&first));
        assert_eq!(pipeline.frames_processed(), 1);
        assert_eq!(pipeline.frames_skipped(), 2);

        // Smoothing history still holds only the first frame
        let second = pipeline.process_frame(&turned_frame(0.0), &signals).unwrap();
        assert_eq!(second.width, 1000.0);
    }

    #[test]
    fn test_smoothing_follows_turn() {
        let mut pipeline = pipeline();
        let signals = FrameSignals::new(Condition::SizeChange, 0);

        pipeline.process_frame(&turned_frame(0.0), &signals);
        // |displacement| = 0.2, rate = 1/30, raw width floors at 800
        let turned = pipeline.process_frame(&turned_frame(0.2), &signals).unwrap();
        assert_eq!(turned.width_in_case_of_change, 800.0);
        assert_eq!(turned.width, 900.0);
    }
}
