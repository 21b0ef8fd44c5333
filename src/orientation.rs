//! Head orientation from normalized face landmarks.
//!
//! The frontal reference is read from a fixed landmark index of the *current*
//! frame, not from a stored calibration. The orientation is the direction of
//! the vector from the landmark centroid to that reference point.

use crate::{
    constants::{EPSILON, REFERENCE_LANDMARK_INDEX},
    utils::{average_all, clamp_unit, dot, norm},
};
use log::{debug, warn};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A single facial keypoint in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn clamped(self) -> Vector2<f64> {
        Vector2::new(clamp_unit(self.x), clamp_unit(self.y))
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Head orientation derived from one landmark frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadOrientation {
    /// Reference point minus landmark centroid
    pub displacement: Vector2<f64>,
    /// Signed angle against the x axis, in `(-π, π]`
    pub angle_rad: f64,
    /// Angle in degrees, in `[0, 360)`
    pub angle_deg: f64,
}

impl HeadOrientation {
    /// Build the orientation for a displacement vector.
    ///
    /// A zero displacement means the face is exactly at its reference point;
    /// the angle is reported as 0 instead of the NaN `acos(0/0)` would give.
    #[must_use]
    pub fn from_displacement(displacement: Vector2<f64>) -> Self {
        let magnitude = norm(&displacement);
        if magnitude < EPSILON {
            return Self {
                displacement,
                angle_rad: 0.0,
                angle_deg: 0.0,
            };
        }

        let base = Vector2::x();
        // Rounding can push the cosine a hair outside [-1, 1]
        let cos = (dot(&base, &displacement) / (norm(&base) * magnitude)).clamp(-1.0, 1.0);
        let mut angle_rad = cos.acos();
        let mut angle_deg = angle_rad.to_degrees();

        // acos only covers [0, π]; the vertical sign picks the half plane
        if displacement.y < 0.0 && angle_rad > 0.0 {
            angle_rad = -angle_rad;
            angle_deg = 360.0 - angle_deg;
        }
        // A nearly horizontal displacement can still round up to a full turn
        if angle_deg >= 360.0 {
            angle_deg = 0.0;
        }

        Self {
            displacement,
            angle_rad,
            angle_deg,
        }
    }

    /// Length of the displacement vector
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        norm(&self.displacement)
    }

    /// Orientation of a face looking straight at its reference point
    #[must_use]
    pub fn centered() -> Self {
        Self::from_displacement(Vector2::zeros())
    }
}

/// Estimates head orientation from landmark frames
#[derive(Debug, Clone)]
pub struct OrientationEstimator {
    reference_index: usize,
}

impl Default for OrientationEstimator {
    fn default() -> Self {
        Self::new(REFERENCE_LANDMARK_INDEX)
    }
}

impl OrientationEstimator {
    /// Create an estimator reading the frontal reference at `reference_index`
    #[must_use]
    pub const fn new(reference_index: usize) -> Self {
        Self { reference_index }
    }

    /// Index of the frontal reference landmark
    #[must_use]
    pub const fn reference_index(&self) -> usize {
        self.reference_index
    }

    /// Estimate the orientation for one frame.
    ///
    /// Returns `None` when the frame has to be skipped: no face detected
    /// (empty frame), the reference landmark is missing, or a coordinate is
    /// not finite. Out-of-range coordinates are clamped to `[0, 1]`.
    #[must_use]
    pub fn estimate(&self, landmarks: &[Landmark]) -> Option<HeadOrientation> {
        if landmarks.is_empty() {
            debug!("No face in frame, skipping");
            return None;
        }
        if landmarks.len() <= self.reference_index {
            warn!(
                "Frame has {} landmarks, reference index {} missing; skipping",
                landmarks.len(),
                self.reference_index
            );
            return None;
        }
        if landmarks.iter().any(|l| !l.is_finite()) {
            warn!("Frame contains non-finite landmark coordinates, skipping");
            return None;
        }

        let (xs, ys): (Vec<f64>, Vec<f64>) = landmarks
            .iter()
            .map(|l| {
                let p = l.clamped();
                (p.x, p.y)
            })
            .unzip();
        let centroid = Vector2::new(average_all(&xs), average_all(&ys));
        let reference = landmarks[self.reference_index].clamped();

        Some(HeadOrientation::from_displacement(reference - centroid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(points: &[(f64, f64)]) -> Vec<Landmark> {
        points.iter().map(|&(x, y)| Landmark::new(x, y)).collect()
    }

    #[test]
    fn test_empty_frame_is_skipped() {
        assert!(OrientationEstimator::default().estimate(&[]).is_none());
    }

    #[test]
    fn test_missing_reference_is_skipped() {
        let landmarks = frame(&[(0.5, 0.5)]);
        assert!(OrientationEstimator::default().estimate(&landmarks).is_none());
    }

    #[test]
    fn test_non_finite_is_skipped() {
        let landmarks = frame(&[(0.5, 0.5), (f64::NAN, 0.5)]);
        assert!(OrientationEstimator::default().estimate(&landmarks).is_none());
    }

    #[test]
    fn test_displacement_from_centroid() {
        // centroid (0.5, 0.5), reference (0.6, 0.5)
        let landmarks = frame(&[(0.4, 0.5), (0.6, 0.5), (0.5, 0.5)]);
        let orientation = OrientationEstimator::default().estimate(&landmarks).unwrap();
        assert!((orientation.displacement.x - 0.1).abs() < 1e-12);
        assert!(orientation.displacement.y.abs() < 1e-12);
        assert!(orientation.angle_deg.abs() < 1e-9);
    }

    #[test]
    fn test_coordinates_are_clamped() {
        // Reference (1.4, 0.5) clamps to (1.0, 0.5); (-0.2, 0.5) clamps to (0.0, 0.5)
        let landmarks = frame(&[(-0.2, 0.5), (1.4, 0.5)]);
        let orientation = OrientationEstimator::default().estimate(&landmarks).unwrap();
        assert!((orientation.displacement.x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_reference_tracks_current_frame() {
        let estimator = OrientationEstimator::default();
        let first = estimator.estimate(&frame(&[(0.4, 0.4), (0.5, 0.5)])).unwrap();
        // Same shape translated: identical displacement
        let second = estimator.estimate(&frame(&[(0.2, 0.1), (0.3, 0.2)])).unwrap();
        assert!((first.displacement - second.displacement).norm() < 1e-12);
    }

    #[test]
    fn test_zero_displacement_is_angle_zero() {
        let orientation = HeadOrientation::from_displacement(Vector2::zeros());
        assert_eq!(orientation.angle_rad, 0.0);
        assert_eq!(orientation.angle_deg, 0.0);
        assert_eq!(orientation, HeadOrientation::centered());
    }

    #[test]
    fn test_vertical_sign_correction() {
        let up = HeadOrientation::from_displacement(Vector2::new(0.0, -0.1));
        assert!((up.angle_deg - 270.0).abs() < 1e-9);
        assert!((up.angle_rad + std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        let down = HeadOrientation::from_displacement(Vector2::new(0.0, 0.1));
        assert!((down.angle_deg - 90.0).abs() < 1e-9);

        let up_right = HeadOrientation::from_displacement(Vector2::new(0.05, -0.1));
        assert!(up_right.angle_deg > 270.0 && up_right.angle_deg < 360.0);

        let down_right = HeadOrientation::from_displacement(Vector2::new(0.05, 0.1));
        assert!(down_right.angle_deg > 0.0 && down_right.angle_deg < 90.0);
    }

    #[test]
    fn test_left_is_half_turn() {
        let left = HeadOrientation::from_displacement(Vector2::new(-0.1, 0.0));
        assert!((left.angle_deg - 180.0).abs() < 1e-9);
        assert!((left.angle_rad - std::f64::consts::PI).abs() < 1e-12);
    }
}
