//! Small vector helpers shared by the orientation and geometry stages.

use nalgebra::Vector2;

/// Arithmetic mean of `values[start..=end]`.
///
/// # Panics
///
/// Panics if the range is empty or out of bounds. Callers only pass
/// non-empty landmark and history slices.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Sample counts are tiny
pub fn average(values: &[f64], start: usize, end: usize) -> f64 {
    assert!(start <= end && end < values.len(), "average over an empty range");
    let slice = &values[start..=end];
    slice.iter().sum::<f64>() / slice.len() as f64
}

/// Mean of a whole slice.
///
/// # Panics
///
/// Panics on an empty slice.
#[must_use]
pub fn average_all(values: &[f64]) -> f64 {
    average(values, 0, values.len().wrapping_sub(1))
}

/// 2D dot product
#[must_use]
pub fn dot(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.dot(b)
}

/// 2D Euclidean norm
#[must_use]
pub fn norm(a: &Vector2<f64>) -> f64 {
    a.norm()
}

/// Clamp a normalized coordinate into `[0, 1]`
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
