//! Overscroll resistance past an edge.

use crate::gesture_constants::RUBBER_BAND_COEFFICIENT;

/// Offset to apply for a raw `excess` past an edge, with the default
/// coefficient.
///
/// The result approaches `dim` as `excess` grows but never reaches it.
#[inline]
pub fn rubber_band_clamp(excess: f32, dim: f32) -> f32 {
    rubber_band_clamp_with(excess, dim, RUBBER_BAND_COEFFICIENT)
}

/// `dim · (1 - 1 / (excess · coefficient / dim + 1))`.
///
/// A zero `dim` leaves no room to stretch into, so the result is zero.
pub fn rubber_band_clamp_with(excess: f32, dim: f32, coefficient: f32) -> f32 {
    if dim <= 0.0 {
        return 0.0;
    }
    dim * (1.0 - 1.0 / (excess * coefficient / dim + 1.0))
}
