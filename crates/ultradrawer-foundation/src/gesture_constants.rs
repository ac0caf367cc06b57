//! Shared constants for drawer gestures and settling.
//!
//! Distances are in logical points. Velocities are noted per constant.

pub use ultradrawer_animation::SPRING_THRESHOLD;

/// Resistance of the rubber band past the first or last anchor. Same value as
/// UIKit scroll view overscroll.
pub const RUBBER_BAND_COEFFICIENT: f32 = 0.55;

/// Distance over which content fades in as the drawer leaves its bottom anchor.
pub const FADE_DISTANCE: f32 = 40.0;

/// Divisor turning a gesture velocity in points per second into the points
/// per millisecond the fling projection works in.
pub const VELOCITY_UNITS_PER_SECOND: f32 = 1000.0;

/// Content size and inset changes smaller than this are not broadcast.
pub const CONTENT_CHANGE_EPSILON: f32 = 0.0001;
