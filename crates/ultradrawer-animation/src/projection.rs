//! Ballistic fling projection.
//!
//! Estimates where a release would come to rest if velocity decayed
//! geometrically by a fixed factor every millisecond. Velocities here are in
//! points per millisecond.

/// Per-millisecond velocity retention factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecelerationRate(f32);

impl DecelerationRate {
    /// Short, snappy flings.
    pub const FAST: DecelerationRate = DecelerationRate(0.99);
    /// Long scroll-view style flings.
    pub const NORMAL: DecelerationRate = DecelerationRate(0.998);

    pub const fn new(rate: f32) -> Self {
        Self(rate)
    }

    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Default for DecelerationRate {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Projected resting position of `origin` after a release at `velocity`.
///
/// The geometric series sums to `origin + v·r / (1 - r)`. Rates at or above
/// one never converge; debug builds assert on them and release builds fall
/// back to adding the raw velocity.
pub fn project(origin: f32, velocity: f32, rate: DecelerationRate) -> f32 {
    let r = rate.value();
    if !(r < 1.0) {
        log::warn!("deceleration rate {r} does not converge; using raw velocity");
        debug_assert!(r < 1.0, "deceleration rate {r} does not converge");
        return origin + velocity;
    }
    origin + velocity * r / (1.0 - r)
}
