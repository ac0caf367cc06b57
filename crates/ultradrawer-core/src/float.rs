//! Tolerant comparisons for origins measured in fractional device pixels.

/// Comparisons with an explicit epsilon.
pub trait ApproxOrd: Copy {
    fn is_less_than(self, other: Self, eps: Self) -> bool;
    fn is_greater_than(self, other: Self, eps: Self) -> bool;
    fn is_equal_to(self, other: Self, eps: Self) -> bool;
}

impl ApproxOrd for f32 {
    #[inline]
    fn is_less_than(self, other: f32, eps: f32) -> bool {
        self < other - eps
    }

    #[inline]
    fn is_greater_than(self, other: f32, eps: f32) -> bool {
        self > other + eps
    }

    #[inline]
    fn is_equal_to(self, other: f32, eps: f32) -> bool {
        (self - other).abs() < eps
    }
}

/// Inclusive `[lower, upper]` range of origins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosedRange {
    pub lower: f32,
    pub upper: f32,
}

impl ClosedRange {
    pub fn new(lower: f32, upper: f32) -> Self {
        debug_assert!(lower <= upper, "range bounds out of order");
        Self { lower, upper }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.lower).min(self.upper)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Strictly inside, at least `eps` away from both bounds.
    pub fn contains_strictly(&self, value: f32, eps: f32) -> bool {
        value.is_greater_than(self.lower, eps) && value.is_less_than(self.upper, eps)
    }
}
