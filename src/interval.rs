//! Closed ranges of `Float`, used both for valid ray parameters and for
//! clamping colour channels.

use crate::camera::Float;

/// Closed interval `[min, max]`. Any interval with `min > max` is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: Float,
    pub max: Float,
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Interval {
    pub const EMPTY: Interval = Interval {
        min: Float::INFINITY,
        max: Float::NEG_INFINITY,
    };

    pub const UNIVERSE: Interval = Interval {
        min: Float::NEG_INFINITY,
        max: Float::INFINITY,
    };

    pub const fn new(min: Float, max: Float) -> Self {
        Self { min, max }
    }

    /// Negative for empty intervals
    pub fn size(&self) -> Float {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Inclusive on both ends
    pub fn contains(&self, x: Float) -> bool {
        self.min <= x && x <= self.max
    }

    /// Exclusive on both ends
    pub fn surrounds(&self, x: Float) -> bool {
        self.min < x && x < self.max
    }

    pub fn clamp(&self, x: Float) -> Float {
        if x < self.min {
            self.min
        } else if x > self.max {
            self.max
        } else {
            x
        }
    }

    /// Same lower bound, upper bound pulled in to `max`
    pub fn with_max(&self, max: Float) -> Self {
        Self { min: self.min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_empty_and_universe() {
        assert!(Interval::EMPTY.is_empty());
        assert!(Interval::EMPTY.size() < 0.0);
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(!Interval::EMPTY.surrounds(0.0));

        assert!(!Interval::UNIVERSE.is_empty());
        assert!(Interval::UNIVERSE.contains(Float::MAX));
        assert!(Interval::UNIVERSE.surrounds(-1e300));
        assert_eq!(Interval::default(), Interval::EMPTY);
    }

    #[test]
    fn test_size() {
        assert_abs_diff_eq!(Interval::new(-1.0, 2.5).size(), 3.5);
        assert_abs_diff_eq!(Interval::new(1.0, 1.0).size(), 0.0);
    }

    #[test]
    fn test_contains_vs_surrounds_at_boundaries() {
        let i = Interval::new(0.0, 1.0);
        assert!(i.contains(0.0));
        assert!(i.contains(1.0));
        assert!(!i.surrounds(0.0));
        assert!(!i.surrounds(1.0));
        assert!(i.surrounds(0.5));
        assert!(!i.contains(1.0001));
    }

    #[test]
    fn test_clamp() {
        let i = Interval::new(0.0, 0.999);
        assert_eq!(i.clamp(-0.1), 0.0);
        assert_eq!(i.clamp(0.5), 0.5);
        assert_eq!(i.clamp(1.0), 0.999);
        assert_eq!(i.clamp(5.0), 0.999);
    }

    #[test]
    fn test_with_max() {
        let i = Interval::new(0.0, Float::INFINITY).with_max(3.0);
        assert_eq!(i, Interval::new(0.0, 3.0));
    }
}
