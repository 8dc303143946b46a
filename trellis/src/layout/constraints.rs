//! Size constraints for measurement.
//!
//! Constraints flow down the element tree, describing the min/max bounds
//! an element may occupy. Either axis may be unbounded (`f32::INFINITY`).

use std::hash::{Hash, Hasher};

use crate::primitives::Size;
use super::length::Padding;

/// The space available to an element during measurement.
///
/// Similar to Flutter's BoxConstraints. Equality and hashing compare the
/// bit patterns of the four bounds, so constraints can key caches.
#[derive(Debug, Clone, Copy)]
pub struct SizeConstraint {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl SizeConstraint {
    /// Unbounded constraints (infinite max, zero min).
    pub const UNBOUNDED: Self = Self {
        min_width: 0.0,
        max_width: f32::INFINITY,
        min_height: 0.0,
        max_height: f32::INFINITY,
    };

    /// Create tight constraints (exact size required).
    #[inline]
    pub fn tight(size: Size) -> Self {
        Self {
            min_width: size.width,
            max_width: size.width,
            min_height: size.height,
            max_height: size.height,
        }
    }

    /// Create loose constraints with maximum bounds.
    #[inline]
    pub fn loose(max: Size) -> Self {
        Self {
            min_width: 0.0,
            max_width: max.width,
            min_height: 0.0,
            max_height: max.height,
        }
    }

    /// Constrained width, unbounded height (width-first measurement).
    #[inline]
    pub fn with_max_width(max_width: f32) -> Self {
        Self {
            max_width,
            ..Self::UNBOUNDED
        }
    }

    /// Constrained height, unbounded width.
    #[inline]
    pub fn with_max_height(max_height: f32) -> Self {
        Self {
            max_height,
            ..Self::UNBOUNDED
        }
    }

    /// The bounds as a `Size` of maximums.
    #[inline]
    pub fn maximum(&self) -> Size {
        Size::new(self.max_width, self.max_height)
    }

    /// Constrain a size to these bounds.
    #[inline(always)]
    pub fn constrain(&self, size: Size) -> Size {
        debug_assert!(!size.width.is_nan(), "NaN width in layout");
        debug_assert!(!size.height.is_nan(), "NaN height in layout");
        Size {
            width: size.width.max(self.min_width).min(self.max_width),
            height: size.height.max(self.min_height).min(self.max_height),
        }
    }

    #[inline]
    pub fn has_bounded_width(&self) -> bool {
        self.max_width.is_finite()
    }

    #[inline]
    pub fn has_bounded_height(&self) -> bool {
        self.max_height.is_finite()
    }

    /// Whether these are tight constraints (min == max).
    #[inline]
    pub fn is_tight(&self) -> bool {
        self.min_width == self.max_width && self.min_height == self.max_height
    }

    /// Whether `size` overflows a bounded axis.
    #[inline]
    pub fn is_exceeded_by(&self, size: Size) -> bool {
        (self.has_bounded_width() && size.width > self.max_width)
            || (self.has_bounded_height() && size.height > self.max_height)
    }

    /// Shrink constraints by padding.
    #[inline]
    pub fn deflate(&self, padding: &Padding) -> Self {
        Self {
            min_width: (self.min_width - padding.horizontal()).max(0.0),
            max_width: (self.max_width - padding.horizontal()).max(0.0),
            min_height: (self.min_height - padding.vertical()).max(0.0),
            max_height: (self.max_height - padding.vertical()).max(0.0),
        }
    }

    /// Expand constraints by padding (inverse of deflate).
    #[inline]
    pub fn inflate(&self, padding: &Padding) -> Self {
        Self {
            min_width: self.min_width + padding.horizontal(),
            max_width: if self.max_width.is_finite() {
                self.max_width + padding.horizontal()
            } else {
                f32::INFINITY
            },
            min_height: self.min_height + padding.vertical(),
            max_height: if self.max_height.is_finite() {
                self.max_height + padding.vertical()
            } else {
                f32::INFINITY
            },
        }
    }

    /// Drop the minimums, keeping the maximums.
    #[inline]
    pub fn loosen(&self) -> Self {
        Self {
            min_width: 0.0,
            min_height: 0.0,
            ..*self
        }
    }

    /// Get the biggest size that satisfies these constraints.
    ///
    /// Unbounded axes collapse to their minimum.
    #[inline]
    pub fn biggest(&self) -> Size {
        Size {
            width: if self.max_width.is_finite() { self.max_width } else { self.min_width },
            height: if self.max_height.is_finite() { self.max_height } else { self.min_height },
        }
    }

    /// Get the smallest size that satisfies these constraints.
    #[inline]
    pub fn smallest(&self) -> Size {
        Size {
            width: self.min_width,
            height: self.min_height,
        }
    }

    /// Bit patterns for equality and hashing, with `-0.0` folded into `0.0`.
    #[inline]
    fn bits(&self) -> [u32; 4] {
        fn canonical(value: f32) -> u32 {
            if value == 0.0 { 0.0f32.to_bits() } else { value.to_bits() }
        }
        [
            canonical(self.min_width),
            canonical(self.max_width),
            canonical(self.min_height),
            canonical(self.max_height),
        ]
    }
}

impl Default for SizeConstraint {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl PartialEq for SizeConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for SizeConstraint {}

impl Hash for SizeConstraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl From<Size> for SizeConstraint {
    /// A loose constraint bounded by `size`.
    fn from(size: Size) -> Self {
        Self::loose(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tight_constraints() {
        let c = SizeConstraint::tight(Size::new(100.0, 50.0));
        assert!(c.is_tight());
        assert_eq!(c.min_width, 100.0);
        assert_eq!(c.max_width, 100.0);
        assert_eq!(c.min_height, 50.0);
        assert_eq!(c.max_height, 50.0);
    }

    #[test]
    fn test_loose_constraints() {
        let c = SizeConstraint::loose(Size::new(100.0, 50.0));
        assert!(!c.is_tight());
        assert_eq!(c.min_width, 0.0);
        assert_eq!(c.max_width, 100.0);
    }

    #[test]
    fn test_constrain() {
        let c = SizeConstraint::loose(Size::new(100.0, 50.0));

        let s1 = c.constrain(Size::new(50.0, 25.0));
        assert_eq!(s1, Size::new(50.0, 25.0));

        let s2 = c.constrain(Size::new(200.0, 100.0));
        assert_eq!(s2, Size::new(100.0, 50.0));
    }

    #[test]
    fn test_deflate_inflate() {
        let c = SizeConstraint::tight(Size::new(100.0, 50.0));
        let padding = Padding::all(10.0);
        let deflated = c.deflate(&padding);
        assert_eq!(deflated.max_width, 80.0);
        assert_eq!(deflated.max_height, 30.0);
        assert_eq!(deflated.inflate(&padding), c);

        let unbounded = SizeConstraint::UNBOUNDED.inflate(&padding);
        assert!(!unbounded.has_bounded_width());
        assert_eq!(unbounded.min_width, 20.0);
    }

    #[test]
    fn test_bounded_checks() {
        let unbounded = SizeConstraint::UNBOUNDED;
        assert!(!unbounded.has_bounded_width());
        assert!(!unbounded.has_bounded_height());
        assert_eq!(unbounded.biggest(), Size::ZERO);

        let bounded = SizeConstraint::loose(Size::new(100.0, 50.0));
        assert!(bounded.has_bounded_width());
        assert!(bounded.is_exceeded_by(Size::new(101.0, 10.0)));
        assert!(!bounded.is_exceeded_by(Size::new(100.0, 50.0)));
    }

    #[test]
    fn test_constraints_are_hashable_by_value() {
        let mut set = HashSet::new();
        set.insert(SizeConstraint::loose(Size::new(500.0, 300.0)));
        set.insert(SizeConstraint::loose(Size::new(500.0, 300.0)));
        set.insert(SizeConstraint::loose(Size::new(400.0, 300.0)));
        set.insert(SizeConstraint::UNBOUNDED);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_negative_zero_bounds_match_zero() {
        let zero = SizeConstraint::tight(Size::new(0.0, 10.0));
        let negative = SizeConstraint::tight(Size::new(-0.0, 10.0));
        assert_eq!(zero, negative);

        let mut set = HashSet::new();
        set.insert(zero);
        assert!(set.contains(&negative));
    }
}
