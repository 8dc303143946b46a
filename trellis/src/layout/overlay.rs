//! Overlay layout - children stacked on top of each other.

use crate::environment::Environment;
use crate::primitives::Size;

use super::{Layout, LayoutAttributes, LayoutItem, SizeConstraint};

/// Every child gets the full frame; the measured size is the componentwise
/// maximum of the children.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayLayout;

impl Layout for OverlayLayout {
    type Traits = ();

    fn default_traits() -> Self::Traits {}

    fn measure(&self, constraint: SizeConstraint, items: &[LayoutItem<'_, ()>], _environment: &Environment) -> Size {
        items
            .iter()
            .map(|item| item.measure(constraint))
            .fold(Size::ZERO, Size::max)
    }

    fn layout(&self, size: Size, items: &[LayoutItem<'_, ()>], _environment: &Environment) -> Vec<LayoutAttributes> {
        vec![LayoutAttributes::from_size(size); items.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Measurable;

    #[test]
    fn test_overlay_takes_componentwise_max() {
        let a = |_: SizeConstraint| Size::new(10.0, 40.0);
        let b = |_: SizeConstraint| Size::new(30.0, 10.0);
        let c = |_: SizeConstraint| Size::new(5.0, 5.0);
        let items = [
            LayoutItem { traits: &(), content: &a as &dyn Measurable },
            LayoutItem { traits: &(), content: &b as &dyn Measurable },
            LayoutItem { traits: &(), content: &c as &dyn Measurable },
        ];
        let env = Environment::new();

        let size = OverlayLayout.measure(SizeConstraint::UNBOUNDED, &items, &env);
        assert_eq!(size, Size::new(30.0, 40.0));

        let attrs = OverlayLayout.layout(size, &items, &env);
        assert_eq!(attrs.len(), 3);
        assert!(attrs.iter().all(|a| *a == LayoutAttributes::from_size(Size::new(30.0, 40.0))));
    }

    #[test]
    fn test_empty_overlay_is_zero() {
        let size = OverlayLayout.measure(SizeConstraint::UNBOUNDED, &[], &Environment::new());
        assert_eq!(size, Size::ZERO);
    }
}
