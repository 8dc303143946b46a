//! Single-child layouts, hosted inside the multi-child contract.

use crate::environment::Environment;
use crate::error::ContractViolation;
use crate::identity::ElementType;
use crate::primitives::Size;

use super::{Layout, LayoutAttributes, LayoutItem, Measurable, SizeConstraint};

/// A layout for exactly one child, with no traits.
pub trait SingleChildLayout: 'static {
    fn measure(&self, constraint: SizeConstraint, child: &dyn Measurable, environment: &Environment) -> Size;

    /// Frame for the child. Defaults to filling `size`.
    fn layout(&self, size: Size, _child: &dyn Measurable, _environment: &Environment) -> LayoutAttributes {
        LayoutAttributes::from_size(size)
    }
}

/// Adapts a [`SingleChildLayout`] to [`Layout`].
///
/// Measuring or laying out with any number of children other than one aborts the pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleChildHost<L>(pub L);

impl<L: SingleChildLayout> SingleChildHost<L> {
    fn only<'a>(items: &'a [LayoutItem<'_, ()>]) -> &'a dyn Measurable {
        match items {
            [item] => item.content,
            _ => ContractViolation::SingleChildCount {
                layout: ElementType::of::<L>().short_name(),
                actual: items.len(),
            }
            .raise(),
        }
    }
}

impl<L: SingleChildLayout> Layout for SingleChildHost<L> {
    type Traits = ();

    fn default_traits() -> Self::Traits {}

    fn measure(&self, constraint: SizeConstraint, items: &[LayoutItem<'_, ()>], environment: &Environment) -> Size {
        self.0.measure(constraint, Self::only(items), environment)
    }

    fn layout(&self, size: Size, items: &[LayoutItem<'_, ()>], environment: &Environment) -> Vec<LayoutAttributes> {
        vec![self.0.layout(size, Self::only(items), environment)]
    }
}

/// Measures as its child and gives it the full size.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughLayout;

impl SingleChildLayout for PassthroughLayout {
    fn measure(&self, constraint: SizeConstraint, child: &dyn Measurable, _environment: &Environment) -> Size {
        child.measure(constraint)
    }
}
