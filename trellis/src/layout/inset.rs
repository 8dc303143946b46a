//! Inset layout - padding around a single child.

use crate::environment::Environment;
use crate::primitives::{Rect, Size};

use super::length::Padding;
use super::{LayoutAttributes, Measurable, SingleChildLayout, SizeConstraint};

#[derive(Debug, Clone, Copy, Default)]
pub struct InsetLayout {
    pub padding: Padding,
}

impl InsetLayout {
    pub fn new(padding: Padding) -> Self {
        Self { padding }
    }
}

impl SingleChildLayout for InsetLayout {
    fn measure(&self, constraint: SizeConstraint, child: &dyn Measurable, _environment: &Environment) -> Size {
        let inner = child.measure(constraint.deflate(&self.padding));
        Size::new(
            inner.width + self.padding.horizontal(),
            inner.height + self.padding.vertical(),
        )
    }

    fn layout(&self, size: Size, _child: &dyn Measurable, _environment: &Environment) -> LayoutAttributes {
        LayoutAttributes::new(Rect::new(
            self.padding.left,
            self.padding.top,
            (size.width - self.padding.horizontal()).max(0.0),
            (size.height - self.padding.vertical()).max(0.0),
        ))
    }
}
