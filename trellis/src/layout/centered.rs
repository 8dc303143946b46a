//! Centers a single child within the assigned frame.

use crate::environment::Environment;
use crate::primitives::{Rect, Size};

use super::{LayoutAttributes, Measurable, SingleChildLayout, SizeConstraint};

#[derive(Debug, Clone, Copy, Default)]
pub struct CenteredLayout;

impl SingleChildLayout for CenteredLayout {
    fn measure(&self, constraint: SizeConstraint, child: &dyn Measurable, _environment: &Environment) -> Size {
        child.measure(constraint)
    }

    fn layout(&self, size: Size, child: &dyn Measurable, _environment: &Environment) -> LayoutAttributes {
        let measured = child.measure(SizeConstraint::loose(size));
        let width = measured.width.min(size.width);
        let height = measured.height.min(size.height);
        LayoutAttributes::new(Rect::new(
            (size.width - width) / 2.0,
            (size.height - height) / 2.0,
            width,
            height,
        ))
    }
}
