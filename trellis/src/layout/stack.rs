//! Stack layout - children flow along one axis.
//!
//! Supports flex sizing, spacing, main-axis alignment and cross-axis
//! alignment. Rows mirror horizontally in a right-to-left environment.

use crate::environment::{Environment, LayoutDirection};
use crate::primitives::{Rect, Size};

use super::length::{Alignment, CrossAxisAlignment};
use super::{Layout, LayoutAttributes, LayoutItem, SizeConstraint};

/// The direction children flow in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    #[inline]
    fn main(self, size: Size) -> f32 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    #[inline]
    fn cross(self, size: Size) -> f32 {
        match self {
            Axis::Horizontal => size.height,
            Axis::Vertical => size.width,
        }
    }

    #[inline]
    fn size(self, main: f32, cross: f32) -> Size {
        match self {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }

    #[inline]
    fn rect(self, main_pos: f32, cross_pos: f32, main: f32, cross: f32) -> Rect {
        match self {
            Axis::Horizontal => Rect::new(main_pos, cross_pos, main, cross),
            Axis::Vertical => Rect::new(cross_pos, main_pos, cross, main),
        }
    }

    /// Children are measured with the main axis unbounded and the cross axis
    /// capped at `cross_max`.
    #[inline]
    fn child_constraint(self, cross_max: f32) -> SizeConstraint {
        match self {
            Axis::Horizontal => SizeConstraint::with_max_height(cross_max),
            Axis::Vertical => SizeConstraint::with_max_width(cross_max),
        }
    }
}

/// Per-child stack parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StackTraits {
    /// Share of leftover main-axis space. Zero means the child keeps its measured size.
    pub flex: f32,
}

impl StackTraits {
    pub fn flex(flex: f32) -> Self {
        Self { flex }
    }
}

/// Lays children out one after another along an [`Axis`].
#[derive(Debug, Clone, Copy)]
pub struct StackLayout {
    pub axis: Axis,
    pub spacing: f32,
    pub alignment: Alignment,
    pub cross_alignment: CrossAxisAlignment,
}

impl StackLayout {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            spacing: 0.0,
            alignment: Alignment::Start,
            cross_alignment: CrossAxisAlignment::Stretch,
        }
    }

    /// Children flow top to bottom.
    pub fn column() -> Self {
        Self::new(Axis::Vertical)
    }

    /// Children flow in the reading direction.
    pub fn row() -> Self {
        Self::new(Axis::Horizontal)
    }

    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn cross_align(mut self, alignment: CrossAxisAlignment) -> Self {
        self.cross_alignment = alignment;
        self
    }

    fn total_spacing(&self, count: usize) -> f32 {
        if count > 1 {
            self.spacing * (count - 1) as f32
        } else {
            0.0
        }
    }
}

impl Layout for StackLayout {
    type Traits = StackTraits;

    fn default_traits() -> StackTraits {
        StackTraits::default()
    }

    fn measure(
        &self,
        constraint: SizeConstraint,
        items: &[LayoutItem<'_, StackTraits>],
        _environment: &Environment,
    ) -> Size {
        let axis = self.axis;
        let child_constraint = axis.child_constraint(axis.cross(constraint.maximum()));

        let mut main = self.total_spacing(items.len());
        let mut cross: f32 = 0.0;
        for item in items {
            let size = item.measure(child_constraint);
            // Flex children fill remaining space and don't count toward the intrinsic main size.
            if item.traits.flex <= 0.0 {
                main += axis.main(size);
            }
            cross = cross.max(axis.cross(size));
        }

        constraint.constrain(axis.size(main, cross))
    }

    fn layout(
        &self,
        size: Size,
        items: &[LayoutItem<'_, StackTraits>],
        environment: &Environment,
    ) -> Vec<LayoutAttributes> {
        let axis = self.axis;
        let main_size = axis.main(size);
        let cross_size = axis.cross(size);
        let child_constraint = axis.child_constraint(cross_size);

        // Measurement pass: fixed main sizes and flex factors
        let mut measured = Vec::with_capacity(items.len());
        let mut total_fixed = self.total_spacing(items.len());
        let mut total_flex = 0.0;
        for item in items {
            let child = item.measure(child_constraint);
            if item.traits.flex > 0.0 {
                total_flex += item.traits.flex;
            } else {
                total_fixed += axis.main(child);
            }
            measured.push(child);
        }

        let available_flex = (main_size - total_fixed).max(0.0);
        let free_space = if total_flex > 0.0 { 0.0 } else { available_flex };

        let n = items.len();
        let (mut position, gap) = match self.alignment {
            Alignment::Start => (0.0, 0.0),
            Alignment::End => (free_space, 0.0),
            Alignment::Center => (free_space / 2.0, 0.0),
            Alignment::SpaceBetween if n > 1 => (0.0, free_space / (n - 1) as f32),
            Alignment::SpaceBetween => (0.0, 0.0),
        };

        // Position pass
        let mirror = axis == Axis::Horizontal && environment.layout_direction() == LayoutDirection::RightToLeft;
        let mut attributes = Vec::with_capacity(n);
        for (item, child) in items.iter().zip(&measured) {
            let main = if item.traits.flex > 0.0 {
                item.traits.flex / total_flex * available_flex
            } else {
                axis.main(*child)
            };

            let child_cross = axis.cross(*child).min(cross_size);
            let (cross_pos, cross) = match self.cross_alignment {
                CrossAxisAlignment::Stretch => (0.0, cross_size),
                CrossAxisAlignment::Start => (0.0, child_cross),
                CrossAxisAlignment::End => (cross_size - child_cross, child_cross),
                CrossAxisAlignment::Center => ((cross_size - child_cross) / 2.0, child_cross),
            };

            let mut frame = axis.rect(position, cross_pos, main, cross);
            if mirror {
                frame.x = size.width - frame.right();
            }
            attributes.push(LayoutAttributes::new(frame));

            position += main + self.spacing + gap;
        }

        attributes
    }
}
