//! Stock elements over the stock layouts.

use std::rc::Rc;

use crate::element::{Element, ElementContent};
use crate::environment::Environment;
use crate::identity::Key;
use crate::layout::{
    Alignment, CenteredLayout, CrossAxisAlignment, InsetLayout, OverlayLayout, Padding, SizeConstraint, StackLayout,
    StackTraits,
};
use crate::primitives::Size;

/// Empty space of a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct Spacer {
    pub size: Size,
}

impl Spacer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
        }
    }
}

impl Element for Spacer {
    fn content(&self) -> ElementContent {
        ElementContent::intrinsic(self.size)
    }
}

/// Children drawn on top of each other, in order.
#[derive(Default)]
pub struct Overlay {
    children: Vec<(Option<Key>, Rc<dyn Element>)>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(mut self, element: impl Element) -> Self {
        self.children.push((None, Rc::new(element)));
        self
    }

    pub fn keyed(mut self, key: impl Into<Key>, element: impl Element) -> Self {
        self.children.push((Some(key.into()), Rc::new(element)));
        self
    }
}

impl Element for Overlay {
    fn content(&self) -> ElementContent {
        ElementContent::build(OverlayLayout, |builder| {
            for (key, element) in &self.children {
                builder.add_shared((), key.clone(), Rc::clone(element));
            }
        })
    }
}

/// Children flowing along one axis. See [`StackLayout`].
pub struct Stack {
    layout: StackLayout,
    children: Vec<(StackTraits, Option<Key>, Rc<dyn Element>)>,
}

impl Stack {
    pub fn new(layout: StackLayout) -> Self {
        Self {
            layout,
            children: Vec::new(),
        }
    }

    pub fn column() -> Self {
        Self::new(StackLayout::column())
    }

    pub fn row() -> Self {
        Self::new(StackLayout::row())
    }

    pub fn spacing(mut self, spacing: f32) -> Self {
        self.layout = self.layout.spacing(spacing);
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.layout = self.layout.align(alignment);
        self
    }

    pub fn cross_align(mut self, alignment: CrossAxisAlignment) -> Self {
        self.layout = self.layout.cross_align(alignment);
        self
    }

    pub fn child(mut self, element: impl Element) -> Self {
        self.children.push((StackTraits::default(), None, Rc::new(element)));
        self
    }

    /// A child sharing leftover space by `flex`.
    pub fn flexible(mut self, flex: f32, element: impl Element) -> Self {
        self.children.push((StackTraits::flex(flex), None, Rc::new(element)));
        self
    }

    pub fn keyed(mut self, key: impl Into<Key>, element: impl Element) -> Self {
        self.children.push((StackTraits::default(), Some(key.into()), Rc::new(element)));
        self
    }
}

impl Element for Stack {
    fn content(&self) -> ElementContent {
        ElementContent::build(self.layout, |builder| {
            for (traits, key, element) in &self.children {
                builder.add_shared(*traits, key.clone(), Rc::clone(element));
            }
        })
    }
}

/// Padding around one child.
pub struct Inset {
    pub padding: Padding,
    child: Rc<dyn Element>,
}

impl Inset {
    pub fn new(padding: Padding, child: impl Element) -> Self {
        Self {
            padding,
            child: Rc::new(child),
        }
    }

    pub fn uniform(amount: f32, child: impl Element) -> Self {
        Self::new(Padding::all(amount), child)
    }
}

impl Element for Inset {
    fn content(&self) -> ElementContent {
        ElementContent::single(InsetLayout::new(self.padding), Rc::clone(&self.child))
    }
}

/// One child, centered in whatever space it is given.
pub struct Centered {
    child: Rc<dyn Element>,
}

impl Centered {
    pub fn new(child: impl Element) -> Self {
        Self { child: Rc::new(child) }
    }
}

impl Element for Centered {
    fn content(&self) -> ElementContent {
        ElementContent::single(CenteredLayout, Rc::clone(&self.child))
    }
}

type ReadFn = Rc<dyn Fn(SizeConstraint, &Environment) -> Rc<dyn Element>>;

/// Builds its child from the constraint and environment it is given.
pub struct GeometryReader {
    build: ReadFn,
}

impl GeometryReader {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(SizeConstraint, &Environment) -> Rc<dyn Element> + 'static,
    {
        Self { build: Rc::new(build) }
    }
}

impl Element for GeometryReader {
    fn content(&self) -> ElementContent {
        let build = Rc::clone(&self.build);
        ElementContent::lazy(move |constraint, environment| build(constraint, environment))
    }
}

/// Shows its child in a modified environment.
pub struct AdaptedEnvironment {
    child: Rc<dyn Element>,
    adapt: Rc<dyn Fn(&mut Environment)>,
}

impl AdaptedEnvironment {
    pub fn new<F>(child: impl Element, adapt: F) -> Self
    where
        F: Fn(&mut Environment) + 'static,
    {
        Self {
            child: Rc::new(child),
            adapt: Rc::new(adapt),
        }
    }
}

impl Element for AdaptedEnvironment {
    fn content(&self) -> ElementContent {
        let adapt = Rc::clone(&self.adapt);
        ElementContent::adapted(Rc::clone(&self.child), move |environment| adapt(environment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{layout_element, measure_element};
    use crate::environment::{LayoutDirection, LayoutDirectionKey};
    use crate::primitives::Rect;

    #[test]
    fn test_overlay_of_spacers() {
        let overlay = Overlay::new()
            .child(Spacer::new(10.0, 40.0))
            .child(Spacer::new(30.0, 10.0))
            .child(Spacer::new(5.0, 5.0));
        let size = measure_element(&overlay, SizeConstraint::UNBOUNDED, &Environment::new());
        assert_eq!(size, Size::new(30.0, 40.0));
    }

    #[test]
    fn test_shared_child_keeps_its_identity() {
        let shared: Rc<dyn Element> = Rc::new(Spacer::new(1.0, 1.0));
        let root = layout_element(Overlay::new().child(shared), Rect::new(0.0, 0.0, 1.0, 1.0), &Environment::new());
        assert_eq!(root.children[0].0.to_string(), "Spacer.0");
    }

    #[test]
    fn test_inset_column() {
        let column = Stack::column()
            .spacing(4.0)
            .child(Spacer::new(20.0, 10.0))
            .child(Spacer::new(20.0, 10.0));
        let root = layout_element(
            Inset::uniform(5.0, column),
            Rect::new(0.0, 0.0, 30.0, 34.0),
            &Environment::new(),
        );

        let (_, column) = &root.children[0];
        assert_eq!(column.layout_attributes.frame, Rect::new(5.0, 5.0, 20.0, 24.0));
        assert_eq!(column.children[1].1.layout_attributes.frame, Rect::new(0.0, 14.0, 20.0, 10.0));
    }

    #[test]
    fn test_centered_in_frame() {
        let root = layout_element(
            Centered::new(Spacer::new(10.0, 10.0)),
            Rect::new(0.0, 0.0, 50.0, 30.0),
            &Environment::new(),
        );
        assert_eq!(root.children[0].1.layout_attributes.frame, Rect::new(20.0, 10.0, 10.0, 10.0));
    }

    #[test]
    fn test_geometry_reader_picks_child_by_width() {
        let reader = GeometryReader::new(|constraint, _| {
            if constraint.max_width > 100.0 {
                Rc::new(Spacer::new(100.0, 1.0))
            } else {
                Rc::new(Spacer::new(10.0, 1.0))
            }
        });
        let env = Environment::new();
        assert_eq!(measure_element(&reader, SizeConstraint::with_max_width(50.0), &env).width, 10.0);
        assert_eq!(measure_element(&reader, SizeConstraint::with_max_width(500.0), &env).width, 100.0);
    }

    #[test]
    fn test_adapted_environment_flips_row() {
        let row = Stack::row().child(Spacer::new(10.0, 10.0)).child(Spacer::new(20.0, 10.0));
        let rtl = AdaptedEnvironment::new(row, |env| env.set::<LayoutDirectionKey>(LayoutDirection::RightToLeft));
        let root = layout_element(rtl, Rect::new(0.0, 0.0, 100.0, 10.0), &Environment::new());

        let (_, row) = &root.children[0];
        assert_eq!(row.environment.layout_direction(), LayoutDirection::RightToLeft);
        assert_eq!(row.children[0].1.layout_attributes.frame.x, 90.0);
        assert_eq!(root.environment.layout_direction(), LayoutDirection::LeftToRight);
    }
}
