//! Builder content: a layout plus an ordered list of children.

use std::rc::Rc;

use crate::cache::CacheTree;
use crate::environment::Environment;
use crate::error::ContractViolation;
use crate::identity::{ElementIdentifier, ElementType, IdentifierFactory, Key};
use crate::layout::{Layout, LayoutItem, SizeConstraint};
use crate::primitives::Size;
use crate::result::LayoutResultNode;
use crate::state::ElementState;

use super::content::{ChildMeasurable, ElementContent};
use super::Element;

/// Object-safe view of a [`Builder`], so content can hold any layout type.
pub(crate) trait ChildStorage {
    fn child_count(&self) -> usize;

    fn measure(
        &self,
        constraint: SizeConstraint,
        environment: &Environment,
        cache: &CacheTree,
        state: &ElementState,
    ) -> Size;

    fn perform_layout(
        &self,
        size: Size,
        environment: &Environment,
        cache: &CacheTree,
        state: &ElementState,
    ) -> Vec<(ElementIdentifier, LayoutResultNode)>;
}

struct Child<T> {
    traits: T,
    key: Option<Key>,
    element: Rc<dyn Element>,
    content: ElementContent,
}

/// Collects children for a layout `L`.
///
/// Each child's content is captured when it is added, so the element's
/// [`Element::content`] runs once per build no matter how often the child
/// is measured.
pub struct Builder<L: Layout> {
    layout: L,
    children: Vec<Child<L::Traits>>,
}

impl<L: Layout> Builder<L> {
    pub fn new(layout: L) -> Self {
        Self {
            layout,
            children: Vec::new(),
        }
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Add a child with explicit traits and an optional key.
    pub fn add(&mut self, traits: L::Traits, key: Option<Key>, element: impl Element) {
        self.add_shared(traits, key, Rc::new(element));
    }

    /// Add an already shared child.
    pub fn add_shared(&mut self, traits: L::Traits, key: Option<Key>, element: Rc<dyn Element>) {
        let content = element.content();
        self.children.push(Child {
            traits,
            key,
            element,
            content,
        });
    }

    /// Add a child with default traits and no key.
    pub fn add_child(&mut self, element: impl Element) {
        self.add(L::default_traits(), None, element);
    }

    /// Add a child with default traits under `key`.
    pub fn add_keyed(&mut self, key: impl Into<Key>, element: impl Element) {
        self.add(L::default_traits(), Some(key.into()), element);
    }

    /// Chaining form of [`Builder::add_child`].
    pub fn push(mut self, element: impl Element) -> Self {
        self.add_child(element);
        self
    }

    /// Chaining form of [`Builder::add`].
    pub fn push_with(mut self, traits: L::Traits, key: Option<Key>, element: impl Element) -> Self {
        self.add(traits, key, element);
        self
    }

    pub fn into_content(self) -> ElementContent {
        ElementContent::from_children(Rc::new(self))
    }

    fn identifiers(&self) -> Vec<ElementIdentifier> {
        let mut factory = IdentifierFactory::with_capacity(self.children.len());
        self.children
            .iter()
            .map(|child| factory.next_identifier(child.element.element_type(), child.key.clone()))
            .collect()
    }

    /// Bind each child to its cache slot and state node.
    fn measurables<'a>(
        &'a self,
        identifiers: &[ElementIdentifier],
        environment: &'a Environment,
        cache: &CacheTree,
        state: &ElementState,
    ) -> Vec<ChildMeasurable<'a>> {
        let count = self.children.len();
        self.children
            .iter()
            .zip(identifiers)
            .enumerate()
            .map(|(index, (child, identifier))| ChildMeasurable {
                content: &child.content,
                environment,
                cache: cache.subcache(index, count, child.element.element_type()),
                state: state.state_for(identifier),
            })
            .collect()
    }

    fn items<'a>(&'a self, measurables: &'a [ChildMeasurable<'_>]) -> Vec<LayoutItem<'a, L::Traits>> {
        self.children
            .iter()
            .zip(measurables)
            .map(|(child, measurable)| LayoutItem {
                traits: &child.traits,
                content: measurable,
            })
            .collect()
    }
}

impl<L: Layout> ChildStorage for Builder<L> {
    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn measure(
        &self,
        constraint: SizeConstraint,
        environment: &Environment,
        cache: &CacheTree,
        state: &ElementState,
    ) -> Size {
        let identifiers = self.identifiers();
        let measurables = self.measurables(&identifiers, environment, cache, state);
        self.layout
            .measure(constraint, &self.items(&measurables), environment)
    }

    fn perform_layout(
        &self,
        size: Size,
        environment: &Environment,
        cache: &CacheTree,
        state: &ElementState,
    ) -> Vec<(ElementIdentifier, LayoutResultNode)> {
        let identifiers = self.identifiers();
        let measurables = self.measurables(&identifiers, environment, cache, state);
        let attributes = self
            .layout
            .layout(size, &self.items(&measurables), environment);

        if attributes.len() != self.children.len() {
            ContractViolation::AttributeCountMismatch {
                layout: ElementType::of::<L>().short_name(),
                expected: self.children.len(),
                actual: attributes.len(),
            }
            .raise();
        }

        self.children
            .iter()
            .zip(identifiers)
            .zip(attributes)
            .zip(&measurables)
            .map(|(((child, identifier), attributes), measurable)| {
                let children = child
                    .content
                    .perform_layout(&attributes, environment, &measurable.cache, &measurable.state);
                let node = LayoutResultNode::new(Rc::clone(&child.element), attributes, environment.clone(), children);
                (identifier, node)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutAttributes, OverlayLayout};
    use crate::state::ElementStateTree;

    struct A;
    struct B;

    impl Element for A {
        fn content(&self) -> ElementContent {
            ElementContent::intrinsic(Size::new(10.0, 10.0))
        }
    }

    impl Element for B {
        fn content(&self) -> ElementContent {
            ElementContent::intrinsic(Size::new(20.0, 5.0))
        }
    }

    /// Drops its last frame.
    struct Short;

    impl Layout for Short {
        type Traits = ();

        fn default_traits() -> Self::Traits {}

        fn measure(&self, _: SizeConstraint, _: &[LayoutItem<'_, ()>], _: &Environment) -> Size {
            Size::ZERO
        }

        fn layout(&self, size: Size, items: &[LayoutItem<'_, ()>], _: &Environment) -> Vec<LayoutAttributes> {
            vec![LayoutAttributes::from_size(size); items.len().saturating_sub(1)]
        }
    }

    fn identifiers<L: Layout>(builder: Builder<L>) -> Vec<String> {
        builder.identifiers().iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_identifiers_count_per_type() {
        let builder = Builder::new(OverlayLayout).push(A).push(B).push(A);
        assert_eq!(identifiers(builder), vec!["A.0", "B.0", "A.1"]);
    }

    #[test]
    fn test_keys_count_separately() {
        let mut builder = Builder::new(OverlayLayout);
        builder.add_keyed("x", A);
        builder.add_child(A);
        builder.add_keyed("x", A);
        assert_eq!(identifiers(builder), vec!["A.x.0", "A.0", "A.x.1"]);
    }

    #[test]
    fn test_layout_preserves_child_order() {
        let content = Builder::new(OverlayLayout).push(B).push(A).push(B).into_content();
        let cache = CacheTree::new();
        let states = ElementStateTree::new();
        let attrs = LayoutAttributes::from_size(Size::new(50.0, 50.0));

        let children = content.perform_layout(&attrs, &Environment::new(), &cache, states.root());
        let names: Vec<String> = children.iter().map(|(id, _)| id.to_string()).collect();
        assert_eq!(names, vec!["B.0", "A.0", "B.1"]);
        assert!(children.iter().all(|(_, node)| node.layout_attributes == attrs));
    }

    #[test]
    #[should_panic(expected = "returned 1 attributes for 2 children")]
    fn test_attribute_count_mismatch_is_fatal() {
        let content = Builder::new(Short).push(A).push(B).into_content();
        let cache = CacheTree::new();
        let states = ElementStateTree::new();
        content.perform_layout(
            &LayoutAttributes::from_size(Size::new(10.0, 10.0)),
            &Environment::new(),
            &cache,
            states.root(),
        );
    }
}
