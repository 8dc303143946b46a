use std::fmt;
use std::rc::Rc;

use crate::cache::{CacheTree, MeasurementCachingKey};
use crate::environment::Environment;
use crate::identity::ElementIdentifier;
use crate::layout::{
    Layout, LayoutAttributes, Measurable, PassthroughLayout, SingleChildHost, SingleChildLayout, SizeConstraint,
};
use crate::primitives::Size;
use crate::result::LayoutResultNode;
use crate::state::{ElementState, ElementStateTree};

use super::adapted::EnvironmentAdaptingStorage;
use super::builder::{Builder, ChildStorage};
use super::lazy::LazyStorage;
use super::Element;

/// How an element is measured and how its children are laid out.
///
/// Built with one of the constructors below; the storage variant is fixed
/// at construction and never changes.
#[derive(Clone)]
pub struct ElementContent {
    storage: ContentStorage,
    caching_key: Option<MeasurementCachingKey>,
}

#[derive(Clone)]
pub(crate) enum ContentStorage {
    Builder(Rc<dyn ChildStorage>),
    Lazy(LazyStorage),
    EnvironmentAdapting(EnvironmentAdaptingStorage),
    Leaf(LeafStorage),
}

#[derive(Clone)]
pub(crate) enum LeafStorage {
    Fixed(Size),
    Measured(Rc<dyn Fn(SizeConstraint, &Environment) -> Size>),
}

impl ElementContent {
    fn from_storage(storage: ContentStorage) -> Self {
        Self {
            storage,
            caching_key: None,
        }
    }

    /// Children arranged by `layout`, added through `configure`.
    pub fn build<L: Layout>(layout: L, configure: impl FnOnce(&mut Builder<L>)) -> Self {
        let mut builder = Builder::new(layout);
        configure(&mut builder);
        builder.into_content()
    }

    /// A single child arranged by `layout`.
    pub fn single<L: SingleChildLayout>(layout: L, child: impl Element) -> Self {
        Builder::new(SingleChildHost(layout)).push(child).into_content()
    }

    /// Same size and frame as `child`.
    pub fn passthrough(child: impl Element) -> Self {
        Self::single(PassthroughLayout, child)
    }

    /// A child produced from the constraint it is measured or laid out in.
    ///
    /// `build` runs on every uncached measurement and on every layout; the
    /// element it returns is never reused across calls.
    pub fn lazy<F>(build: F) -> Self
    where
        F: Fn(SizeConstraint, &Environment) -> Rc<dyn Element> + 'static,
    {
        Self::from_storage(ContentStorage::Lazy(LazyStorage::new(Rc::new(build))))
    }

    /// `child`, measured and laid out in the environment produced by `adapt`.
    pub fn adapted<F>(child: impl Element, adapt: F) -> Self
    where
        F: Fn(&mut Environment) + 'static,
    {
        Self::from_storage(ContentStorage::EnvironmentAdapting(EnvironmentAdaptingStorage::new(
            Rc::new(child),
            Rc::new(adapt),
        )))
    }

    /// A leaf of a fixed size, constrained to whatever constraint it is
    /// measured under.
    pub fn intrinsic(size: Size) -> Self {
        Self::from_storage(ContentStorage::Leaf(LeafStorage::Fixed(size)))
    }

    /// A leaf sized by `measure`.
    pub fn measure_with<F>(measure: F) -> Self
    where
        F: Fn(SizeConstraint, &Environment) -> Size + 'static,
    {
        Self::from_storage(ContentStorage::Leaf(LeafStorage::Measured(Rc::new(measure))))
    }

    pub(crate) fn from_children(children: Rc<dyn ChildStorage>) -> Self {
        Self::from_storage(ContentStorage::Builder(children))
    }

    /// Share measurements with every other node carrying the same key.
    ///
    /// Keyed measurements survive across passes, so the key must capture
    /// every input the measurement depends on, environment values included.
    pub fn with_caching_key(mut self, key: MeasurementCachingKey) -> Self {
        self.caching_key = Some(key);
        self
    }

    pub fn caching_key(&self) -> Option<&MeasurementCachingKey> {
        self.caching_key.as_ref()
    }

    /// Number of children. Lazy content reports one without building it.
    pub fn child_count(&self) -> usize {
        match &self.storage {
            ContentStorage::Builder(children) => children.child_count(),
            ContentStorage::Lazy(_) | ContentStorage::EnvironmentAdapting(_) => 1,
            ContentStorage::Leaf(_) => 0,
        }
    }

    /// The size this content wants under `constraint`.
    ///
    /// Results are memoized in `cache`; `state` is the node's identity-keyed
    /// state, used to reach the state of its children.
    pub fn measure(
        &self,
        constraint: SizeConstraint,
        environment: &Environment,
        cache: &CacheTree,
        state: &ElementState,
    ) -> Size {
        cache.get(constraint, self.caching_key.as_ref(), || match &self.storage {
            ContentStorage::Builder(children) => children.measure(constraint, environment, cache, state),
            ContentStorage::Lazy(lazy) => lazy.measure(constraint, environment, cache, state),
            ContentStorage::EnvironmentAdapting(adapted) => adapted.measure(constraint, environment, cache, state),
            ContentStorage::Leaf(LeafStorage::Fixed(size)) => constraint.constrain(*size),
            ContentStorage::Leaf(LeafStorage::Measured(measure)) => measure(constraint, environment),
        })
    }

    /// Measure with a throwaway cache and state.
    pub fn measure_detached(&self, constraint: SizeConstraint, environment: &Environment) -> Size {
        let cache = CacheTree::new();
        let states = ElementStateTree::new();
        self.measure(constraint, environment, &cache, states.root())
    }

    /// Lay out the children within `attributes`.
    ///
    /// Returns one entry per child, in child order. Frames are relative to
    /// this node.
    pub fn perform_layout(
        &self,
        attributes: &LayoutAttributes,
        environment: &Environment,
        cache: &CacheTree,
        state: &ElementState,
    ) -> Vec<(ElementIdentifier, LayoutResultNode)> {
        let size = attributes.size();
        match &self.storage {
            ContentStorage::Builder(children) => children.perform_layout(size, environment, cache, state),
            ContentStorage::Lazy(lazy) => lazy.perform_layout(size, environment, cache, state),
            ContentStorage::EnvironmentAdapting(adapted) => adapted.perform_layout(size, environment, cache, state),
            ContentStorage::Leaf(_) => Vec::new(),
        }
    }
}

impl fmt::Debug for ElementContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.storage {
            ContentStorage::Builder(_) => "Builder",
            ContentStorage::Lazy(_) => "Lazy",
            ContentStorage::EnvironmentAdapting(_) => "EnvironmentAdapting",
            ContentStorage::Leaf(_) => "Leaf",
        };
        f.debug_struct("ElementContent")
            .field("storage", &kind)
            .field("children", &self.child_count())
            .field("caching_key", &self.caching_key)
            .finish()
    }
}

/// A child slot as handed to a layout: its content bound to its cache and
/// state for the duration of one measure or layout call.
pub(crate) struct ChildMeasurable<'a> {
    pub content: &'a ElementContent,
    pub environment: &'a Environment,
    pub cache: Rc<CacheTree>,
    pub state: Rc<ElementState>,
}

impl Measurable for ChildMeasurable<'_> {
    fn measure(&self, constraint: SizeConstraint) -> Size {
        self.content.measure(constraint, self.environment, &self.cache, &self.state)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::layout::OverlayLayout;

    struct Fixed(Size);

    impl Element for Fixed {
        fn content(&self) -> ElementContent {
            ElementContent::intrinsic(self.0)
        }
    }

    #[test]
    fn test_intrinsic_is_constrained() {
        let content = ElementContent::intrinsic(Size::new(10.0, 20.0));
        let env = Environment::new();
        assert_eq!(content.measure_detached(SizeConstraint::UNBOUNDED, &env), Size::new(10.0, 20.0));
        let size = content.measure_detached(SizeConstraint::with_max_height(5.0), &env);
        assert_eq!(size, Size::new(10.0, 5.0));
        assert_eq!(content.child_count(), 0);
    }

    #[test]
    fn test_measure_with_sees_constraint() {
        let content = ElementContent::measure_with(|c, _| Size::new(c.max_width.min(50.0), 10.0));
        let size = content.measure_detached(SizeConstraint::with_max_width(30.0), &Environment::new());
        assert_eq!(size, Size::new(30.0, 10.0));
    }

    #[test]
    fn test_child_counts() {
        let built = ElementContent::build(OverlayLayout, |b| {
            b.add_child(Fixed(Size::ZERO));
            b.add_child(Fixed(Size::ZERO));
        });
        assert_eq!(built.child_count(), 2);
        assert_eq!(ElementContent::passthrough(Fixed(Size::ZERO)).child_count(), 1);
        assert_eq!(ElementContent::lazy(|_, _| Rc::new(Fixed(Size::ZERO))).child_count(), 1);
        assert_eq!(ElementContent::adapted(Fixed(Size::ZERO), |_| {}).child_count(), 1);
    }

    #[test]
    fn test_measure_is_memoized_within_a_pass() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let content = ElementContent::measure_with(move |_, _| {
            counter.set(counter.get() + 1);
            Size::new(5.0, 5.0)
        });

        let cache = CacheTree::new();
        let states = ElementStateTree::new();
        let env = Environment::new();
        for _ in 0..3 {
            content.measure(SizeConstraint::UNBOUNDED, &env, &cache, states.root());
        }
        assert_eq!(calls.get(), 1);

        content.measure(SizeConstraint::with_max_width(3.0), &env, &cache, states.root());
        assert_eq!(calls.get(), 2);
    }
}
