use std::rc::Rc;

use crate::cache::CacheTree;
use crate::environment::Environment;
use crate::identity::ElementIdentifier;
use crate::layout::{LayoutAttributes, SizeConstraint};
use crate::primitives::Size;
use crate::result::LayoutResultNode;
use crate::state::ElementState;

use super::Element;

type BuildFn = Rc<dyn Fn(SizeConstraint, &Environment) -> Rc<dyn Element>>;

/// One child, rebuilt on every use from the constraint it is used under.
///
/// Each build gets its own detached cache node, so measurements memoized for
/// one build are never served to another.
#[derive(Clone)]
pub(crate) struct LazyStorage {
    build: BuildFn,
}

impl LazyStorage {
    pub fn new(build: BuildFn) -> Self {
        Self { build }
    }

    /// The built child's identity. It has no siblings and no key, so it
    /// always takes count 1 regardless of what was built.
    fn identifier(child: &dyn Element) -> ElementIdentifier {
        ElementIdentifier::new(child.element_type(), None, 1)
    }

    pub fn measure(
        &self,
        constraint: SizeConstraint,
        environment: &Environment,
        cache: &CacheTree,
        state: &ElementState,
    ) -> Size {
        let child = (self.build)(constraint, environment);
        let identifier = Self::identifier(child.as_ref());
        child.content().measure(
            constraint,
            environment,
            &cache.detached_subcache(child.element_type()),
            &state.state_for(&identifier),
        )
    }

    /// Rebuilds the child for a loose constraint of `size` and gives it the
    /// full size.
    pub fn perform_layout(
        &self,
        size: Size,
        environment: &Environment,
        cache: &CacheTree,
        state: &ElementState,
    ) -> Vec<(ElementIdentifier, LayoutResultNode)> {
        let child = (self.build)(SizeConstraint::loose(size), environment);
        let identifier = Self::identifier(child.as_ref());
        let attributes = LayoutAttributes::from_size(size);
        let children = child.content().perform_layout(
            &attributes,
            environment,
            &cache.detached_subcache(child.element_type()),
            &state.state_for(&identifier),
        );
        vec![(
            identifier,
            LayoutResultNode::new(child, attributes, environment.clone(), children),
        )]
    }
}
