use std::rc::Rc;

use crate::cache::CacheTree;
use crate::environment::Environment;
use crate::identity::ElementIdentifier;
use crate::layout::{LayoutAttributes, SizeConstraint};
use crate::primitives::Size;
use crate::result::LayoutResultNode;
use crate::state::ElementState;

use super::content::ElementContent;
use super::Element;

/// One child that sees a modified copy of the incoming environment.
#[derive(Clone)]
pub(crate) struct EnvironmentAdaptingStorage {
    child: Rc<dyn Element>,
    content: Rc<ElementContent>,
    adapt: Rc<dyn Fn(&mut Environment)>,
}

impl EnvironmentAdaptingStorage {
    pub fn new(child: Rc<dyn Element>, adapt: Rc<dyn Fn(&mut Environment)>) -> Self {
        let content = Rc::new(child.content());
        Self { child, content, adapt }
    }

    fn identifier(&self) -> ElementIdentifier {
        ElementIdentifier::new(self.child.element_type(), None, 1)
    }

    fn adapted(&self, environment: &Environment) -> Environment {
        let mut environment = environment.clone();
        (self.adapt)(&mut environment);
        environment
    }

    pub fn measure(
        &self,
        constraint: SizeConstraint,
        environment: &Environment,
        cache: &CacheTree,
        state: &ElementState,
    ) -> Size {
        let environment = self.adapted(environment);
        self.content.measure(
            constraint,
            &environment,
            &cache.subcache(0, 1, self.child.element_type()),
            &state.state_for(&self.identifier()),
        )
    }

    pub fn perform_layout(
        &self,
        size: Size,
        environment: &Environment,
        cache: &CacheTree,
        state: &ElementState,
    ) -> Vec<(ElementIdentifier, LayoutResultNode)> {
        let environment = self.adapted(environment);
        let identifier = self.identifier();
        let attributes = LayoutAttributes::from_size(size);
        let children = self.content.perform_layout(
            &attributes,
            &environment,
            &cache.subcache(0, 1, self.child.element_type()),
            &state.state_for(&identifier),
        );
        vec![(
            identifier,
            LayoutResultNode::new(Rc::clone(&self.child), attributes, environment, children),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::environment::EnvironmentKey;
    use crate::primitives::Rect;
    use crate::state::ElementStateTree;

    struct Gutter;

    impl EnvironmentKey for Gutter {
        type Value = f32;

        fn default_value() -> f32 {
            0.0
        }
    }

    /// As wide as the gutter it finds in the environment.
    struct GutterSized;

    impl Element for GutterSized {
        fn content(&self) -> ElementContent {
            ElementContent::measure_with(|_, env| Size::new(env.get::<Gutter>(), 1.0))
        }
    }

    #[test]
    fn test_child_sees_adapted_environment() {
        let content = ElementContent::adapted(GutterSized, |env| env.set::<Gutter>(12.0));
        let outer = Environment::new();

        assert_eq!(content.measure_detached(SizeConstraint::UNBOUNDED, &outer), Size::new(12.0, 1.0));
        assert_eq!(outer.get::<Gutter>(), 0.0);
    }

    #[test]
    fn test_layout_records_adapted_environment() {
        let content = ElementContent::adapted(GutterSized, |env| env.set::<Gutter>(7.0));
        let cache = CacheTree::new();
        let states = ElementStateTree::new();

        let children = content.perform_layout(
            &LayoutAttributes::from_size(Size::new(7.0, 1.0)),
            &Environment::new(),
            &cache,
            states.root(),
        );
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].0.to_string(), "GutterSized.1");
        assert_eq!(children[0].1.environment.get::<Gutter>(), 7.0);
    }

    struct Guttered;

    impl Element for Guttered {
        fn content(&self) -> ElementContent {
            ElementContent::adapted(GutterSized, |env| env.set::<Gutter>(9.0))
        }
    }

    #[test]
    fn test_engine_lays_out_adapted_content() {
        let mut engine = Engine::default();
        let env = Environment::new();

        let size = engine.measure(&Guttered, SizeConstraint::UNBOUNDED, &env);
        assert_eq!(size, Size::new(9.0, 1.0));

        let root = engine.layout(Guttered, Rect::new(0.0, 0.0, 9.0, 1.0), &env);
        assert_eq!(root.environment.get::<Gutter>(), 0.0);
        let (identifier, child) = &root.children[0];
        assert_eq!(identifier.to_string(), "GutterSized.1");
        assert_eq!(child.environment.get::<Gutter>(), 9.0);
        assert_eq!(child.layout_attributes.size(), Size::new(9.0, 1.0));
    }
}
