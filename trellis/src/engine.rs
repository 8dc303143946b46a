//! The host-facing handle for one live view.
//!
//! An [`Engine`] owns everything that persists between passes for a single
//! root: the measurement cache, the state tree and the last resolved view
//! tree. Every call is one pass.
//!
//! ```text
//! measure  -> Size                 (retained cache)
//! probe    -> Size                 (throwaway cache and state)
//! layout   -> LayoutResultNode     (prunes state, ages cache)
//! update   -> [ViewUpdate]         (layout + resolve + reconcile)
//! ```

use std::rc::Rc;

use crate::cache::CacheTree;
use crate::config::EngineConfig;
use crate::element::Element;
use crate::environment::Environment;
use crate::error::ContractViolation;
use crate::identity::{ElementIdentifier, ElementPath};
use crate::layout::{LayoutAttributes, SizeConstraint};
use crate::primitives::{Rect, Size};
use crate::reconcile::{reconcile, ViewUpdate};
use crate::result::LayoutResultNode;
use crate::state::{ElementState, ElementStateTree};
use crate::view::NativeViewNode;

/// Host-side handle for one live view: owns its cache, state and last view tree.
pub struct Engine {
    config: EngineConfig,
    cache: Rc<CacheTree>,
    states: ElementStateTree,
    views: Vec<(ElementPath, NativeViewNode)>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let cache = CacheTree::with_keyed_capacity(config.keyed_cache_capacity);
        Self {
            config,
            cache,
            states: ElementStateTree::new(),
            views: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheTree {
        &self.cache
    }

    pub fn states(&self) -> &ElementStateTree {
        &self.states
    }

    /// The view tree produced by the last [`update`](Self::update).
    pub fn views(&self) -> &[(ElementPath, NativeViewNode)] {
        &self.views
    }

    /// Measure `element` against the retained cache.
    pub fn measure(&mut self, element: &dyn Element, constraint: SizeConstraint, environment: &Environment) -> Size {
        let generation = self.begin_pass();
        let _span = tracing::debug_span!("measure_pass", generation).entered();

        let (cache, state) = self.root_scope(element);
        let size = element.content().measure(constraint, environment, &cache, &state);
        self.check_root_size(element, constraint, size);

        self.end_pass(false);
        tracing::debug!(?constraint, ?size, "measured root");
        size
    }

    /// Measure `element` without touching the live cache or state.
    ///
    /// For one-off sizing questions whose constraints should not linger in
    /// the retained cache.
    pub fn probe(&self, element: &dyn Element, constraint: SizeConstraint, environment: &Environment) -> Size {
        let cache = CacheTree::with_keyed_capacity(self.config.keyed_cache_capacity);
        let states = ElementStateTree::new();
        let state = states.root().state_for(&root_identifier(element));

        let size = element
            .content()
            .measure(constraint, environment, &cache.subcache(0, 1, element.element_type()), &state);
        self.check_root_size(element, constraint, size);
        size
    }

    /// Lay `element` out in `frame`.
    pub fn layout(&mut self, element: impl Element, frame: Rect, environment: &Environment) -> LayoutResultNode {
        self.layout_shared(Rc::new(element), frame, environment)
    }

    pub fn layout_shared(
        &mut self,
        element: Rc<dyn Element>,
        frame: Rect,
        environment: &Environment,
    ) -> LayoutResultNode {
        let generation = self.begin_pass();
        let _span = tracing::debug_span!("layout_pass", generation).entered();

        let (cache, state) = self.root_scope(element.as_ref());
        let attributes = LayoutAttributes::new(frame);
        let children = element
            .content()
            .perform_layout(&attributes, environment, &cache, &state);
        let root = LayoutResultNode::new(element, attributes, environment.clone(), children);

        self.end_pass(true);
        tracing::debug!(nodes = root.node_count(), "laid out root");
        root
    }

    /// Lay out, resolve into native views and diff against the last update.
    ///
    /// Frames are snapped to the pixel grid of the environment's display
    /// scale. Paths start with the root element's identifier.
    pub fn update(&mut self, element: impl Element, frame: Rect, environment: &Environment) -> Vec<ViewUpdate> {
        let element: Rc<dyn Element> = Rc::new(element);
        let identifier = root_identifier(element.as_ref());
        let scale = environment.display_scale();

        let root = self.layout_shared(element, frame, environment);
        let views: Vec<(ElementPath, NativeViewNode)> = root
            .resolve()
            .into_iter()
            .map(|(path, mut node)| {
                node.round_to_pixels(scale);
                (path.prepending(identifier.clone()), node)
            })
            .collect();

        let updates = reconcile(&self.views, &views);
        tracing::debug!(views = views.len(), updates = updates.len(), "reconciled views");
        self.views = views;
        updates
    }

    fn begin_pass(&mut self) -> u64 {
        if !self.config.retain_cache {
            self.cache = CacheTree::with_keyed_capacity(self.config.keyed_cache_capacity);
        }
        self.cache.begin_pass();
        self.states.begin_pass();
        self.cache.generation()
    }

    fn end_pass(&mut self, laid_out: bool) {
        let expired = self.cache.gc(self.config.cache_max_age);
        // Measurement may skip subtrees a layout would visit, so only a
        // layout pass decides which states are gone.
        let pruned = if laid_out && self.config.prune_state {
            self.states.prune_unvisited()
        } else {
            0
        };
        if expired > 0 || pruned > 0 {
            tracing::debug!(expired, pruned, "pass cleanup");
        }
    }

    fn root_scope(&self, element: &dyn Element) -> (Rc<CacheTree>, Rc<ElementState>) {
        (
            self.cache.subcache(0, 1, element.element_type()),
            self.states.root().state_for(&root_identifier(element)),
        )
    }

    fn check_root_size(&self, element: &dyn Element, constraint: SizeConstraint, size: Size) {
        if !size.is_finite_non_negative() {
            ContractViolation::InvalidSize {
                element: element.element_type().short_name(),
                size,
            }
            .raise();
        }
        if self.config.warn_on_oversize && constraint.is_exceeded_by(size) {
            tracing::warn!(
                element = element.element_type().short_name(),
                ?constraint,
                ?size,
                "element measured larger than its constraint"
            );
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn root_identifier(element: &dyn Element) -> ElementIdentifier {
    ElementIdentifier::new(element.element_type(), None, 0)
}

/// Measure `element` once, with a fresh cache and state.
pub fn measure_element(element: &dyn Element, constraint: SizeConstraint, environment: &Environment) -> Size {
    Engine::default().probe(element, constraint, environment)
}

/// Lay `element` out once in `frame`, with a fresh cache and state.
pub fn layout_element(element: impl Element, frame: Rect, environment: &Environment) -> LayoutResultNode {
    Engine::default().layout(element, frame, environment)
}
