//! Per-node state addressed by element identity.
//!
//! The state tree mirrors the element tree through [`ElementIdentifier`]s. It
//! holds no behaviour of its own: it gives the host a stable place to hang
//! data for "the same logical node" across rebuilds, and tells it which nodes
//! went away.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::identity::ElementIdentifier;

/// One node of an [`ElementStateTree`].
pub struct ElementState {
    identifier: Option<ElementIdentifier>,
    generation: Rc<Cell<u64>>,
    last_visited: Cell<u64>,
    children: RefCell<IndexMap<ElementIdentifier, Rc<ElementState>>>,
    payload: RefCell<Option<Box<dyn Any>>>,
}

impl ElementState {
    fn new(identifier: Option<ElementIdentifier>, generation: Rc<Cell<u64>>) -> Self {
        let visited = generation.get();
        Self {
            identifier,
            generation,
            last_visited: Cell::new(visited),
            children: RefCell::new(IndexMap::new()),
            payload: RefCell::new(None),
        }
    }

    /// `None` for the tree root.
    pub fn identifier(&self) -> Option<&ElementIdentifier> {
        self.identifier.as_ref()
    }

    /// The state of the child with `identifier`, created on first use.
    ///
    /// Marks the child as visited in the current pass.
    pub fn state_for(&self, identifier: &ElementIdentifier) -> Rc<ElementState> {
        let generation = self.generation.get();
        let mut children = self.children.borrow_mut();
        let child = children.entry(identifier.clone()).or_insert_with(|| {
            tracing::trace!(%identifier, "new element state");
            Rc::new(ElementState::new(Some(identifier.clone()), Rc::clone(&self.generation)))
        });
        child.last_visited.set(generation);
        Rc::clone(child)
    }

    /// The existing child state, without creating or visiting it.
    pub fn child(&self, identifier: &ElementIdentifier) -> Option<Rc<ElementState>> {
        self.children.borrow().get(identifier).cloned()
    }

    /// Identifiers of the children, in first-visit order.
    pub fn child_identifiers(&self) -> Vec<ElementIdentifier> {
        self.children.borrow().keys().cloned().collect()
    }

    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    /// Run `f` against the host payload of type `T`, creating it with `init`
    /// if absent or of another type.
    ///
    /// The payload is moved out of the slot while `f` runs, so `f` may use
    /// this node again. Anything `f` stores in the slot is overwritten on return.
    pub fn with_payload<T: 'static, R>(&self, init: impl FnOnce() -> T, f: impl FnOnce(&mut T) -> R) -> R {
        let taken = self.payload.borrow_mut().take();
        let mut payload: Box<T> = match taken.map(|payload| payload.downcast::<T>()) {
            Some(Ok(existing)) => existing,
            _ => Box::new(init()),
        };
        let result = f(&mut *payload);
        *self.payload.borrow_mut() = Some(payload);
        result
    }

    /// A copy of the payload, if one of type `T` is present.
    pub fn payload<T: Clone + 'static>(&self) -> Option<T> {
        self.payload
            .borrow()
            .as_ref()
            .and_then(|payload| payload.downcast_ref::<T>())
            .cloned()
    }

    fn prune(&self, generation: u64) -> usize {
        let mut removed = 0;
        self.children.borrow_mut().retain(|_, child| {
            if child.last_visited.get() == generation {
                removed += child.prune(generation);
                true
            } else {
                removed += child.node_count();
                false
            }
        });
        removed
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .borrow()
            .values()
            .map(|child| child.node_count())
            .sum::<usize>()
    }
}

impl std::fmt::Debug for ElementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementState")
            .field("identifier", &self.identifier)
            .field("children", &self.child_identifiers())
            .finish()
    }
}

/// Root handle of a state tree, owned by the host for one live view.
#[derive(Debug)]
pub struct ElementStateTree {
    root: Rc<ElementState>,
}

impl ElementStateTree {
    pub fn new() -> Self {
        Self {
            root: Rc::new(ElementState::new(None, Rc::new(Cell::new(0)))),
        }
    }

    pub fn root(&self) -> &Rc<ElementState> {
        &self.root
    }

    /// Start a pass. Nodes not reached through `state_for` before the next
    /// [`prune_unvisited`](Self::prune_unvisited) are dropped by it.
    pub fn begin_pass(&self) {
        let generation = &self.root.generation;
        generation.set(generation.get() + 1);
        self.root.last_visited.set(generation.get());
    }

    /// Drop every subtree not visited since [`begin_pass`](Self::begin_pass).
    ///
    /// Returns the number of nodes removed.
    pub fn prune_unvisited(&self) -> usize {
        let removed = self.root.prune(self.root.generation.get());
        if removed > 0 {
            tracing::debug!(removed, "pruned element states");
        }
        removed
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}

impl Default for ElementStateTree {
    fn default() -> Self {
        Self::new()
    }
}
