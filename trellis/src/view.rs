//! Backing-view descriptors handed to the host renderer.
//!
//! The core never interprets a [`ViewDescription`]; it only carries it from
//! the element that produced it to the resolved view tree, and compares view
//! kinds to decide between reusing and replacing a native view.

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

use crate::environment::Environment;
use crate::identity::ElementPath;
use crate::layout::LayoutAttributes;
use crate::primitives::Rect;

/// The concrete type of view a description asks for.
#[derive(Clone, Copy)]
pub struct ViewKind {
    id: TypeId,
    name: &'static str,
}

impl ViewKind {
    pub fn of<V: 'static>() -> Self {
        Self {
            id: TypeId::of::<V>(),
            name: std::any::type_name::<V>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ViewKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ViewKind {}

impl fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.rsplit("::").next().unwrap_or(self.name))
    }
}

/// An opaque request for a native view, configured by `V`.
#[derive(Clone)]
pub struct ViewDescription {
    kind: ViewKind,
    configuration: Rc<dyn Any>,
}

impl ViewDescription {
    pub fn new<V: 'static>(configuration: V) -> Self {
        Self {
            kind: ViewKind::of::<V>(),
            configuration: Rc::new(configuration),
        }
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// The configuration, if it is of type `V`.
    pub fn configuration<V: 'static>(&self) -> Option<&V> {
        self.configuration.downcast_ref::<V>()
    }
}

impl fmt::Debug for ViewDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewDescription").field("kind", &self.kind).finish()
    }
}

/// What an element knows when asked for its backing view.
#[derive(Debug, Clone)]
pub struct ViewDescriptionContext {
    /// The element's bounds in its own coordinate space.
    pub bounds: Rect,
    pub environment: Environment,
}

/// A node of the resolved view tree: one native view and its subviews.
#[derive(Debug, Clone)]
pub struct NativeViewNode {
    pub view_description: ViewDescription,
    pub layout_attributes: LayoutAttributes,
    pub environment: Environment,
    pub children: Vec<(ElementPath, NativeViewNode)>,
}

impl NativeViewNode {
    /// Snap this frame and every descendant frame to the pixel grid.
    ///
    /// Frames are relative to their parent, so snapping each one keeps every
    /// absolute edge on the grid too.
    pub fn round_to_pixels(&mut self, scale: f32) {
        self.layout_attributes = self.layout_attributes.round_to_pixels(scale);
        for (_, child) in &mut self.children {
            child.round_to_pixels(scale);
        }
    }

    /// Number of native views in this subtree, including this one.
    pub fn view_count(&self) -> usize {
        1 + self.children.iter().map(|(_, child)| child.view_count()).sum::<usize>()
    }
}
