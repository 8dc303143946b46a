//! The output of a layout pass.

use std::fmt;
use std::rc::Rc;

use crate::element::Element;
use crate::environment::Environment;
use crate::error::ContractViolation;
use crate::identity::{ElementIdentifier, ElementPath};
use crate::layout::LayoutAttributes;
use crate::primitives::Rect;
use crate::view::{NativeViewNode, ViewDescriptionContext};

/// One laid-out element and its laid-out children.
///
/// Frames are relative to the parent node.
#[derive(Clone)]
pub struct LayoutResultNode {
    pub element: Rc<dyn Element>,
    pub layout_attributes: LayoutAttributes,
    pub environment: Environment,
    pub children: Vec<(ElementIdentifier, LayoutResultNode)>,
}

impl LayoutResultNode {
    /// Frames handed to the renderer must have a finite, non-negative size.
    pub fn new(
        element: Rc<dyn Element>,
        layout_attributes: LayoutAttributes,
        environment: Environment,
        children: Vec<(ElementIdentifier, LayoutResultNode)>,
    ) -> Self {
        let size = layout_attributes.size();
        if !size.is_finite_non_negative() {
            ContractViolation::InvalidSize {
                element: element.element_type().short_name(),
                size,
            }
            .raise();
        }
        Self {
            element,
            layout_attributes,
            environment,
            children,
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|(_, child)| child.node_count()).sum::<usize>()
    }

    /// The descendant at `path`, relative to this node.
    pub fn descendant(&self, path: &ElementPath) -> Option<&LayoutResultNode> {
        path.identifiers().iter().try_fold(self, |node, identifier| {
            node.children
                .iter()
                .find(|(child_identifier, _)| child_identifier == identifier)
                .map(|(_, child)| child)
        })
    }

    /// Flatten this subtree into native views.
    ///
    /// A node with a backing view becomes a [`NativeViewNode`] owning the
    /// views resolved from its children. A node without one disappears and
    /// its resolved children are hoisted to the caller, shifted by this
    /// node's origin. Paths are relative to this node.
    pub fn resolve(&self) -> Vec<(ElementPath, NativeViewNode)> {
        let children: Vec<(ElementPath, NativeViewNode)> = self
            .children
            .iter()
            .flat_map(|(identifier, child)| {
                child
                    .resolve()
                    .into_iter()
                    .map(move |(path, node)| (path.prepending(identifier.clone()), node))
            })
            .collect();

        let context = ViewDescriptionContext {
            bounds: Rect::from_size(self.layout_attributes.size()),
            environment: self.environment.clone(),
        };

        match self.element.backing_view_description(&context) {
            Some(view_description) => vec![(
                ElementPath::empty(),
                NativeViewNode {
                    view_description,
                    layout_attributes: self.layout_attributes,
                    environment: self.environment.clone(),
                    children,
                },
            )],
            None => children
                .into_iter()
                .map(|(path, mut node)| {
                    node.layout_attributes = node.layout_attributes.within(&self.layout_attributes);
                    (path, node)
                })
                .collect(),
        }
    }
}

impl fmt::Debug for LayoutResultNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutResultNode")
            .field("element", &self.element.element_type())
            .field("frame", &self.layout_attributes.frame)
            .field("children", &self.children)
            .finish()
    }
}
