//! Elements and their content.
//!
//! An [`Element`] is an immutable description of a piece of UI. It says
//! nothing about where it goes; instead it hands back an [`ElementContent`]
//! that knows how to measure it and lay out its children, and optionally a
//! [`ViewDescription`] for a native view that should back it.
//!
//! # Content variants
//!
//! ```text
//! Builder              a layout plus a fixed, ordered list of children
//! Lazy                 one child, rebuilt from the constraint on every use
//! EnvironmentAdapting  one child, seen through a modified environment
//! Leaf                 no children, sized by a fixed size or a closure
//! ```

mod adapted;
mod builder;
mod content;
mod lazy;

use std::rc::Rc;

use crate::identity::ElementType;
use crate::view::{ViewDescription, ViewDescriptionContext};

pub use builder::Builder;
pub use content::ElementContent;

/// A declarative, immutable description of a node in the UI tree.
pub trait Element: 'static {
    /// How this element is measured and how its children are laid out.
    fn content(&self) -> ElementContent;

    /// The native view backing this element, if any.
    ///
    /// Elements without one are flattened away when the layout result is
    /// resolved into a view tree.
    fn backing_view_description(&self, _context: &ViewDescriptionContext) -> Option<ViewDescription> {
        None
    }

    /// The concrete type of this element, used for identity.
    fn element_type(&self) -> ElementType {
        ElementType::of::<Self>()
    }
}

/// A shared element is the element it points at, identity included.
impl Element for Rc<dyn Element> {
    fn content(&self) -> ElementContent {
        (**self).content()
    }

    fn backing_view_description(&self, context: &ViewDescriptionContext) -> Option<ViewDescription> {
        (**self).backing_view_description(context)
    }

    fn element_type(&self) -> ElementType {
        (**self).element_type()
    }
}

/// Shorthand for sharing an element as a trait object.
pub fn shared(element: impl Element) -> Rc<dyn Element> {
    Rc::new(element)
}
