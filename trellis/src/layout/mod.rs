//! Layout protocols and the stock layouts built on them.
//!
//! A layout algorithm never sees child elements. It receives one
//! [`Measurable`] per child, paired with that child's layout-specific traits,
//! and may measure each child as often as it likes under whatever derived
//! constraint it needs. Every such measurement is memoized per child slot.
//!
//! # Architecture
//!
//! ```text
//! measure(constraint, items) -> Size
//! layout(size, items)        -> [LayoutAttributes], one per item, same order
//! ```

pub mod attributes;
pub mod constraints;
pub mod length;

pub mod centered;
pub mod inset;
pub mod overlay;
pub mod single_child;
pub mod stack;

use crate::environment::Environment;
use crate::primitives::Size;

// Re-export core types
pub use attributes::LayoutAttributes;
pub use constraints::SizeConstraint;
pub use length::{Alignment, CrossAxisAlignment, Padding};

// Re-export layouts
pub use centered::CenteredLayout;
pub use inset::InsetLayout;
pub use overlay::OverlayLayout;
pub use single_child::{PassthroughLayout, SingleChildHost, SingleChildLayout};
pub use stack::{Axis, StackLayout, StackTraits};

/// Something that can report its size under a constraint.
pub trait Measurable {
    fn measure(&self, constraint: SizeConstraint) -> Size;
}

impl<F> Measurable for F
where
    F: Fn(SizeConstraint) -> Size,
{
    fn measure(&self, constraint: SizeConstraint) -> Size {
        self(constraint)
    }
}

/// One child as seen by a [`Layout`]: its traits and a way to measure it.
pub struct LayoutItem<'a, T> {
    pub traits: &'a T,
    pub content: &'a dyn Measurable,
}

impl<T> Clone for LayoutItem<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for LayoutItem<'_, T> {}

impl<T> LayoutItem<'_, T> {
    #[inline]
    pub fn measure(&self, constraint: SizeConstraint) -> Size {
        self.content.measure(constraint)
    }
}

/// A multi-child layout algorithm.
pub trait Layout: 'static {
    /// Per-child parameters (flex factor, alignment, ...).
    type Traits: 'static;

    /// Traits used for children added without explicit ones.
    fn default_traits() -> Self::Traits;

    /// The size this layout wants under `constraint`.
    fn measure(
        &self,
        constraint: SizeConstraint,
        items: &[LayoutItem<'_, Self::Traits>],
        environment: &Environment,
    ) -> Size;

    /// Frames for every item, positionally aligned with `items`.
    ///
    /// Returning any other number of attributes than `items.len()` aborts the pass.
    fn layout(
        &self,
        size: Size,
        items: &[LayoutItem<'_, Self::Traits>],
        environment: &Environment,
    ) -> Vec<LayoutAttributes>;
}
