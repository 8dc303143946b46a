//! Frames assigned to children during arrangement.

use crate::primitives::{Point, Rect, Size};

/// The frame a layout assigns to one child, in the parent's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutAttributes {
    pub frame: Rect,
}

impl LayoutAttributes {
    #[inline]
    pub fn new(frame: Rect) -> Self {
        Self { frame }
    }

    /// Attributes filling `size` from the origin.
    #[inline]
    pub fn from_size(size: Size) -> Self {
        Self {
            frame: Rect::from_size(size),
        }
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.frame.size()
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.frame.origin()
    }

    /// Re-express these attributes in the space of `parent`'s parent.
    #[inline]
    pub fn within(&self, parent: &LayoutAttributes) -> Self {
        Self {
            frame: self.frame.translate(parent.origin()),
        }
    }

    pub fn round_to_pixels(&self, scale: f32) -> Self {
        Self {
            frame: self.frame.round_to_pixels(scale),
        }
    }
}
