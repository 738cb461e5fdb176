//! Page-space geometry.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box `(x0, y0, x1, y1)` in page coordinates.
///
/// `x0 < x1` and `y0 < y1` is expected but not enforced. The origin and the
/// direction of the Y axis are whatever the layout provider emits; for
/// lopdf-backed pages that is PDF user space (origin bottom-left, Y up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a box from its four coordinates.
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest box containing all the given points.
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = (f32, f32)>) -> Option<Self> {
        points.into_iter().fold(None, |acc: Option<BBox>, (x, y)| {
            Some(match acc {
                None => BBox::new(x, y, x, y),
                Some(b) => BBox::new(b.x0.min(x), b.y0.min(y), b.x1.max(x), b.y1.max(y)),
            })
        })
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    /// Length of the horizontal overlap, 0 when disjoint.
    pub fn hoverlap(&self, other: &BBox) -> f32 {
        (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0)
    }

    /// Length of the vertical overlap, 0 when disjoint.
    pub fn voverlap(&self, other: &BBox) -> f32 {
        (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0)
    }

    /// Horizontal gap between the boxes, 0 when they overlap.
    pub fn hdistance(&self, other: &BBox) -> f32 {
        (self.x0.max(other.x0) - self.x1.min(other.x1)).max(0.0)
    }

    /// Vertical gap between the boxes, 0 when they overlap.
    pub fn vdistance(&self, other: &BBox) -> f32 {
        (self.y0.max(other.y0) - self.y1.min(other.y1)).max(0.0)
    }
}
