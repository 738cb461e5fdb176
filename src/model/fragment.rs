//! Positioned text fragments.

use serde::{Deserialize, Serialize};

use super::BBox;

/// A positioned piece of text extracted from a page.
///
/// Fragments are immutable once created; they carry no identity beyond their
/// position in the sequence that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    text: String,
    bbox: BBox,
}

impl TextFragment {
    /// Create a fragment from its text and bounding box.
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }

    /// The fragment text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The fragment bounding box.
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// Left X bound (`bbox[0]`).
    pub fn x0(&self) -> f32 {
        self.bbox.x0
    }

    /// Lower Y bound (`bbox[1]`), the row clustering key.
    pub fn y0(&self) -> f32 {
        self.bbox.y0
    }
}
