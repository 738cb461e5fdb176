//! Layout tree types produced by the layout provider.

use serde::{Deserialize, Serialize};

use super::{BBox, TextFragment};

/// A node of a page layout tree.
///
/// The set of variants is closed: text-bearing leaves, figure containers and
/// images. Consumers match on it instead of inspecting types at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutNode {
    /// A block of one or more text lines.
    TextBox(TextBox),
    /// A single line of text.
    TextLine(TextFragment),
    /// A container holding nested nodes (a Form XObject).
    Figure(Figure),
    /// A raster image. Carries no text.
    Image(ImageBox),
}

impl LayoutNode {
    /// Bounding box of the node.
    pub fn bbox(&self) -> BBox {
        match self {
            LayoutNode::TextBox(b) => b.bbox,
            LayoutNode::TextLine(l) => l.bbox(),
            LayoutNode::Figure(f) => f.bbox,
            LayoutNode::Image(i) => i.bbox,
        }
    }
}

/// A group of vertically adjacent text lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub bbox: BBox,
    pub lines: Vec<TextFragment>,
}

impl TextBox {
    /// Build a box from its lines. The bbox is the union of the line boxes.
    pub fn from_lines(lines: Vec<TextFragment>) -> Self {
        let bbox = lines
            .iter()
            .map(TextFragment::bbox)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        Self { bbox, lines }
    }

    /// Text of all lines joined by newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(TextFragment::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The whole box as a single fragment.
    pub fn to_fragment(&self) -> TextFragment {
        TextFragment::new(self.text(), self.bbox)
    }
}

/// A figure: nested content painted through a Form XObject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// XObject resource name
    pub name: String,
    pub bbox: BBox,
    pub children: Vec<LayoutNode>,
}

impl Figure {
    pub fn new(name: impl Into<String>, bbox: BBox, children: Vec<LayoutNode>) -> Self {
        Self {
            name: name.into(),
            bbox,
            children,
        }
    }
}

/// An image placed on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBox {
    /// XObject resource name
    pub name: String,
    pub bbox: BBox,
    /// Width in samples, if declared
    pub width: Option<u32>,
    /// Height in samples, if declared
    pub height: Option<u32>,
}

/// The layout tree of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Top-level nodes in content order
    pub children: Vec<LayoutNode>,
}

impl PageLayout {
    /// Create an empty page layout.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            children: Vec::new(),
        }
    }

    /// Check if the page has no layout nodes.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_box_from_lines() {
        let tb = TextBox::from_lines(vec![
            TextFragment::new("Name", BBox::new(72.0, 700.0, 100.0, 712.0)),
            TextFragment::new("Age", BBox::new(70.0, 686.0, 90.0, 698.0)),
        ]);
        assert_eq!(tb.bbox, BBox::new(70.0, 686.0, 100.0, 712.0));
        assert_eq!(tb.text(), "Name\nAge");
        assert_eq!(tb.to_fragment().bbox(), tb.bbox);
    }

    #[test]
    fn test_empty_text_box() {
        let tb = TextBox::from_lines(Vec::new());
        assert_eq!(tb.bbox, BBox::default());
        assert_eq!(tb.text(), "");
    }

    #[test]
    fn test_node_bbox() {
        let line = LayoutNode::TextLine(TextFragment::new("x", BBox::new(1.0, 2.0, 3.0, 4.0)));
        let image = LayoutNode::Image(ImageBox {
            name: "Im1".to_string(),
            bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
            width: Some(10),
            height: Some(10),
        });
        assert_eq!(line.bbox(), BBox::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(image.bbox().x1, 10.0);
    }
}
