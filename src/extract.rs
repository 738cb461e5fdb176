//! Flattening of layout trees into text fragments.
//!
//! The walk is depth-first and pre-order: a text-bearing node yields its
//! fragment, a figure is expanded in child order, and images are skipped.
//! Neither function mutates the tree.

use serde::{Deserialize, Serialize};

use crate::model::{LayoutNode, PageLayout, TextFragment};

/// Flatten layout nodes into fragments in depth-first order.
///
/// A tree without text yields an empty vector.
pub fn extract_fragments(nodes: &[LayoutNode]) -> Vec<TextFragment> {
    let mut out = Vec::new();
    for node in nodes {
        collect_fragments(node, &mut out);
    }
    out
}

/// Flatten a whole page.
pub fn page_fragments(page: &PageLayout) -> Vec<TextFragment> {
    extract_fragments(&page.children)
}

fn collect_fragments(node: &LayoutNode, out: &mut Vec<TextFragment>) {
    match node {
        LayoutNode::TextBox(tb) => out.push(tb.to_fragment()),
        LayoutNode::TextLine(line) => out.push(line.clone()),
        LayoutNode::Figure(fig) => {
            for child in &fig.children {
                collect_fragments(child, out);
            }
        }
        LayoutNode::Image(_) => {}
    }
}

/// Plain text of a layout tree with figure nesting preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlainText {
    Text(String),
    Group(Vec<PlainText>),
}

impl PlainText {
    /// All strings in depth-first order.
    pub fn flatten(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            PlainText::Text(s) => out.push(s),
            PlainText::Group(items) => items.iter().for_each(|i| i.flatten_into(out)),
        }
    }
}

/// Extract the text of each node, turning every figure into a nested group.
///
/// Figures are kept even when they hold no text, as empty groups.
pub fn extract_plaintext(nodes: &[LayoutNode]) -> Vec<PlainText> {
    nodes
        .iter()
        .filter_map(|node| match node {
            LayoutNode::TextBox(tb) => Some(PlainText::Text(tb.text())),
            LayoutNode::TextLine(line) => Some(PlainText::Text(line.text().to_string())),
            LayoutNode::Figure(fig) => Some(PlainText::Group(extract_plaintext(&fig.children))),
            LayoutNode::Image(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Figure, ImageBox, TextBox};

    fn line(text: &str, y: f32) -> TextFragment {
        TextFragment::new(text, BBox::new(0.0, y, 40.0, y + 10.0))
    }

    fn image() -> LayoutNode {
        LayoutNode::Image(ImageBox {
            name: "Im0".to_string(),
            bbox: BBox::new(0.0, 0.0, 50.0, 50.0),
            width: None,
            height: None,
        })
    }

    #[test]
    fn test_text_box_is_one_fragment() {
        let nodes = vec![LayoutNode::TextBox(TextBox::from_lines(vec![
            line("first", 20.0),
            line("second", 8.0),
        ]))];
        let frags = extract_fragments(&nodes);
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].text(), "first\nsecond");
        assert_eq!(frags[0].y0(), 8.0);
    }

    #[test]
    fn test_no_text_gives_empty() {
        assert!(extract_fragments(&[image()]).is_empty());
        assert!(extract_fragments(&[]).is_empty());
    }

    #[test]
    fn test_nested_figures_keep_order() {
        let inner = Figure::new("Fm2", BBox::default(), vec![LayoutNode::TextLine(line("c", 1.0))]);
        let outer = Figure::new(
            "Fm1",
            BBox::default(),
            vec![
                LayoutNode::TextLine(line("b", 2.0)),
                LayoutNode::Figure(inner),
                image(),
            ],
        );
        let nodes = vec![
            LayoutNode::TextLine(line("a", 3.0)),
            LayoutNode::Figure(outer),
            LayoutNode::TextLine(line("d", 0.0)),
        ];

        let texts: Vec<String> = extract_fragments(&nodes)
            .iter()
            .map(|f| f.text().to_string())
            .collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_plaintext_nesting() {
        let fig = Figure::new(
            "Fm1",
            BBox::default(),
            vec![LayoutNode::TextLine(line("inside", 0.0)), image()],
        );
        let nodes = vec![
            LayoutNode::TextLine(line("outside", 10.0)),
            LayoutNode::Figure(fig),
            image(),
        ];

        let plain = extract_plaintext(&nodes);
        assert_eq!(
            plain,
            vec![
                PlainText::Text("outside".to_string()),
                PlainText::Group(vec![PlainText::Text("inside".to_string())]),
            ]
        );
        let all = PlainText::Group(plain);
        assert_eq!(all.flatten(), vec!["outside", "inside"]);
    }
}
