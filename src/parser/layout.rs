//! Layout analysis: grouping positioned spans into lines, boxes and figures.
//!
//! Spans are taken in content-stream order. A span continues the current
//! line when it overlaps the line's last span vertically and sits close to it
//! horizontally; lines are then stacked into boxes when they overlap
//! horizontally and are separated by a small vertical gap. Every resulting
//! node keeps the stream position of its first span so that text, figures
//! and images come out in painting order.

use crate::model::{BBox, Figure, LayoutNode, TextBox, TextFragment};

use super::interpreter::{ContentItem, TextSpan};
use super::options::{Granularity, LayoutParams};
use super::text::needs_space;

/// Gap, as a fraction of the average glyph width, that reads as a space.
const SPACE_GAP_RATIO: f32 = 0.2;

/// Groups interpreted content into layout nodes.
#[derive(Debug, Clone, Default)]
pub(crate) struct LayoutAnalyzer {
    params: LayoutParams,
}

impl LayoutAnalyzer {
    /// Create an analyzer with the given thresholds.
    pub(crate) fn new(params: LayoutParams) -> Self {
        Self { params }
    }

    /// Build the top-level nodes of a page.
    pub(crate) fn analyze(&self, items: Vec<ContentItem>) -> Vec<LayoutNode> {
        self.build(items, self.params.granularity)
    }

    fn build(&self, items: Vec<ContentItem>, granularity: Granularity) -> Vec<LayoutNode> {
        let mut spans = Vec::new();
        let mut nodes: Vec<(usize, LayoutNode)> = Vec::new();

        for (seq, item) in items.into_iter().enumerate() {
            match item {
                ContentItem::Span(span) => spans.push((seq, span)),
                ContentItem::Form { name, bbox, items } => {
                    // Text inside figures stays at line level.
                    let children = self.build(items, Granularity::Lines);
                    let bbox = bbox
                        .or_else(|| children.iter().map(LayoutNode::bbox).reduce(|a, b| a.union(&b)))
                        .unwrap_or_default();
                    nodes.push((seq, LayoutNode::Figure(Figure::new(name, bbox, children))));
                }
                ContentItem::Image(image) => nodes.push((seq, LayoutNode::Image(image))),
            }
        }

        let span_count = spans.len();
        let lines = self.group_spans_into_lines(spans);
        let line_count = lines.len();

        match granularity {
            Granularity::Lines => nodes.extend(
                lines
                    .into_iter()
                    .map(|line| (line.seq, LayoutNode::TextLine(line.into_fragment()))),
            ),
            Granularity::Boxes => nodes.extend(
                self.group_lines_into_boxes(lines)
                    .into_iter()
                    .map(|(seq, tb)| (seq, LayoutNode::TextBox(tb))),
            ),
        }

        log::debug!(
            "Layout: {} spans, {} lines, {} nodes",
            span_count,
            line_count,
            nodes.len()
        );

        nodes.sort_by_key(|(seq, _)| *seq);
        nodes.into_iter().map(|(_, node)| node).collect()
    }

    fn group_spans_into_lines(&self, spans: Vec<(usize, TextSpan)>) -> Vec<LineBuilder> {
        let mut lines: Vec<LineBuilder> = Vec::new();

        for (seq, span) in spans {
            match lines.last_mut() {
                Some(line) if self.continues_line(line.last(), &span) => line.push(span),
                _ => lines.push(LineBuilder::new(seq, span)),
            }
        }

        lines
    }

    /// Whether `next` belongs on the same line as `prev`.
    fn continues_line(&self, prev: &TextSpan, next: &TextSpan) -> bool {
        let (a, b) = (&prev.bbox, &next.bbox);
        let min_height = a.height().min(b.height());
        let max_char_width = avg_char_width(prev).max(avg_char_width(next));

        b.x0 >= a.x0
            && a.voverlap(b) > min_height * self.params.line_overlap
            && a.hdistance(b) < max_char_width * self.params.char_margin
    }

    fn group_lines_into_boxes(&self, lines: Vec<LineBuilder>) -> Vec<(usize, TextBox)> {
        let mut boxes: Vec<(usize, Vec<TextFragment>)> = Vec::new();

        for line in lines {
            let seq = line.seq;
            let frag = line.into_fragment();
            match boxes.last_mut() {
                Some((_, group))
                    if group
                        .last()
                        .is_some_and(|prev| self.continues_box(&prev.bbox(), &frag.bbox())) =>
                {
                    group.push(frag)
                }
                _ => boxes.push((seq, vec![frag])),
            }
        }

        boxes
            .into_iter()
            .map(|(seq, group)| (seq, TextBox::from_lines(group)))
            .collect()
    }

    /// Whether line `next` stacks onto line `prev` in one box.
    fn continues_box(&self, prev: &BBox, next: &BBox) -> bool {
        let max_height = prev.height().max(next.height());
        prev.hoverlap(next) > 0.0 && prev.vdistance(next) <= max_height * self.params.line_margin
    }
}

fn avg_char_width(span: &TextSpan) -> f32 {
    let chars = span.text.chars().count();
    if chars > 0 && span.bbox.width() > 0.0 {
        span.bbox.width() / chars as f32
    } else {
        span.bbox.height() * 0.5
    }
}

/// A line under construction.
#[derive(Debug)]
struct LineBuilder {
    seq: usize,
    spans: Vec<TextSpan>,
}

impl LineBuilder {
    fn new(seq: usize, span: TextSpan) -> Self {
        Self {
            seq,
            spans: vec![span],
        }
    }

    fn last(&self) -> &TextSpan {
        // never empty: created with one span
        &self.spans[self.spans.len() - 1]
    }

    fn push(&mut self, span: TextSpan) {
        self.spans.push(span);
    }

    /// Join the spans into one fragment, inserting spaces at visible gaps.
    fn into_fragment(self) -> TextFragment {
        let mut text = String::new();
        let mut bbox: Option<BBox> = None;
        let mut prev: Option<&TextSpan> = None;

        for span in &self.spans {
            if let Some(prev) = prev {
                let gap = span.bbox.x0 - prev.bbox.x1;
                if gap > avg_char_width(span) * SPACE_GAP_RATIO && needs_space(&text, &span.text) {
                    text.push(' ');
                }
            }
            text.push_str(&span.text);
            bbox = Some(bbox.map_or(span.bbox, |b| b.union(&span.bbox)));
            prev = Some(span);
        }

        TextFragment::new(text, bbox.unwrap_or_default())
    }
}
